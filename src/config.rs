use std::env;

/// Environment-derived settings, resolved once at startup and carried in
/// [`crate::state::AppState`]. Request handlers never read the process
/// environment directly.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub gateway_secret_key: String,
    pub gateway_base_url: String,
    pub callback_base_url: String,
    pub webhook_base_url: String,
    pub order_ref_prefix: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let jwt_secret = env::var("JWT_SECRET")?;
        let gateway_secret_key = env::var("GATEWAY_SECRET_KEY")?;
        let gateway_base_url =
            env::var("GATEWAY_BASE_URL").unwrap_or_else(|_| "https://api.paystack.co".to_string());
        let callback_base_url = env::var("CALLBACK_BASE_URL")?;
        let webhook_base_url =
            env::var("WEBHOOK_BASE_URL").unwrap_or_else(|_| callback_base_url.clone());
        let order_ref_prefix = env::var("ORDER_REF_PREFIX").unwrap_or_else(|_| "ORD".to_string());
        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            gateway_secret_key,
            gateway_base_url,
            callback_base_url,
            webhook_base_url,
            order_ref_prefix,
        })
    }
}

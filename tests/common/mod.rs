use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

use axum_marketplace_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    entity::{products::ActiveModel as ProductActive, users::ActiveModel as UserActive},
    error::{AppError, AppResult},
    gateway::{
        CreateSubaccount, GatewayAuthorization, InitializeTransaction, PaymentGateway,
    },
    state::AppState,
};

/// Recording gateway double: captures every initialize request and mints
/// deterministic responses.
#[derive(Default)]
pub struct MockGateway {
    pub init_requests: Mutex<Vec<InitializeTransaction>>,
    pub fail_subaccount: bool,
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn initialize_transaction(
        &self,
        req: &InitializeTransaction,
    ) -> AppResult<GatewayAuthorization> {
        self.init_requests.lock().unwrap().push(req.clone());
        Ok(GatewayAuthorization {
            authorization_url: format!("https://checkout.example/{}", req.reference),
            access_code: "ACCESS123".to_string(),
        })
    }

    async fn create_subaccount(&self, _req: &CreateSubaccount) -> AppResult<String> {
        if self.fail_subaccount {
            return Err(AppError::Gateway("Could not resolve bank account".into()));
        }
        Ok("ACCT_mock".to_string())
    }
}

/// Returns `None` when no database is configured, letting callers skip.
pub async fn try_setup_state(gateway: Arc<MockGateway>) -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration tests."
            );
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url).await?;
    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;

    let config = AppConfig {
        database_url,
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: "test-secret".to_string(),
        gateway_secret_key: "sk_test".to_string(),
        gateway_base_url: "https://gateway.invalid".to_string(),
        callback_base_url: "https://shop.example".to_string(),
        webhook_base_url: "https://shop.example".to_string(),
        order_ref_prefix: "TEST".to_string(),
    };

    Ok(Some(AppState {
        pool,
        orm,
        gateway,
        config,
    }))
}

/// Seed a merchant row directly; each call uses fresh unique identifiers.
pub async fn seed_merchant(
    state: &AppState,
    subaccount: Option<&str>,
) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    let hex = id.simple().to_string();
    let tag = &hex[..8];
    UserActive {
        id: Set(id),
        email: Set(format!("merchant-{tag}@example.com")),
        name: Set("Test Merchant".into()),
        phone: Set(Some("2348012345678".into())),
        role: Set("admin".into()),
        subdomain: Set(Some(format!("store-{tag}"))),
        slug: Set(Some(format!("store-{tag}"))),
        store_name: Set(Some("Test Store".into())),
        payout_subaccount_code: Set(subaccount.map(str::to_string)),
        is_active: Set(true),
        payment_status: Set("paid".into()),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;
    Ok(id)
}

pub async fn seed_product(
    state: &AppState,
    admin_id: Uuid,
    price: f64,
    original_price: Option<f64>,
) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    ProductActive {
        id: Set(id),
        admin_id: Set(admin_id),
        name: Set("Test Widget".into()),
        category: Set("Fashion".into()),
        description: Set(Some("A product for testing".into())),
        price: Set(price),
        original_price: Set(original_price),
        adjusted_price: Set(None),
        gateway_fee: Set(None),
        units_available: Set(10),
        location_state: Set(None),
        location_address: Set(None),
        image_url: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(id)
}

use std::env;

use axum_marketplace_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    identity,
};
use uuid::Uuid;

/// Bootstrap the platform superadmin. Merchant provisioning requires a
/// superadmin bearer, so this must run once against a fresh database.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let email =
        env::var("SUPERADMIN_EMAIL").unwrap_or_else(|_| "superadmin@example.com".to_string());
    let password = env::var("SUPERADMIN_PASSWORD")
        .unwrap_or_else(|_| identity::generate_temp_password());

    let superadmin_id = ensure_superadmin(&pool, &email, &password).await?;

    println!("Seed completed. Superadmin {email} ({superadmin_id})");
    Ok(())
}

async fn ensure_superadmin(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
) -> anyhow::Result<Uuid> {
    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM users WHERE email = $1 AND role = 'superadmin'")
            .bind(email)
            .fetch_optional(pool)
            .await?;
    if let Some((id,)) = existing {
        println!("Superadmin already present");
        return Ok(id);
    }

    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO users (id, email, name, role) VALUES ($1, $2, 'Platform Operator', 'superadmin')")
        .bind(id)
        .bind(email)
        .execute(pool)
        .await?;
    identity::create_account(pool, id, email, password)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    println!("Created superadmin {email} with password {password}");
    Ok(id)
}

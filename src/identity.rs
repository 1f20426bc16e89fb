use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::{OsRng, RngCore};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::{AppError, AppResult},
    reference::encode_base36,
};

/// Narrow interface over the login-account store (`credentials` table).
/// Merchant provisioning creates accounts here and, on partial failure,
/// compensates with [`delete_account`].
pub async fn create_account(pool: &DbPool, id: Uuid, email: &str, password: &str) -> AppResult<()> {
    let password_hash = hash_password(password)?;
    sqlx::query("INSERT INTO credentials (id, email, password_hash) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(email)
        .bind(password_hash)
        .execute(pool)
        .await?;
    Ok(())
}

/// Compensating delete for a half-provisioned merchant.
pub async fn delete_account(pool: &DbPool, id: Uuid) -> AppResult<()> {
    sqlx::query("DELETE FROM credentials WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn fetch_password_hash(pool: &DbPool, email: &str) -> AppResult<Option<String>> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT password_hash FROM credentials WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(hash,)| hash))
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Temporary password for provisioned merchants; they must reset it on
/// first login.
pub fn generate_temp_password() -> String {
    encode_base36(OsRng.next_u64(), 8)
}

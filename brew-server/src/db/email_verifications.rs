//! One-time codes keyed by (email, purpose); codes are stored hashed

use sqlx::PgPool;

pub const PURPOSE_VERIFY_EMAIL: &str = "verify_email";
pub const PURPOSE_PASSWORD_RESET: &str = "password_reset";

#[derive(sqlx::FromRow)]
pub struct EmailVerification {
    pub code: String,
    pub attempts: i32,
    pub expires_at: i64,
}

pub async fn upsert(
    pool: &PgPool,
    email: &str,
    purpose: &str,
    code_hash: &str,
    expires_at: i64,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO email_verifications (email, purpose, code, attempts, expires_at, created_at)
         VALUES ($1, $2, $3, 0, $4, $5)
         ON CONFLICT (email, purpose) DO UPDATE SET
            code = $3, attempts = 0, expires_at = $4, created_at = $5",
    )
    .bind(email)
    .bind(purpose)
    .bind(code_hash)
    .bind(expires_at)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find(
    pool: &PgPool,
    email: &str,
    purpose: &str,
) -> Result<Option<EmailVerification>, sqlx::Error> {
    sqlx::query_as(
        "SELECT code, attempts, expires_at FROM email_verifications WHERE email = $1 AND purpose = $2",
    )
    .bind(email)
    .bind(purpose)
    .fetch_optional(pool)
    .await
}

pub async fn increment_attempts(pool: &PgPool, email: &str, purpose: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE email_verifications SET attempts = attempts + 1 WHERE email = $1 AND purpose = $2",
    )
    .bind(email)
    .bind(purpose)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete(pool: &PgPool, email: &str, purpose: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM email_verifications WHERE email = $1 AND purpose = $2")
        .bind(email)
        .bind(purpose)
        .execute(pool)
        .await?;
    Ok(())
}

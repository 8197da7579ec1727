//! Refresh token storage

use shared::util::now_millis;
use sqlx::PgPool;

/// Create a new refresh token for a user
pub async fn create(pool: &PgPool, user_id: i64, ttl_ms: i64) -> Result<String, sqlx::Error> {
    let token_id = uuid::Uuid::new_v4().to_string();
    let now = now_millis();

    sqlx::query(
        "INSERT INTO refresh_tokens (id, user_id, expires_at, revoked, created_at) VALUES ($1, $2, $3, FALSE, $4)",
    )
    .bind(&token_id)
    .bind(user_id)
    .bind(now + ttl_ms)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(token_id)
}

/// Validate and rotate a refresh token. Returns (user_id, new_refresh_token).
pub async fn rotate(
    pool: &PgPool,
    refresh_token: &str,
    ttl_ms: i64,
) -> Result<Option<(i64, String)>, sqlx::Error> {
    // Revoke-and-return in one statement so a token can be used once
    let row: Option<RefreshTokenRow> = sqlx::query_as(
        r#"
        UPDATE refresh_tokens SET revoked = TRUE
        WHERE id = $1 AND NOT revoked
        RETURNING user_id, expires_at
        "#,
    )
    .bind(refresh_token)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };
    if row.expires_at < now_millis() {
        return Ok(None);
    }

    let new_token = create(pool, row.user_id, ttl_ms).await?;
    Ok(Some((row.user_id, new_token)))
}

pub async fn revoke(pool: &PgPool, refresh_token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE id = $1")
        .bind(refresh_token)
        .execute(pool)
        .await?;
    Ok(())
}

/// Revoke all refresh tokens for a user
pub async fn revoke_all(pool: &PgPool, user_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE user_id = $1 AND NOT revoked")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

#[derive(sqlx::FromRow)]
struct RefreshTokenRow {
    user_id: i64,
    expires_at: i64,
}

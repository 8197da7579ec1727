//! Café rows

use shared::models::{Cafe, CafeUpdate, NewCafe};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;

pub async fn create(pool: &PgPool, owner_id: i64, data: &NewCafe) -> Result<Cafe, sqlx::Error> {
    let now = now_millis();
    sqlx::query_as(
        r#"
        INSERT INTO cafes (
            id, owner_id, name, description, address, city, state, zip_code,
            contact_number, email, gst_number, fssai_license, opening_time, closing_time,
            is_verified, is_active, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, FALSE, TRUE, $15, $15)
        RETURNING *
        "#,
    )
    .bind(snowflake_id())
    .bind(owner_id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.address)
    .bind(&data.city)
    .bind(&data.state)
    .bind(&data.zip_code)
    .bind(&data.contact_number)
    .bind(&data.email)
    .bind(&data.gst_number)
    .bind(&data.fssai_license)
    .bind(data.opening_time)
    .bind(data.closing_time)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Cafe>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM cafes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Visible to customers: verified and active
pub async fn find_public(pool: &PgPool, id: i64) -> Result<Option<Cafe>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM cafes WHERE id = $1 AND is_verified AND is_active")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_public(pool: &PgPool) -> Result<Vec<Cafe>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM cafes WHERE is_verified AND is_active ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn list_by_owner(pool: &PgPool, owner_id: i64) -> Result<Vec<Cafe>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM cafes WHERE owner_id = $1 ORDER BY created_at")
        .bind(owner_id)
        .fetch_all(pool)
        .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Cafe>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM cafes ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

/// Awaiting verification (still active)
pub async fn list_pending(pool: &PgPool) -> Result<Vec<Cafe>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM cafes WHERE NOT is_verified AND is_active ORDER BY created_at")
        .fetch_all(pool)
        .await
}

pub async fn update(pool: &PgPool, id: i64, data: &CafeUpdate) -> Result<Option<Cafe>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE cafes SET
            name = COALESCE($1, name),
            description = COALESCE($2, description),
            address = COALESCE($3, address),
            city = COALESCE($4, city),
            state = COALESCE($5, state),
            zip_code = COALESCE($6, zip_code),
            contact_number = COALESCE($7, contact_number),
            email = COALESCE($8, email),
            gst_number = COALESCE($9, gst_number),
            fssai_license = COALESCE($10, fssai_license),
            opening_time = COALESCE($11, opening_time),
            closing_time = COALESCE($12, closing_time),
            updated_at = $13
        WHERE id = $14
        RETURNING *
        "#,
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.address)
    .bind(&data.city)
    .bind(&data.state)
    .bind(&data.zip_code)
    .bind(&data.contact_number)
    .bind(&data.email)
    .bind(&data.gst_number)
    .bind(&data.fssai_license)
    .bind(data.opening_time)
    .bind(data.closing_time)
    .bind(now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Set verification flags (admin verify / reject)
pub async fn set_verification(
    pool: &PgPool,
    id: i64,
    is_verified: bool,
    is_active: bool,
) -> Result<Option<Cafe>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE cafes SET is_verified = $1, is_active = $2, updated_at = $3 WHERE id = $4 RETURNING *",
    )
    .bind(is_verified)
    .bind(is_active)
    .bind(now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM cafes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

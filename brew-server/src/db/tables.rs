//! Café table rows

use shared::models::{CafeTable, CafeTableCreate, CafeTableUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;

pub async fn list_by_cafe(pool: &PgPool, cafe_id: i64) -> Result<Vec<CafeTable>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM cafe_tables WHERE cafe_id = $1 ORDER BY table_number")
        .bind(cafe_id)
        .fetch_all(pool)
        .await
}

pub async fn find(pool: &PgPool, cafe_id: i64, id: i64) -> Result<Option<CafeTable>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM cafe_tables WHERE id = $1 AND cafe_id = $2")
        .bind(id)
        .bind(cafe_id)
        .fetch_optional(pool)
        .await
}

/// Whether another table in the café already uses `table_number`
pub async fn number_taken(
    pool: &PgPool,
    cafe_id: i64,
    table_number: i32,
    except_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM cafe_tables
            WHERE cafe_id = $1 AND table_number = $2 AND ($3::BIGINT IS NULL OR id <> $3)
        )
        "#,
    )
    .bind(cafe_id)
    .bind(table_number)
    .bind(except_id)
    .fetch_one(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    cafe_id: i64,
    data: &CafeTableCreate,
) -> Result<CafeTable, sqlx::Error> {
    let now = now_millis();
    sqlx::query_as(
        r#"
        INSERT INTO cafe_tables (
            id, cafe_id, table_number, table_type, capacity, display_label, description,
            status, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
        RETURNING *
        "#,
    )
    .bind(snowflake_id())
    .bind(cafe_id)
    .bind(data.table_number)
    .bind(data.table_type.unwrap_or_default())
    .bind(data.capacity)
    .bind(&data.display_label)
    .bind(&data.description)
    .bind(data.status.unwrap_or_default())
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    cafe_id: i64,
    id: i64,
    data: &CafeTableUpdate,
) -> Result<Option<CafeTable>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE cafe_tables SET
            table_number = COALESCE($1, table_number),
            capacity = COALESCE($2, capacity),
            table_type = COALESCE($3, table_type),
            display_label = COALESCE($4, display_label),
            description = COALESCE($5, description),
            status = COALESCE($6, status),
            updated_at = $7
        WHERE id = $8 AND cafe_id = $9
        RETURNING *
        "#,
    )
    .bind(data.table_number)
    .bind(data.capacity)
    .bind(data.table_type)
    .bind(&data.display_label)
    .bind(&data.description)
    .bind(data.status)
    .bind(now_millis())
    .bind(id)
    .bind(cafe_id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, cafe_id: i64, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM cafe_tables WHERE id = $1 AND cafe_id = $2")
        .bind(id)
        .bind(cafe_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

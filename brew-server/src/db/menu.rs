//! Menu categories and items

use rust_decimal::Decimal;
use shared::models::{
    MenuCategory, MenuCategoryCreate, MenuCategoryUpdate, MenuItem, MenuItemCreate,
    MenuItemUpdate,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;

/// Number of suggested items shown per café
const SUGGESTED_LIMIT: i64 = 5;

// ── Categories ──

pub async fn list_categories(
    pool: &PgPool,
    cafe_id: i64,
    active_only: bool,
) -> Result<Vec<MenuCategory>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM menu_categories
        WHERE cafe_id = $1 AND (NOT $2 OR is_active)
        ORDER BY display_order, name
        "#,
    )
    .bind(cafe_id)
    .bind(active_only)
    .fetch_all(pool)
    .await
}

pub async fn find_category(
    pool: &PgPool,
    cafe_id: i64,
    id: i64,
) -> Result<Option<MenuCategory>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM menu_categories WHERE id = $1 AND cafe_id = $2")
        .bind(id)
        .bind(cafe_id)
        .fetch_optional(pool)
        .await
}

pub async fn create_category(
    pool: &PgPool,
    cafe_id: i64,
    data: &MenuCategoryCreate,
) -> Result<MenuCategory, sqlx::Error> {
    let now = now_millis();
    sqlx::query_as(
        r#"
        INSERT INTO menu_categories (
            id, cafe_id, name, description, display_order, is_active, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        RETURNING *
        "#,
    )
    .bind(snowflake_id())
    .bind(cafe_id)
    .bind(data.name.trim())
    .bind(&data.description)
    .bind(data.display_order.unwrap_or(0))
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update_category(
    pool: &PgPool,
    cafe_id: i64,
    id: i64,
    data: &MenuCategoryUpdate,
) -> Result<Option<MenuCategory>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE menu_categories SET
            name = COALESCE($1, name),
            description = COALESCE($2, description),
            display_order = COALESCE($3, display_order),
            is_active = COALESCE($4, is_active),
            updated_at = $5
        WHERE id = $6 AND cafe_id = $7
        RETURNING *
        "#,
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.description)
    .bind(data.display_order)
    .bind(data.is_active)
    .bind(now_millis())
    .bind(id)
    .bind(cafe_id)
    .fetch_optional(pool)
    .await
}

pub async fn category_has_items(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM menu_items WHERE category_id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn delete_category(pool: &PgPool, cafe_id: i64, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM menu_categories WHERE id = $1 AND cafe_id = $2")
        .bind(id)
        .bind(cafe_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ── Items ──

/// Every item of the café (owner/staff view)
pub async fn list_items(pool: &PgPool, cafe_id: i64) -> Result<Vec<MenuItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM menu_items WHERE cafe_id = $1 ORDER BY category_id, name")
        .bind(cafe_id)
        .fetch_all(pool)
        .await
}

/// Available items, optionally filtered by category
pub async fn list_available_items(
    pool: &PgPool,
    cafe_id: i64,
    category_id: Option<i64>,
) -> Result<Vec<MenuItem>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM menu_items
        WHERE cafe_id = $1 AND is_available AND ($2::BIGINT IS NULL OR category_id = $2)
        ORDER BY category_id, name
        "#,
    )
    .bind(cafe_id)
    .bind(category_id)
    .fetch_all(pool)
    .await
}

pub async fn list_addons(pool: &PgPool, cafe_id: i64) -> Result<Vec<MenuItem>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM menu_items WHERE cafe_id = $1 AND is_available AND is_addon ORDER BY name",
    )
    .bind(cafe_id)
    .fetch_all(pool)
    .await
}

/// Top rated available items
pub async fn list_suggested(pool: &PgPool, cafe_id: i64) -> Result<Vec<MenuItem>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM menu_items
        WHERE cafe_id = $1 AND is_available
        ORDER BY avg_rating DESC, name
        LIMIT $2
        "#,
    )
    .bind(cafe_id)
    .bind(SUGGESTED_LIMIT)
    .fetch_all(pool)
    .await
}

/// Items by id, for order pricing
pub async fn find_items(pool: &PgPool, ids: &[i64]) -> Result<Vec<MenuItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM menu_items WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await
}

pub async fn create_item(
    pool: &PgPool,
    cafe_id: i64,
    data: &MenuItemCreate,
    price: Decimal,
) -> Result<MenuItem, sqlx::Error> {
    let now = now_millis();
    sqlx::query_as(
        r#"
        INSERT INTO menu_items (
            id, cafe_id, category_id, name, description, price, item_type, image_url,
            is_available, is_addon, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
        RETURNING *
        "#,
    )
    .bind(snowflake_id())
    .bind(cafe_id)
    .bind(data.category_id)
    .bind(data.name.trim())
    .bind(&data.description)
    .bind(price)
    .bind(data.item_type.unwrap_or_default())
    .bind(&data.image_url)
    .bind(data.is_available.unwrap_or(true))
    .bind(data.is_addon.unwrap_or(false))
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update_item(
    pool: &PgPool,
    cafe_id: i64,
    id: i64,
    data: &MenuItemUpdate,
) -> Result<Option<MenuItem>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE menu_items SET
            category_id = COALESCE($1, category_id),
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            price = COALESCE($4, price),
            item_type = COALESCE($5, item_type),
            image_url = COALESCE($6, image_url),
            is_available = COALESCE($7, is_available),
            is_addon = COALESCE($8, is_addon),
            updated_at = $9
        WHERE id = $10 AND cafe_id = $11
        RETURNING *
        "#,
    )
    .bind(data.category_id)
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.description)
    .bind(data.price)
    .bind(data.item_type)
    .bind(&data.image_url)
    .bind(data.is_available)
    .bind(data.is_addon)
    .bind(now_millis())
    .bind(id)
    .bind(cafe_id)
    .fetch_optional(pool)
    .await
}

pub async fn delete_item(pool: &PgPool, cafe_id: i64, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM menu_items WHERE id = $1 AND cafe_id = $2")
        .bind(id)
        .bind(cafe_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

//! Aggregate counts for the owner and admin dashboards

use shared::models::Role;
use sqlx::PgPool;

/// Per-café counts that are not order related
#[derive(Debug, sqlx::FromRow)]
pub struct CafeCounts {
    pub total_bookings: i64,
    pub total_tables: i64,
    pub available_tables: i64,
    pub total_menu_items: i64,
}

pub async fn cafe_counts(pool: &PgPool, cafe_id: i64) -> Result<CafeCounts, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT
            (SELECT COUNT(*) FROM bookings WHERE cafe_id = $1) AS total_bookings,
            (SELECT COUNT(*) FROM cafe_tables WHERE cafe_id = $1) AS total_tables,
            (SELECT COUNT(*) FROM cafe_tables WHERE cafe_id = $1 AND status = 'AVAILABLE')
                AS available_tables,
            (SELECT COUNT(*) FROM menu_items WHERE cafe_id = $1) AS total_menu_items
        "#,
    )
    .bind(cafe_id)
    .fetch_one(pool)
    .await
}

#[derive(Debug, sqlx::FromRow)]
pub struct UserCounts {
    pub total_users: i64,
    pub active_users: i64,
    pub pending_users: i64,
    pub registrations_since: i64,
}

/// User totals; `since` (millis) bounds the recent-registration count
pub async fn user_counts(pool: &PgPool, since: i64) -> Result<UserCounts, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT
            COUNT(*) AS total_users,
            COUNT(*) FILTER (WHERE is_active) AS active_users,
            COUNT(*) FILTER (WHERE NOT is_active AND password_hash IS NULL) AS pending_users,
            COUNT(*) FILTER (WHERE created_at >= $1) AS registrations_since
        FROM users
        "#,
    )
    .bind(since)
    .fetch_one(pool)
    .await
}

pub async fn users_by_role(pool: &PgPool) -> Result<Vec<(Role, i64)>, sqlx::Error> {
    sqlx::query_as("SELECT role, COUNT(*) FROM users GROUP BY role")
        .fetch_all(pool)
        .await
}

#[derive(Debug, sqlx::FromRow)]
pub struct CafeTotals {
    pub total_cafes: i64,
    pub verified_cafes: i64,
    pub pending_cafes: i64,
}

pub async fn cafe_totals(pool: &PgPool) -> Result<CafeTotals, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT
            COUNT(*) AS total_cafes,
            COUNT(*) FILTER (WHERE is_verified) AS verified_cafes,
            COUNT(*) FILTER (WHERE NOT is_verified AND is_active) AS pending_cafes
        FROM cafes
        "#,
    )
    .fetch_one(pool)
    .await
}

//! Table bookings
//!
//! Writes that can make a booking hold a table run on a transaction that
//! first took [`lock_table`], so overlap checks see every competing row.

use chrono::NaiveDate;
use shared::models::{Booking, BookingCreate, BookingStatus};
use shared::util::{RefKind, generate_reference, now_millis, snowflake_id};
use sqlx::{PgConnection, PgPool};

/// Row lock on a table, held until the transaction ends
pub async fn lock_table(conn: &mut PgConnection, table_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT id FROM cafe_tables WHERE id = $1 FOR UPDATE")
        .bind(table_id)
        .fetch_optional(conn)
        .await?;
    Ok(())
}

pub async fn create(
    conn: impl sqlx::Executor<'_, Database = sqlx::Postgres>,
    customer_id: i64,
    data: &BookingCreate,
) -> Result<Booking, sqlx::Error> {
    let now = now_millis();
    sqlx::query_as(
        r#"
        INSERT INTO bookings (
            id, booking_ref, cafe_id, customer_id, table_id, booking_date, start_time,
            number_of_guests, special_requests, status, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'PENDING', $10, $10)
        RETURNING *
        "#,
    )
    .bind(snowflake_id())
    .bind(generate_reference(RefKind::Booking))
    .bind(data.cafe_id)
    .bind(customer_id)
    .bind(data.table_id)
    .bind(data.booking_date)
    .bind(data.start_time)
    .bind(data.number_of_guests)
    .bind(&data.special_requests)
    .bind(now)
    .fetch_one(conn)
    .await
}

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Booking>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM bookings WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Bookings on one table and date that still hold the table
pub async fn list_active_for_table(
    conn: impl sqlx::Executor<'_, Database = sqlx::Postgres>,
    table_id: i64,
    date: NaiveDate,
) -> Result<Vec<Booking>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM bookings
        WHERE table_id = $1 AND booking_date = $2 AND status IN ('PENDING', 'CONFIRMED')
        ORDER BY start_time
        "#,
    )
    .bind(table_id)
    .bind(date)
    .fetch_all(conn)
    .await
}

pub async fn list_by_customer(pool: &PgPool, customer_id: i64) -> Result<Vec<Booking>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM bookings WHERE customer_id = $1 ORDER BY booking_date DESC, start_time DESC",
    )
    .bind(customer_id)
    .fetch_all(pool)
    .await
}

pub async fn list_by_cafe(
    pool: &PgPool,
    cafe_id: i64,
    date: Option<NaiveDate>,
) -> Result<Vec<Booking>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM bookings
        WHERE cafe_id = $1 AND ($2::DATE IS NULL OR booking_date = $2)
        ORDER BY booking_date DESC, start_time
        "#,
    )
    .bind(cafe_id)
    .bind(date)
    .fetch_all(pool)
    .await
}

pub async fn set_status(
    conn: impl sqlx::Executor<'_, Database = sqlx::Postgres>,
    id: i64,
    status: BookingStatus,
) -> Result<Option<Booking>, sqlx::Error> {
    sqlx::query_as("UPDATE bookings SET status = $1, updated_at = $2 WHERE id = $3 RETURNING *")
        .bind(status)
        .bind(now_millis())
        .bind(id)
        .fetch_optional(conn)
        .await
}

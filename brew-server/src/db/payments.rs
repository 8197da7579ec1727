//! Payment records (one per order)

use rust_decimal::Decimal;
use shared::models::{DEFAULT_CURRENCY, Payment, PaymentMethod};
use shared::util::{now_millis, snowflake_id};
use sqlx::{PgConnection, PgPool};

/// Pending record created alongside the order
pub async fn insert_pending(
    conn: &mut PgConnection,
    order_id: i64,
    amount: Decimal,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO payments (id, order_id, amount, currency, status, created_at)
        VALUES ($1, $2, $3, $4, 'PENDING', $5)
        "#,
    )
    .bind(snowflake_id())
    .bind(order_id)
    .bind(amount)
    .bind(DEFAULT_CURRENCY)
    .bind(now_millis())
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn find_by_order(pool: &PgPool, order_id: i64) -> Result<Option<Payment>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM payments WHERE order_id = $1")
        .bind(order_id)
        .fetch_optional(pool)
        .await
}

/// Mark the order's pending payment completed. Returns None when no pending
/// record exists.
pub async fn complete(
    conn: &mut PgConnection,
    order_id: i64,
    method: PaymentMethod,
    transaction_ref: &str,
) -> Result<Option<Payment>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE payments SET
            status = 'COMPLETED', method = $1, transaction_ref = $2, payment_date = $3
        WHERE order_id = $4 AND status = 'PENDING'
        RETURNING *
        "#,
    )
    .bind(method)
    .bind(transaction_ref)
    .bind(now_millis())
    .bind(order_id)
    .fetch_optional(conn)
    .await
}

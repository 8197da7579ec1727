//! Orders, order items, and status history
//!
//! Writes that change an order's status always go through
//! [`update_status`] on an open transaction together with
//! [`insert_history`].

use rust_decimal::Decimal;
use shared::models::{Order, OrderItem, OrderStatusHistory, OrderType};
use shared::order::{OrderStatus, OrderTotals, PricedLine};
use shared::util::{RefKind, generate_reference, now_millis, snowflake_id};
use sqlx::{PgConnection, PgPool};

/// Header fields for a new order
pub struct NewOrder<'a> {
    pub cafe_id: i64,
    pub customer_id: i64,
    pub table_id: Option<i64>,
    pub order_type: OrderType,
    pub special_instructions: Option<&'a str>,
    pub totals: OrderTotals,
}

pub async fn insert_order(conn: &mut PgConnection, o: &NewOrder<'_>) -> Result<Order, sqlx::Error> {
    let now = now_millis();
    sqlx::query_as(
        r#"
        INSERT INTO orders (
            id, order_ref, cafe_id, customer_id, table_id, order_type, status,
            special_instructions, total_amount, tax_amount, discount_amount, grand_total,
            payment_status, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, 'PLACED', $7, $8, $9, $10, $11, 'PENDING', $12, $12)
        RETURNING *
        "#,
    )
    .bind(snowflake_id())
    .bind(generate_reference(RefKind::Order))
    .bind(o.cafe_id)
    .bind(o.customer_id)
    .bind(o.table_id)
    .bind(o.order_type)
    .bind(o.special_instructions)
    .bind(o.totals.total_amount)
    .bind(o.totals.tax_amount)
    .bind(o.totals.discount_amount)
    .bind(o.totals.grand_total)
    .bind(now)
    .fetch_one(conn)
    .await
}

pub async fn insert_item(
    conn: &mut PgConnection,
    order_id: i64,
    line: &PricedLine,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO order_items (
            id, order_id, menu_item_id, item_name, quantity, unit_price, sub_total, notes
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(snowflake_id())
    .bind(order_id)
    .bind(line.menu_item_id)
    .bind(&line.item_name)
    .bind(line.quantity)
    .bind(line.unit_price)
    .bind(line.sub_total)
    .bind(&line.notes)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn insert_history(
    conn: &mut PgConnection,
    order_id: i64,
    status: OrderStatus,
    changed_by: Option<i64>,
    notes: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO order_status_history (id, order_id, status, changed_by, changed_at, notes)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(snowflake_id())
    .bind(order_id)
    .bind(status)
    .bind(changed_by)
    .bind(now_millis())
    .bind(notes)
    .execute(conn)
    .await?;
    Ok(())
}

/// Write a new status, filling assignment columns that are still empty
pub async fn update_status(
    conn: &mut PgConnection,
    order_id: i64,
    status: OrderStatus,
    chef_id: Option<i64>,
    waiter_id: Option<i64>,
) -> Result<Order, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE orders SET
            status = $1,
            assigned_chef_id = COALESCE(assigned_chef_id, $2),
            assigned_waiter_id = COALESCE(assigned_waiter_id, $3),
            updated_at = $4
        WHERE id = $5
        RETURNING *
        "#,
    )
    .bind(status)
    .bind(chef_id)
    .bind(waiter_id)
    .bind(now_millis())
    .bind(order_id)
    .fetch_one(conn)
    .await
}

/// Overwrite assignments; `None` keeps the current value
pub async fn set_assignment(
    conn: &mut PgConnection,
    order_id: i64,
    chef_id: Option<i64>,
    waiter_id: Option<i64>,
) -> Result<Order, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE orders SET
            assigned_chef_id = COALESCE($1, assigned_chef_id),
            assigned_waiter_id = COALESCE($2, assigned_waiter_id),
            updated_at = $3
        WHERE id = $4
        RETURNING *
        "#,
    )
    .bind(chef_id)
    .bind(waiter_id)
    .bind(now_millis())
    .bind(order_id)
    .fetch_one(conn)
    .await
}

pub async fn mark_paid(conn: &mut PgConnection, order_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE orders SET payment_status = 'PAID', updated_at = $1 WHERE id = $2")
        .bind(now_millis())
        .bind(order_id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_items(pool: &PgPool, order_id: i64) -> Result<Vec<OrderItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id")
        .bind(order_id)
        .fetch_all(pool)
        .await
}

pub async fn list_history(
    pool: &PgPool,
    order_id: i64,
) -> Result<Vec<OrderStatusHistory>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM order_status_history WHERE order_id = $1 ORDER BY changed_at, id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await
}

pub async fn list_by_customer(pool: &PgPool, customer_id: i64) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE customer_id = $1 ORDER BY created_at DESC")
        .bind(customer_id)
        .fetch_all(pool)
        .await
}

pub async fn list_by_cafe(
    pool: &PgPool,
    cafe_id: i64,
    status: Option<OrderStatus>,
) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM orders
        WHERE cafe_id = $1 AND ($2::order_status IS NULL OR status = $2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(cafe_id)
    .bind(status)
    .fetch_all(pool)
    .await
}

/// Orders in any of `statuses`, oldest first (work queues)
pub async fn list_queue(
    pool: &PgPool,
    cafe_id: i64,
    statuses: &[OrderStatus],
) -> Result<Vec<Order>, sqlx::Error> {
    let statuses: Vec<&str> = statuses.iter().map(OrderStatus::as_str).collect();
    sqlx::query_as(
        "SELECT * FROM orders WHERE cafe_id = $1 AND status::TEXT = ANY($2) ORDER BY created_at",
    )
    .bind(cafe_id)
    .bind(&statuses)
    .fetch_all(pool)
    .await
}

/// Delivered orders a waiter handled
pub async fn list_delivered_by_waiter(
    pool: &PgPool,
    cafe_id: i64,
    waiter_id: i64,
) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM orders
        WHERE cafe_id = $1 AND assigned_waiter_id = $2 AND status = 'DELIVERED'
        ORDER BY updated_at DESC
        "#,
    )
    .bind(cafe_id)
    .bind(waiter_id)
    .fetch_all(pool)
    .await
}

/// `(status, count)` rows for a café
pub async fn count_by_status(
    pool: &PgPool,
    cafe_id: i64,
) -> Result<Vec<(OrderStatus, i64)>, sqlx::Error> {
    sqlx::query_as("SELECT status, COUNT(*) FROM orders WHERE cafe_id = $1 GROUP BY status")
        .bind(cafe_id)
        .fetch_all(pool)
        .await
}

/// Orders created since `since` (millis) and their delivered revenue
pub async fn count_and_revenue_since(
    pool: &PgPool,
    cafe_id: i64,
    since: i64,
) -> Result<(i64, Decimal), sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT
            COUNT(*),
            COALESCE(SUM(grand_total) FILTER (WHERE status = 'DELIVERED'), 0)
        FROM orders
        WHERE cafe_id = $1 AND created_at >= $2
        "#,
    )
    .bind(cafe_id)
    .bind(since)
    .fetch_one(pool)
    .await
}

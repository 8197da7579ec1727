//! Café management API handlers
//!
//! Every handler resolves the café first:
//! - `authorize_cafe` for reads that chefs and waiters of the café may share
//! - `owned_cafe` for writes and owner-only views
//!
//! Child resources (tables, menu, orders, bookings) are always looked up
//! scoped to that café, so ids from another café answer 404.

pub mod bookings;
pub mod cafe;
pub mod dashboard;
pub mod menu;
pub mod orders;
pub mod staff;
pub mod tables;

pub use bookings::*;
pub use cafe::*;
pub use dashboard::*;
pub use menu::*;
pub use orders::*;
pub use staff::*;
pub use tables::*;

use axum::Router;
use axum::routing::{delete, get, put};
use shared::error::{AppError, ErrorCode};
use shared::models::Order;

use crate::db;
use crate::error::internal;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    const BASE: &str = "/api/cafe-owner/cafes";
    let path = |suffix: &str| format!("{BASE}{suffix}");

    Router::new()
        .route(BASE, get(list_cafes).post(create_cafe))
        .route(&path("/{id}"), get(get_cafe).put(update_cafe))
        .route(&path("/{id}/dashboard"), get(get_dashboard))
        // Menu
        .route(&path("/{id}/categories"), get(list_categories).post(create_category))
        .route(
            &path("/{id}/categories/{category_id}"),
            put(update_category).delete(delete_category),
        )
        .route(&path("/{id}/items"), get(list_items).post(create_item))
        .route(&path("/{id}/items/{item_id}"), put(update_item).delete(delete_item))
        // Tables
        .route(&path("/{id}/tables"), get(list_tables).post(create_table))
        .route(&path("/{id}/tables/{table_id}"), put(update_table).delete(delete_table))
        // Staff
        .route(&path("/{id}/staff"), get(list_staff).post(add_staff))
        .route(&path("/{id}/staff/{assignment_id}"), delete(remove_staff))
        // Orders
        .route(&path("/{id}/orders"), get(list_orders))
        .route(&path("/{id}/orders/pending"), get(list_pending_orders))
        .route(&path("/{id}/orders/{order_id}/history"), get(order_history))
        .route(&path("/{id}/orders/{order_id}/confirm"), put(confirm_order))
        .route(&path("/{id}/orders/{order_id}/assign"), put(assign_order))
        .route(&path("/{id}/orders/{order_id}/payment"), put(confirm_payment))
        // Bookings
        .route(&path("/{id}/bookings"), get(list_bookings))
        .route(&path("/{id}/bookings/{booking_id}/status"), put(update_booking_status))
}

/// Load an order that belongs to `cafe_id`
async fn cafe_order(state: &AppState, cafe_id: i64, order_id: i64) -> Result<Order, AppError> {
    db::orders::find(&state.pool, order_id)
        .await
        .map_err(internal)?
        .filter(|o| o.cafe_id == cafe_id)
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", order_id))
}

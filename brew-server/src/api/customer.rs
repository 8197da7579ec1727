//! Customer routes: own bookings and orders

use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Extension, Json, Router};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Booking, BookingCreate, Order, OrderDetail, OrderStatusHistory, PlaceOrderRequest,
    StatusChangeRequest,
};
use shared::order::OrderStatus;

use crate::auth::CurrentUser;
use crate::db;
use crate::error::internal;
use crate::services::{self, access};
use crate::state::AppState;
use crate::validation::{MAX_NOTE_LEN, validate_optional_text};

use super::ApiResult;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/customer/bookings", get(list_bookings).post(create_booking))
        .route("/api/customer/bookings/{id}/cancel", put(cancel_booking))
        .route("/api/customer/orders", get(list_orders).post(place_order))
        .route("/api/customer/orders/{id}", get(get_order))
        .route("/api/customer/orders/{id}/history", get(order_history))
        .route("/api/customer/orders/{id}/cancel", put(cancel_order))
}

/// Load an order and check it belongs to the caller
async fn own_order(state: &AppState, user: &CurrentUser, id: i64) -> Result<Order, AppError> {
    let order = db::orders::find(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", id))?;
    access::check_order_owner(&order, user)?;
    Ok(order)
}

// ── Bookings ──

pub async fn list_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Vec<Booking>> {
    let bookings = db::bookings::list_by_customer(&state.pool, user.user_id)
        .await
        .map_err(internal)?;
    Ok(Json(bookings))
}

pub async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<BookingCreate>,
) -> ApiResult<Booking> {
    let booking = services::bookings::make_booking(&state, &user, &req).await?;
    Ok(Json(booking))
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Booking> {
    let booking = services::bookings::cancel_own(&state, &user, id).await?;
    Ok(Json(booking))
}

// ── Orders ──

pub async fn list_orders(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Vec<Order>> {
    let orders = db::orders::list_by_customer(&state.pool, user.user_id)
        .await
        .map_err(internal)?;
    Ok(Json(orders))
}

pub async fn place_order(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<PlaceOrderRequest>,
) -> ApiResult<OrderDetail> {
    let detail = services::orders::place_order(&state, &user, &req).await?;
    Ok(Json(detail))
}

pub async fn get_order(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<OrderDetail> {
    let order = own_order(&state, &user, id).await?;
    let items = db::orders::list_items(&state.pool, order.id)
        .await
        .map_err(internal)?;
    Ok(Json(OrderDetail { order, items }))
}

pub async fn order_history(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<OrderStatusHistory>> {
    let order = own_order(&state, &user, id).await?;
    let history = db::orders::list_history(&state.pool, order.id)
        .await
        .map_err(internal)?;
    Ok(Json(history))
}

/// PUT /api/customer/orders/{id}/cancel
///
/// Only PLACED or CONFIRMED orders can be cancelled; the body is optional.
pub async fn cancel_order(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    body: Option<Json<StatusChangeRequest>>,
) -> ApiResult<Order> {
    let notes = body.and_then(|Json(req)| req.notes);
    validate_optional_text(&notes, "notes", MAX_NOTE_LEN)?;

    let order = own_order(&state, &user, id).await?;
    if !order.status.is_cancellable() {
        return Err(AppError::new(ErrorCode::OrderNotCancellable)
            .with_detail("status", order.status.as_str()));
    }
    let notes = notes.as_deref().unwrap_or("Cancelled by customer");
    let updated = services::orders::transition(
        &state,
        &user,
        &order,
        OrderStatus::Cancelled,
        Some(notes),
        None,
        None,
    )
    .await?;
    Ok(Json(updated))
}

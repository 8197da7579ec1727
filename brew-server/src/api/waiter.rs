//! Floor queue for waiters

use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Extension, Json, Router};
use shared::error::AppError;
use shared::models::{Cafe, Order, StatusChangeRequest};
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
        .route("/api/waiter/cafe", get(get_cafe))
        .route("/api/waiter/orders", get(list_orders))
        .route("/api/waiter/orders/{id}/send-to-kitchen", put(send_to_kitchen))
        .route("/api/waiter/orders/{id}/deliver", put(deliver_order))
        .route("/api/waiter/orders/{id}/status", put(update_status))
}

pub async fn get_cafe(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Cafe> {
    let (cafe, _) = access::assigned_cafe(&state, &user).await?;
    Ok(Json(cafe))
}

/// Open floor orders plus the ones this waiter already delivered
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Vec<Order>> {
    let (cafe, _) = access::assigned_cafe(&state, &user).await?;
    let mut orders = db::orders::list_queue(&state.pool, cafe.id, &OrderStatus::FLOOR_QUEUE)
        .await
        .map_err(internal)?;
    let delivered = db::orders::list_delivered_by_waiter(&state.pool, cafe.id, user.user_id)
        .await
        .map_err(internal)?;
    orders.extend(delivered);
    Ok(Json(orders))
}

async fn apply(
    state: &AppState,
    user: &CurrentUser,
    order_id: i64,
    to: OrderStatus,
    notes: Option<String>,
) -> Result<Order, AppError> {
    validate_optional_text(&notes, "notes", MAX_NOTE_LEN)?;
    let order = access::assigned_order(state, user, order_id).await?;
    // Both waiter edges claim the order if no waiter holds it yet
    let updated = services::orders::transition(
        state,
        user,
        &order,
        to,
        notes.as_deref(),
        None,
        Some(user.user_id),
    )
    .await?;
    Ok(updated)
}

/// PUT /api/waiter/orders/{id}/send-to-kitchen
pub async fn send_to_kitchen(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    body: Option<Json<StatusChangeRequest>>,
) -> ApiResult<Order> {
    let notes = body.and_then(|Json(req)| req.notes);
    let order = apply(&state, &user, id, OrderStatus::SentToKitchen, notes).await?;
    Ok(Json(order))
}

/// PUT /api/waiter/orders/{id}/deliver
pub async fn deliver_order(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    body: Option<Json<StatusChangeRequest>>,
) -> ApiResult<Order> {
    let notes = body.and_then(|Json(req)| req.notes);
    let order = apply(&state, &user, id, OrderStatus::Delivered, notes).await?;
    Ok(Json(order))
}

pub async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(req): Json<StatusChangeRequest>,
) -> ApiResult<Order> {
    let to = req.status.ok_or_else(|| AppError::required("status"))?;
    let order = apply(&state, &user, id, to, req.notes).await?;
    Ok(Json(order))
}

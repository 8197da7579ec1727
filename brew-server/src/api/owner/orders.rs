use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    AssignStaffRequest, ConfirmPaymentRequest, Order, OrderStatusHistory, Payment,
};
use shared::order::OrderStatus;
use shared::util::{RefKind, generate_reference};

use crate::api::ApiResult;
use crate::auth::CurrentUser;
use crate::db;
use crate::error::{ServiceError, internal};
use crate::services::{self, access};
use crate::state::AppState;
use crate::validation::{MAX_SHORT_TEXT_LEN, validate_optional_text};

use super::cafe_order;

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
}

/// GET /api/cafe-owner/cafes/{id}/orders?status=
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(cafe_id): Path<i64>,
    Query(query): Query<OrderListQuery>,
) -> ApiResult<Vec<Order>> {
    access::authorize_cafe(&state, &user, cafe_id).await?;
    let orders = db::orders::list_by_cafe(&state.pool, cafe_id, query.status)
        .await
        .map_err(internal)?;
    Ok(Json(orders))
}

/// GET /api/cafe-owner/cafes/{id}/orders/pending
pub async fn list_pending_orders(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(cafe_id): Path<i64>,
) -> ApiResult<Vec<Order>> {
    access::owned_cafe(&state, &user, cafe_id).await?;
    let orders = db::orders::list_by_cafe(&state.pool, cafe_id, Some(OrderStatus::Placed))
        .await
        .map_err(internal)?;
    Ok(Json(orders))
}

pub async fn order_history(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((cafe_id, order_id)): Path<(i64, i64)>,
) -> ApiResult<Vec<OrderStatusHistory>> {
    access::authorize_cafe(&state, &user, cafe_id).await?;
    let order = cafe_order(&state, cafe_id, order_id).await?;
    let history = db::orders::list_history(&state.pool, order.id)
        .await
        .map_err(internal)?;
    Ok(Json(history))
}

/// PUT /api/cafe-owner/cafes/{id}/orders/{order_id}/confirm
///
/// PLACED → CONFIRMED. The body is optional; staff can be named or
/// picked by rotation in the same call.
pub async fn confirm_order(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((cafe_id, order_id)): Path<(i64, i64)>,
    body: Option<Json<AssignStaffRequest>>,
) -> ApiResult<Order> {
    access::owned_cafe(&state, &user, cafe_id).await?;
    let order = cafe_order(&state, cafe_id, order_id).await?;
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let updated = services::orders::confirm(&state, &user, &order, &req).await?;
    Ok(Json(updated))
}

/// PUT /api/cafe-owner/cafes/{id}/orders/{order_id}/assign
pub async fn assign_order(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((cafe_id, order_id)): Path<(i64, i64)>,
    Json(req): Json<AssignStaffRequest>,
) -> ApiResult<Order> {
    access::owned_cafe(&state, &user, cafe_id).await?;
    let order = cafe_order(&state, cafe_id, order_id).await?;
    let updated = services::orders::reassign(&state, &order, &req).await?;
    Ok(Json(updated))
}

/// PUT /api/cafe-owner/cafes/{id}/orders/{order_id}/payment
///
/// Completes the order's PENDING payment and marks the order PAID in one
/// transaction. A second call finds no pending row and is refused.
pub async fn confirm_payment(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((cafe_id, order_id)): Path<(i64, i64)>,
    Json(req): Json<ConfirmPaymentRequest>,
) -> ApiResult<Payment> {
    access::owned_cafe(&state, &user, cafe_id).await?;
    validate_optional_text(&req.transaction_id, "transaction_id", MAX_SHORT_TEXT_LEN)?;
    let order = cafe_order(&state, cafe_id, order_id).await?;

    db::payments::find_by_order(&state.pool, order.id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::PaymentNotFound).with_detail("order_id", order.id))?;

    let transaction_ref = req
        .transaction_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| generate_reference(RefKind::Payment));

    let mut tx = state.pool.begin().await.map_err(ServiceError::from)?;
    let payment = db::payments::complete(&mut *tx, order.id, req.method, &transaction_ref)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| {
            AppError::new(ErrorCode::PaymentAlreadyCompleted).with_detail("order_id", order.id)
        })?;
    db::orders::mark_paid(&mut *tx, order.id)
        .await
        .map_err(ServiceError::from)?;
    tx.commit().await.map_err(ServiceError::from)?;

    tracing::info!(
        order_id = order.id,
        method = ?req.method,
        transaction_ref = %transaction_ref,
        amount = %payment.amount,
        "Payment confirmed"
    );
    Ok(Json(payment))
}

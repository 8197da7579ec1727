//! Kitchen queue for chefs
//!
//! A chef only sees orders of the café they are actively assigned to.
//! Allowed edges are SENT_TO_KITCHEN → PREPARING → READY.

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
        .route("/api/chef/cafe", get(get_cafe))
        .route("/api/chef/orders", get(list_orders))
        .route("/api/chef/orders/{id}/start", put(start_order))
        .route("/api/chef/orders/{id}/ready", put(ready_order))
        .route("/api/chef/orders/{id}/status", put(update_status))
}

pub async fn get_cafe(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Cafe> {
    let (cafe, _) = access::assigned_cafe(&state, &user).await?;
    Ok(Json(cafe))
}

pub async fn list_orders(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Vec<Order>> {
    let (cafe, _) = access::assigned_cafe(&state, &user).await?;
    let orders = db::orders::list_queue(&state.pool, cafe.id, &OrderStatus::KITCHEN_QUEUE)
        .await
        .map_err(internal)?;
    Ok(Json(orders))
}

/// Apply a chef transition; PREPARING claims the order if no chef holds it
async fn apply(
    state: &AppState,
    user: &CurrentUser,
    order_id: i64,
    to: OrderStatus,
    notes: Option<String>,
) -> Result<Order, AppError> {
    validate_optional_text(&notes, "notes", MAX_NOTE_LEN)?;
    let order = access::assigned_order(state, user, order_id).await?;
    let chef_id = (to == OrderStatus::Preparing).then_some(user.user_id);
    let updated =
        services::orders::transition(state, user, &order, to, notes.as_deref(), chef_id, None)
            .await?;
    Ok(updated)
}

fn notes_of(body: Option<Json<StatusChangeRequest>>) -> Option<String> {
    body.and_then(|Json(req)| req.notes)
}

/// PUT /api/chef/orders/{id}/start
pub async fn start_order(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    body: Option<Json<StatusChangeRequest>>,
) -> ApiResult<Order> {
    let order = apply(&state, &user, id, OrderStatus::Preparing, notes_of(body)).await?;
    Ok(Json(order))
}

/// PUT /api/chef/orders/{id}/ready
pub async fn ready_order(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    body: Option<Json<StatusChangeRequest>>,
) -> ApiResult<Order> {
    let order = apply(&state, &user, id, OrderStatus::Ready, notes_of(body)).await?;
    Ok(Json(order))
}

/// PUT /api/chef/orders/{id}/status with `{ "status": ..., "notes": ... }`
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

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{AddStaffRequest, StaffMember};

use crate::api::{ApiResult, message};
use crate::auth::CurrentUser;
use crate::db;
use crate::error::internal;
use crate::services::{self, access};
use crate::state::AppState;

pub async fn list_staff(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(cafe_id): Path<i64>,
) -> ApiResult<Vec<StaffMember>> {
    access::owned_cafe(&state, &user, cafe_id).await?;
    let members = db::staff::list_members(&state.pool, cafe_id)
        .await
        .map_err(internal)?;
    Ok(Json(members))
}

/// POST /api/cafe-owner/cafes/{id}/staff
///
/// Creates (or reactivates) the staff account and emails its credentials.
pub async fn add_staff(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(cafe_id): Path<i64>,
    Json(req): Json<AddStaffRequest>,
) -> ApiResult<StaffMember> {
    let cafe = access::owned_cafe(&state, &user, cafe_id).await?;
    let member = services::staff::add_staff(&state, &user, &cafe, &req).await?;
    Ok(Json(member))
}

/// DELETE /api/cafe-owner/cafes/{id}/staff/{assignment_id}
///
/// Deactivates the assignment; the user account stays.
pub async fn remove_staff(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((cafe_id, assignment_id)): Path<(i64, i64)>,
) -> ApiResult<serde_json::Value> {
    access::owned_cafe(&state, &user, cafe_id).await?;
    let staff_id = db::staff::deactivate(&state.pool, cafe_id, assignment_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| {
            AppError::new(ErrorCode::StaffNotFound).with_detail("assignment_id", assignment_id)
        })?;
    tracing::info!(cafe_id, assignment_id, staff_id, "Staff assignment removed");
    Ok(message("Staff removed"))
}

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::models::CafeDashboard;

use crate::api::ApiResult;
use crate::auth::CurrentUser;
use crate::services::{self, access};
use crate::state::AppState;

/// GET /api/cafe-owner/cafes/{id}/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(cafe_id): Path<i64>,
) -> ApiResult<CafeDashboard> {
    let cafe = access::owned_cafe(&state, &user, cafe_id).await?;
    let dashboard = services::dashboard::cafe_dashboard(&state, cafe.id).await?;
    Ok(Json(dashboard))
}

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::models::{Booking, BookingStatusUpdate};

use crate::api::ApiResult;
use crate::auth::CurrentUser;
use crate::db;
use crate::error::internal;
use crate::services::{self, access};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    pub date: Option<NaiveDate>,
}

/// GET /api/cafe-owner/cafes/{id}/bookings?date=YYYY-MM-DD
pub async fn list_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(cafe_id): Path<i64>,
    Query(query): Query<BookingListQuery>,
) -> ApiResult<Vec<Booking>> {
    access::authorize_cafe(&state, &user, cafe_id).await?;
    let bookings = db::bookings::list_by_cafe(&state.pool, cafe_id, query.date)
        .await
        .map_err(internal)?;
    Ok(Json(bookings))
}

/// PUT /api/cafe-owner/cafes/{id}/bookings/{booking_id}/status
///
/// Owners may move a booking to any known status, as long as a revived
/// booking does not overlap another one on its table.
pub async fn update_booking_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((cafe_id, booking_id)): Path<(i64, i64)>,
    Json(req): Json<BookingStatusUpdate>,
) -> ApiResult<Booking> {
    access::owned_cafe(&state, &user, cafe_id).await?;
    let booking =
        services::bookings::set_status_by_owner(&state, cafe_id, booking_id, req.status).await?;
    Ok(Json(booking))
}

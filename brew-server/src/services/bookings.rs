//! Customer table bookings

use shared::booking::{can_customer_cancel, check_status_change, validate_booking};
use shared::error::{AppError, ErrorCode};
use shared::models::{Booking, BookingCreate, BookingStatus};

use crate::auth::CurrentUser;
use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::validation::{MAX_NOTE_LEN, validate_optional_text};

/// Validate and store a new PENDING booking
pub async fn make_booking(
    state: &AppState,
    customer: &CurrentUser,
    req: &BookingCreate,
) -> ServiceResult<Booking> {
    validate_optional_text(&req.special_requests, "special_requests", MAX_NOTE_LEN)?;

    let cafe = db::cafes::find_by_id(&state.pool, req.cafe_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CafeNotFound))?;

    let mut tx = state.pool.begin().await?;
    let (table, existing) = match req.table_id {
        Some(table_id) => {
            let table = db::tables::find(&state.pool, cafe.id, table_id).await?;
            db::bookings::lock_table(&mut *tx, table_id).await?;
            let existing =
                db::bookings::list_active_for_table(&mut *tx, table_id, req.booking_date)
                    .await?;
            (table, existing)
        }
        None => (None, Vec::new()),
    };

    let now = chrono::Local::now().naive_local();
    validate_booking(req, &cafe, table.as_ref(), &existing, now)?;

    let booking = db::bookings::create(&mut *tx, customer.user_id, req).await?;
    tx.commit().await?;
    tracing::info!(
        booking_id = booking.id,
        booking_ref = %booking.booking_ref,
        cafe_id = cafe.id,
        "Booking created"
    );
    Ok(booking)
}

/// Cancel one of the caller's own bookings
pub async fn cancel_own(
    state: &AppState,
    customer: &CurrentUser,
    booking_id: i64,
) -> ServiceResult<Booking> {
    let booking = db::bookings::find(&state.pool, booking_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::BookingNotFound))?;
    if booking.customer_id != customer.user_id {
        return Err(AppError::forbidden("Booking belongs to another customer").into());
    }
    can_customer_cancel(&booking)?;

    let updated = db::bookings::set_status(&state.pool, booking.id, BookingStatus::Cancelled)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::BookingNotFound))?;
    tracing::info!(booking_id = booking.id, "Booking cancelled by customer");
    Ok(updated)
}

/// Owner status change on a booking of `cafe_id`. Reviving an inactive
/// booking re-checks its slot under the table lock.
pub async fn set_status_by_owner(
    state: &AppState,
    cafe_id: i64,
    booking_id: i64,
    to: BookingStatus,
) -> ServiceResult<Booking> {
    let not_found =
        || AppError::new(ErrorCode::BookingNotFound).with_detail("booking_id", booking_id);

    let booking = db::bookings::find(&state.pool, booking_id)
        .await?
        .filter(|b| b.cafe_id == cafe_id)
        .ok_or_else(not_found)?;

    let mut tx = state.pool.begin().await?;
    if let Some(table_id) = booking.table_id {
        db::bookings::lock_table(&mut *tx, table_id).await?;
        let existing =
            db::bookings::list_active_for_table(&mut *tx, table_id, booking.booking_date).await?;
        check_status_change(&booking, to, &existing)?;
    }
    let updated = db::bookings::set_status(&mut *tx, booking_id, to)
        .await?
        .ok_or_else(not_found)?;
    tx.commit().await?;

    tracing::info!(cafe_id, booking_id, status = ?to, "Booking status updated");
    Ok(updated)
}

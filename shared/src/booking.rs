//! Table booking rules
//!
//! Pure checks run before a booking row is written. The caller loads the
//! café, the requested table, and the active bookings on that table for the
//! requested date, then passes them in here.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::error::{AppError, ErrorCode};
use crate::models::{Booking, BookingCreate, BookingStatus, Cafe, CafeTable};

/// A booking holds its table for this many minutes
pub const BOOKING_SLOT_MINUTES: i64 = 120;
/// Upper bound on party size, independent of table capacity
pub const MAX_GUESTS: i32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("cafe is not accepting bookings")]
    CafeNotPublic,

    #[error("number of guests must be between 1 and {MAX_GUESTS}")]
    InvalidGuests(i32),

    #[error("booking date {0} is in the past")]
    InPast(NaiveDate),

    #[error("start time {0} has already passed today")]
    StartPassed(NaiveTime),

    #[error("start time {start} is outside opening hours {open}-{close}")]
    OutsideHours {
        start: NaiveTime,
        open: NaiveTime,
        close: NaiveTime,
    },

    #[error("table {0} does not belong to this cafe")]
    TableNotInCafe(i64),

    #[error("party of {guests} exceeds table capacity {capacity}")]
    ExceedsCapacity { guests: i32, capacity: i32 },

    #[error("table is already booked at {0}")]
    Overlap(NaiveTime),

    #[error("booking in status {0:?} cannot be cancelled")]
    NotCancellable(BookingStatus),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        let code = match &err {
            BookingError::CafeNotPublic => ErrorCode::CafeNotPublic,
            BookingError::InvalidGuests(_) => ErrorCode::ValueOutOfRange,
            BookingError::InPast(_) | BookingError::StartPassed(_) => ErrorCode::BookingInPast,
            BookingError::OutsideHours { .. } => ErrorCode::BookingOutsideHours,
            BookingError::TableNotInCafe(_) => ErrorCode::TableNotFound,
            BookingError::ExceedsCapacity { .. } => ErrorCode::GuestsExceedCapacity,
            BookingError::Overlap(_) => ErrorCode::BookingOverlap,
            BookingError::NotCancellable(_) => ErrorCode::BookingNotCancellable,
        };
        AppError::with_message(code, err.to_string())
    }
}

/// Whether two start times on the same date fall within one slot of each other
pub fn slots_overlap(a: NaiveTime, b: NaiveTime) -> bool {
    let gap = (a - b).num_minutes().abs();
    gap < BOOKING_SLOT_MINUTES
}

/// First active booking in `existing`, other than `skip_id`, whose slot
/// overlaps `start` on the given table and date
fn find_clash<'a>(
    existing: &'a [Booking],
    table_id: i64,
    date: NaiveDate,
    start: NaiveTime,
    skip_id: Option<i64>,
) -> Option<&'a Booking> {
    existing.iter().find(|b| {
        Some(b.id) != skip_id
            && b.table_id == Some(table_id)
            && b.booking_date == date
            && b.status.is_active()
            && slots_overlap(b.start_time, start)
    })
}

/// Validate a booking request.
///
/// `table` is the row for `req.table_id` when one was requested (None if
/// the id did not resolve). `existing` are bookings on that table and date.
/// `now` is the café's local wall clock.
pub fn validate_booking(
    req: &BookingCreate,
    cafe: &Cafe,
    table: Option<&CafeTable>,
    existing: &[Booking],
    now: NaiveDateTime,
) -> Result<(), BookingError> {
    let today = now.date();
    if !cafe.is_public() {
        return Err(BookingError::CafeNotPublic);
    }
    if !(1..=MAX_GUESTS).contains(&req.number_of_guests) {
        return Err(BookingError::InvalidGuests(req.number_of_guests));
    }
    if req.booking_date < today {
        return Err(BookingError::InPast(req.booking_date));
    }
    if req.booking_date == today && req.start_time < now.time() {
        return Err(BookingError::StartPassed(req.start_time));
    }
    if !cafe.is_open_at(req.start_time) {
        return Err(BookingError::OutsideHours {
            start: req.start_time,
            open: cafe.opening_time,
            close: cafe.closing_time,
        });
    }

    let Some(table_id) = req.table_id else {
        return Ok(());
    };
    let table = table
        .filter(|t| t.id == table_id && t.cafe_id == cafe.id)
        .ok_or(BookingError::TableNotInCafe(table_id))?;
    if req.number_of_guests > table.capacity {
        return Err(BookingError::ExceedsCapacity {
            guests: req.number_of_guests,
            capacity: table.capacity,
        });
    }

    if let Some(b) = find_clash(existing, table_id, req.booking_date, req.start_time, None) {
        return Err(BookingError::Overlap(b.start_time));
    }
    Ok(())
}

/// A cancelled or no-show booking moved back to PENDING/CONFIRMED takes
/// its table again, so its slot must still be free.
pub fn check_status_change(
    booking: &Booking,
    to: BookingStatus,
    existing: &[Booking],
) -> Result<(), BookingError> {
    if booking.status.is_active() || !to.is_active() {
        return Ok(());
    }
    let Some(table_id) = booking.table_id else {
        return Ok(());
    };
    match find_clash(existing, table_id, booking.booking_date, booking.start_time, Some(booking.id)) {
        Some(b) => Err(BookingError::Overlap(b.start_time)),
        None => Ok(()),
    }
}

/// Customers may cancel their own booking while it still holds the table
pub fn can_customer_cancel(booking: &Booking) -> Result<(), BookingError> {
    if booking.status.is_active() {
        Ok(())
    } else {
        Err(BookingError::NotCancellable(booking.status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TableStatus, TableType};

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
    }

    fn morning(d: u32) -> NaiveDateTime {
        day(d).and_time(hm(8, 0))
    }

    fn cafe() -> Cafe {
        Cafe {
            id: 10,
            owner_id: 1,
            name: "Brew".into(),
            description: None,
            address: "1 Main".into(),
            city: "Pune".into(),
            state: None,
            zip_code: None,
            contact_number: None,
            email: None,
            gst_number: None,
            fssai_license: None,
            opening_time: hm(9, 0),
            closing_time: hm(22, 0),
            is_verified: true,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn table(id: i64, cafe_id: i64, capacity: i32) -> CafeTable {
        CafeTable {
            id,
            cafe_id,
            table_number: 1,
            table_type: TableType::Standard,
            capacity,
            display_label: None,
            description: None,
            status: TableStatus::Available,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn request(table_id: Option<i64>, date: NaiveDate, start: NaiveTime, guests: i32) -> BookingCreate {
        BookingCreate {
            cafe_id: 10,
            table_id,
            booking_date: date,
            start_time: start,
            number_of_guests: guests,
            special_requests: None,
        }
    }

    fn booking(table_id: i64, date: NaiveDate, start: NaiveTime, status: BookingStatus) -> Booking {
        Booking {
            id: 99,
            booking_ref: "BKG-20260501120000-123".into(),
            cafe_id: 10,
            customer_id: 5,
            table_id: Some(table_id),
            booking_date: date,
            start_time: start,
            number_of_guests: 2,
            special_requests: None,
            status,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_valid_booking_without_table() {
        let req = request(None, day(10), hm(12, 0), 3);
        assert_eq!(validate_booking(&req, &cafe(), None, &[], morning(9)), Ok(()));
    }

    #[test]
    fn test_unpublished_cafe_rejected() {
        let mut c = cafe();
        c.is_verified = false;
        let req = request(None, day(10), hm(12, 0), 3);
        assert_eq!(
            validate_booking(&req, &c, None, &[], morning(9)),
            Err(BookingError::CafeNotPublic)
        );
    }

    #[test]
    fn test_guest_count_and_date() {
        let c = cafe();
        let req = request(None, day(10), hm(12, 0), 0);
        assert_eq!(
            validate_booking(&req, &c, None, &[], morning(9)),
            Err(BookingError::InvalidGuests(0))
        );
        let req = request(None, day(8), hm(12, 0), 2);
        assert_eq!(
            validate_booking(&req, &c, None, &[], morning(9)),
            Err(BookingError::InPast(day(8)))
        );
        // Today is allowed
        let req = request(None, day(9), hm(12, 0), 2);
        assert!(validate_booking(&req, &c, None, &[], morning(9)).is_ok());
    }

    #[test]
    fn test_start_time_already_passed_today() {
        let c = cafe();
        let now = day(9).and_time(hm(15, 0));
        let req = request(None, day(9), hm(12, 0), 2);
        assert_eq!(
            validate_booking(&req, &c, None, &[], now),
            Err(BookingError::StartPassed(hm(12, 0)))
        );
        let req = request(None, day(9), hm(16, 0), 2);
        assert!(validate_booking(&req, &c, None, &[], now).is_ok());
        // Earlier clock time on a later date is fine
        let req = request(None, day(10), hm(12, 0), 2);
        assert!(validate_booking(&req, &c, None, &[], now).is_ok());
    }

    #[test]
    fn test_outside_opening_hours() {
        let req = request(None, day(10), hm(8, 30), 2);
        assert!(matches!(
            validate_booking(&req, &cafe(), None, &[], morning(9)),
            Err(BookingError::OutsideHours { .. })
        ));
    }

    #[test]
    fn test_table_checks() {
        let c = cafe();
        let t = table(7, 10, 4);
        let req = request(Some(7), day(10), hm(12, 0), 6);
        assert_eq!(
            validate_booking(&req, &c, Some(&t), &[], morning(9)),
            Err(BookingError::ExceedsCapacity {
                guests: 6,
                capacity: 4
            })
        );

        let foreign = table(7, 11, 4);
        let req = request(Some(7), day(10), hm(12, 0), 2);
        assert_eq!(
            validate_booking(&req, &c, Some(&foreign), &[], morning(9)),
            Err(BookingError::TableNotInCafe(7))
        );
        assert_eq!(
            validate_booking(&req, &c, None, &[], morning(9)),
            Err(BookingError::TableNotInCafe(7))
        );
    }

    #[test]
    fn test_overlapping_active_booking_rejected() {
        let c = cafe();
        let t = table(7, 10, 4);
        let existing = [booking(7, day(10), hm(12, 0), BookingStatus::Confirmed)];

        let req = request(Some(7), day(10), hm(13, 30), 2);
        assert_eq!(
            validate_booking(&req, &c, Some(&t), &existing, morning(9)),
            Err(BookingError::Overlap(hm(12, 0)))
        );

        // Exactly one slot later is free
        let req = request(Some(7), day(10), hm(14, 0), 2);
        assert!(validate_booking(&req, &c, Some(&t), &existing, morning(9)).is_ok());

        // Another date is free
        let req = request(Some(7), day(11), hm(12, 0), 2);
        assert!(validate_booking(&req, &c, Some(&t), &existing, morning(9)).is_ok());
    }

    #[test]
    fn test_cancelled_booking_does_not_block() {
        let c = cafe();
        let t = table(7, 10, 4);
        let existing = [
            booking(7, day(10), hm(12, 0), BookingStatus::Cancelled),
            booking(7, day(10), hm(12, 30), BookingStatus::NoShow),
        ];
        let req = request(Some(7), day(10), hm(12, 0), 2);
        assert!(validate_booking(&req, &c, Some(&t), &existing, morning(9)).is_ok());
    }

    #[test]
    fn test_reviving_cancelled_booking_needs_free_slot() {
        let mut cancelled = booking(7, day(10), hm(12, 0), BookingStatus::Cancelled);
        cancelled.id = 1;
        let mut later = booking(7, day(10), hm(12, 30), BookingStatus::Pending);
        later.id = 2;
        let existing = [later];

        assert_eq!(
            check_status_change(&cancelled, BookingStatus::Confirmed, &existing),
            Err(BookingError::Overlap(hm(12, 30)))
        );
        assert_eq!(
            check_status_change(&cancelled, BookingStatus::Pending, &existing),
            Err(BookingError::Overlap(hm(12, 30)))
        );
        // Staying inactive never conflicts
        assert!(check_status_change(&cancelled, BookingStatus::NoShow, &existing).is_ok());
        assert!(check_status_change(&cancelled, BookingStatus::Confirmed, &[]).is_ok());
    }

    #[test]
    fn test_active_booking_does_not_clash_with_itself() {
        let mut pending = booking(7, day(10), hm(12, 0), BookingStatus::Pending);
        pending.id = 3;
        let existing = [pending.clone()];
        assert!(check_status_change(&pending, BookingStatus::Confirmed, &existing).is_ok());

        let mut no_show = pending.clone();
        no_show.status = BookingStatus::NoShow;
        assert!(check_status_change(&no_show, BookingStatus::Confirmed, &existing).is_ok());
    }

    #[test]
    fn test_customer_cancel_rule() {
        assert!(can_customer_cancel(&booking(1, day(1), hm(9, 0), BookingStatus::Pending)).is_ok());
        assert!(can_customer_cancel(&booking(1, day(1), hm(9, 0), BookingStatus::Confirmed)).is_ok());
        assert_eq!(
            can_customer_cancel(&booking(1, day(1), hm(9, 0), BookingStatus::Completed)),
            Err(BookingError::NotCancellable(BookingStatus::Completed))
        );
    }

    #[test]
    fn test_error_codes() {
        let app: AppError = BookingError::Overlap(hm(12, 0)).into();
        assert_eq!(app.code, ErrorCode::BookingOverlap);
        let app: AppError = BookingError::CafeNotPublic.into();
        assert_eq!(app.code, ErrorCode::CafeNotPublic);
    }
}

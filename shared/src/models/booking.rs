//! Table Booking Model

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Booking status. Owners may set any status; customers may only cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "booking_status", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
}

impl BookingStatus {
    /// Still holds the table
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: i64,
    pub booking_ref: String,
    pub cafe_id: i64,
    pub customer_id: i64,
    pub table_id: Option<i64>,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub number_of_guests: i32,
    pub special_requests: Option<String>,
    pub status: BookingStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreate {
    pub cafe_id: i64,
    pub table_id: Option<i64>,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub number_of_guests: i32,
    pub special_requests: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingStatusUpdate {
    pub status: BookingStatus,
}

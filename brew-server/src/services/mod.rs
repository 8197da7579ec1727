//! Multi-step workflows shared by the API handlers
//!
//! Single-table reads and writes stay in the handlers; anything that spans
//! tables, needs a transaction, or sends email lives here.

pub mod access;
pub mod admin;
pub mod bookings;
pub mod dashboard;
pub mod orders;
pub mod staff;

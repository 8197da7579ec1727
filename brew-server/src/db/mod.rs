//! PostgreSQL access, one module per table group
//!
//! Functions take `&PgPool` for single statements and `&mut PgConnection`
//! when they must run inside a caller's transaction.

pub mod bookings;
pub mod cafes;
pub mod dashboard;
pub mod email_verifications;
pub mod menu;
pub mod orders;
pub mod payments;
pub mod refresh_tokens;
pub mod staff;
pub mod tables;
pub mod users;

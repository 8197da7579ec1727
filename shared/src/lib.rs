//! Shared types for the Brew & Co platform
//!
//! Domain models, the error taxonomy, the order state machine and pricing,
//! booking rules, and reference generation. No IO lives here; the `db`
//! feature only adds `sqlx` derives to the row types.

pub mod booking;
pub mod error;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use serde::{Deserialize, Serialize};

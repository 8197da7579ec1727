//! Data models
//!
//! Shared between brew-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes; enums map to Postgres enum types.

pub mod booking;
pub mod cafe;
pub mod dashboard;
pub mod menu;
pub mod order;
pub mod payment;
pub mod staff;
pub mod table;
pub mod user;

// Re-exports
pub use booking::*;
pub use cafe::*;
pub use dashboard::*;
pub use menu::*;
pub use order::*;
pub use payment::*;
pub use staff::*;
pub use table::*;
pub use user::*;

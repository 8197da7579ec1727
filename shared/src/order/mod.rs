//! Order lifecycle and pricing
//!
//! - [`status`]: the single transition table every role goes through
//! - [`pricing`]: line subtotals and order totals on `rust_decimal`

pub mod pricing;
pub mod status;

// Re-exports
pub use pricing::{OrderTotals, PricedLine, PricingError, compute_totals, price_lines};
pub use status::{OrderStatus, TransitionError, authorize_transition};

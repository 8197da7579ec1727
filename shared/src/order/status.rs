//! Order status state machine
//!
//! ```text
//! PLACED -> CONFIRMED -> SENT_TO_KITCHEN -> PREPARING -> READY -> DELIVERED
//!    \            \
//!     +-----------+--> CANCELLED
//! ```
//!
//! Every status write in the system is checked by [`authorize_transition`]:
//! first against the graph, then against the role that owns the edge.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::{AppError, ErrorCode};
use crate::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "order_status", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum OrderStatus {
    Placed,
    Confirmed,
    SentToKitchen,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Placed,
        OrderStatus::Confirmed,
        OrderStatus::SentToKitchen,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Statuses shown in the kitchen queue
    pub const KITCHEN_QUEUE: [OrderStatus; 3] = [
        OrderStatus::SentToKitchen,
        OrderStatus::Preparing,
        OrderStatus::Ready,
    ];

    /// Statuses shown in the floor (waiter) queue
    pub const FLOOR_QUEUE: [OrderStatus; 3] = [
        OrderStatus::Confirmed,
        OrderStatus::SentToKitchen,
        OrderStatus::Ready,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Placed => "PLACED",
            Self::Confirmed => "CONFIRMED",
            Self::SentToKitchen => "SENT_TO_KITCHEN",
            Self::Preparing => "PREPARING",
            Self::Ready => "READY",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// The single forward step from this status
    pub const fn next(&self) -> Option<OrderStatus> {
        match self {
            Self::Placed => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::SentToKitchen),
            Self::SentToKitchen => Some(Self::Preparing),
            Self::Preparing => Some(Self::Ready),
            Self::Ready => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled => None,
        }
    }

    pub const fn is_cancellable(&self) -> bool {
        matches!(self, Self::Placed | Self::Confirmed)
    }

    pub fn can_transition_to(&self, to: OrderStatus) -> bool {
        if to == Self::Cancelled {
            return self.is_cancellable();
        }
        self.next() == Some(to)
    }

    /// Validate the edge against the graph only
    pub fn transition(self, to: OrderStatus) -> Result<OrderStatus, TransitionError> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(TransitionError::Illegal { from: self, to })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot move order from {from} to {to}")]
    Illegal { from: OrderStatus, to: OrderStatus },

    #[error("{role} may not move an order to {to}")]
    NotPermitted { role: Role, to: OrderStatus },
}

/// Role that owns the edge leading into `to`
fn may_set(role: Role, to: OrderStatus) -> bool {
    match role {
        Role::Customer => to == OrderStatus::Cancelled,
        Role::CafeOwner => to == OrderStatus::Confirmed,
        Role::Waiter => matches!(to, OrderStatus::SentToKitchen | OrderStatus::Delivered),
        Role::Chef => matches!(to, OrderStatus::Preparing | OrderStatus::Ready),
        Role::Admin => false,
    }
}

/// Check `from -> to` against the graph, then against `role`.
///
/// Graph violations win over role violations so that a chef asking for
/// CONFIRMED -> READY learns the edge does not exist.
pub fn authorize_transition(
    role: Role,
    from: OrderStatus,
    to: OrderStatus,
) -> Result<OrderStatus, TransitionError> {
    from.transition(to)?;
    if !may_set(role, to) {
        return Err(TransitionError::NotPermitted { role, to });
    }
    Ok(to)
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::Illegal { from, to } => {
                AppError::with_message(ErrorCode::InvalidTransition, err.to_string())
                    .with_detail("from", from.as_str())
                    .with_detail("to", to.as_str())
            }
            TransitionError::NotPermitted { role, to } => {
                AppError::with_message(ErrorCode::PermissionDenied, err.to_string())
                    .with_detail("role", role.as_str())
                    .with_detail("to", to.as_str())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn test_forward_chain() {
        let mut s = Placed;
        let mut seen = vec![s];
        while let Some(n) = s.next() {
            s = s.transition(n).unwrap();
            seen.push(s);
        }
        assert_eq!(
            seen,
            vec![Placed, Confirmed, SentToKitchen, Preparing, Ready, Delivered]
        );
    }

    #[test]
    fn test_cancel_only_from_placed_or_confirmed() {
        for from in OrderStatus::ALL {
            let allowed = from.can_transition_to(Cancelled);
            assert_eq!(allowed, matches!(from, Placed | Confirmed), "{from}");
        }
    }

    #[test]
    fn test_skipping_steps_is_rejected() {
        assert_eq!(
            Confirmed.transition(Ready),
            Err(TransitionError::Illegal {
                from: Confirmed,
                to: Ready
            })
        );
        assert!(Placed.transition(Delivered).is_err());
        assert!(Ready.transition(Preparing).is_err());
        assert!(Delivered.transition(Cancelled).is_err());
        assert!(Cancelled.transition(Placed).is_err());
        assert!(Placed.transition(Placed).is_err());
    }

    #[test]
    fn test_terminal_has_no_exits() {
        for to in OrderStatus::ALL {
            assert!(!Delivered.can_transition_to(to));
            assert!(!Cancelled.can_transition_to(to));
        }
    }

    #[test]
    fn test_role_edges() {
        assert!(authorize_transition(Role::CafeOwner, Placed, Confirmed).is_ok());
        assert!(authorize_transition(Role::Waiter, Confirmed, SentToKitchen).is_ok());
        assert!(authorize_transition(Role::Chef, SentToKitchen, Preparing).is_ok());
        assert!(authorize_transition(Role::Chef, Preparing, Ready).is_ok());
        assert!(authorize_transition(Role::Waiter, Ready, Delivered).is_ok());
        assert!(authorize_transition(Role::Customer, Confirmed, Cancelled).is_ok());
    }

    #[test]
    fn test_role_cannot_take_foreign_edge() {
        assert_eq!(
            authorize_transition(Role::Chef, Ready, Delivered),
            Err(TransitionError::NotPermitted {
                role: Role::Chef,
                to: Delivered
            })
        );
        assert!(authorize_transition(Role::Waiter, SentToKitchen, Preparing).is_err());
        assert!(authorize_transition(Role::Customer, Placed, Confirmed).is_err());
        assert!(authorize_transition(Role::Admin, Placed, Confirmed).is_err());
    }

    #[test]
    fn test_graph_error_reported_before_role_error() {
        let err = authorize_transition(Role::Chef, Confirmed, Ready).unwrap_err();
        assert!(matches!(err, TransitionError::Illegal { .. }));
    }

    #[test]
    fn test_error_mapping() {
        let app: AppError = Confirmed.transition(Ready).unwrap_err().into();
        assert_eq!(app.code, ErrorCode::InvalidTransition);
        assert_eq!(app.message, "cannot move order from CONFIRMED to READY");

        let app: AppError = authorize_transition(Role::Waiter, Preparing, Ready)
            .unwrap_err()
            .into();
        assert_eq!(app.code, ErrorCode::PermissionDenied);
    }

    #[test]
    fn test_parse_and_serde() {
        assert_eq!("sent_to_kitchen".parse::<OrderStatus>(), Ok(SentToKitchen));
        assert!("SHIPPED".parse::<OrderStatus>().is_err());
        let json = serde_json::to_string(&SentToKitchen).unwrap();
        assert_eq!(json, "\"SENT_TO_KITCHEN\"");
    }
}

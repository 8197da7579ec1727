//! Dashboard aggregate counts (owner and admin)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::user::Role;
use crate::order::OrderStatus;

/// Order counts per lifecycle bucket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCounts {
    pub total_orders: i64,
    pub pending_orders: i64,
    pub confirmed_orders: i64,
    /// Sent to kitchen or being prepared
    pub preparing_orders: i64,
    pub ready_orders: i64,
    pub delivered_orders: i64,
    pub cancelled_orders: i64,
}

impl OrderCounts {
    /// Fold `GROUP BY status` rows into buckets
    pub fn from_status_counts(rows: &[(OrderStatus, i64)]) -> Self {
        let mut counts = Self::default();
        for &(status, n) in rows {
            counts.total_orders += n;
            match status {
                OrderStatus::Placed => counts.pending_orders += n,
                OrderStatus::Confirmed => counts.confirmed_orders += n,
                OrderStatus::SentToKitchen | OrderStatus::Preparing => {
                    counts.preparing_orders += n
                }
                OrderStatus::Ready => counts.ready_orders += n,
                OrderStatus::Delivered => counts.delivered_orders += n,
                OrderStatus::Cancelled => counts.cancelled_orders += n,
            }
        }
        counts
    }
}

/// Café owner dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CafeDashboard {
    pub cafe_id: i64,
    #[serde(flatten)]
    pub orders: OrderCounts,
    pub today_orders: i64,
    /// Sum of grand totals of delivered orders
    pub total_revenue: Decimal,
    pub today_revenue: Decimal,
    pub total_bookings: i64,
    pub total_tables: i64,
    pub available_tables: i64,
    pub total_staff: i64,
    pub total_chefs: i64,
    pub total_waiters: i64,
    pub total_menu_items: i64,
}

/// Per-role user counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCounts {
    pub admins: i64,
    pub cafe_owners: i64,
    pub chefs: i64,
    pub waiters: i64,
    pub customers: i64,
}

impl RoleCounts {
    pub fn from_role_counts(rows: &[(Role, i64)]) -> Self {
        let mut counts = Self::default();
        for &(role, n) in rows {
            match role {
                Role::Admin => counts.admins += n,
                Role::CafeOwner => counts.cafe_owners += n,
                Role::Chef => counts.chefs += n,
                Role::Waiter => counts.waiters += n,
                Role::Customer => counts.customers += n,
            }
        }
        counts
    }
}

/// Administrator dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminDashboard {
    pub total_users: i64,
    pub active_users: i64,
    pub pending_users: i64,
    pub users_by_role: RoleCounts,
    pub registrations_last_7_days: i64,
    pub total_cafes: i64,
    pub verified_cafes: i64,
    pub pending_cafes: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_counts_fold() {
        let rows = [
            (OrderStatus::Placed, 3),
            (OrderStatus::Confirmed, 1),
            (OrderStatus::SentToKitchen, 2),
            (OrderStatus::Preparing, 4),
            (OrderStatus::Ready, 1),
            (OrderStatus::Delivered, 10),
            (OrderStatus::Cancelled, 2),
        ];
        let counts = OrderCounts::from_status_counts(&rows);
        assert_eq!(counts.total_orders, 23);
        assert_eq!(counts.pending_orders, 3);
        assert_eq!(counts.preparing_orders, 6);
        assert_eq!(counts.delivered_orders, 10);
        assert_eq!(counts.cancelled_orders, 2);
    }

    #[test]
    fn test_order_counts_empty() {
        assert_eq!(OrderCounts::from_status_counts(&[]), OrderCounts::default());
    }

    #[test]
    fn test_role_counts_fold() {
        let counts = RoleCounts::from_role_counts(&[
            (Role::Customer, 40),
            (Role::CafeOwner, 5),
            (Role::Chef, 6),
            (Role::Waiter, 7),
            (Role::Admin, 1),
        ]);
        assert_eq!(counts.customers, 40);
        assert_eq!(counts.cafe_owners, 5);
        assert_eq!(counts.chefs + counts.waiters, 13);
        assert_eq!(counts.admins, 1);
    }
}

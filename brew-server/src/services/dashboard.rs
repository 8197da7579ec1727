//! Café owner dashboard

use chrono::{DateTime, NaiveTime, Utc};
use shared::models::{CafeDashboard, OrderCounts, StaffRole};

use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;

/// Start of the UTC day containing `now`, in millis
pub fn day_start_millis(now: DateTime<Utc>) -> i64 {
    now.date_naive().and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

pub async fn cafe_dashboard(state: &AppState, cafe_id: i64) -> ServiceResult<CafeDashboard> {
    let status_rows = db::orders::count_by_status(&state.pool, cafe_id).await?;
    let (_, total_revenue) = db::orders::count_and_revenue_since(&state.pool, cafe_id, 0).await?;
    let (today_orders, today_revenue) = db::orders::count_and_revenue_since(
        &state.pool,
        cafe_id,
        day_start_millis(Utc::now()),
    )
    .await?;
    let counts = db::dashboard::cafe_counts(&state.pool, cafe_id).await?;
    let staff = db::staff::count_by_role(&state.pool, cafe_id).await?;

    let staff_of = |role: StaffRole| {
        staff
            .iter()
            .filter(|(r, _)| *r == role)
            .map(|(_, n)| *n)
            .sum::<i64>()
    };

    Ok(CafeDashboard {
        cafe_id,
        orders: OrderCounts::from_status_counts(&status_rows),
        today_orders,
        total_revenue,
        today_revenue,
        total_bookings: counts.total_bookings,
        total_tables: counts.total_tables,
        available_tables: counts.available_tables,
        total_staff: staff.iter().map(|(_, n)| n).sum(),
        total_chefs: staff_of(StaffRole::Chef),
        total_waiters: staff_of(StaffRole::Waiter),
        total_menu_items: counts.total_menu_items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_day_start() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 17, 45, 12).unwrap();
        let start = Utc.with_ymd_and_hms(2025, 3, 14, 0, 0, 0).unwrap();
        assert_eq!(day_start_millis(now), start.timestamp_millis());
    }
}

//! Café access scoping
//!
//! Owners reach a café through `Cafe.owner_id`; chefs and waiters through
//! their single active staff assignment. Everyone else is refused.

use shared::error::{AppError, ErrorCode};
use shared::models::{Cafe, Order, Role, StaffAssignment, StaffRole};

use crate::auth::CurrentUser;
use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;

/// How the caller reaches a café
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CafeScope {
    Owner,
    Staff(StaffRole),
}

/// Decide whether `user` may act on `cafe`.
///
/// `assignment` is the caller's active staff assignment, if any.
pub fn resolve_scope(
    user: &CurrentUser,
    cafe: &Cafe,
    assignment: Option<&StaffAssignment>,
) -> Result<CafeScope, AppError> {
    match user.role {
        Role::CafeOwner if cafe.owner_id == user.user_id => Ok(CafeScope::Owner),
        Role::Chef | Role::Waiter => match assignment {
            Some(a) if a.is_active && a.staff_id == user.user_id && a.cafe_id == cafe.id => {
                Ok(CafeScope::Staff(a.role))
            }
            _ => Err(denied(cafe.id)),
        },
        _ => Err(denied(cafe.id)),
    }
}

fn denied(cafe_id: i64) -> AppError {
    AppError::new(ErrorCode::CafeAccessDenied).with_detail("cafe_id", cafe_id)
}

/// Customers only see and cancel orders they placed
pub fn check_order_owner(order: &Order, user: &CurrentUser) -> Result<(), AppError> {
    if order.customer_id == user.user_id {
        Ok(())
    } else {
        Err(AppError::new(ErrorCode::OrderAccessDenied).with_detail("order_id", order.id))
    }
}

pub async fn load_cafe(state: &AppState, cafe_id: i64) -> ServiceResult<Cafe> {
    db::cafes::find_by_id(&state.pool, cafe_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CafeNotFound).with_detail("cafe_id", cafe_id).into())
}

/// Load the café and check the caller may act on it
pub async fn authorize_cafe(
    state: &AppState,
    user: &CurrentUser,
    cafe_id: i64,
) -> ServiceResult<(Cafe, CafeScope)> {
    let cafe = load_cafe(state, cafe_id).await?;
    let assignment = if user.role.is_staff() {
        db::staff::find_active_for_staff(&state.pool, user.user_id).await?
    } else {
        None
    };
    let scope = resolve_scope(user, &cafe, assignment.as_ref())?;
    Ok((cafe, scope))
}

/// Owner-only variant
pub async fn owned_cafe(state: &AppState, user: &CurrentUser, cafe_id: i64) -> ServiceResult<Cafe> {
    match authorize_cafe(state, user, cafe_id).await? {
        (cafe, CafeScope::Owner) => Ok(cafe),
        _ => Err(denied(cafe_id).into()),
    }
}

/// The café a chef or waiter is currently assigned to
pub async fn assigned_cafe(
    state: &AppState,
    user: &CurrentUser,
) -> ServiceResult<(Cafe, StaffAssignment)> {
    let assignment = db::staff::find_active_for_staff(&state.pool, user.user_id)
        .await?
        .filter(|a| a.role.as_role() == user.role)
        .ok_or_else(|| AppError::new(ErrorCode::NoActiveAssignment))?;
    let cafe = load_cafe(state, assignment.cafe_id).await?;
    Ok((cafe, assignment))
}

/// An order of the café the chef or waiter works at.
///
/// Orders of other cafés answer 404 rather than 403.
pub async fn assigned_order(
    state: &AppState,
    user: &CurrentUser,
    order_id: i64,
) -> ServiceResult<Order> {
    let (cafe, _) = assigned_cafe(state, user).await?;
    db::orders::find(&state.pool, order_id)
        .await?
        .filter(|o| o.cafe_id == cafe.id)
        .ok_or_else(|| {
            AppError::new(ErrorCode::OrderNotFound)
                .with_detail("order_id", order_id)
                .into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use rust_decimal::Decimal;
    use shared::models::{OrderType, PaymentStatus};
    use shared::order::OrderStatus;

    fn cafe(id: i64, owner_id: i64) -> Cafe {
        Cafe {
            id,
            owner_id,
            name: "Bean There".into(),
            description: None,
            address: "1 Main St".into(),
            city: "Pune".into(),
            state: None,
            zip_code: None,
            contact_number: None,
            email: None,
            gst_number: None,
            fssai_license: None,
            opening_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            closing_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            is_verified: true,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn user(user_id: i64, role: Role) -> CurrentUser {
        CurrentUser {
            user_id,
            email: format!("{user_id}@brew.test"),
            role,
        }
    }

    fn assignment(staff_id: i64, cafe_id: i64, role: StaffRole) -> StaffAssignment {
        StaffAssignment {
            id: 900,
            cafe_id,
            staff_id,
            role,
            is_active: true,
            assigned_by: Some(1),
            assigned_at: 0,
        }
    }

    #[test]
    fn test_owner_of_cafe() {
        let scope = resolve_scope(&user(1, Role::CafeOwner), &cafe(10, 1), None).unwrap();
        assert_eq!(scope, CafeScope::Owner);
    }

    #[test]
    fn test_other_owner_denied() {
        let err = resolve_scope(&user(2, Role::CafeOwner), &cafe(10, 1), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::CafeAccessDenied);
        assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_staff_assigned_here() {
        let a = assignment(5, 10, StaffRole::Chef);
        let scope = resolve_scope(&user(5, Role::Chef), &cafe(10, 1), Some(&a)).unwrap();
        assert_eq!(scope, CafeScope::Staff(StaffRole::Chef));
    }

    #[test]
    fn test_staff_assigned_elsewhere_denied() {
        let a = assignment(5, 11, StaffRole::Waiter);
        assert!(resolve_scope(&user(5, Role::Waiter), &cafe(10, 1), Some(&a)).is_err());
    }

    #[test]
    fn test_staff_without_assignment_denied() {
        assert!(resolve_scope(&user(5, Role::Chef), &cafe(10, 1), None).is_err());
    }

    #[test]
    fn test_inactive_assignment_denied() {
        let mut a = assignment(5, 10, StaffRole::Chef);
        a.is_active = false;
        assert!(resolve_scope(&user(5, Role::Chef), &cafe(10, 1), Some(&a)).is_err());
    }

    #[test]
    fn test_customer_and_admin_denied() {
        assert!(resolve_scope(&user(1, Role::Customer), &cafe(10, 1), None).is_err());
        assert!(resolve_scope(&user(1, Role::Admin), &cafe(10, 1), None).is_err());
    }

    fn order(id: i64, customer_id: i64) -> Order {
        Order {
            id,
            order_ref: "ORD-20260501120000-042".into(),
            cafe_id: 10,
            customer_id,
            table_id: None,
            order_type: OrderType::Takeaway,
            status: OrderStatus::Placed,
            special_instructions: None,
            total_amount: Decimal::new(25000, 2),
            tax_amount: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            grand_total: Decimal::new(25000, 2),
            payment_status: PaymentStatus::Pending,
            assigned_chef_id: None,
            assigned_waiter_id: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_customer_owns_order() {
        assert!(check_order_owner(&order(40, 7), &user(7, Role::Customer)).is_ok());
    }

    #[test]
    fn test_other_customer_gets_403() {
        let err = check_order_owner(&order(40, 7), &user(8, Role::Customer)).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderAccessDenied);
        assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);
    }
}

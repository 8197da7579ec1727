//! Staff Assignment Model

use serde::{Deserialize, Serialize};

use super::user::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "staff_role", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum StaffRole {
    Chef,
    Waiter,
}

impl StaffRole {
    pub const fn as_role(&self) -> Role {
        match self {
            Self::Chef => Role::Chef,
            Self::Waiter => Role::Waiter,
        }
    }
}

/// Binding of a CHEF/WAITER user to one café
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StaffAssignment {
    pub id: i64,
    pub cafe_id: i64,
    pub staff_id: i64,
    pub role: StaffRole,
    pub is_active: bool,
    pub assigned_by: Option<i64>,
    pub assigned_at: i64,
}

/// Assignment joined with the staff user's name and email
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StaffMember {
    pub assignment_id: i64,
    pub staff_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: StaffRole,
    pub assigned_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddStaffRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: StaffRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_role_mapping() {
        assert_eq!(StaffRole::Chef.as_role(), Role::Chef);
        assert_eq!(StaffRole::Waiter.as_role(), Role::Waiter);
    }
}

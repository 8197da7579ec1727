//! User Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Platform role carried in the access token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum Role {
    Admin,
    CafeOwner,
    Chef,
    Waiter,
    Customer,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::CafeOwner,
        Role::Chef,
        Role::Waiter,
        Role::Customer,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::CafeOwner => "CAFE_OWNER",
            Self::Chef => "CHEF",
            Self::Waiter => "WAITER",
            Self::Customer => "CUSTOMER",
        }
    }

    /// Kitchen and floor staff are scoped through a staff assignment
    pub const fn is_staff(&self) -> bool {
        matches!(self, Self::Chef | Self::Waiter)
    }

    /// Roles a visitor may request at self-registration
    pub const fn is_self_registrable(&self) -> bool {
        matches!(self, Self::Customer | Self::CafeOwner)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown role string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Argon2 hash, absent until an admin approves the account
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub is_email_verified: bool,
    pub login_count: i32,
    pub last_login_at: Option<i64>,
    pub last_login_ip: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Registered but never approved
    pub fn is_pending(&self) -> bool {
        !self.is_active && self.password_hash.is_none()
    }
}

/// Profile fields a user may edit on their own account
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfileUpdate {
    pub phone: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
}

/// Postal address submitted at registration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Address {
    pub id: i64,
    pub user_id: i64,
    pub street: String,
    pub city: String,
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressInput {
    pub street: String,
    pub city: String,
    pub postal_code: Option<String>,
}

/// Prior employment submitted at registration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct WorkExperience {
    pub id: i64,
    pub user_id: i64,
    pub company_name: String,
    pub position: String,
    pub years: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkExperienceInput {
    pub company_name: String,
    pub position: String,
    pub years: Option<i32>,
}

/// Identity document reference submitted at registration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct GovernmentProof {
    pub id: i64,
    pub user_id: i64,
    pub proof_type: String,
    pub proof_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernmentProofInput {
    pub proof_type: String,
    pub proof_number: String,
}

/// User with every registration entry, for admin review
#[derive(Debug, Clone, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub addresses: Vec<Address>,
    pub work_experiences: Vec<WorkExperience>,
    pub government_proofs: Vec<GovernmentProof>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert_eq!("cafe_owner".parse::<Role>(), Ok(Role::CafeOwner));
        assert!("MANAGER".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_matches_as_str() {
        let json = serde_json::to_string(&Role::CafeOwner).expect("serialize");
        assert_eq!(json, "\"CAFE_OWNER\"");
    }

    #[test]
    fn test_role_groups() {
        assert!(Role::Chef.is_staff());
        assert!(!Role::CafeOwner.is_staff());
        assert!(Role::Customer.is_self_registrable());
        assert!(!Role::Admin.is_self_registrable());
        assert!(!Role::Waiter.is_self_registrable());
    }
}

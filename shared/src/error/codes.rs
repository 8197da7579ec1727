//! Unified error codes for the Brew & Co platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Account & café errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Menu errors
//! - 7xxx: Table & booking errors
//! - 8xxx: Staff errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the frontend can switch
/// on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Refresh session has expired or was revoked
    SessionExpired = 1005,
    /// Account is disabled
    AccountDisabled = 1007,
    /// Account is waiting for admin approval
    AccountPendingApproval = 1008,
    /// Verification code expired
    VerificationCodeExpired = 1010,
    /// Verification code invalid
    VerificationCodeInvalid = 1011,
    /// Too many verification attempts
    TooManyAttempts = 1012,
    /// Password too short
    PasswordTooShort = 1013,
    /// Email already verified
    EmailAlreadyVerified = 1014,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Cannot modify admin user
    CannotModifyAdmin = 2004,
    /// Cannot modify own account through admin endpoints
    CannotModifySelf = 2005,
    /// Caller does not own or work at the café
    CafeAccessDenied = 2006,
    /// Caller did not place the order
    OrderAccessDenied = 2007,

    // ==================== 3xxx: Account & Café ====================
    /// User not found
    UserNotFound = 3001,
    /// Email already registered
    EmailAlreadyRegistered = 3002,
    /// User is already active
    UserAlreadyActive = 3003,
    /// User is not awaiting approval
    UserNotPending = 3004,
    /// Café not found
    CafeNotFound = 3101,
    /// Café is not verified or not active
    CafeNotPublic = 3102,
    /// Café already verified
    CafeAlreadyVerified = 3103,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4007,
    /// Status change not allowed by the order lifecycle
    InvalidTransition = 4010,
    /// Order can no longer be cancelled
    OrderNotCancellable = 4011,
    /// Order is delivered or cancelled
    OrderAlreadyTerminal = 4012,
    /// Menu item is unavailable or belongs to another café
    MenuItemUnavailable = 4013,
    /// Dine-in orders need a table
    TableRequiredForDineIn = 4014,

    // ==================== 5xxx: Payment ====================
    /// Payment record not found
    PaymentNotFound = 5001,
    /// Payment already completed
    PaymentAlreadyCompleted = 5002,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Invalid price
    InvalidPrice = 6002,
    /// Category not found
    CategoryNotFound = 6101,
    /// Category still has items
    CategoryHasItems = 6102,

    // ==================== 7xxx: Table & Booking ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table number already used in this café
    TableNumberExists = 7002,
    /// Booking not found
    BookingNotFound = 7101,
    /// Table already booked for an overlapping slot
    BookingOverlap = 7102,
    /// Guest count exceeds table capacity
    GuestsExceedCapacity = 7103,
    /// Requested time is outside opening hours
    BookingOutsideHours = 7104,
    /// Requested date is in the past
    BookingInPast = 7105,
    /// Booking can no longer be cancelled
    BookingNotCancellable = 7106,

    // ==================== 8xxx: Staff ====================
    /// Staff member not found
    StaffNotFound = 8001,
    /// Staff member already has an active assignment
    StaffAlreadyAssigned = 8002,
    /// Staff member does not hold the required role
    StaffRoleMismatch = 8003,
    /// Caller has no active café assignment
    NoActiveAssignment = 8004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Numeric value of this code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Whether this code represents success
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Default English message for this code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::InvalidFormat => "Invalid format",
            Self::RequiredField => "Required field missing",
            Self::ValueOutOfRange => "Value out of range",

            // Auth
            Self::NotAuthenticated => "Authentication required",
            Self::InvalidCredentials => "Invalid email or password",
            Self::TokenExpired => "Token has expired",
            Self::TokenInvalid => "Invalid token",
            Self::SessionExpired => "Session has expired, please sign in again",
            Self::AccountDisabled => "Account is disabled",
            Self::AccountPendingApproval => "Account is awaiting admin approval",
            Self::VerificationCodeExpired => "Verification code has expired",
            Self::VerificationCodeInvalid => "Verification code is invalid",
            Self::TooManyAttempts => "Too many attempts",
            Self::PasswordTooShort => "Password must be at least 8 characters",
            Self::EmailAlreadyVerified => "Email is already verified",

            // Permission
            Self::PermissionDenied => "Permission denied",
            Self::RoleRequired => "Role required",
            Self::CannotModifyAdmin => "Cannot modify admin user",
            Self::CannotModifySelf => "Cannot modify your own account",
            Self::CafeAccessDenied => "You do not have access to this cafe",
            Self::OrderAccessDenied => "You do not have access to this order",

            // Account & Café
            Self::UserNotFound => "User not found",
            Self::EmailAlreadyRegistered => "Email already registered",
            Self::UserAlreadyActive => "User is already active",
            Self::UserNotPending => "User is not awaiting approval",
            Self::CafeNotFound => "Cafe not found",
            Self::CafeNotPublic => "Cafe is not open for customers",
            Self::CafeAlreadyVerified => "Cafe is already verified",

            // Order
            Self::OrderNotFound => "Order not found",
            Self::OrderEmpty => "Order has no items",
            Self::InvalidTransition => "Invalid order status transition",
            Self::OrderNotCancellable => "Order can no longer be cancelled",
            Self::OrderAlreadyTerminal => "Order is already delivered or cancelled",
            Self::MenuItemUnavailable => "Menu item is not available",
            Self::TableRequiredForDineIn => "Dine-in orders require a table",

            // Payment
            Self::PaymentNotFound => "Payment not found",
            Self::PaymentAlreadyCompleted => "Payment already completed",

            // Menu
            Self::MenuItemNotFound => "Menu item not found",
            Self::InvalidPrice => "Price must be zero or greater",
            Self::CategoryNotFound => "Category not found",
            Self::CategoryHasItems => "Category still has menu items",

            // Table & Booking
            Self::TableNotFound => "Table not found",
            Self::TableNumberExists => "Table number already exists in this cafe",
            Self::BookingNotFound => "Booking not found",
            Self::BookingOverlap => "Table is already booked for that time",
            Self::GuestsExceedCapacity => "Number of guests exceeds table capacity",
            Self::BookingOutsideHours => "Requested time is outside opening hours",
            Self::BookingInPast => "Booking date is in the past",
            Self::BookingNotCancellable => "Booking can no longer be cancelled",

            // Staff
            Self::StaffNotFound => "Staff member not found",
            Self::StaffAlreadyAssigned => "Staff member already works at a cafe",
            Self::StaffRoleMismatch => "Staff member does not hold the required role",
            Self::NoActiveAssignment => "No active cafe assignment",

            // System
            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::SessionExpired),
            1007 => Ok(ErrorCode::AccountDisabled),
            1008 => Ok(ErrorCode::AccountPendingApproval),
            1010 => Ok(ErrorCode::VerificationCodeExpired),
            1011 => Ok(ErrorCode::VerificationCodeInvalid),
            1012 => Ok(ErrorCode::TooManyAttempts),
            1013 => Ok(ErrorCode::PasswordTooShort),
            1014 => Ok(ErrorCode::EmailAlreadyVerified),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2004 => Ok(ErrorCode::CannotModifyAdmin),
            2005 => Ok(ErrorCode::CannotModifySelf),
            2006 => Ok(ErrorCode::CafeAccessDenied),
            2007 => Ok(ErrorCode::OrderAccessDenied),

            // Account & Café
            3001 => Ok(ErrorCode::UserNotFound),
            3002 => Ok(ErrorCode::EmailAlreadyRegistered),
            3003 => Ok(ErrorCode::UserAlreadyActive),
            3004 => Ok(ErrorCode::UserNotPending),
            3101 => Ok(ErrorCode::CafeNotFound),
            3102 => Ok(ErrorCode::CafeNotPublic),
            3103 => Ok(ErrorCode::CafeAlreadyVerified),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4007 => Ok(ErrorCode::OrderEmpty),
            4010 => Ok(ErrorCode::InvalidTransition),
            4011 => Ok(ErrorCode::OrderNotCancellable),
            4012 => Ok(ErrorCode::OrderAlreadyTerminal),
            4013 => Ok(ErrorCode::MenuItemUnavailable),
            4014 => Ok(ErrorCode::TableRequiredForDineIn),

            // Payment
            5001 => Ok(ErrorCode::PaymentNotFound),
            5002 => Ok(ErrorCode::PaymentAlreadyCompleted),

            // Menu
            6001 => Ok(ErrorCode::MenuItemNotFound),
            6002 => Ok(ErrorCode::InvalidPrice),
            6101 => Ok(ErrorCode::CategoryNotFound),
            6102 => Ok(ErrorCode::CategoryHasItems),

            // Table & Booking
            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::TableNumberExists),
            7101 => Ok(ErrorCode::BookingNotFound),
            7102 => Ok(ErrorCode::BookingOverlap),
            7103 => Ok(ErrorCode::GuestsExceedCapacity),
            7104 => Ok(ErrorCode::BookingOutsideHours),
            7105 => Ok(ErrorCode::BookingInPast),
            7106 => Ok(ErrorCode::BookingNotCancellable),

            // Staff
            8001 => Ok(ErrorCode::StaffNotFound),
            8002 => Ok(ErrorCode::StaffAlreadyAssigned),
            8003 => Ok(ErrorCode::StaffRoleMismatch),
            8004 => Ok(ErrorCode::NoActiveAssignment),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::AccountPendingApproval.code(), 1008);
        assert_eq!(ErrorCode::CafeAccessDenied.code(), 2006);
        assert_eq!(ErrorCode::CafeNotFound.code(), 3101);
        assert_eq!(ErrorCode::InvalidTransition.code(), 4010);
        assert_eq!(ErrorCode::PaymentAlreadyCompleted.code(), 5002);
        assert_eq!(ErrorCode::CategoryHasItems.code(), 6102);
        assert_eq!(ErrorCode::BookingOverlap.code(), 7102);
        assert_eq!(ErrorCode::NoActiveAssignment.code(), 8004);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::NotFound.is_success());
        assert!(!ErrorCode::InvalidTransition.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(1001), Ok(ErrorCode::NotAuthenticated));
        assert_eq!(ErrorCode::try_from(4010), Ok(ErrorCode::InvalidTransition));
        assert_eq!(ErrorCode::try_from(7103), Ok(ErrorCode::GuestsExceedCapacity));
        assert_eq!(ErrorCode::try_from(9001), Ok(ErrorCode::InternalError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::OrderNotFound).expect("serialize");
        assert_eq!(json, "4001");
        let code: ErrorCode = serde_json::from_str("7102").expect("deserialize");
        assert_eq!(code, ErrorCode::BookingOverlap);
        assert!(serde_json::from_str::<ErrorCode>("1234").is_err());
    }

    #[test]
    fn test_display_and_message() {
        assert_eq!(format!("{}", ErrorCode::InvalidTransition), "4010");
        assert_eq!(ErrorCode::CafeNotFound.message(), "Cafe not found");
        assert_eq!(
            InvalidErrorCode(42).to_string(),
            "invalid error code: 42"
        );
    }
}

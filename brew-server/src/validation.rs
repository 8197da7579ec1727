//! Input validation helpers
//!
//! Text length limits and checks shared by the CRUD handlers.

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};

/// Entity names: café, category, menu item, person names
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, special requests
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, postal code, licence numbers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

pub const MIN_PASSWORD_LEN: usize = 8;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::required(field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Minimal shape check: one `@`, non-empty local part, dotted domain.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    validate_required_text(email, "email", MAX_EMAIL_LEN)?;
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AppError::with_message(
            ErrorCode::InvalidFormat,
            "email is not a valid address",
        )
        .with_detail("field", "email"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password is too long (max {MAX_PASSWORD_LEN})"
        )));
    }
    Ok(())
}

/// Prices must be present and not negative
pub fn validate_price(price: Option<Decimal>) -> Result<Decimal, AppError> {
    let price = price.ok_or_else(|| AppError::required("price"))?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(AppError::with_message(
            ErrorCode::InvalidPrice,
            "price must not be negative",
        ));
    }
    Ok(price)
}

/// Integer field that must be at least `min`
pub fn validate_min(value: i32, field: &str, min: i32) -> Result<(), AppError> {
    if value < min {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must be at least {min}"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Latte", "name", MAX_NAME_LEN).is_ok());
        assert_eq!(
            validate_required_text("   ", "name", MAX_NAME_LEN).unwrap_err().code,
            ErrorCode::RequiredField
        );
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert_eq!(
            validate_required_text(&long, "name", MAX_NAME_LEN).unwrap_err().code,
            ErrorCode::ValidationFailed
        );
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "notes", 3).is_ok());
        assert!(validate_optional_text(&Some("abc".into()), "notes", 3).is_ok());
        assert!(validate_optional_text(&Some("abcd".into()), "notes", 3).is_err());
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("ana@brew.test").is_ok());
        for bad in ["", "ana", "@brew.test", "ana@brew", "ana@.test", "a b@brew.test", "a@b@c.d"] {
            assert!(validate_email(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_password_length() {
        assert_eq!(
            validate_password("short").unwrap_err().code,
            ErrorCode::PasswordTooShort
        );
        assert!(validate_password("long enough").is_ok());
    }

    #[test]
    fn test_price() {
        assert_eq!(
            validate_price(None).unwrap_err().code,
            ErrorCode::RequiredField
        );
        assert_eq!(
            validate_price(Some(Decimal::from_str("-0.50").unwrap()))
                .unwrap_err()
                .code,
            ErrorCode::InvalidPrice
        );
        assert_eq!(validate_price(Some(Decimal::ZERO)).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_min() {
        assert!(validate_min(1, "capacity", 1).is_ok());
        assert_eq!(
            validate_min(0, "capacity", 1).unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
    }
}

//! Plain-text email bodies

use rust_decimal::Decimal;

/// Rendered subject and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub subject: String,
    pub body: String,
}

pub fn verification_code(code: &str, valid_minutes: i64) -> EmailMessage {
    EmailMessage {
        subject: "Brew & Co - Your verification code".into(),
        body: format!(
            "Your verification code is: {code}\n\
             This code expires in {valid_minutes} minutes."
        ),
    }
}

pub fn password_reset_code(code: &str, valid_minutes: i64) -> EmailMessage {
    EmailMessage {
        subject: "Brew & Co - Reset your password".into(),
        body: format!(
            "Your password reset code is: {code}\n\
             This code expires in {valid_minutes} minutes.\n\n\
             If you did not request a reset, you can ignore this email."
        ),
    }
}

pub fn account_approved(first_name: &str, email: &str, password: &str, login_url: &str) -> EmailMessage {
    EmailMessage {
        subject: "Brew & Co - Your account has been approved".into(),
        body: format!(
            "Hello {first_name},\n\n\
             Your Brew & Co account has been approved.\n\n\
             Email:    {email}\n\
             Password: {password}\n\n\
             Please change your password after your first login.\n\
             Login at: {login_url}/login\n\n\
             Brew & Co Admin Team"
        ),
    }
}

pub fn account_rejected(first_name: &str) -> EmailMessage {
    EmailMessage {
        subject: "Brew & Co - Registration update".into(),
        body: format!(
            "Hello {first_name},\n\n\
             Your Brew & Co registration has not been approved at this time.\n\
             If you believe this is a mistake, please contact support.\n\n\
             Brew & Co Admin Team"
        ),
    }
}

pub fn staff_welcome(first_name: &str, email: &str, password: &str, cafe_name: &str) -> EmailMessage {
    EmailMessage {
        subject: "Welcome to Brew & Co - Your login credentials".into(),
        body: format!(
            "Hi {first_name},\n\n\
             You have been added to the staff of {cafe_name}.\n\n\
             Email:    {email}\n\
             Password: {password}\n\n\
             We recommend changing your password after your first login.\n\n\
             The Brew & Co Team"
        ),
    }
}

pub fn order_placed(first_name: &str, order_ref: &str, grand_total: Decimal) -> EmailMessage {
    EmailMessage {
        subject: format!("Order received - #{order_ref}"),
        body: format!(
            "Hello {first_name},\n\n\
             Your order #{order_ref} has been received and is being processed.\n\
             Total amount: INR {grand_total:.2}\n\n\
             The Brew & Co Team"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_approval_contains_credentials() {
        let m = account_approved("Ana", "ana@brew.test", "Ab1@xyzQWE", "http://localhost:5173");
        assert!(m.body.contains("ana@brew.test"));
        assert!(m.body.contains("Ab1@xyzQWE"));
        assert!(m.body.contains("http://localhost:5173/login"));
    }

    #[test]
    fn test_order_placed_formats_total() {
        let m = order_placed("Ana", "ORD-20260101120000-123", Decimal::from_str("11.5").unwrap());
        assert_eq!(m.subject, "Order received - #ORD-20260101120000-123");
        assert!(m.body.contains("INR 11.50"));
    }

    #[test]
    fn test_codes_mention_expiry() {
        assert!(verification_code("123456", 10).body.contains("10 minutes"));
        assert!(password_reset_code("654321", 10).body.contains("654321"));
    }
}

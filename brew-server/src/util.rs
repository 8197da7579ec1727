//! Shared utility functions for brew-server

use rand::Rng;
use rand::seq::SliceRandom;

const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SPECIAL: &[u8] = b"@#$!&";

/// Length of generated account passwords
pub const GENERATED_PASSWORD_LEN: usize = 10;

/// Six-digit one-time code
pub fn generate_code() -> String {
    let code: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
    code.to_string()
}

/// Random password with at least one uppercase, lowercase, digit, and special
/// character, shuffled.
pub fn generate_password<R: Rng + ?Sized>(rng: &mut R) -> String {
    let all: Vec<u8> = [UPPER, LOWER, DIGITS, SPECIAL].concat();
    let mut chars: Vec<u8> = [UPPER, LOWER, DIGITS, SPECIAL]
        .iter()
        .filter_map(|set| set.choose(rng).copied())
        .collect();
    while chars.len() < GENERATED_PASSWORD_LEN {
        if let Some(&c) = all.choose(rng) {
            chars.push(c);
        }
    }
    chars.shuffle(rng);
    chars.into_iter().map(char::from).collect()
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Normalize an email for lookup and storage
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// First hop of `X-Forwarded-For`, if any
pub fn client_ip(headers: &http::HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_generate_code_is_six_digits() {
        for _ in 0..50 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_generated_password_classes() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let pw = generate_password(&mut rng);
            assert_eq!(pw.len(), GENERATED_PASSWORD_LEN);
            assert!(pw.chars().any(|c| c.is_ascii_uppercase()), "{pw}");
            assert!(pw.chars().any(|c| c.is_ascii_lowercase()), "{pw}");
            assert!(pw.chars().any(|c| c.is_ascii_digit()), "{pw}");
            assert!(pw.chars().any(|c| "@#$!&".contains(c)), "{pw}");
            assert!(pw.bytes().all(|b| b.is_ascii_alphanumeric() || SPECIAL.contains(&b)));
        }
    }

    #[test]
    fn test_generated_passwords_differ() {
        let mut rng = StdRng::seed_from_u64(42);
        let a = generate_password(&mut rng);
        let b = generate_password(&mut rng);
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Coffee@123").unwrap();
        assert_ne!(hash, "Coffee@123");
        assert!(verify_password("Coffee@123", &hash));
        assert!(!verify_password("coffee@123", &hash));
        assert!(!verify_password("Coffee@123", "not-a-hash"));
    }

    #[test]
    fn test_client_ip_first_hop() {
        let mut headers = http::HeaderMap::new();
        assert_eq!(client_ip(&headers), None);
        headers.insert("x-forwarded-for", "203.0.113.9, 10.0.0.1".parse().unwrap());
        assert_eq!(client_ip(&headers).as_deref(), Some("203.0.113.9"));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ana@Brew.Test "), "ana@brew.test");
    }
}

use chrono::{DateTime, Utc};

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Human-readable reference prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Order,
    Booking,
    Payment,
}

impl RefKind {
    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::Order => "ORD",
            Self::Booking => "BKG",
            Self::Payment => "PAY",
        }
    }
}

/// Build a reference `PREFIX-yyyyMMddHHmmss-NNN` from explicit parts.
///
/// `suffix` is clamped into the three-digit range 100..=999.
pub fn reference_at(kind: RefKind, at: DateTime<Utc>, suffix: u16) -> String {
    let suffix = suffix.clamp(100, 999);
    format!("{}-{}-{suffix}", kind.prefix(), at.format("%Y%m%d%H%M%S"))
}

/// Generate a fresh reference for `kind`.
///
/// Timestamp plus random suffix: not guaranteed unique, the storage layer
/// holds a UNIQUE constraint on every reference column.
pub fn generate_reference(kind: RefKind) -> String {
    use rand::Rng;
    let suffix: u16 = rand::thread_rng().gen_range(100..1000);
    reference_at(kind, Utc::now(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_reference_format() {
        let at = Utc.with_ymd_and_hms(2026, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            reference_at(RefKind::Order, at, 482),
            "ORD-20260309140507-482"
        );
        assert_eq!(
            reference_at(RefKind::Booking, at, 100),
            "BKG-20260309140507-100"
        );
        assert_eq!(
            reference_at(RefKind::Payment, at, 999),
            "PAY-20260309140507-999"
        );
    }

    #[test]
    fn test_reference_suffix_clamped() {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert!(reference_at(RefKind::Order, at, 7).ends_with("-100"));
        assert!(reference_at(RefKind::Order, at, 4000).ends_with("-999"));
    }

    #[test]
    fn test_generate_reference_shape() {
        for kind in [RefKind::Order, RefKind::Booking, RefKind::Payment] {
            let r = generate_reference(kind);
            let parts: Vec<&str> = r.split('-').collect();
            assert_eq!(parts.len(), 3);
            assert_eq!(parts[0], kind.prefix());
            assert_eq!(parts[1].len(), 14);
            assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
            let suffix: u16 = parts[2].parse().unwrap();
            assert!((100..=999).contains(&suffix));
        }
    }

    #[test]
    fn test_snowflake_id_positive_and_distinct_bits() {
        let a = snowflake_id();
        assert!(a > 0);
        assert!(a < (1_i64 << 53));
    }
}

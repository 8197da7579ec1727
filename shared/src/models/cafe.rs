//! Cafe Model

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CAFE_NAME: &str = "New Cafe";
pub const DEFAULT_ADDRESS: &str = "Unknown Street";
pub const DEFAULT_CITY: &str = "Unknown City";

pub fn default_opening_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}

pub fn default_closing_time() -> NaiveTime {
    NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Cafe entity (one tenant business)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Cafe {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub gst_number: Option<String>,
    pub fssai_license: Option<String>,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    pub is_verified: bool,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Cafe {
    /// Listed to customers only when verified and active
    pub fn is_public(&self) -> bool {
        self.is_verified && self.is_active
    }

    /// Whether `t` falls inside opening hours. Handles hours that wrap past
    /// midnight; equal opening and closing times mean open all day.
    pub fn is_open_at(&self, t: NaiveTime) -> bool {
        if self.opening_time == self.closing_time {
            return true;
        }
        if self.opening_time < self.closing_time {
            self.opening_time <= t && t < self.closing_time
        } else {
            t >= self.opening_time || t < self.closing_time
        }
    }
}

/// Create cafe payload (every field optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CafeCreate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub gst_number: Option<String>,
    pub fssai_license: Option<String>,
    pub opening_time: Option<NaiveTime>,
    pub closing_time: Option<NaiveTime>,
}

/// Create payload with defaults filled in, ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewCafe {
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub gst_number: Option<String>,
    pub fssai_license: Option<String>,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl CafeCreate {
    pub fn with_defaults(self) -> NewCafe {
        NewCafe {
            name: non_blank(self.name).unwrap_or_else(|| DEFAULT_CAFE_NAME.to_string()),
            description: self.description,
            address: non_blank(self.address).unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
            city: non_blank(self.city).unwrap_or_else(|| DEFAULT_CITY.to_string()),
            state: self.state,
            zip_code: self.zip_code,
            contact_number: self.contact_number,
            email: self.email,
            gst_number: self.gst_number,
            fssai_license: self.fssai_license,
            opening_time: self.opening_time.unwrap_or_else(default_opening_time),
            closing_time: self.closing_time.unwrap_or_else(default_closing_time),
        }
    }
}

/// Partial cafe update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CafeUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub gst_number: Option<String>,
    pub fssai_license: Option<String>,
    pub opening_time: Option<NaiveTime>,
    pub closing_time: Option<NaiveTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn cafe(open: NaiveTime, close: NaiveTime) -> Cafe {
        Cafe {
            id: 1,
            owner_id: 2,
            name: "Brew".into(),
            description: None,
            address: "1 Main".into(),
            city: "Pune".into(),
            state: None,
            zip_code: None,
            contact_number: None,
            email: None,
            gst_number: None,
            fssai_license: None,
            opening_time: open,
            closing_time: close,
            is_verified: false,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_create_without_hours_defaults_to_nine_to_ten() {
        let new = CafeCreate::default().with_defaults();
        assert_eq!(new.opening_time, hm(9, 0));
        assert_eq!(new.closing_time, hm(22, 0));
        assert_eq!(new.name, "New Cafe");
        assert_eq!(new.address, "Unknown Street");
        assert_eq!(new.city, "Unknown City");
    }

    #[test]
    fn test_create_keeps_supplied_values() {
        let new = CafeCreate {
            name: Some("  Bean There ".into()),
            city: Some("".into()),
            opening_time: Some(hm(7, 30)),
            ..Default::default()
        }
        .with_defaults();
        assert_eq!(new.name, "Bean There");
        assert_eq!(new.city, "Unknown City");
        assert_eq!(new.opening_time, hm(7, 30));
        assert_eq!(new.closing_time, hm(22, 0));
    }

    #[test]
    fn test_is_public_requires_both_flags() {
        let mut c = cafe(hm(9, 0), hm(22, 0));
        assert!(!c.is_public());
        c.is_verified = true;
        assert!(c.is_public());
        c.is_active = false;
        assert!(!c.is_public());
    }

    #[test]
    fn test_is_open_at() {
        let day = cafe(hm(9, 0), hm(22, 0));
        assert!(day.is_open_at(hm(9, 0)));
        assert!(day.is_open_at(hm(21, 59)));
        assert!(!day.is_open_at(hm(22, 0)));
        assert!(!day.is_open_at(hm(8, 0)));

        let night = cafe(hm(18, 0), hm(2, 0));
        assert!(night.is_open_at(hm(23, 0)));
        assert!(night.is_open_at(hm(1, 0)));
        assert!(!night.is_open_at(hm(12, 0)));

        let all_day = cafe(hm(0, 0), hm(0, 0));
        assert!(all_day.is_open_at(hm(3, 0)));
    }
}

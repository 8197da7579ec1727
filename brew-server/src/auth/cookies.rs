//! Auth cookie builders

use tower_cookies::Cookie;
use tower_cookies::cookie::SameSite;
use tower_cookies::cookie::time::Duration;

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";

fn build(name: &'static str, value: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(max_age_secs))
        .build()
}

pub fn access_cookie(token: String, ttl_secs: i64, secure: bool) -> Cookie<'static> {
    build(ACCESS_COOKIE, token, ttl_secs, secure)
}

pub fn refresh_cookie(token: String, ttl_secs: i64, secure: bool) -> Cookie<'static> {
    build(REFRESH_COOKIE, token, ttl_secs, secure)
}

/// Expired blank cookie that overwrites `name` in the browser
pub fn clearing_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    build(name, String::new(), 0, secure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_cookie_attributes() {
        let c = access_cookie("abc".into(), 3600, true);
        assert_eq!(c.name(), "access_token");
        assert_eq!(c.value(), "abc");
        assert_eq!(c.http_only(), Some(true));
        assert_eq!(c.secure(), Some(true));
        assert_eq!(c.same_site(), Some(SameSite::Lax));
        assert_eq!(c.path(), Some("/"));
        assert_eq!(c.max_age(), Some(Duration::seconds(3600)));
    }

    #[test]
    fn test_clearing_cookie_expires_now() {
        let c = clearing_cookie(REFRESH_COOKIE, false);
        assert_eq!(c.name(), "refresh_token");
        assert_eq!(c.value(), "");
        assert_eq!(c.max_age(), Some(Duration::ZERO));
        assert_eq!(c.secure(), Some(false));
    }
}

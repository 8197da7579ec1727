//! Authentication and role-based authorization
//!
//! `auth_middleware` resolves the caller from a Bearer header or the
//! `access_token` cookie and inserts a [`CurrentUser`] into request
//! extensions. `require_roles` is layered per router to restrict a group of
//! routes to a fixed set of roles.

pub mod cookies;
pub mod jwt;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::{AppError, ErrorCode};
use shared::models::Role;
use tower_cookies::Cookies;

use crate::state::AppState;

pub use jwt::{Claims, issue_access_token, verify_access_token};

/// Authenticated caller extracted from the access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = AppError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: claims.user_id()?,
            email: claims.email,
            role: claims.role,
        })
    }
}

fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn cookie_token(request: &Request) -> Option<String> {
    request
        .extensions()
        .get::<Cookies>()
        .and_then(|c| c.get(cookies::ACCESS_COOKIE))
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
}

/// Verify the access token and attach the caller to the request
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request)
        .or_else(|| cookie_token(&request))
        .ok_or_else(AppError::not_authenticated)?;

    let claims = verify_access_token(&token, &state.jwt_secret)?;
    let user = CurrentUser::try_from(claims)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Check the caller's role against an allowed set
pub fn ensure_role(user: &CurrentUser, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        return Ok(());
    }
    let required: Vec<&str> = allowed.iter().map(Role::as_str).collect();
    Err(
        AppError::with_message(ErrorCode::RoleRequired, "Insufficient role for this endpoint")
            .with_detail("role", user.role.as_str())
            .with_detail("required", required.join(",")),
    )
}

/// Route-group guard, layered with `from_fn_with_state(ROLES, require_roles)`
pub async fn require_roles(
    State(allowed): State<&'static [Role]>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::not_authenticated)?;
    ensure_role(user, allowed)?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            user_id: 1,
            email: "u@brew.test".into(),
            role,
        }
    }

    #[test]
    fn test_ensure_role() {
        assert!(ensure_role(&user(Role::Chef), &[Role::Chef, Role::Waiter]).is_ok());
        let err = ensure_role(&user(Role::Customer), &[Role::Admin]).unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleRequired);
        assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_bearer_token_parsing() {
        let req = Request::builder()
            .header("Authorization", "Bearer abc.def")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&req).as_deref(), Some("abc.def"));

        let req = Request::builder()
            .header("Authorization", "Basic xyz")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&req), None);
    }

    #[test]
    fn test_claims_to_current_user() {
        let claims = Claims {
            sub: "77".into(),
            email: "w@brew.test".into(),
            role: Role::Waiter,
            exp: 0,
            iat: 0,
        };
        let u = CurrentUser::try_from(claims).unwrap();
        assert_eq!(u.user_id, 77);
        assert_eq!(u.role, Role::Waiter);
    }
}

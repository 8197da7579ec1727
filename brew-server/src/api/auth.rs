//! Authentication endpoints
//!
//! Registration creates an inactive account with no password; an admin
//! approval issues the first password. Login sets the `access_token` and
//! `refresh_token` cookies and also returns the access token for Bearer use.

use axum::routing::{get, post};
use axum::{Extension, Json, Router, extract::State};
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    AddressInput, GovernmentProofInput, Role, User, UserProfileUpdate, WorkExperienceInput,
};
use shared::util::now_millis;
use tower_cookies::Cookies;

use crate::auth::{CurrentUser, cookies, issue_access_token};
use crate::db;
use crate::db::email_verifications::{
    EmailVerification, PURPOSE_PASSWORD_RESET, PURPOSE_VERIFY_EMAIL,
};
use crate::db::users::NewUser;
use crate::email::{self, templates};
use crate::error::{ServiceError, internal};
use crate::state::AppState;
use crate::util::{client_ip, generate_code, hash_password, normalize_email, verify_password};
use crate::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_min,
    validate_optional_text, validate_password, validate_required_text,
};

use super::{ApiResult, message};

/// One-time codes expire after this many minutes
const CODE_TTL_MINUTES: i64 = 10;
const VERIFY_MAX_ATTEMPTS: i32 = 5;
const RESET_MAX_ATTEMPTS: i32 = 3;

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/verify-email", post(verify_email))
        .route("/api/auth/resend-otp", post(resend_otp))
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/forgot-password", post(forgot_password))
        .route("/api/auth/reset-password", post(reset_password))
}

pub fn protected_router() -> Router<AppState> {
    Router::new().route("/api/auth/me", get(get_profile).put(update_profile))
}

/// Check a stored code record. Attempts are counted before the code is
/// compared, so the limit also caps guesses.
pub fn check_code_record(
    record: &EmailVerification,
    code: &str,
    now: i64,
    max_attempts: i32,
) -> Result<(), ErrorCode> {
    if now > record.expires_at {
        return Err(ErrorCode::VerificationCodeExpired);
    }
    if record.attempts >= max_attempts {
        return Err(ErrorCode::TooManyAttempts);
    }
    if !verify_password(code.trim(), &record.code) {
        return Err(ErrorCode::VerificationCodeInvalid);
    }
    Ok(())
}

async fn consume_code(
    state: &AppState,
    email_addr: &str,
    purpose: &str,
    code: &str,
    max_attempts: i32,
) -> Result<(), AppError> {
    let record = db::email_verifications::find(&state.pool, email_addr, purpose)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::VerificationCodeInvalid))?;

    if let Err(rejection) = check_code_record(&record, code, now_millis(), max_attempts) {
        if rejection == ErrorCode::VerificationCodeInvalid {
            let _ = db::email_verifications::increment_attempts(&state.pool, email_addr, purpose)
                .await;
        }
        return Err(AppError::new(rejection));
    }

    db::email_verifications::delete(&state.pool, email_addr, purpose)
        .await
        .map_err(internal)?;
    Ok(())
}

async fn send_code(state: &AppState, email_addr: &str, purpose: &str) -> Result<(), AppError> {
    let code = generate_code();
    let code_hash = hash_password(&code).map_err(internal)?;
    let now = now_millis();
    db::email_verifications::upsert(
        &state.pool,
        email_addr,
        purpose,
        &code_hash,
        now + CODE_TTL_MINUTES * 60 * 1000,
        now,
    )
    .await
    .map_err(internal)?;

    let msg = if purpose == PURPOSE_PASSWORD_RESET {
        templates::password_reset_code(&code, CODE_TTL_MINUTES)
    } else {
        templates::verification_code(&code, CODE_TTL_MINUTES)
    };
    tracing::debug!(email = email_addr, purpose, "One-time code issued");
    email::notify(state.email.clone(), email_addr.to_string(), msg);
    Ok(())
}

// ── Registration ──

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    /// CUSTOMER (default) or CAFE_OWNER
    pub role: Option<Role>,
    #[serde(default)]
    pub addresses: Vec<AddressInput>,
    #[serde(default)]
    pub work_experiences: Vec<WorkExperienceInput>,
    #[serde(default)]
    pub government_proofs: Vec<GovernmentProofInput>,
}

impl RegisterRequest {
    fn validate(&self) -> Result<Role, AppError> {
        validate_required_text(&self.first_name, "first_name", MAX_NAME_LEN)?;
        validate_required_text(&self.last_name, "last_name", MAX_NAME_LEN)?;
        validate_optional_text(&self.phone, "phone", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.gender, "gender", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.street_address, "street_address", MAX_ADDRESS_LEN)?;
        validate_optional_text(&self.city, "city", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.postal_code, "postal_code", MAX_SHORT_TEXT_LEN)?;

        for a in &self.addresses {
            validate_required_text(&a.street, "addresses.street", MAX_ADDRESS_LEN)?;
            validate_required_text(&a.city, "addresses.city", MAX_SHORT_TEXT_LEN)?;
            validate_optional_text(&a.postal_code, "addresses.postal_code", MAX_SHORT_TEXT_LEN)?;
        }
        for w in &self.work_experiences {
            validate_required_text(&w.company_name, "work_experiences.company_name", MAX_NAME_LEN)?;
            validate_required_text(&w.position, "work_experiences.position", MAX_NAME_LEN)?;
            validate_min(w.years.unwrap_or(0), "work_experiences.years", 0)?;
        }
        for g in &self.government_proofs {
            validate_required_text(&g.proof_type, "government_proofs.proof_type", MAX_SHORT_TEXT_LEN)?;
            validate_required_text(
                &g.proof_number,
                "government_proofs.proof_number",
                MAX_SHORT_TEXT_LEN,
            )?;
        }

        let role = self.role.unwrap_or(Role::Customer);
        if !role.is_self_registrable() {
            return Err(AppError::with_message(
                ErrorCode::RoleRequired,
                format!("Cannot self-register as {role}"),
            ));
        }
        Ok(role)
    }
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<User> {
    let role = req.validate()?;
    let email_addr = normalize_email(&req.email);
    validate_email(&email_addr)?;

    if db::users::email_exists(&state.pool, &email_addr)
        .await
        .map_err(internal)?
    {
        return Err(AppError::new(ErrorCode::EmailAlreadyRegistered));
    }

    let user = async {
        let mut tx = state.pool.begin().await?;
        let user = db::users::insert(
            &mut *tx,
            &NewUser {
                first_name: req.first_name.trim(),
                last_name: req.last_name.trim(),
                email: &email_addr,
                password_hash: None,
                phone: req.phone.as_deref(),
                gender: req.gender.as_deref(),
                street_address: req.street_address.as_deref(),
                city: req.city.as_deref(),
                postal_code: req.postal_code.as_deref(),
                role,
                is_active: false,
                is_email_verified: false,
            },
        )
        .await?;
        for a in &req.addresses {
            db::users::insert_address(&mut *tx, user.id, a).await?;
        }
        for w in &req.work_experiences {
            db::users::insert_work_experience(&mut *tx, user.id, w).await?;
        }
        for g in &req.government_proofs {
            db::users::insert_government_proof(&mut *tx, user.id, g).await?;
        }
        tx.commit().await?;
        Ok::<_, ServiceError>(user)
    }
    .await?;

    tracing::info!(user_id = user.id, role = %role, "User registered, awaiting approval");
    send_code(&state, &user.email, PURPOSE_VERIFY_EMAIL).await?;
    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub email: String,
    pub code: String,
}

/// POST /api/auth/verify-email
pub async fn verify_email(
    State(state): State<AppState>,
    Json(req): Json<VerifyEmailRequest>,
) -> ApiResult<serde_json::Value> {
    let email_addr = normalize_email(&req.email);
    let user = db::users::find_by_email(&state.pool, &email_addr)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::VerificationCodeInvalid))?;
    if user.is_email_verified {
        return Err(AppError::new(ErrorCode::EmailAlreadyVerified));
    }

    consume_code(&state, &email_addr, PURPOSE_VERIFY_EMAIL, &req.code, VERIFY_MAX_ATTEMPTS)
        .await?;
    db::users::mark_email_verified(&state.pool, user.id)
        .await
        .map_err(internal)?;

    tracing::info!(user_id = user.id, "Email verified");
    Ok(message("Email verified"))
}

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

/// POST /api/auth/resend-otp
pub async fn resend_otp(
    State(state): State<AppState>,
    Json(req): Json<EmailRequest>,
) -> ApiResult<serde_json::Value> {
    let email_addr = normalize_email(&req.email);
    let Some(user) = db::users::find_by_email(&state.pool, &email_addr)
        .await
        .map_err(internal)?
    else {
        return Ok(message("If the email is registered, a new code has been sent"));
    };
    if user.is_email_verified {
        return Err(AppError::new(ErrorCode::EmailAlreadyVerified));
    }
    send_code(&state, &email_addr, PURPOSE_VERIFY_EMAIL).await?;
    Ok(message("If the email is registered, a new code has been sent"))
}

// ── Session ──

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Seconds until the access token expires
    pub expires_in: i64,
    pub user: User,
}

/// Why a user may not sign in, if anything
pub fn login_block(user: &User) -> Option<ErrorCode> {
    if user.is_pending() {
        Some(ErrorCode::AccountPendingApproval)
    } else if !user.is_active {
        Some(ErrorCode::AccountDisabled)
    } else {
        None
    }
}

async fn start_session(
    state: &AppState,
    cookie_jar: &Cookies,
    user: User,
    refresh_token: String,
) -> ApiResult<TokenResponse> {
    let access_token = issue_access_token(
        user.id,
        &user.email,
        user.role,
        state.access_token_ttl,
        &state.jwt_secret,
    )
    .map_err(internal)?;

    let access_secs = state.access_token_ttl.num_seconds();
    cookie_jar.add(cookies::access_cookie(
        access_token.clone(),
        access_secs,
        state.cookie_secure,
    ));
    cookie_jar.add(cookies::refresh_cookie(
        refresh_token,
        state.refresh_token_ttl.num_seconds(),
        state.cookie_secure,
    ));

    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer",
        expires_in: access_secs,
        user,
    }))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    cookie_jar: Cookies,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> ApiResult<TokenResponse> {
    let email_addr = normalize_email(&req.email);
    let user = db::users::find_by_email(&state.pool, &email_addr)
        .await
        .map_err(internal)?
        .ok_or_else(AppError::invalid_credentials)?;

    let password_ok = user
        .password_hash
        .as_deref()
        .is_some_and(|hash| verify_password(&req.password, hash));
    if let Some(code) = login_block(&user) {
        // Pending accounts have no password; report the state, not a bad password
        if code == ErrorCode::AccountPendingApproval || password_ok {
            return Err(AppError::new(code));
        }
    }
    if !password_ok {
        tracing::info!(email = %email_addr, "Failed login attempt");
        return Err(AppError::invalid_credentials());
    }

    let ip = client_ip(&headers);
    db::users::record_login(&state.pool, user.id, ip.as_deref())
        .await
        .map_err(internal)?;
    let refresh_token =
        db::refresh_tokens::create(&state.pool, user.id, state.refresh_token_ttl.num_milliseconds())
            .await
            .map_err(internal)?;

    tracing::info!(user_id = user.id, role = %user.role, ip = ?ip, "User logged in");
    start_session(&state, &cookie_jar, user, refresh_token).await
}

#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// POST /api/auth/refresh
///
/// Reads the refresh token from the cookie, or from the body for clients
/// that do not keep cookies.
pub async fn refresh(
    State(state): State<AppState>,
    cookie_jar: Cookies,
    body: Option<Json<RefreshRequest>>,
) -> ApiResult<TokenResponse> {
    let presented = cookie_jar
        .get(cookies::REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| body.and_then(|Json(b)| b.refresh_token))
        .ok_or_else(|| AppError::new(ErrorCode::SessionExpired))?;

    let (user_id, new_token) = db::refresh_tokens::rotate(
        &state.pool,
        &presented,
        state.refresh_token_ttl.num_milliseconds(),
    )
    .await
    .map_err(internal)?
    .ok_or_else(|| AppError::new(ErrorCode::SessionExpired))?;

    let user = db::users::find_by_id(&state.pool, user_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::SessionExpired))?;
    if let Some(code) = login_block(&user) {
        if let Err(e) = db::refresh_tokens::revoke(&state.pool, &new_token).await {
            tracing::warn!(user_id, error = %e, "Failed to revoke refresh token of blocked user");
        }
        return Err(AppError::new(code));
    }

    start_session(&state, &cookie_jar, user, new_token).await
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    cookie_jar: Cookies,
) -> ApiResult<serde_json::Value> {
    if let Some(token) = cookie_jar.get(cookies::REFRESH_COOKIE) {
        db::refresh_tokens::revoke(&state.pool, token.value())
            .await
            .map_err(internal)?;
    }
    cookie_jar.add(cookies::clearing_cookie(cookies::ACCESS_COOKIE, state.cookie_secure));
    cookie_jar.add(cookies::clearing_cookie(cookies::REFRESH_COOKIE, state.cookie_secure));
    Ok(message("Logged out"))
}

// ── Password reset ──

/// POST /api/auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<EmailRequest>,
) -> ApiResult<serde_json::Value> {
    let email_addr = normalize_email(&req.email);

    // Same answer whether or not the account exists
    if let Ok(Some(user)) = db::users::find_by_email(&state.pool, &email_addr).await
        && user.is_active
    {
        send_code(&state, &email_addr, PURPOSE_PASSWORD_RESET).await?;
    }
    Ok(message("If the email exists, a reset code has been sent"))
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<serde_json::Value> {
    let email_addr = normalize_email(&req.email);
    validate_password(&req.new_password)?;

    consume_code(&state, &email_addr, PURPOSE_PASSWORD_RESET, &req.code, RESET_MAX_ATTEMPTS)
        .await?;
    let user = db::users::find_by_email(&state.pool, &email_addr)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    let hash = hash_password(&req.new_password).map_err(internal)?;
    db::users::update_password(&state.pool, user.id, &hash)
        .await
        .map_err(internal)?;
    db::refresh_tokens::revoke_all(&state.pool, user.id)
        .await
        .map_err(internal)?;

    tracing::info!(user_id = user.id, "Password reset");
    Ok(message("Password has been reset"))
}

// ── Profile ──

/// GET /api/auth/me
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<User> {
    let user = db::users::find_by_id(&state.pool, user.user_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(Json(user))
}

/// PUT /api/auth/me
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<UserProfileUpdate>,
) -> ApiResult<User> {
    validate_optional_text(&req.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&req.street_address, "street_address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&req.city, "city", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&req.postal_code, "postal_code", MAX_SHORT_TEXT_LEN)?;

    let updated = db::users::update_profile(&state.pool, user.user_id, &req)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: &str, attempts: i32, expires_at: i64) -> EmailVerification {
        EmailVerification {
            code: hash_password(code).unwrap(),
            attempts,
            expires_at,
        }
    }

    #[test]
    fn test_code_accepted() {
        let r = record("123456", 0, 10_000);
        assert_eq!(check_code_record(&r, "123456", 5_000, 5), Ok(()));
        assert_eq!(check_code_record(&r, " 123456 ", 5_000, 5), Ok(()));
    }

    #[test]
    fn test_code_rejections() {
        let r = record("123456", 0, 10_000);
        assert_eq!(
            check_code_record(&r, "654321", 5_000, 5),
            Err(ErrorCode::VerificationCodeInvalid)
        );
        assert_eq!(
            check_code_record(&r, "123456", 10_001, 5),
            Err(ErrorCode::VerificationCodeExpired)
        );
        let spent = record("123456", 3, 10_000);
        assert_eq!(
            check_code_record(&spent, "123456", 5_000, 3),
            Err(ErrorCode::TooManyAttempts)
        );
    }

    fn user(is_active: bool, password_hash: Option<&str>) -> User {
        User {
            id: 1,
            first_name: "Meera".into(),
            last_name: "S".into(),
            email: "meera@brew.test".into(),
            password_hash: password_hash.map(String::from),
            phone: None,
            gender: None,
            street_address: None,
            city: None,
            postal_code: None,
            role: Role::Customer,
            is_active,
            is_email_verified: true,
            login_count: 0,
            last_login_at: None,
            last_login_ip: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_login_block() {
        assert_eq!(login_block(&user(true, Some("h"))), None);
        assert_eq!(
            login_block(&user(false, None)),
            Some(ErrorCode::AccountPendingApproval)
        );
        assert_eq!(
            login_block(&user(false, Some("h"))),
            Some(ErrorCode::AccountDisabled)
        );
    }

    fn register_req(role: Option<Role>) -> RegisterRequest {
        RegisterRequest {
            first_name: "Arjun".into(),
            last_name: "Rao".into(),
            email: "arjun@brew.test".into(),
            phone: None,
            gender: None,
            street_address: None,
            city: None,
            postal_code: None,
            role,
            addresses: vec![],
            work_experiences: vec![],
            government_proofs: vec![],
        }
    }

    #[test]
    fn test_register_role_defaults_to_customer() {
        assert_eq!(register_req(None).validate().unwrap(), Role::Customer);
        assert_eq!(
            register_req(Some(Role::CafeOwner)).validate().unwrap(),
            Role::CafeOwner
        );
    }

    #[test]
    fn test_register_rejects_privileged_roles() {
        for role in [Role::Admin, Role::Chef, Role::Waiter] {
            assert_eq!(
                register_req(Some(role)).validate().unwrap_err().code,
                ErrorCode::RoleRequired
            );
        }
    }

    #[test]
    fn test_register_requires_entry_fields() {
        let mut req = register_req(None);
        req.addresses.push(AddressInput {
            street: "  ".into(),
            city: "Pune".into(),
            postal_code: None,
        });
        assert_eq!(req.validate().unwrap_err().code, ErrorCode::RequiredField);
    }
}

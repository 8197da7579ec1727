//! Account approval and lifecycle

use shared::error::{AppError, ErrorCode};
use shared::models::{AdminDashboard, Role, RoleCounts, User};
use shared::util::now_millis;

use crate::config::Config;
use crate::db;
use crate::db::users::NewUser;
use crate::email::{self, templates};
use crate::error::{ServiceResult, internal};
use crate::state::AppState;
use crate::util::{generate_password, hash_password, normalize_email};
use crate::validation::{validate_email, validate_password};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Rejection is a hard delete, so only never-approved, non-admin rows qualify
pub fn check_rejectable(target: &User) -> Result<(), AppError> {
    if target.role == Role::Admin {
        return Err(AppError::new(ErrorCode::CannotModifyAdmin));
    }
    if !target.is_pending() {
        return Err(AppError::new(ErrorCode::UserNotPending).with_detail("user_id", target.id));
    }
    Ok(())
}

pub fn check_deactivatable(actor_id: i64, target: &User) -> Result<(), AppError> {
    if target.id == actor_id {
        return Err(AppError::new(ErrorCode::CannotModifySelf));
    }
    if target.role == Role::Admin {
        return Err(AppError::new(ErrorCode::CannotModifyAdmin));
    }
    Ok(())
}

async fn load_user(state: &AppState, user_id: i64) -> ServiceResult<User> {
    Ok(db::users::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound).with_detail("user_id", user_id))?)
}

fn login_url(state: &AppState) -> String {
    format!("{}/login", state.frontend_url.trim_end_matches('/'))
}

/// Issue a first password and activate. Returns the user and the plaintext
/// password, which is also emailed.
pub async fn approve(state: &AppState, user_id: i64) -> ServiceResult<(User, String)> {
    let target = load_user(state, user_id).await?;
    if target.is_active {
        return Err(AppError::new(ErrorCode::UserAlreadyActive).into());
    }
    let (user, password) = activate_with_new_password(state, user_id).await?;
    tracing::info!(user_id, role = %user.role, "User approved");
    Ok((user, password))
}

async fn activate_with_new_password(
    state: &AppState,
    user_id: i64,
) -> ServiceResult<(User, String)> {
    let password = generate_password(&mut rand::thread_rng());
    let hash = hash_password(&password).map_err(internal)?;
    let user = db::users::activate(&state.pool, user_id, Some(&hash))
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    // Activation stands even if the email never arrives
    email::notify(
        state.email.clone(),
        user.email.clone(),
        templates::account_approved(&user.first_name, &user.email, &password, &login_url(state)),
    );
    Ok((user, password))
}

/// Re-enable a deactivated account. Accounts that never had a password get
/// one, as on approval.
pub async fn activate(state: &AppState, user_id: i64) -> ServiceResult<(User, Option<String>)> {
    let target = load_user(state, user_id).await?;
    if target.is_active {
        return Err(AppError::new(ErrorCode::UserAlreadyActive).into());
    }
    if target.password_hash.is_none() {
        let (user, password) = activate_with_new_password(state, user_id).await?;
        return Ok((user, Some(password)));
    }
    let user = db::users::activate(&state.pool, user_id, None)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    tracing::info!(user_id, "User reactivated");
    Ok((user, None))
}

pub async fn deactivate(state: &AppState, actor_id: i64, user_id: i64) -> ServiceResult<User> {
    let target = load_user(state, user_id).await?;
    check_deactivatable(actor_id, &target)?;
    let user = db::users::deactivate(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    db::refresh_tokens::revoke_all(&state.pool, user_id).await?;
    tracing::info!(user_id, actor_id, "User deactivated");
    Ok(user)
}

/// Reject a pending registration. Deletes the row and its profile entries,
/// then notifies the applicant.
pub async fn reject(state: &AppState, user_id: i64) -> ServiceResult<()> {
    let target = load_user(state, user_id).await?;
    check_rejectable(&target)?;

    if !db::users::delete_pending(&state.pool, user_id).await? {
        return Err(AppError::new(ErrorCode::UserNotPending).into());
    }
    email::notify(
        state.email.clone(),
        target.email.clone(),
        templates::account_rejected(&target.first_name),
    );
    tracing::info!(user_id, email = %target.email, "Pending user rejected and deleted");
    Ok(())
}

pub async fn dashboard(state: &AppState) -> ServiceResult<AdminDashboard> {
    let users = db::dashboard::user_counts(&state.pool, now_millis() - 7 * DAY_MS).await?;
    let by_role = db::dashboard::users_by_role(&state.pool).await?;
    let cafes = db::dashboard::cafe_totals(&state.pool).await?;
    Ok(AdminDashboard {
        total_users: users.total_users,
        active_users: users.active_users,
        pending_users: users.pending_users,
        users_by_role: RoleCounts::from_role_counts(&by_role),
        registrations_last_7_days: users.registrations_since,
        total_cafes: cafes.total_cafes,
        verified_cafes: cafes.verified_cafes,
        pending_cafes: cafes.pending_cafes,
    })
}

/// Create the first administrator from configuration when none exists
pub async fn ensure_bootstrap_admin(state: &AppState, config: &Config) -> ServiceResult<()> {
    let (Some(email_addr), Some(password)) = (
        config.bootstrap_admin_email.as_deref(),
        config.bootstrap_admin_password.as_deref(),
    ) else {
        return Ok(());
    };
    if db::users::admin_exists(&state.pool).await? {
        tracing::debug!("Admin account present, bootstrap skipped");
        return Ok(());
    }

    let email_addr = normalize_email(email_addr);
    validate_email(&email_addr)?;
    validate_password(password)?;
    let hash = hash_password(password).map_err(internal)?;

    let mut conn = state.pool.acquire().await?;
    let admin = db::users::insert(
        &mut *conn,
        &NewUser {
            first_name: "Admin",
            last_name: "User",
            email: &email_addr,
            password_hash: Some(&hash),
            phone: None,
            gender: None,
            street_address: None,
            city: None,
            postal_code: None,
            role: Role::Admin,
            is_active: true,
            is_email_verified: true,
        },
    )
    .await?;
    tracing::info!(user_id = admin.id, email = %admin.email, "Bootstrap admin created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, role: Role, is_active: bool) -> User {
        User {
            id,
            first_name: "Ravi".into(),
            last_name: "K".into(),
            email: format!("{id}@brew.test"),
            password_hash: None,
            phone: None,
            gender: None,
            street_address: None,
            city: None,
            postal_code: None,
            role,
            is_active,
            is_email_verified: false,
            login_count: 0,
            last_login_at: None,
            last_login_ip: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_reject_pending_customer() {
        assert!(check_rejectable(&user(2, Role::Customer, false)).is_ok());
        assert!(check_rejectable(&user(2, Role::CafeOwner, false)).is_ok());
    }

    #[test]
    fn test_reject_refuses_active_and_admin() {
        assert_eq!(
            check_rejectable(&user(2, Role::Customer, true)).unwrap_err().code,
            ErrorCode::UserNotPending
        );
        assert_eq!(
            check_rejectable(&user(2, Role::Admin, false)).unwrap_err().code,
            ErrorCode::CannotModifyAdmin
        );
    }

    #[test]
    fn test_reject_refuses_deactivated_account() {
        let mut former = user(4, Role::Customer, false);
        former.password_hash = Some("$argon2id$old".into());
        former.login_count = 12;
        assert!(!former.is_pending());
        assert_eq!(
            check_rejectable(&former).unwrap_err().code,
            ErrorCode::UserNotPending
        );
    }

    #[test]
    fn test_deactivate_guards() {
        assert_eq!(
            check_deactivatable(1, &user(1, Role::Admin, true)).unwrap_err().code,
            ErrorCode::CannotModifySelf
        );
        assert_eq!(
            check_deactivatable(1, &user(2, Role::Admin, true)).unwrap_err().code,
            ErrorCode::CannotModifyAdmin
        );
        assert!(check_deactivatable(1, &user(3, Role::Waiter, true)).is_ok());
    }
}

//! Administration: account approval and café verification

use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, put};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{AdminDashboard, Cafe, Role, User, UserDetail};

use crate::auth::CurrentUser;
use crate::db;
use crate::error::internal;
use crate::services;
use crate::state::AppState;

use super::{ApiResult, message};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/dashboard", get(get_dashboard))
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/pending", get(list_pending_users))
        .route("/api/admin/users/{id}", get(get_user).delete(reject_user))
        .route("/api/admin/users/{id}/approve", put(approve_user))
        .route("/api/admin/users/{id}/deactivate", put(deactivate_user))
        .route("/api/admin/users/{id}/activate", put(activate_user))
        .route("/api/admin/cafes", get(list_cafes))
        .route("/api/admin/cafes/pending", get(list_pending_cafes))
        .route("/api/admin/cafes/{id}/verify", put(verify_cafe))
        .route("/api/admin/cafes/{id}/reject", put(reject_cafe))
        .route("/api/admin/cafes/{id}", delete(delete_cafe))
}

/// Result of approve/activate. `generated_password` is set only when a new
/// password was issued; it is also emailed to the user.
#[derive(Debug, Serialize)]
pub struct AccountActivation {
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub role: Option<Role>,
}

pub async fn get_dashboard(State(state): State<AppState>) -> ApiResult<AdminDashboard> {
    let dashboard = services::admin::dashboard(&state).await?;
    Ok(Json(dashboard))
}

// ── Users ──

/// GET /api/admin/users?role=CAFE_OWNER
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Vec<User>> {
    let users = db::users::list(&state.pool, query.role)
        .await
        .map_err(internal)?;
    Ok(Json(users))
}

pub async fn list_pending_users(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let users = db::users::list_pending(&state.pool).await.map_err(internal)?;
    Ok(Json(users))
}

/// GET /api/admin/users/{id} with profile entries
pub async fn get_user(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<UserDetail> {
    let user = db::users::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound).with_detail("user_id", id))?;
    let addresses = db::users::list_addresses(&state.pool, id)
        .await
        .map_err(internal)?;
    let work_experiences = db::users::list_work_experiences(&state.pool, id)
        .await
        .map_err(internal)?;
    let government_proofs = db::users::list_government_proofs(&state.pool, id)
        .await
        .map_err(internal)?;
    Ok(Json(UserDetail {
        user,
        addresses,
        work_experiences,
        government_proofs,
    }))
}

pub async fn approve_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<AccountActivation> {
    let (user, password) = services::admin::approve(&state, id).await?;
    Ok(Json(AccountActivation {
        user,
        generated_password: Some(password),
    }))
}

pub async fn activate_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<AccountActivation> {
    let (user, generated_password) = services::admin::activate(&state, id).await?;
    Ok(Json(AccountActivation {
        user,
        generated_password,
    }))
}

pub async fn deactivate_user(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<User> {
    let user = services::admin::deactivate(&state, admin.user_id, id).await?;
    Ok(Json(user))
}

/// DELETE /api/admin/users/{id}: reject a pending registration
pub async fn reject_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    services::admin::reject(&state, id).await?;
    Ok(message("User rejected and deleted"))
}

// ── Cafés ──

pub async fn list_cafes(State(state): State<AppState>) -> ApiResult<Vec<Cafe>> {
    let cafes = db::cafes::list_all(&state.pool).await.map_err(internal)?;
    Ok(Json(cafes))
}

pub async fn list_pending_cafes(State(state): State<AppState>) -> ApiResult<Vec<Cafe>> {
    let cafes = db::cafes::list_pending(&state.pool).await.map_err(internal)?;
    Ok(Json(cafes))
}

fn cafe_not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::CafeNotFound).with_detail("cafe_id", id)
}

/// PUT /api/admin/cafes/{id}/verify: verified and active, visible to customers
pub async fn verify_cafe(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Cafe> {
    let cafe = db::cafes::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| cafe_not_found(id))?;
    if cafe.is_public() {
        return Err(AppError::new(ErrorCode::CafeAlreadyVerified).with_detail("cafe_id", id));
    }

    let cafe = db::cafes::set_verification(&state.pool, id, true, true)
        .await
        .map_err(internal)?
        .ok_or_else(|| cafe_not_found(id))?;
    tracing::info!(cafe_id = id, "Cafe verified");
    Ok(Json(cafe))
}

/// PUT /api/admin/cafes/{id}/reject: unverified and inactive
pub async fn reject_cafe(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Cafe> {
    let cafe = db::cafes::set_verification(&state.pool, id, false, false)
        .await
        .map_err(internal)?
        .ok_or_else(|| cafe_not_found(id))?;
    tracing::info!(cafe_id = id, "Cafe rejected");
    Ok(Json(cafe))
}

pub async fn delete_cafe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    if !db::cafes::delete(&state.pool, id).await.map_err(internal)? {
        return Err(cafe_not_found(id));
    }
    tracing::info!(cafe_id = id, "Cafe deleted");
    Ok(message("Cafe deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 7,
            first_name: "Asha".into(),
            last_name: "Rao".into(),
            email: "asha@brew.test".into(),
            password_hash: Some("$argon2id$secret".into()),
            phone: None,
            gender: None,
            street_address: None,
            city: None,
            postal_code: None,
            role: Role::CafeOwner,
            is_active: true,
            is_email_verified: true,
            login_count: 0,
            last_login_at: None,
            last_login_ip: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_activation_hides_hash_and_optional_password() {
        let body = serde_json::to_value(AccountActivation {
            user: user(),
            generated_password: None,
        })
        .unwrap();
        assert!(body.get("generated_password").is_none());
        assert!(body["user"].get("password_hash").is_none());

        let body = serde_json::to_value(AccountActivation {
            user: user(),
            generated_password: Some("Xy7#pass".into()),
        })
        .unwrap();
        assert_eq!(body["generated_password"], "Xy7#pass");
    }

    #[test]
    fn test_role_filter_parses_wire_name() {
        let query: UserListQuery = serde_json::from_str(r#"{"role":"CAFE_OWNER"}"#).unwrap();
        assert_eq!(query.role, Some(Role::CafeOwner));
    }
}

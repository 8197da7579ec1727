use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::error::AppError;
use shared::models::{Cafe, CafeCreate, CafeUpdate, Role};

use crate::auth::{CurrentUser, ensure_role};
use crate::db;
use crate::error::internal;
use crate::services::access;
use crate::state::AppState;
use crate::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_email,
    validate_optional_text, validate_required_text,
};

use crate::api::ApiResult;

fn validate_contact(
    contact_number: &Option<String>,
    email: &Option<String>,
    state: &Option<String>,
    zip_code: &Option<String>,
) -> Result<(), AppError> {
    validate_optional_text(contact_number, "contact_number", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(state, "state", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(zip_code, "zip_code", MAX_SHORT_TEXT_LEN)?;
    if let Some(email) = email.as_deref().filter(|e| !e.trim().is_empty()) {
        validate_email(email)?;
    }
    Ok(())
}

/// GET /api/cafe-owner/cafes
pub async fn list_cafes(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Vec<Cafe>> {
    ensure_role(&user, &[Role::CafeOwner])?;
    let cafes = db::cafes::list_by_owner(&state.pool, user.user_id)
        .await
        .map_err(internal)?;
    Ok(Json(cafes))
}

/// POST /api/cafe-owner/cafes
///
/// Missing name/address/city fall back to placeholders. The café starts
/// unverified and stays out of the public listing until an admin verifies it.
pub async fn create_cafe(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CafeCreate>,
) -> ApiResult<Cafe> {
    ensure_role(&user, &[Role::CafeOwner])?;

    let data = req.with_defaults();
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&data.address, "address", MAX_ADDRESS_LEN)?;
    validate_required_text(&data.city, "city", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&data.gst_number, "gst_number", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.fssai_license, "fssai_license", MAX_SHORT_TEXT_LEN)?;
    validate_contact(&data.contact_number, &data.email, &data.state, &data.zip_code)?;

    let cafe = db::cafes::create(&state.pool, user.user_id, &data)
        .await
        .map_err(internal)?;
    tracing::info!(cafe_id = cafe.id, owner_id = user.user_id, name = %cafe.name, "Cafe created");
    Ok(Json(cafe))
}

/// GET /api/cafe-owner/cafes/{id}
pub async fn get_cafe(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Cafe> {
    let (cafe, _) = access::authorize_cafe(&state, &user, id).await?;
    Ok(Json(cafe))
}

/// PUT /api/cafe-owner/cafes/{id}
pub async fn update_cafe(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(req): Json<CafeUpdate>,
) -> ApiResult<Cafe> {
    let cafe = access::owned_cafe(&state, &user, id).await?;

    if let Some(name) = &req.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(address) = &req.address {
        validate_required_text(address, "address", MAX_ADDRESS_LEN)?;
    }
    if let Some(city) = &req.city {
        validate_required_text(city, "city", MAX_SHORT_TEXT_LEN)?;
    }
    validate_optional_text(&req.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&req.gst_number, "gst_number", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&req.fssai_license, "fssai_license", MAX_SHORT_TEXT_LEN)?;
    validate_contact(&req.contact_number, &req.email, &req.state, &req.zip_code)?;

    let updated = db::cafes::update(&state.pool, cafe.id, &req)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::not_found(format!("Cafe {id}")))?;
    tracing::info!(cafe_id = cafe.id, "Cafe updated");
    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_email_is_skipped() {
        assert!(validate_contact(&None, &Some("  ".into()), &None, &None).is_ok());
        assert!(validate_contact(&None, &Some("not-an-email".into()), &None, &None).is_err());
    }

    #[test]
    fn test_defaults_pass_validation() {
        let data = CafeCreate::default().with_defaults();
        assert!(validate_required_text(&data.name, "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text(&data.address, "address", MAX_ADDRESS_LEN).is_ok());
        assert!(validate_contact(&data.contact_number, &data.email, &data.state, &data.zip_code).is_ok());
    }
}

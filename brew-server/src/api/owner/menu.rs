use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    MenuCategory, MenuCategoryCreate, MenuCategoryUpdate, MenuItem, MenuItemCreate,
    MenuItemUpdate,
};

use crate::api::{ApiResult, message};
use crate::auth::CurrentUser;
use crate::db;
use crate::error::internal;
use crate::services::access;
use crate::state::AppState;
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_min, validate_optional_text,
    validate_price, validate_required_text,
};

fn category_not_found(category_id: i64) -> AppError {
    AppError::new(ErrorCode::CategoryNotFound).with_detail("category_id", category_id)
}

fn item_not_found(item_id: i64) -> AppError {
    AppError::new(ErrorCode::MenuItemNotFound).with_detail("item_id", item_id)
}

/// The category must exist inside `cafe_id`
async fn ensure_category(state: &AppState, cafe_id: i64, category_id: i64) -> Result<(), AppError> {
    db::menu::find_category(&state.pool, cafe_id, category_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| category_not_found(category_id))?;
    Ok(())
}

// ── Categories ──

pub async fn list_categories(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(cafe_id): Path<i64>,
) -> ApiResult<Vec<MenuCategory>> {
    access::authorize_cafe(&state, &user, cafe_id).await?;
    let categories = db::menu::list_categories(&state.pool, cafe_id, false)
        .await
        .map_err(internal)?;
    Ok(Json(categories))
}

pub async fn create_category(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(cafe_id): Path<i64>,
    Json(data): Json<MenuCategoryCreate>,
) -> ApiResult<MenuCategory> {
    access::owned_cafe(&state, &user, cafe_id).await?;
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
    if let Some(order) = data.display_order {
        validate_min(order, "display_order", 0)?;
    }

    let category = db::menu::create_category(&state.pool, cafe_id, &data)
        .await
        .map_err(internal)?;
    tracing::info!(cafe_id, category_id = category.id, "Menu category created");
    Ok(Json(category))
}

pub async fn update_category(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((cafe_id, category_id)): Path<(i64, i64)>,
    Json(data): Json<MenuCategoryUpdate>,
) -> ApiResult<MenuCategory> {
    access::owned_cafe(&state, &user, cafe_id).await?;
    if let Some(name) = &data.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
    if let Some(order) = data.display_order {
        validate_min(order, "display_order", 0)?;
    }

    let category = db::menu::update_category(&state.pool, cafe_id, category_id, &data)
        .await
        .map_err(internal)?
        .ok_or_else(|| category_not_found(category_id))?;
    Ok(Json(category))
}

/// DELETE /api/cafe-owner/cafes/{id}/categories/{category_id}
///
/// Refused while items still reference the category.
pub async fn delete_category(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((cafe_id, category_id)): Path<(i64, i64)>,
) -> ApiResult<serde_json::Value> {
    access::owned_cafe(&state, &user, cafe_id).await?;
    ensure_category(&state, cafe_id, category_id).await?;

    if db::menu::category_has_items(&state.pool, category_id)
        .await
        .map_err(internal)?
    {
        return Err(
            AppError::new(ErrorCode::CategoryHasItems).with_detail("category_id", category_id)
        );
    }

    if !db::menu::delete_category(&state.pool, cafe_id, category_id)
        .await
        .map_err(internal)?
    {
        return Err(category_not_found(category_id));
    }
    tracing::info!(cafe_id, category_id, "Menu category deleted");
    Ok(message("Category deleted"))
}

// ── Items ──

pub async fn list_items(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(cafe_id): Path<i64>,
) -> ApiResult<Vec<MenuItem>> {
    access::authorize_cafe(&state, &user, cafe_id).await?;
    let items = db::menu::list_items(&state.pool, cafe_id)
        .await
        .map_err(internal)?;
    Ok(Json(items))
}

pub async fn create_item(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(cafe_id): Path<i64>,
    Json(data): Json<MenuItemCreate>,
) -> ApiResult<MenuItem> {
    access::owned_cafe(&state, &user, cafe_id).await?;
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&data.image_url, "image_url", MAX_URL_LEN)?;
    let price = validate_price(data.price)?;
    ensure_category(&state, cafe_id, data.category_id).await?;

    let item = db::menu::create_item(&state.pool, cafe_id, &data, price)
        .await
        .map_err(internal)?;
    tracing::info!(cafe_id, item_id = item.id, price = %item.price, "Menu item created");
    Ok(Json(item))
}

pub async fn update_item(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((cafe_id, item_id)): Path<(i64, i64)>,
    Json(data): Json<MenuItemUpdate>,
) -> ApiResult<MenuItem> {
    access::owned_cafe(&state, &user, cafe_id).await?;
    if let Some(name) = &data.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&data.image_url, "image_url", MAX_URL_LEN)?;
    if data.price.is_some() {
        validate_price(data.price)?;
    }
    if let Some(category_id) = data.category_id {
        ensure_category(&state, cafe_id, category_id).await?;
    }

    let item = db::menu::update_item(&state.pool, cafe_id, item_id, &data)
        .await
        .map_err(internal)?
        .ok_or_else(|| item_not_found(item_id))?;
    Ok(Json(item))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((cafe_id, item_id)): Path<(i64, i64)>,
) -> ApiResult<serde_json::Value> {
    access::owned_cafe(&state, &user, cafe_id).await?;
    if !db::menu::delete_item(&state.pool, cafe_id, item_id)
        .await
        .map_err(internal)?
    {
        return Err(item_not_found(item_id));
    }
    tracing::info!(cafe_id, item_id, "Menu item deleted");
    Ok(message("Menu item deleted"))
}

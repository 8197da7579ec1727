//! Public café catalogue (no auth)
//!
//! Only verified, active cafés are visible here; every lookup goes through
//! `find_public` so a hidden café answers 404.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Cafe, CafeTable, MenuCategory, MenuItem};

use crate::db;
use crate::error::internal;
use crate::state::AppState;

use super::ApiResult;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/cafes", get(list_cafes))
        .route("/api/cafes/{id}", get(get_cafe))
        .route("/api/cafes/{id}/menu", get(list_categories))
        .route("/api/cafes/{id}/menu/items", get(list_items))
        .route(
            "/api/cafes/{id}/menu/categories/{category_id}/items",
            get(list_category_items),
        )
        .route("/api/cafes/{id}/menu/addons", get(list_addons))
        .route("/api/cafes/{id}/menu/suggested", get(list_suggested))
        .route("/api/cafes/{id}/tables", get(list_tables))
}

async fn public_cafe(state: &AppState, id: i64) -> Result<Cafe, AppError> {
    db::cafes::find_public(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::CafeNotFound).with_detail("cafe_id", id))
}

/// GET /api/cafes
pub async fn list_cafes(State(state): State<AppState>) -> ApiResult<Vec<Cafe>> {
    let cafes = db::cafes::list_public(&state.pool).await.map_err(internal)?;
    Ok(Json(cafes))
}

/// GET /api/cafes/{id}
pub async fn get_cafe(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Cafe> {
    Ok(Json(public_cafe(&state, id).await?))
}

/// GET /api/cafes/{id}/menu
pub async fn list_categories(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<MenuCategory>> {
    public_cafe(&state, id).await?;
    let categories = db::menu::list_categories(&state.pool, id, true)
        .await
        .map_err(internal)?;
    Ok(Json(categories))
}

#[derive(Debug, Deserialize)]
pub struct ItemsQuery {
    pub category_id: Option<i64>,
}

/// GET /api/cafes/{id}/menu/items?category_id=
pub async fn list_items(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<ItemsQuery>,
) -> ApiResult<Vec<MenuItem>> {
    public_cafe(&state, id).await?;
    let items = db::menu::list_available_items(&state.pool, id, query.category_id)
        .await
        .map_err(internal)?;
    Ok(Json(items))
}

/// GET /api/cafes/{id}/menu/categories/{category_id}/items
pub async fn list_category_items(
    State(state): State<AppState>,
    Path((id, category_id)): Path<(i64, i64)>,
) -> ApiResult<Vec<MenuItem>> {
    public_cafe(&state, id).await?;
    db::menu::find_category(&state.pool, id, category_id)
        .await
        .map_err(internal)?
        .filter(|c| c.is_active)
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;
    let items = db::menu::list_available_items(&state.pool, id, Some(category_id))
        .await
        .map_err(internal)?;
    Ok(Json(items))
}

/// GET /api/cafes/{id}/menu/addons
pub async fn list_addons(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<MenuItem>> {
    public_cafe(&state, id).await?;
    let items = db::menu::list_addons(&state.pool, id).await.map_err(internal)?;
    Ok(Json(items))
}

/// GET /api/cafes/{id}/menu/suggested
pub async fn list_suggested(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<MenuItem>> {
    public_cafe(&state, id).await?;
    let items = db::menu::list_suggested(&state.pool, id).await.map_err(internal)?;
    Ok(Json(items))
}

/// GET /api/cafes/{id}/tables
pub async fn list_tables(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<CafeTable>> {
    public_cafe(&state, id).await?;
    let tables = db::tables::list_by_cafe(&state.pool, id).await.map_err(internal)?;
    Ok(Json(tables))
}

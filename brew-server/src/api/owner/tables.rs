use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{CafeTable, CafeTableCreate, CafeTableUpdate};

use crate::api::{ApiResult, message};
use crate::auth::CurrentUser;
use crate::db;
use crate::error::internal;
use crate::services::access;
use crate::state::AppState;
use crate::validation::{MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_min, validate_optional_text};

fn table_not_found(table_id: i64) -> AppError {
    AppError::new(ErrorCode::TableNotFound).with_detail("table_id", table_id)
}

async fn ensure_number_free(
    state: &AppState,
    cafe_id: i64,
    table_number: i32,
    except_id: Option<i64>,
) -> Result<(), AppError> {
    if db::tables::number_taken(&state.pool, cafe_id, table_number, except_id)
        .await
        .map_err(internal)?
    {
        return Err(
            AppError::new(ErrorCode::TableNumberExists).with_detail("table_number", table_number)
        );
    }
    Ok(())
}

pub async fn list_tables(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(cafe_id): Path<i64>,
) -> ApiResult<Vec<CafeTable>> {
    access::authorize_cafe(&state, &user, cafe_id).await?;
    let tables = db::tables::list_by_cafe(&state.pool, cafe_id)
        .await
        .map_err(internal)?;
    Ok(Json(tables))
}

pub async fn create_table(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(cafe_id): Path<i64>,
    Json(data): Json<CafeTableCreate>,
) -> ApiResult<CafeTable> {
    access::owned_cafe(&state, &user, cafe_id).await?;
    validate_min(data.table_number, "table_number", 1)?;
    validate_min(data.capacity, "capacity", 1)?;
    validate_optional_text(&data.display_label, "display_label", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
    ensure_number_free(&state, cafe_id, data.table_number, None).await?;

    let table = db::tables::create(&state.pool, cafe_id, &data)
        .await
        .map_err(internal)?;
    tracing::info!(cafe_id, table_id = table.id, table_number = table.table_number, "Table created");
    Ok(Json(table))
}

pub async fn update_table(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((cafe_id, table_id)): Path<(i64, i64)>,
    Json(data): Json<CafeTableUpdate>,
) -> ApiResult<CafeTable> {
    access::owned_cafe(&state, &user, cafe_id).await?;
    if let Some(capacity) = data.capacity {
        validate_min(capacity, "capacity", 1)?;
    }
    validate_optional_text(&data.display_label, "display_label", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
    if let Some(number) = data.table_number {
        validate_min(number, "table_number", 1)?;
        ensure_number_free(&state, cafe_id, number, Some(table_id)).await?;
    }

    let table = db::tables::update(&state.pool, cafe_id, table_id, &data)
        .await
        .map_err(internal)?
        .ok_or_else(|| table_not_found(table_id))?;
    Ok(Json(table))
}

pub async fn delete_table(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((cafe_id, table_id)): Path<(i64, i64)>,
) -> ApiResult<serde_json::Value> {
    access::owned_cafe(&state, &user, cafe_id).await?;
    if !db::tables::delete(&state.pool, cafe_id, table_id)
        .await
        .map_err(internal)?
    {
        return Err(table_not_found(table_id));
    }
    tracing::info!(cafe_id, table_id, "Table deleted");
    Ok(message("Table deleted"))
}

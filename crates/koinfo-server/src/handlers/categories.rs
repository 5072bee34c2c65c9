//! Category handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use koinfo_core::{Category, CategoryPatch, NewCategory};

use crate::{read_json, AppError, AppState, OkResponse};

/// POST /api/category - Create a category
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let req: NewCategory = read_json(request).await?;

    let category = state.ledger.write(|data| data.create_category(req))?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/category/:id - Rename or retype a category
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    request: Request,
) -> Result<Json<Category>, AppError> {
    let patch: CategoryPatch = read_json(request).await?;

    let category = state
        .ledger
        .write(|data| data.update_category(&id, patch))?;

    Ok(Json(category))
}

/// DELETE /api/category/:id - Remove a category, or soft-delete it if referenced
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, AppError> {
    let removal = state.ledger.write(|data| data.delete_category(&id))?;
    debug!(id = %id, ?removal, "Category delete handled");

    Ok(Json(OkResponse { ok: true }))
}

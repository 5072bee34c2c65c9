//! Debt handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    Json,
};

use koinfo_core::{Debt, DebtPatch, NewDebt};

use crate::{read_json, AppError, AppState, OkResponse};

/// POST /api/debt - Create a debt and its linked category
pub async fn create_debt(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<Debt>), AppError> {
    let req: NewDebt = read_json(request).await?;

    let debt = state.ledger.write(|data| data.create_debt(req))?;

    Ok((StatusCode::CREATED, Json(debt)))
}

/// PUT /api/debt/:id - Update a debt
pub async fn update_debt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    request: Request,
) -> Result<Json<Debt>, AppError> {
    let patch: DebtPatch = read_json(request).await?;

    let debt = state.ledger.write(|data| data.update_debt(&id, patch))?;

    Ok(Json(debt))
}

/// DELETE /api/debt/:id - Delete a debt; its category is kept for history
pub async fn delete_debt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, AppError> {
    state.ledger.write(|data| data.delete_debt(&id))?;
    Ok(Json(OkResponse { ok: true }))
}

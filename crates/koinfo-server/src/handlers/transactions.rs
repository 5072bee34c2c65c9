//! Transaction handlers
//!
//! Each write also moves the balance of a debt or the progress of a goal
//! linked to the transaction's category.

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    Json,
};

use koinfo_core::{today, NewTransaction, Transaction, TransactionPatch};

use crate::{read_json, AppError, AppState, OkResponse};

/// POST /api/transaction - Record a transaction
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let req: NewTransaction = read_json(request).await?;

    let tx = state
        .ledger
        .write(|data| data.create_transaction(req, today()))?;

    Ok((StatusCode::CREATED, Json(tx)))
}

/// PUT /api/transaction/:id - Edit a transaction, reverting its old effect first
pub async fn update_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    request: Request,
) -> Result<Json<Transaction>, AppError> {
    let patch: TransactionPatch = read_json(request).await?;

    let tx = state
        .ledger
        .write(|data| data.update_transaction(&id, patch))?;

    Ok(Json(tx))
}

/// DELETE /api/transaction/:id - Delete a transaction and revert its effect
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, AppError> {
    state.ledger.write(|data| data.delete_transaction(&id))?;
    Ok(Json(OkResponse { ok: true }))
}

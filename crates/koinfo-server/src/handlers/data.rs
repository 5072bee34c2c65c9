//! Whole-dataset handlers

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Json,
};
use serde::{Deserialize, Serialize};

use koinfo_core::Dataset;

use crate::{read_json, AppError, AppState};

/// GET /api/data - Full dataset, soft-deleted categories included
pub async fn get_data(State(state): State<Arc<AppState>>) -> Result<Json<Dataset>, AppError> {
    let data = state.ledger.data()?;
    Ok(Json(data))
}

/// Opening balance payload, used for both request and response
#[derive(Debug, Deserialize, Serialize)]
pub struct OpenBalance {
    pub open_balance: f64,
}

/// PUT /api/open_balance - Set the opening balance
pub async fn update_open_balance(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<OpenBalance>, AppError> {
    let req: OpenBalance = read_json(request).await?;

    let open_balance = state
        .ledger
        .write(|data| data.set_open_balance(req.open_balance))?;

    Ok(Json(OpenBalance { open_balance }))
}

/// POST /api/reset_data - Replace everything with the seed dataset
pub async fn reset_data(State(state): State<Arc<AppState>>) -> Result<Json<Dataset>, AppError> {
    let data = state.ledger.reset()?;
    Ok(Json(data))
}

//! Goal handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    Json,
};

use koinfo_core::{today, Goal, GoalPatch, NewGoal};

use crate::{read_json, AppError, AppState, OkResponse};

/// POST /api/goal - Create a goal and its linked saving category
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<Goal>), AppError> {
    let req: NewGoal = read_json(request).await?;

    let goal = state.ledger.write(|data| data.create_goal(req, today()))?;

    Ok((StatusCode::CREATED, Json(goal)))
}

/// PUT /api/goal/:id - Update a goal's name, target or deadline
pub async fn update_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    request: Request,
) -> Result<Json<Goal>, AppError> {
    let patch: GoalPatch = read_json(request).await?;

    let goal = state
        .ledger
        .write(|data| data.update_goal(&id, patch, today()))?;

    Ok(Json(goal))
}

/// DELETE /api/goal/:id - Delete a goal; its category is kept for history
pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, AppError> {
    state.ledger.write(|data| data.delete_goal(&id))?;
    Ok(Json(OkResponse { ok: true }))
}

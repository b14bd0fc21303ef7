//! Model status handler

use axum::{extract::State, Json};

use crate::classifier::EngineStatus;
use crate::{AppResult, AppState};

/// Report whether a classifier bundle is loaded and how it is performing.
pub async fn status(State(state): State<AppState>) -> AppResult<Json<EngineStatus>> {
    Ok(Json(state.classifier.status()))
}

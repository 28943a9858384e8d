//! Model status handler

use axum::{extract::State, Json};

use churn_core::EngineStatus;

use crate::AppState;

/// Loaded model metadata and inference counters
pub async fn status(State(state): State<AppState>) -> Json<EngineStatus> {
    Json(state.predictor.status())
}

//! Prediction handler

use std::sync::Arc;

use axum::{extract::State, Json};

use churn_core::{ChurnLabel, RawRecord, RawTable};

use crate::models::{CustomerData, PredictionResponse};
use crate::{AppResult, AppState};

/// Predict churn for one customer
pub async fn predict(
    State(state): State<AppState>,
    Json(data): Json<CustomerData>,
) -> AppResult<Json<PredictionResponse>> {
    let prediction = run_prediction(&state, &data).await?;
    Ok(Json(PredictionResponse { prediction }))
}

/// Shared by the JSON endpoint and the form UI
pub async fn run_prediction(state: &AppState, data: &CustomerData) -> AppResult<ChurnLabel> {
    let record = RawRecord::from(data);

    if state.config.validate_requests {
        let report = state.predictor.validate(&RawTable::from_record(&record));
        if !report.success() {
            tracing::warn!("Request failed validation: {:?}", report.failed_checks());
        }
    }

    // Inference holds the session lock; keep it off the async workers
    let predictor = Arc::clone(&state.predictor);
    let label = tokio::task::spawn_blocking(move || predictor.predict(&record)).await??;

    tracing::debug!(
        "Prediction for {} / {} / tenure {}: {}",
        data.contract,
        data.internet_service,
        data.tenure,
        label
    );

    Ok(label)
}

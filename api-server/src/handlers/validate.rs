//! Batch validation handler

use axum::{extract::State, Json};

use churn_core::{RawTable, ValidationReport};

use crate::{AppResult, AppState};

/// Run the data-quality rules over a JSON array of customer records.
///
/// A failing batch is still a 200: the report is the answer. Only a body
/// that is not an array of objects is rejected.
pub async fn validate(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Json<ValidationReport>> {
    let table = RawTable::from_json(body)?;
    let report = state.predictor.validate(&table);

    tracing::info!(
        "Validated {} rows: {}/{} checks passed",
        table.row_count(),
        report.passed_checks(),
        report.total_checks()
    );

    Ok(Json(report))
}

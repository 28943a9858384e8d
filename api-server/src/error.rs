//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use churn_core::{PredictError, TableError};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors
    #[error("{0}")]
    BadRequest(String),

    // Model errors (message is returned to the caller)
    #[error("{0}")]
    Inference(String),

    // Generic errors
    #[error("{0}")]
    InternalError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Inference(_) | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match &self {
            AppError::BadRequest(msg) => msg.as_str(),
            AppError::Inference(msg) => {
                tracing::error!("Inference error: {}", msg);
                msg.as_str()
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error"
            }
        };

        // Prediction failures keep the bare `{"error"}` body clients parse
        let body = match &self {
            AppError::Inference(_) => Json(json!({ "error": error_message })),
            _ => Json(json!({
                "error": error_message,
                "status": status.as_u16()
            })),
        };

        (status, body).into_response()
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::Encode(e) => AppError::BadRequest(e.to_string()),
            inference @ PredictError::Inference(_) => AppError::Inference(inference.to_string()),
        }
    }
}

impl From<TableError> for AppError {
    fn from(err: TableError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(err.to_string())
    }
}

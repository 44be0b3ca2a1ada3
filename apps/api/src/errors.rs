use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::matching::MatchError;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// `message` is what the client sees; the store detail is only logged.
    #[error("Persistence error: {message}")]
    Persistence {
        message: String,
        #[source]
        source: StoreError,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

const STORE_FAILURE_MESSAGE: &str = "A database error occurred";

impl From<StoreError> for AppError {
    fn from(source: StoreError) -> Self {
        AppError::Persistence {
            message: STORE_FAILURE_MESSAGE.to_string(),
            source,
        }
    }
}

impl From<MatchError> for AppError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::CandidateNotFound(_)
            | MatchError::JobNotFound(_)
            | MatchError::MatchNotFound(_)
            | MatchError::MissingIds { .. } => AppError::NotFound(err.to_string()),
            MatchError::InvalidInput(msg) => AppError::Validation(msg),
            MatchError::Persistence {
                candidate_id,
                job_id,
                source,
            } => AppError::Persistence {
                message: format!(
                    "failed to persist match for candidate {candidate_id} / job {job_id}"
                ),
                source,
            },
            MatchError::Store(source) => source.into(),
            MatchError::WorkerPool(_) => AppError::Internal(anyhow::Error::new(err)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Persistence { message, source } => {
                tracing::error!("Persistence error: {message}: {source}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PERSISTENCE_ERROR",
                    message.clone(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

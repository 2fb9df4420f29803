use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors produced by the compliance engine.
///
/// NotFound and Unauthorized are kept distinct internally; the transport
/// layer may unify them, the engine never does.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Access denied: {0}")]
    Unauthorized(&'static str),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Conflicting write on a unique key")]
    Conflict,
    #[error("Database error: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            EngineError::NotFound(_) => (StatusCode::NOT_FOUND, "Resource not found"),
            EngineError::Unauthorized(_) => (StatusCode::FORBIDDEN, "Access denied"),
            EngineError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "Invalid request"),
            // A surfaced Conflict means the local upsert recovery failed;
            // treat it as a server fault, not a client one.
            EngineError::Conflict => (StatusCode::INTERNAL_SERVER_ERROR, "Write conflict"),
            EngineError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error"),
        };

        let body = Json(json!({
            "error": error_message,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

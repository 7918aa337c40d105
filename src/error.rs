use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("map error: {0}")]
    Map(#[from] MapError),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, Error)]
pub enum MapError {
    #[error("map script failed to load: {0}")]
    ScriptLoad(String),

    #[error("map construction failed: {0}")]
    Construction(String),

    #[error("overlay placement failed: {0}")]
    Placement(String),

    #[error("cannot move map from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Map(err) => (StatusCode::CONFLICT, err.to_string()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

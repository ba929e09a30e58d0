use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Error type for the HTTP API boundary.
///
/// Every variant maps to one status band: user-correctable input problems are
/// 4xx, upstream-AI and persistence failures are 5xx. The response body is
/// always `{"error": <kind>, "message": <detail>}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("AI service error: {0}")]
    AiService(String),
    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "Bad Request", msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "Unauthorized", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "Forbidden", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not Found", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "Conflict", msg),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method Not Allowed",
                "Method not allowed".to_string(),
            ),
            ApiError::AiService(msg) => {
                error!("AI service failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "AI Service Error",
                    "Failed to generate flashcards. Please try again.".to_string(),
                )
            }
            ApiError::Database(err) => {
                error!("Database failure: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "Internal server error. Please try again.".to_string(),
                )
            }
        };

        let body = Json(serde_json::json!({
            "error": kind,
            "message": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Sheet \"{0}\" not found")]
    SheetMissing(String),

    #[error("Server error: {0}")]
    Internal(String),

    #[error("Server error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::SheetMissing(_) | AppError::Internal(_) | AppError::Json(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {self}");
        }

        // Callers branch on `ok`, not on the transport status code.
        (status, Json(json!({ "ok": false, "error": self.to_string() }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

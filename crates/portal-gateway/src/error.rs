use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use portal_core::ShortenerError;
use tracing::{error, info};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// The request was malformed; rendered as 400.
    Validation(String),
    Shortener(ShortenerError),
}

impl From<ShortenerError> for AppError {
    fn from(value: ShortenerError) -> Self {
        Self::Shortener(value)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Shortener(err @ ShortenerError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            AppError::Shortener(err @ ShortenerError::TtlTooLong(_)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            AppError::Shortener(err @ ShortenerError::Store(_)) => {
                error!(error = %err, "store failure while serving request");
                return internal_error();
            }
        };
        info!(status = status.as_u16(), %message, "request failed");
        (status, Json(message)).into_response()
    }
}

/// The opaque 500 answer; details only go to the log.
pub fn internal_error() -> Response {
    let status = StatusCode::INTERNAL_SERVER_ERROR;
    let reason = status.canonical_reason().unwrap_or("Internal Server Error");
    (status, Json(reason)).into_response()
}

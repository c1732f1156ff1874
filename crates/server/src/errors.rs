use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::movie::MovieError;
use thiserror::Error;
use tracing::error;

/// JSON error body: `{"error": <title>, "message": <message>}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub message: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, message: Option<String>) -> Self {
        Self { status, title, message }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request", Some(message.into()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({"error": self.title, "message": self.message}))).into_response()
    }
}

impl From<MovieError> for JsonApiError {
    fn from(e: MovieError) -> Self {
        match e {
            MovieError::InvalidInput => JsonApiError::bad_request(e.to_string()),
            MovieError::Conflict => JsonApiError::new(StatusCode::CONFLICT, "Conflict", Some(e.to_string())),
            MovieError::NotFound(_) => JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(e.to_string())),
            MovieError::Repository(_) => {
                // store details stay in the log
                error!(code = e.code(), err = %e, "movie store failure");
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", None)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

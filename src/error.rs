use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Movie data file not found: {0}")]
    MissingDataFile(String),

    #[error("Malformed movie data: {0}")]
    MalformedDataFile(String),

    #[error("Movie '{0}' not found in database")]
    UnknownTitle(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Poster fetch failed: {0}")]
    PosterFetch(String),

    #[error("Poster API timed out: {0}")]
    NetworkTimeout(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Classifies a reqwest failure, keeping timeouts distinct from other transport errors
    pub fn from_request(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::NetworkTimeout(err.to_string())
        } else {
            AppError::HttpClient(err)
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::UnknownTitle(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::PosterFetch(msg) | AppError::NetworkTimeout(msg) => {
                (StatusCode::BAD_GATEWAY, msg)
            }
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::MissingDataFile(_)
            | AppError::MalformedDataFile(_)
            | AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

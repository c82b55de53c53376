// backend/src/error.rs

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Client mistakes caught before a job exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Input text is too short: {length} characters given, at least {minimum} required.")]
    InputTooShort { length: usize, minimum: usize },
    #[error("Language '{0}' not supported.")]
    UnsupportedLanguage(String),
    #[error("Unknown operation: {0}.")]
    UnknownOperation(String),
    #[error("Entity type '{0}' not supported.")]
    UnsupportedEntityType(String),
}

/// The queue or result store could not be reached or returned garbage.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("redis pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),
    #[error("redis error: {0}")]
    Redis(#[from] deadpool_redis::redis::RedisError),
    #[error("malformed job data: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("job queue is closed")]
    QueueClosed,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("Request body must be UTF-8 encoded text.")]
    InvalidBody,
    #[error(transparent)]
    BodyRejected(#[from] BytesRejection),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    code: u16,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidBody => StatusCode::BAD_REQUEST,
            ApiError::Backend(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::BodyRejected(rejection) => rejection.status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ApiError::Backend(e) => {
                tracing::error!("Job backend error: {}", e);
                "Job backend unavailable, try again later.".to_string()
            }
            other => other.to_string(),
        };
        let body = ErrorBody {
            message,
            code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = ApiError::from(ValidationError::UnsupportedLanguage("es".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Language 'es' not supported.");
    }

    #[test]
    fn backend_failures_are_server_side() {
        let err = ApiError::from(BackendError::QueueClosed);
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}

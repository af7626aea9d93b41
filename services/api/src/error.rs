//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use catalog::{OrderError, StoreError};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Unauthorized access
    #[error("Unauthorized")]
    Unauthorized,

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The request clashes with the current save workflow or a concurrent edit
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl From<OrderError> for ApiError {
    fn from(error: OrderError) -> Self {
        let message = error.to_string();
        match error {
            OrderError::Validation(_) | OrderError::NothingToSave => ApiError::BadRequest(message),
            OrderError::UnknownVideo(_) => ApiError::NotFound(message),
            OrderError::CommitInFlight
            | OrderError::ListBusy
            | OrderError::NoPendingConfirmation => ApiError::Conflict(message),
            OrderError::NotConfigured => ApiError::ServiceUnavailable(message),
            OrderError::Store(store) => match store {
                StoreError::NotFound(_) => ApiError::NotFound(message),
                StoreError::Conflict(_) => ApiError::Conflict(message),
                StoreError::Rejected(_) => ApiError::BadRequest(message),
                StoreError::NotConfigured | StoreError::Unavailable(_) => {
                    ApiError::ServiceUnavailable(message)
                }
                StoreError::Unsupported => ApiError::InternalServerError,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

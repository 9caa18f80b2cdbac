use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gallery_common::storage::StorageError;
use sea_orm::DbErr;

/// Application-level error type.
///
/// Responses carry a plain-text reason, which is what the camera firmware
/// and the gallery page expect.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    NotFound(String),
    /// Upload exceeds the configured blob size limit.
    PayloadTooLarge { limit: u64 },
    Internal(String),
}

impl AppError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::PayloadTooLarge { limit } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("upload exceeds maximum size of {limit} bytes"),
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".into(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.status_and_message().into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => AppError::NotFound(format!("{key} not found")),
            StorageError::InvalidKey(msg) => AppError::Validation(msg),
            StorageError::SizeLimitExceeded { limit, .. } => AppError::PayloadTooLarge { limit },
            other => AppError::Internal(other.to_string()),
        }
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{service}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E5xxx: Notification errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,
    NotFound,
    ServiceUnavailable,

    // Notification (E5xxx)
    NotificationNotFound,
    SettingsNotFound,
    SettingsAlreadyExist,
    InvalidNotificationType,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",
            Self::NotFound => "E0003",
            Self::ServiceUnavailable => "E0007",

            // Notification
            Self::NotificationNotFound => "E5001",
            Self::SettingsNotFound => "E5002",
            Self::SettingsAlreadyExist => "E5003",
            Self::InvalidNotificationType => "E5004",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::ValidationError | Self::InvalidNotificationType => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::NotificationNotFound | Self::SettingsNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::SettingsAlreadyExist => StatusCode::CONFLICT,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// The error code this error renders with, for callers that branch on it.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Known { code, .. } => *code,
            AppError::Internal(_) => ErrorCode::InternalError,
            AppError::Database(diesel::result::Error::NotFound) => ErrorCode::NotFound,
            AppError::Database(_) => ErrorCode::InternalError,
            AppError::Validation(_) => ErrorCode::ValidationError,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let body = match self {
            AppError::Known { message, details, .. } => {
                ApiErrorResponse::new(code, message).with_details(details)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                ApiErrorResponse::new(code, "internal server error")
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                let message = match code {
                    ErrorCode::NotFound => "resource not found",
                    _ => "database error",
                };
                ApiErrorResponse::new(code, message)
            }
            AppError::Validation(message) => ApiErrorResponse::new(code, message),
        };

        (code.status_code(), Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

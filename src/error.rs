use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unsupported delivery method: {0}")]
    UnsupportedMethod(String),

    #[error("Delivery channel not configured: {0}")]
    ChannelUnavailable(String),

    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("No pending code")]
    NoPendingCode,

    #[error("Code expired")]
    CodeExpired,

    #[error("Invalid code")]
    CodeMismatch,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                (
                    actix_web::http::StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::UnsupportedMethod(method) => {
                log::warn!("Unsupported delivery method: {method}");
                (
                    actix_web::http::StatusCode::BAD_REQUEST,
                    "UNSUPPORTED_METHOD",
                    format!("Unknown method: {method}"),
                )
            }
            AppError::ChannelUnavailable(msg) => {
                log::error!("Delivery channel not configured: {msg}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "CHANNEL_UNAVAILABLE",
                    msg.clone(),
                )
            }
            AppError::DeliveryFailed(msg) => {
                log::error!("Delivery failed: {msg}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "DELIVERY_FAILED",
                    "send failed".to_string(),
                )
            }
            AppError::NoPendingCode => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "NO_PENDING_CODE",
                "no pending code".to_string(),
            ),
            AppError::CodeExpired => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "CODE_EXPIRED",
                "code expired".to_string(),
            ),
            AppError::CodeMismatch => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "INVALID_CODE",
                "invalid code".to_string(),
            ),
            AppError::UserAlreadyExists => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "USER_EXISTS",
                "user already exists".to_string(),
            ),
            AppError::StorageError(msg) => {
                log::error!("Storage error: {msg}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_UNAVAILABLE",
                    "Storage unavailable".to_string(),
                )
            }
            _ => {
                log::error!("Internal error: {self}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message
            }
        }))
    }
}

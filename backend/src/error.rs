//! Error handling for the Kargo back-office
//!
//! Every error surfaces as the standard `{success: false, message}` envelope.
//! Token-expiry and token-signature failures are distinguished so expired
//! sessions get a different user-facing message from tampered tokens.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Missing access token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Activation / invite errors
    #[error("Invalid activation code")]
    InvalidActivationCode,

    #[error("Activation token expired")]
    ActivationExpired,

    #[error("Invalid activation token")]
    InvalidActivationToken,

    #[error("Invalid invite link")]
    InvalidInvite,

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Conflict errors (duplicate email/company/username), checked proactively
    #[error("{0}")]
    Conflict(String),

    #[error("{0} not found")]
    NotFound(String),

    // External service errors
    #[error("Chat directory error: {0}")]
    ChatDirectory(String),

    #[error("Mail delivery error: {0}")]
    Mail(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    Unexpected(#[from] anyhow::Error),
}

/// Error response body, the failure half of the response envelope
#[derive(Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

impl AppError {
    /// Status code plus the user-facing message.
    ///
    /// Database and internal errors are collapsed to a generic message so
    /// internals never leak to clients.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "Please login to access this resource".to_string(),
            ),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid route".to_string()),
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "Session expired, Please login!".to_string(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::BAD_REQUEST,
                "Username or password is invalid!".to_string(),
            ),
            AppError::InvalidActivationCode => (
                StatusCode::UNAUTHORIZED,
                "Invalid OTP, Please try again!".to_string(),
            ),
            AppError::ActivationExpired => (
                StatusCode::UNAUTHORIZED,
                "Activation token has expired".to_string(),
            ),
            AppError::InvalidActivationToken => {
                (StatusCode::UNAUTHORIZED, "Invalid user!".to_string())
            }
            AppError::InvalidInvite => {
                (StatusCode::NOT_FOUND, "Invalid Invite link.".to_string())
            }
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::Conflict(message) => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::NotFound(resource) => {
                (StatusCode::NOT_FOUND, format!("{} not found", resource))
            }
            AppError::ChatDirectory(message) => (
                StatusCode::BAD_GATEWAY,
                format!("Chat service error: {}", message),
            ),
            AppError::Mail(message) => (
                StatusCode::BAD_GATEWAY,
                format!("Mail service error: {}", message),
            ),
            AppError::Database(_) | AppError::Internal(_) | AppError::Unexpected(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {:?}", self);
        } else {
            tracing::debug!("request rejected: {:?}", self);
        }

        (
            status,
            Json(ErrorBody {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

/// Run `validator` checks on a request payload, surfacing the first failing
/// field's message as a 400.
pub fn validate_payload<T: validator::Validate>(payload: &T) -> AppResult<()> {
    payload.validate().map_err(|errors| {
        let message = first_validation_message(&errors)
            .unwrap_or_else(|| "Invalid request".to_string());
        AppError::Validation(message)
    })
}

fn first_validation_message(errors: &validator::ValidationErrors) -> Option<String> {
    use validator::ValidationErrorsKind;

    for kind in errors.errors().values() {
        match kind {
            ValidationErrorsKind::Field(errs) => {
                if let Some(message) = errs.iter().find_map(|e| e.message.as_ref()) {
                    return Some(message.to_string());
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                if let Some(message) = first_validation_message(nested) {
                    return Some(message);
                }
            }
            ValidationErrorsKind::List(map) => {
                for nested in map.values() {
                    if let Some(message) = first_validation_message(nested) {
                        return Some(message);
                    }
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_are_distinguishable() {
        let (expired_status, expired_msg) = AppError::TokenExpired.status_and_message();
        let (invalid_status, invalid_msg) = AppError::InvalidToken.status_and_message();
        assert_eq!(expired_status, StatusCode::UNAUTHORIZED);
        assert_eq!(invalid_status, StatusCode::UNAUTHORIZED);
        assert_ne!(expired_msg, invalid_msg);
    }

    #[test]
    fn internal_errors_do_not_leak() {
        let err = AppError::Internal("connection refused at 10.0.0.3".to_string());
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Internal Server Error");
    }

    #[test]
    fn activation_errors_are_distinguishable() {
        let (_, expired) = AppError::ActivationExpired.status_and_message();
        let (_, bad_code) = AppError::InvalidActivationCode.status_and_message();
        assert_ne!(expired, bad_code);
    }
}

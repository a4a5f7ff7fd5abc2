//! Error types for festa-rs.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Registration not found: {0}")]
    RegistrationNotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // === Registration Errors ===
    #[error("Invalid tier/pass selection: {0}")]
    InvalidSelection(String),

    #[error("A registration already exists for this contact")]
    DuplicateRegistration {
        /// Identifier of the conflicting registration, for user messaging.
        conflict: String,
    },

    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    #[error("Payment screenshot upload failed: {0}")]
    UploadFailed(String),

    #[error("Registration write was rolled back: {0}")]
    PartialWriteFailed(String),

    // === Admin Review Errors ===
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("A rejection reason is required")]
    MissingReason,

    #[error("Email template not found: {0}")]
    TemplateNotFound(String),

    // === Server Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::NotFound(_) | Self::RegistrationNotFound(_) | Self::UnknownEvent(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_)
            | Self::Validation(_)
            | Self::InvalidSelection(_)
            | Self::MissingReason => StatusCode::BAD_REQUEST,
            Self::Conflict(_)
            | Self::DuplicateRegistration { .. }
            | Self::InvalidStateTransition(_) => StatusCode::CONFLICT,

            // 5xx Server Errors
            Self::UploadFailed(_)
            | Self::PartialWriteFailed(_)
            | Self::TemplateNotFound(_)
            | Self::Database(_)
            | Self::Config(_)
            | Self::ExternalService(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::RegistrationNotFound(_) => "REGISTRATION_NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::InvalidSelection(_) => "INVALID_SELECTION",
            Self::DuplicateRegistration { .. } => "DUPLICATE_REGISTRATION",
            Self::UnknownEvent(_) => "UNKNOWN_EVENT",
            Self::UploadFailed(_) => "UPLOAD_FAILED",
            Self::PartialWriteFailed(_) => "PARTIAL_WRITE_FAILED",
            Self::InvalidStateTransition(_) => "INVALID_STATE_TRANSITION",
            Self::MissingReason => "MISSING_REASON",
            Self::TemplateNotFound(_) => "TEMPLATE_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Internal detail stays server-side; clients get the short message.
        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        let conflict = match &self {
            Self::DuplicateRegistration { conflict } => Some(conflict.clone()),
            _ => None,
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
                "conflict": conflict,
            }
        }));

        (status, body).into_response()
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

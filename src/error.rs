//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::AccrualError;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1002,
///     "message": "invalid amount: -5",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category                 | HTTP Status                      |
/// |-----------|--------------------------|----------------------------------|
/// | 1000–1999 | Validation               | 400 Bad Request                  |
/// | 2000–2999 | Auth / Conflict / Lookup | 401 / 404 / 409                  |
/// | 3000–3999 | Server                   | 500 Internal Server Error        |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Deposit or withdrawal amount is not a positive finite number.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Email address is empty or malformed.
    #[error("invalid email address")]
    InvalidEmail,

    /// Password does not meet the minimum length.
    #[error("password must be at least {min_len} characters")]
    WeakPassword {
        /// Required minimum length.
        min_len: usize,
    },

    /// Missing, malformed, or expired bearer token.
    #[error("unauthorized")]
    Unauthorized,

    /// Email/password pair did not match an account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("email already registered")]
    EmailTaken,

    /// Token subject no longer maps to an account.
    #[error("user not found: {0}")]
    UserNotFound(uuid::Uuid),

    /// Stored ledger data could not be turned into a balance.
    #[error("ledger data integrity error: {0}")]
    DataIntegrity(#[from] AccrualError),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidAmount(_) => 1002,
            Self::InvalidEmail => 1003,
            Self::WeakPassword { .. } => 1004,
            Self::Unauthorized => 2001,
            Self::InvalidCredentials => 2002,
            Self::EmailTaken => 2003,
            Self::UserNotFound(_) => 2004,
            Self::Internal(_) => 3000,
            Self::PersistenceError(_) => 3001,
            Self::DataIntegrity(_) => 3002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_)
            | Self::InvalidAmount(_)
            | Self::InvalidEmail
            | Self::WeakPassword { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::EmailTaken => StatusCode::CONFLICT,
            Self::UserNotFound(_) => StatusCode::NOT_FOUND,
            Self::DataIntegrity(_) | Self::PersistenceError(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

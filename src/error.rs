use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Application-wide error types with appropriate HTTP status codes.
///
/// # Client Errors
///
/// Guard failures are split into one variant per rejection reason so the
/// response body can name exactly the first check that failed:
///
/// - `Unauthorized` - credential check failed (401)
/// - `MissingQueryParameters`, `InvalidQueryDate` - query guard (422)
/// - `InvalidJsonPayload`, `InvalidDate`, `InvalidAmount` - body guard (422)
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized {
        /// Realm advertised in the `WWW-Authenticate` challenge
        realm: String,
    },

    #[error("Missing query parameters")]
    MissingQueryParameters,

    #[error("Invalid date format in query parameters")]
    InvalidQueryDate,

    #[error("Invalid JSON payload")]
    InvalidJsonPayload,

    #[error("Invalid 'date' format")]
    InvalidDate,

    #[error("Invalid 'amount' type")]
    InvalidAmount,

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    /// HTTP status code returned to the client for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::MissingQueryParameters
            | AppError::InvalidQueryDate
            | AppError::InvalidJsonPayload
            | AppError::InvalidDate
            | AppError::InvalidAmount => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Internal(_) | AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message placed in the `error` field.
    ///
    /// Internal variants never expose their details.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Internal(_) | AppError::ConfigError(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Message used for every 5xx response body.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Error response body for API endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Client errors are expected traffic; only server faults are errors
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = axum::Json(ErrorResponse::new(self.public_message()));

        match self {
            AppError::Unauthorized { realm } => {
                let challenge = HeaderValue::from_str(&format!("Basic realm=\"{realm}\""))
                    .unwrap_or_else(|_| HeaderValue::from_static("Basic"));
                (status, [(WWW_AUTHENTICATE, challenge)], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

//! API error type and its JSON body

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::DomainError;
use crate::infrastructure::services::BalanceError;

const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred.";

/// Error response body: `{"error": "...", "code": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: message.into(),
                code: None,
            },
        }
    }

    /// Add a machine-readable error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.code = Some(code.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    pub fn message(&self) -> &str {
        &self.response.error
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Validation { message }
            | DomainError::InvalidId { message }
            | DomainError::Conflict { message } => Self::bad_request(message),
            DomainError::Configuration { .. }
            | DomainError::Internal { .. }
            | DomainError::Storage { .. } => {
                error!(error = %err, "Request failed with an internal error");
                Self::internal(INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

impl From<BalanceError> for ApiError {
    fn from(err: BalanceError) -> Self {
        match &err {
            BalanceError::AddressRequired
            | BalanceError::NoStoredAddress
            | BalanceError::InvalidAddress
            | BalanceError::TokenAddressRequired
            | BalanceError::InvalidTokenQuery
            | BalanceError::AddressRejected(_) => Self::bad_request(err.to_string()),
            BalanceError::Unavailable => Self::unavailable(err.to_string()),
            BalanceError::QueryFailed { .. } => Self::internal(err.to_string()),
            BalanceError::Lookup(source) => {
                error!(error = %source, "Wallet address lookup failed");
                Self::internal(err.to_string())
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status.as_u16(), self.response.error)
    }
}

impl std::error::Error for ApiError {}

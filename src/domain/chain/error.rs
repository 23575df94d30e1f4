//! Chain client errors

use thiserror::Error;

/// JSON-RPC error code for rejected method parameters
pub const INVALID_PARAMS_CODE: i64 = -32602;

/// Why a chain handle was disabled at start-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisabledReason {
    /// No RPC URL configured
    NotConfigured,
    /// The configured URL could not be parsed
    InvalidUrl(String),
    /// The node did not answer the start-up probe
    Unreachable(String),
}

impl DisabledReason {
    /// Short machine-readable label
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotConfigured => "not_configured",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Unreachable(_) => "unreachable",
        }
    }
}

impl std::fmt::Display for DisabledReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "RPC URL is not configured"),
            Self::InvalidUrl(detail) => write!(f, "RPC URL is invalid: {}", detail),
            Self::Unreachable(detail) => write!(f, "RPC endpoint is unreachable: {}", detail),
        }
    }
}

/// Errors returned by chain clients
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ChainError {
    /// The handle is disabled; no call was attempted
    #[error("Blockchain connection not available: {0}")]
    Unavailable(DisabledReason),

    /// Network failure, timeout or unexpected HTTP status
    #[error("Transport error: {message}")]
    Transport { message: String, retryable: bool },

    /// The node answered with a JSON-RPC error object
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The node answered with something that is not the expected shape
    #[error("Malformed RPC response: {0}")]
    Decode(String),
}

impl ChainError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: true,
        }
    }

    pub fn fatal_transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: false,
        }
    }

    pub fn rpc(code: i64, message: impl Into<String>) -> Self {
        Self::Rpc {
            code,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Whether another attempt may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { retryable: true, .. })
    }

    /// Message of a parameter rejection by the node, if this is one
    pub fn invalid_params_message(&self) -> Option<&str> {
        match self {
            Self::Rpc { code, message } if *code == INVALID_PARAMS_CODE => Some(message),
            _ => None,
        }
    }

    /// Short label used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::Transport { .. } => "transport",
            Self::Rpc { .. } => "rpc",
            Self::Decode(_) => "decode",
        }
    }
}

/*
[INPUT]:  Error sources (credentials, grant exchange, transport, API status)
[OUTPUT]: Structured error types with the failure kind of each call
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or changing classification
*/

use serde_json::Value;
use thiserror::Error;

/// Main error type for the Korbit adapter
#[derive(Error, Debug)]
pub enum KorbitError {
    /// Client id or secret is empty; no request was sent
    #[error("Credentials are not set")]
    CredentialsMissing,

    /// Grant or refresh exchange was rejected or unreachable
    #[error("Failed to authorize: {warning}")]
    AuthorizationFailed { status: Option<u16>, warning: String },

    /// Public endpoint returned non-200 or could not be reached
    #[error("Public request failed: {warning}")]
    PublicRequestFailed { status: Option<u16>, warning: String },

    /// Private endpoint returned non-200 or could not be reached
    #[error("Transport error: {warning}")]
    Transport { status: Option<u16>, warning: String },

    /// Private endpoint answered 200 with a non-success `status`
    #[error("Application error: {status}")]
    Application { status: String, body: Value },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Request parameters cannot be encoded
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failure kinds a caller can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    CredentialsMissing,
    AuthorizationFailed,
    PublicRequestFailed,
    TransportError,
    ApplicationError,
    /// Raised before any request left the process
    Local,
}

impl KorbitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            KorbitError::CredentialsMissing => ErrorKind::CredentialsMissing,
            KorbitError::AuthorizationFailed { .. } => ErrorKind::AuthorizationFailed,
            KorbitError::PublicRequestFailed { .. } => ErrorKind::PublicRequestFailed,
            KorbitError::Transport { .. } => ErrorKind::TransportError,
            KorbitError::Application { .. } => ErrorKind::ApplicationError,
            KorbitError::Serialization(_)
            | KorbitError::InvalidParameter(_)
            | KorbitError::Config(_) => ErrorKind::Local,
        }
    }

    /// Server-provided text for the failure: the warning header, status
    /// text, or the business `status` value.
    pub fn message(&self) -> String {
        match self {
            KorbitError::AuthorizationFailed { warning, .. }
            | KorbitError::PublicRequestFailed { warning, .. }
            | KorbitError::Transport { warning, .. } => warning.clone(),
            KorbitError::Application { status, .. } => status.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status of the failed response, when one was received
    pub fn status_code(&self) -> Option<u16> {
        match self {
            KorbitError::AuthorizationFailed { status, .. }
            | KorbitError::PublicRequestFailed { status, .. }
            | KorbitError::Transport { status, .. } => *status,
            KorbitError::Application { .. } => Some(200),
            _ => None,
        }
    }

    /// Check if error indicates authentication failure
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            KorbitError::CredentialsMissing | KorbitError::AuthorizationFailed { .. }
        ) || matches!(self.status_code(), Some(401))
    }
}

/// Result type alias for Korbit operations
pub type Result<T> = std::result::Result<T, KorbitError>;

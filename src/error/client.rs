//! Unified client error type and result alias.

use std::fmt;

use super::auth::AuthError;
use super::network::NetworkError;
use super::validation::ValidationError;

/// Type alias for Results using [`ClientError`].
pub type ClientResult<T> = Result<T, ClientError>;

/// Unified error type consolidating all client error kinds.
///
/// Cloneable so a single failure can reject every caller queued on a shared
/// in-flight operation (refresh, cache re-fetch).
#[derive(Debug, Clone)]
pub enum ClientError {
    /// Authentication / session lifecycle error.
    Auth(AuthError),
    /// Transient network error; the caller decides whether to retry.
    Network(NetworkError),
    /// Field-level rejection from a write endpoint.
    Validation(ValidationError),
    /// A response body could not be decoded into its expected model.
    Decode { message: String },
}

impl ClientError {
    /// Check if this is the terminal session-expired kind.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ClientError::Auth(AuthError::SessionExpired))
    }

    /// Check if the caller may reasonably retry the operation.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Auth(err) => err.user_message(),
            ClientError::Network(err) => err.user_message(),
            ClientError::Validation(err) => err.user_message(),
            ClientError::Decode { .. } => {
                "The server returned an unexpected response.".to_string()
            }
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Auth(err) => write!(f, "{}", err),
            ClientError::Network(err) => write!(f, "{}", err),
            ClientError::Validation(err) => write!(f, "{}", err),
            ClientError::Decode { message } => write!(f, "Failed to decode response: {}", message),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Auth(err) => Some(err),
            ClientError::Network(err) => Some(err),
            ClientError::Validation(err) => Some(err),
            ClientError::Decode { .. } => None,
        }
    }
}

impl From<AuthError> for ClientError {
    fn from(err: AuthError) -> Self {
        ClientError::Auth(err)
    }
}

impl From<NetworkError> for ClientError {
    fn from(err: NetworkError) -> Self {
        ClientError::Network(err)
    }
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Validation(err)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode {
            message: err.to_string(),
        }
    }
}

//! Authentication-related error types.
//!
//! This module defines errors related to credential exchange, token refresh,
//! and session lifecycle.

use std::fmt;

/// Authentication-specific error variants.
#[derive(Debug, Clone)]
pub enum AuthError {
    /// Login was rejected by the server (wrong email/password).
    InvalidCredentials { message: String },

    /// No token pair is available (user never logged in, or logged out).
    NotAuthenticated,

    /// The session is terminally expired: refresh failed, timed out, or the
    /// retried call was rejected again. All in-flight work dependent on the
    /// session fails with this kind.
    SessionExpired,

    /// The refresh call itself failed.
    RefreshFailed { message: String },

    /// The refresh call exceeded its bounded wait.
    RefreshTimedOut { seconds: u64 },
}

impl AuthError {
    /// Check if this error requires the user to log in again.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            AuthError::SessionExpired
                | AuthError::NotAuthenticated
                | AuthError::RefreshFailed { .. }
                | AuthError::RefreshTimedOut { .. }
        )
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::InvalidCredentials { .. } => {
                "Invalid email or password. Please try again.".to_string()
            }
            AuthError::NotAuthenticated => {
                "You are not signed in. Please sign in to continue.".to_string()
            }
            AuthError::SessionExpired => {
                "Your session has expired. Please sign in again.".to_string()
            }
            AuthError::RefreshFailed { .. } => {
                "Your session could not be renewed. Please sign in again.".to_string()
            }
            AuthError::RefreshTimedOut { .. } => {
                "Your session could not be renewed in time. Please sign in again.".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials { .. } => "E_AUTH_INVALID",
            AuthError::NotAuthenticated => "E_AUTH_NOT_AUTH",
            AuthError::SessionExpired => "E_AUTH_SESSION_EXP",
            AuthError::RefreshFailed { .. } => "E_AUTH_REFRESH_FAIL",
            AuthError::RefreshTimedOut { .. } => "E_AUTH_REFRESH_TIMEOUT",
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials { message } => {
                write!(f, "Invalid credentials: {}", message)
            }
            AuthError::NotAuthenticated => write!(f, "Not authenticated"),
            AuthError::SessionExpired => write!(f, "Session expired"),
            AuthError::RefreshFailed { message } => {
                write!(f, "Token refresh failed: {}", message)
            }
            AuthError::RefreshTimedOut { seconds } => {
                write!(f, "Token refresh timed out after {}s", seconds)
            }
        }
    }
}

impl std::error::Error for AuthError {}

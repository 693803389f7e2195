//! Network-related error types.
//!
//! This module defines errors that occur during network operations and the
//! classification from transport-level [`HttpError`]s.

use std::fmt;

use crate::traits::HttpError;

/// Network-specific error variants.
///
/// These are transient, caller-visible failures: the session is unaffected
/// and the caller decides whether to retry.
#[derive(Debug, Clone)]
pub enum NetworkError {
    /// Connection to the server failed.
    ConnectionFailed { operation: String, message: String },

    /// Request timed out. The bound is absent when the transport timed out
    /// on its own rather than against a configured limit.
    Timeout {
        operation: String,
        seconds: Option<u64>,
    },

    /// HTTP status error (non-2xx response not handled elsewhere).
    HttpStatus { status: u16, message: String },

    /// Response body could not be interpreted.
    InvalidResponse { message: String },

    /// Generic network error.
    Other { message: String },
}

impl NetworkError {
    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::ConnectionFailed { .. } => true,
            NetworkError::Timeout { .. } => true,
            NetworkError::HttpStatus { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            NetworkError::InvalidResponse { .. } => false,
            NetworkError::Other { .. } => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::ConnectionFailed { .. } => {
                "Unable to connect to the server. Please check your internet connection."
                    .to_string()
            }
            NetworkError::Timeout { operation, seconds } => match seconds {
                Some(seconds) => format!(
                    "The {} operation timed out after {} seconds. The server may be slow or unreachable.",
                    operation, seconds
                ),
                None => format!(
                    "The {} operation timed out. The server may be slow or unreachable.",
                    operation
                ),
            },
            NetworkError::HttpStatus { status, .. } => match *status {
                400 => "The request was invalid. Please try again.".to_string(),
                403 => "Access denied. You don't have permission for this action.".to_string(),
                404 => "The requested resource was not found.".to_string(),
                429 => "Too many requests. Please wait a moment and try again.".to_string(),
                500..=599 => {
                    "The server is experiencing issues. Please try again later.".to_string()
                }
                _ => format!("The server returned an error (HTTP {}).", status),
            },
            NetworkError::InvalidResponse { .. } => {
                "The server returned an unexpected response.".to_string()
            }
            NetworkError::Other { .. } => {
                "A network error occurred. Please try again.".to_string()
            }
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::ConnectionFailed { operation, message } => {
                write!(f, "Connection failed during {}: {}", operation, message)
            }
            NetworkError::Timeout { operation, seconds } => match seconds {
                Some(seconds) => write!(f, "{} timed out after {}s", operation, seconds),
                None => write!(f, "{} timed out", operation),
            },
            NetworkError::HttpStatus { status, message } => {
                write!(f, "HTTP {} error: {}", status, message)
            }
            NetworkError::InvalidResponse { message } => {
                write!(f, "Invalid response: {}", message)
            }
            NetworkError::Other { message } => write!(f, "Network error: {}", message),
        }
    }
}

impl std::error::Error for NetworkError {}

/// Classify a transport-level [`HttpError`] into a [`NetworkError`].
///
/// `operation` names the logical call for error messages and logs.
pub fn classify_http_error(err: HttpError, operation: &str) -> NetworkError {
    match err {
        HttpError::ConnectionFailed(message) => NetworkError::ConnectionFailed {
            operation: operation.to_string(),
            message,
        },
        HttpError::Timeout(_) => NetworkError::Timeout {
            operation: operation.to_string(),
            seconds: None,
        },
        HttpError::Cancelled => NetworkError::Other {
            message: format!("{} was cancelled", operation),
        },
        HttpError::Io(message) | HttpError::Other(message) => NetworkError::Other { message },
        HttpError::InvalidUrl(message) => NetworkError::InvalidResponse {
            message: format!("invalid URL: {}", message),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_failed_is_retryable() {
        let err = NetworkError::ConnectionFailed {
            operation: "list jobs".to_string(),
            message: "refused".to_string(),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn test_timeout_is_retryable() {
        let err = NetworkError::Timeout {
            operation: "refresh".to_string(),
            seconds: Some(10),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn test_timeout_messages_with_and_without_bound() {
        let bounded = NetworkError::Timeout {
            operation: "fetch jobs".to_string(),
            seconds: Some(10),
        };
        assert!(bounded.user_message().contains("after 10 seconds"));
        assert!(bounded.to_string().contains("after 10s"));

        let unbounded = NetworkError::Timeout {
            operation: "fetch jobs".to_string(),
            seconds: None,
        };
        assert!(!unbounded.user_message().contains("0 second"));
        assert_eq!(unbounded.to_string(), "fetch jobs timed out");
    }

    #[test]
    fn test_http_status_retryability() {
        let server = NetworkError::HttpStatus {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert!(server.is_retryable());

        let rate_limited = NetworkError::HttpStatus {
            status: 429,
            message: "slow down".to_string(),
        };
        assert!(rate_limited.is_retryable());

        let not_found = NetworkError::HttpStatus {
            status: 404,
            message: "missing".to_string(),
        };
        assert!(!not_found.is_retryable());
    }

    #[test]
    fn test_invalid_response_not_retryable() {
        let err = NetworkError::InvalidResponse {
            message: "truncated".to_string(),
        };
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_classify_http_error() {
        let err = classify_http_error(
            HttpError::ConnectionFailed("refused".to_string()),
            "fetch jobs",
        );
        assert!(matches!(err, NetworkError::ConnectionFailed { .. }));

        let err = classify_http_error(HttpError::Timeout("elapsed".to_string()), "fetch jobs");
        assert!(matches!(err, NetworkError::Timeout { seconds: None, .. }));

        let err = classify_http_error(HttpError::Other("boom".to_string()), "fetch jobs");
        assert!(matches!(err, NetworkError::Other { .. }));
    }

    #[test]
    fn test_user_message_status_codes() {
        let err = NetworkError::HttpStatus {
            status: 500,
            message: "oops".to_string(),
        };
        assert!(err.user_message().contains("server"));

        let err = NetworkError::HttpStatus {
            status: 404,
            message: "missing".to_string(),
        };
        assert!(err.user_message().contains("not found"));
    }
}

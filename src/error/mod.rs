//! Unified error handling architecture for the JobTrack client.
//!
//! This module provides the crate's error system:
//!
//! - **Domain-specific errors**: Auth, Network, and Validation errors
//! - **Unified error type**: [`ClientError`] consolidates all error kinds
//! - **Result type alias**: [`ClientResult<T>`] for consistent return types
//!
//! # Propagation policy
//!
//! Authentication failures are handled centrally by the request pipeline and
//! session store; they surface to page code only as
//! [`AuthError::SessionExpired`], never as raw network errors. All other
//! errors propagate to the caller for local, page-specific display:
//!
//! | Kind | Scope | Recovery |
//! |------|-------|----------|
//! | `InvalidCredentials` | local | inline error, session stays anonymous |
//! | `Validation` | local | per-field display, session unaffected |
//! | `Network` | local | caller may retry |
//! | `SessionExpired` | global | token clear + redirect to login |

mod auth;
mod client;
mod network;
mod validation;

pub use auth::AuthError;
pub use client::{ClientError, ClientResult};
pub use network::{classify_http_error, NetworkError};
pub use validation::ValidationError;

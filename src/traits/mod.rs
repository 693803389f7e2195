//! Trait abstractions for dependency injection and testability.
//!
//! This module provides trait-based abstractions for the crate's side-effect
//! boundaries, enabling dependency injection, mocking, and better testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST, PATCH, DELETE)
//! - [`TokenStorage`] - Durable token pair storage
//! - [`SignalMirror`] - Edge-gate signal (cookie analogue) mirroring
//! - [`Navigator`] - Forced navigation on session expiry / logout

pub mod http;
pub mod navigator;
pub mod signal;
pub mod tokens;

pub use http::{Headers, HttpClient, HttpError, Response};
pub use navigator::Navigator;
pub use signal::SignalMirror;
pub use tokens::{StorageError, TokenStorage};

//! Adapter implementations of the core traits.
//!
//! Production adapters:
//! - [`ReqwestHttpClient`] - reqwest-based HTTP client
//! - [`FileTokenStorage`] - token pair persistence under `~/.jobtrack/`
//! - [`FileSignalMirror`] - file-marker edge signal (cookie analogue)
//!
//! The [`mock`] module provides configurable test doubles.

pub mod file_signal;
pub mod file_tokens;
pub mod mock;
pub mod reqwest_http;

pub use file_signal::FileSignalMirror;
pub use file_tokens::FileTokenStorage;
pub use reqwest_http::ReqwestHttpClient;

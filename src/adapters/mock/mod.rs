//! Mock adapters for testing.
//!
//! Configurable test doubles for the core traits, used by unit and
//! integration tests to exercise the pipeline, session, and cache without
//! network or filesystem access.

pub mod http;
pub mod navigator;
pub mod tokens;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use navigator::RecordingNavigator;
pub use tokens::{InMemorySignalMirror, InMemoryTokenStorage};

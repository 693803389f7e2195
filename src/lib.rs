//! JobTrack client core - the session, pipeline, and cache engine behind the
//! job-application dashboard.
//!
//! This library exposes modules for use by UI hosts and integration tests.

pub mod adapters;
pub mod api;
pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod routing;
pub mod traits;

pub use client::JobtrackClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};

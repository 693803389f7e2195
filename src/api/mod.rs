//! API clients over the authenticated request pipeline.

pub mod analytics;
pub mod auth;
pub mod jobs;
pub mod pipeline;

pub use analytics::AnalyticsApi;
pub use auth::{AuthApi, RegisterRequest};
pub use jobs::JobsApi;
pub use pipeline::{Method, RequestPipeline};

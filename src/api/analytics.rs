//! Dashboard analytics endpoint.

use std::sync::Arc;

use crate::api::pipeline::{Method, RequestPipeline};
use crate::error::ClientResult;
use crate::models::DashboardAnalytics;

const DASHBOARD_PATH: &str = "/analytics/dashboard/";

/// Client for the analytics endpoints.
pub struct AnalyticsApi {
    pipeline: Arc<RequestPipeline>,
}

impl AnalyticsApi {
    pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self { pipeline }
    }

    /// Fetch the dashboard aggregate.
    ///
    /// GET /analytics/dashboard/
    pub async fn dashboard(&self) -> ClientResult<DashboardAnalytics> {
        let response = self
            .pipeline
            .execute("fetch dashboard", Method::Get, DASHBOARD_PATH, None)
            .await?;
        RequestPipeline::decode(&response)
    }
}

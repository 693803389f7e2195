//! Job application endpoints.

use std::sync::Arc;
use tracing::debug;

use crate::api::pipeline::{Method, RequestPipeline};
use crate::error::ClientResult;
use crate::models::{JobApplication, JobPatch, NewJobApplication};

const JOBS_PATH: &str = "/jobs/";

/// Client for the job application endpoints. All calls are session-bound.
pub struct JobsApi {
    pipeline: Arc<RequestPipeline>,
}

impl JobsApi {
    pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self { pipeline }
    }

    /// List all job applications.
    ///
    /// GET /jobs/
    pub async fn list(&self) -> ClientResult<Vec<JobApplication>> {
        let response = self
            .pipeline
            .execute("fetch jobs", Method::Get, JOBS_PATH, None)
            .await?;
        RequestPipeline::decode(&response)
    }

    /// Fetch a single job application.
    ///
    /// GET /jobs/{id}/
    pub async fn get(&self, id: u64) -> ClientResult<JobApplication> {
        let path = format!("{}{}/", JOBS_PATH, id);
        let response = self
            .pipeline
            .execute("fetch job", Method::Get, &path, None)
            .await?;
        RequestPipeline::decode(&response)
    }

    /// Create a job application.
    ///
    /// POST /jobs/
    pub async fn create(&self, job: &NewJobApplication) -> ClientResult<JobApplication> {
        let body = serde_json::to_string(job)?;
        let response = self
            .pipeline
            .execute("create job", Method::Post, JOBS_PATH, Some(body))
            .await?;
        let created: JobApplication = RequestPipeline::decode(&response)?;
        debug!("created job {}", created.id);
        Ok(created)
    }

    /// Apply a partial update to a job application.
    ///
    /// PATCH /jobs/{id}/
    pub async fn update(&self, id: u64, patch: &JobPatch) -> ClientResult<JobApplication> {
        let path = format!("{}{}/", JOBS_PATH, id);
        let body = serde_json::to_string(patch)?;
        let response = self
            .pipeline
            .execute("update job", Method::Patch, &path, Some(body))
            .await?;
        RequestPipeline::decode(&response)
    }

    /// Delete a job application.
    ///
    /// DELETE /jobs/{id}/
    pub async fn delete(&self, id: u64) -> ClientResult<()> {
        let path = format!("{}{}/", JOBS_PATH, id);
        self.pipeline
            .execute("delete job", Method::Delete, &path, None)
            .await?;
        Ok(())
    }
}

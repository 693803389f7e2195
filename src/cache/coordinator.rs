//! Read-through queries and write-path invalidation.
//!
//! [`MutationCoordinator`] is the one place job writes go through. Every
//! successful write invalidates the job list, the touched job's detail
//! entry, and the dashboard aggregate, so no consumer ever composes a view
//! from a mix of pre- and post-write data.

use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::api::{AnalyticsApi, JobsApi};
use crate::cache::{CacheKey, QueryCache};
use crate::error::{ClientError, ClientResult};
use crate::models::{DashboardAnalytics, JobApplication, JobPatch, NewJobApplication};

/// A completed job write, carrying the id it touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobMutation {
    Created(u64),
    Updated(u64),
    Deleted(u64),
}

impl JobMutation {
    /// The cache keys a mutation makes stale.
    pub fn invalidations(&self) -> [CacheKey; 3] {
        let id = match self {
            JobMutation::Created(id) | JobMutation::Updated(id) | JobMutation::Deleted(id) => *id,
        };
        [
            CacheKey::JobsList,
            CacheKey::JobDetail(id),
            CacheKey::DashboardAnalytics,
        ]
    }
}

/// Couples the job and analytics APIs to the query cache.
pub struct MutationCoordinator {
    jobs: Arc<JobsApi>,
    analytics: Arc<AnalyticsApi>,
    cache: QueryCache,
}

impl MutationCoordinator {
    pub fn new(jobs: Arc<JobsApi>, analytics: Arc<AnalyticsApi>, cache: QueryCache) -> Self {
        Self {
            jobs,
            analytics,
            cache,
        }
    }

    /// The underlying cache, for subscribers that want to peek or clear.
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Read the job list, cached.
    pub async fn jobs_list(&self) -> ClientResult<Vec<JobApplication>> {
        let jobs = Arc::clone(&self.jobs);
        let value = self
            .cache
            .get_or_fetch(CacheKey::JobsList, move || async move {
                let list = jobs.list().await?;
                serde_json::to_value(list).map_err(ClientError::from)
            })
            .await?;
        decode(value)
    }

    /// Read one job, cached per id.
    pub async fn job_detail(&self, id: u64) -> ClientResult<JobApplication> {
        let jobs = Arc::clone(&self.jobs);
        let value = self
            .cache
            .get_or_fetch(CacheKey::JobDetail(id), move || async move {
                let job = jobs.get(id).await?;
                serde_json::to_value(job).map_err(ClientError::from)
            })
            .await?;
        decode(value)
    }

    /// Read the dashboard aggregate, cached.
    pub async fn dashboard(&self) -> ClientResult<DashboardAnalytics> {
        let analytics = Arc::clone(&self.analytics);
        let value = self
            .cache
            .get_or_fetch(CacheKey::DashboardAnalytics, move || async move {
                let dashboard = analytics.dashboard().await?;
                serde_json::to_value(dashboard).map_err(ClientError::from)
            })
            .await?;
        decode(value)
    }

    /// Create a job and invalidate everything it touches.
    pub async fn create_job(&self, job: &NewJobApplication) -> ClientResult<JobApplication> {
        let created = self.jobs.create(job).await?;
        self.apply(JobMutation::Created(created.id));
        Ok(created)
    }

    /// Update a job and invalidate everything it touches.
    pub async fn update_job(&self, id: u64, patch: &JobPatch) -> ClientResult<JobApplication> {
        let updated = self.jobs.update(id, patch).await?;
        self.apply(JobMutation::Updated(id));
        Ok(updated)
    }

    /// Delete a job and invalidate everything it touches.
    pub async fn delete_job(&self, id: u64) -> ClientResult<()> {
        self.jobs.delete(id).await?;
        self.apply(JobMutation::Deleted(id));
        Ok(())
    }

    /// Invalidate the cache keys a mutation makes stale.
    pub fn apply(&self, mutation: JobMutation) {
        info!("applying {:?}", mutation);
        for key in mutation.invalidations() {
            self.cache.invalidate(&key);
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> ClientResult<T> {
    serde_json::from_value(value).map_err(ClientError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{
        InMemorySignalMirror, InMemoryTokenStorage, MockHttpClient, MockResponse,
    };
    use crate::api::RequestPipeline;
    use crate::auth::{TokenPair, TokenStore};
    use crate::config::ClientConfig;
    use crate::models::JobStatus;
    use crate::traits::Response;
    use bytes::Bytes;

    const JOB_BODY: &str = r#"{
        "id": 3,
        "company_name": "Initech",
        "job_title": "Software Engineer",
        "status": "applied"
    }"#;

    async fn coordinator_with(http: MockHttpClient) -> MutationCoordinator {
        let tokens = Arc::new(TokenStore::new(
            Arc::new(InMemoryTokenStorage::new()),
            Arc::new(InMemorySignalMirror::new()),
        ));
        tokens
            .set(TokenPair {
                access: "acc".to_string(),
                refresh: "ref".to_string(),
                access_expires_at: chrono::Utc::now().timestamp() + 300,
            })
            .await;
        let config = ClientConfig::new("http://localhost:8000/api").unwrap();
        let pipeline = Arc::new(RequestPipeline::new(Arc::new(http), tokens, config));
        MutationCoordinator::new(
            Arc::new(JobsApi::new(pipeline.clone())),
            Arc::new(AnalyticsApi::new(pipeline)),
            QueryCache::new(),
        )
    }

    fn json(status: u16, body: &str) -> MockResponse {
        MockResponse::Success(Response::new(status, Bytes::from(body.to_string())))
    }

    #[test]
    fn test_mutation_invalidations_cover_list_detail_dashboard() {
        let keys = JobMutation::Updated(5).invalidations();
        assert!(keys.contains(&CacheKey::JobsList));
        assert!(keys.contains(&CacheKey::JobDetail(5)));
        assert!(keys.contains(&CacheKey::DashboardAnalytics));
    }

    #[tokio::test]
    async fn test_jobs_list_is_cached_between_reads() {
        let http = MockHttpClient::new();
        http.set_response("/jobs/", json(200, &format!("[{}]", JOB_BODY)));
        let coordinator = coordinator_with(http.clone()).await;

        coordinator.jobs_list().await.unwrap();
        coordinator.jobs_list().await.unwrap();
        assert_eq!(http.requests_to("/jobs/").len(), 1);
    }

    #[tokio::test]
    async fn test_update_invalidates_list_and_refetches() {
        let http = MockHttpClient::new();
        http.set_response("/jobs/", json(200, &format!("[{}]", JOB_BODY)));
        http.set_response("/jobs/3/", json(200, JOB_BODY));
        let coordinator = coordinator_with(http.clone()).await;

        coordinator.jobs_list().await.unwrap();
        coordinator
            .update_job(3, &JobPatch::status(JobStatus::Interview))
            .await
            .unwrap();
        coordinator.jobs_list().await.unwrap();

        // One fetch before the write, one after invalidation.
        assert_eq!(
            http.requests_to("/jobs/")
                .iter()
                .filter(|r| r.method == "GET")
                .count(),
            2
        );
    }

    #[tokio::test]
    async fn test_delete_invalidates_dashboard() {
        let http = MockHttpClient::new();
        http.set_response("/jobs/3/", json(204, ""));
        http.set_response(
            "/analytics/dashboard/",
            json(
                200,
                r#"{"total_applications": 1, "by_status": []}"#,
            ),
        );
        let coordinator = coordinator_with(http.clone()).await;

        coordinator.dashboard().await.unwrap();
        coordinator.delete_job(3).await.unwrap();
        coordinator.dashboard().await.unwrap();

        assert_eq!(http.requests_to("/analytics/dashboard/").len(), 2);
    }

    #[tokio::test]
    async fn test_create_returns_created_job() {
        let http = MockHttpClient::new();
        http.set_response("/jobs/", json(201, JOB_BODY));
        let coordinator = coordinator_with(http).await;

        let created = coordinator
            .create_job(&NewJobApplication {
                company_name: "Initech".to_string(),
                job_title: "Software Engineer".to_string(),
                status: Some(JobStatus::Applied),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(created.id, 3);
        assert!(!coordinator.cache().is_fresh(&CacheKey::JobsList));
    }
}

//! Top-level client wiring.
//!
//! [`JobtrackClient`] assembles the token store, request pipeline, API
//! surfaces, query cache, and session store over injected adapters, and runs
//! the background task that turns pipeline expiry broadcasts into session
//! teardown.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::{AnalyticsApi, AuthApi, JobsApi, RequestPipeline};
use crate::auth::{SessionStore, TokenStore};
use crate::cache::{MutationCoordinator, QueryCache};
use crate::config::ClientConfig;
use crate::routing::{self, GateDecision};
use crate::traits::{HttpClient, Navigator, SignalMirror, TokenStorage};

/// The assembled client.
pub struct JobtrackClient {
    session: Arc<SessionStore>,
    coordinator: Arc<MutationCoordinator>,
    auth: Arc<AuthApi>,
    mirror: Arc<dyn SignalMirror>,
    expiry_watcher: JoinHandle<()>,
}

impl JobtrackClient {
    /// Wire up a client over the given adapters and start the expiry
    /// watcher.
    pub fn new(
        config: ClientConfig,
        http: Arc<dyn HttpClient>,
        storage: Arc<dyn TokenStorage>,
        mirror: Arc<dyn SignalMirror>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let tokens = Arc::new(TokenStore::new(storage, mirror.clone()));
        let pipeline = Arc::new(RequestPipeline::new(http, tokens.clone(), config));
        let auth = Arc::new(AuthApi::new(pipeline.clone()));
        let jobs = Arc::new(JobsApi::new(pipeline.clone()));
        let analytics = Arc::new(AnalyticsApi::new(pipeline.clone()));
        let cache = QueryCache::new();
        let coordinator = Arc::new(MutationCoordinator::new(jobs, analytics, cache.clone()));
        let session = Arc::new(SessionStore::new(
            tokens,
            auth.clone(),
            cache,
            navigator,
        ));

        let expiry_watcher = {
            let session = session.clone();
            let mut rx = pipeline.subscribe_expiry();
            tokio::spawn(async move {
                while rx.changed().await.is_ok() {
                    debug!("expiry broadcast received");
                    session.handle_expired().await;
                }
            })
        };

        Self {
            session,
            coordinator,
            auth,
            mirror,
            expiry_watcher,
        }
    }

    /// Restore a persisted session, if any. Call once at startup.
    pub async fn init(&self) {
        if let Err(err) = self.session.restore().await {
            debug!("no session restored: {}", err);
        }
    }

    /// Session state and login/logout flows.
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Cached reads and invalidating writes for jobs and analytics.
    pub fn coordinator(&self) -> &Arc<MutationCoordinator> {
        &self.coordinator
    }

    /// Account endpoints (registration).
    pub fn auth(&self) -> &Arc<AuthApi> {
        &self.auth
    }

    /// Evaluate the route gate for a path against the current edge signal.
    pub fn route_decision(&self, path: &str) -> GateDecision {
        routing::evaluate(path, self.mirror.is_present())
    }

    /// Stop the expiry watcher.
    pub fn shutdown(&self) {
        self.expiry_watcher.abort();
    }
}

impl Drop for JobtrackClient {
    fn drop(&mut self) {
        self.expiry_watcher.abort();
    }
}

//! Generation-counted query cache with request deduplication.
//!
//! Each cached query key carries a generation counter. Reads serve the
//! cached value only while its generation matches the key's current one;
//! invalidation bumps the generation without dropping the stale value, so
//! callers that want it can still show it while a re-fetch runs.
//!
//! Concurrent reads of the same key share one in-flight fetch. A fetch that
//! completes after its key was invalidated returns its result to the callers
//! that awaited it but never overwrites the cache.

mod coordinator;

pub use coordinator::{JobMutation, MutationCoordinator};

use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Identity of a cached query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The full job application list.
    JobsList,
    /// A single job application.
    JobDetail(u64),
    /// The dashboard aggregate.
    DashboardAnalytics,
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::JobsList => write!(f, "jobs-list"),
            CacheKey::JobDetail(id) => write!(f, "job-detail:{}", id),
            CacheKey::DashboardAnalytics => write!(f, "dashboard-analytics"),
        }
    }
}

type SharedFetch = Shared<BoxFuture<'static, Result<Value, ClientError>>>;

#[derive(Default)]
struct Entry {
    /// Current generation of the key. Bumped on invalidation.
    generation: u64,
    /// Last stored value, possibly stale.
    value: Option<Value>,
    /// Generation the stored value belongs to.
    value_generation: u64,
    /// In-flight fetch tagged with the generation it was started under.
    inflight: Option<(u64, SharedFetch)>,
}

/// The query cache. Cheap to clone; clones share state.
#[derive(Clone, Default)]
pub struct QueryCache {
    entries: Arc<Mutex<HashMap<CacheKey, Entry>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a fresh cached value, join an in-flight fetch, or start a new
    /// one via `fetch`.
    pub async fn get_or_fetch<F, Fut>(&self, key: CacheKey, fetch: F) -> ClientResult<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<Value>> + Send + 'static,
    {
        let fut = {
            let mut entries = self.entries.lock().unwrap();
            let entry = entries.entry(key.clone()).or_default();

            if entry.value_generation == entry.generation {
                if let Some(value) = &entry.value {
                    return Ok(value.clone());
                }
            }

            match &entry.inflight {
                Some((gen, fut)) if *gen == entry.generation => fut.clone(),
                _ => {
                    let generation = entry.generation;
                    let store = Arc::clone(&self.entries);
                    let store_key = key.clone();
                    let fetch_fut = fetch();
                    let shared = async move {
                        let result = fetch_fut.await;
                        let mut entries = store.lock().unwrap();
                        if let Some(entry) = entries.get_mut(&store_key) {
                            if let Ok(value) = &result {
                                if entry.generation == generation {
                                    entry.value = Some(value.clone());
                                    entry.value_generation = generation;
                                } else {
                                    debug!(
                                        "discarding stale fetch result for {}",
                                        store_key
                                    );
                                }
                            }
                            if matches!(&entry.inflight, Some((g, _)) if *g == generation) {
                                entry.inflight = None;
                            }
                        }
                        result
                    }
                    .boxed()
                    .shared();
                    entry.inflight = Some((generation, shared.clone()));
                    shared
                }
            }
        };

        fut.await
    }

    /// Mark a key stale. The old value stays readable through [`peek`] until
    /// a re-fetch replaces it.
    ///
    /// [`peek`]: QueryCache::peek
    pub fn invalidate(&self, key: &CacheKey) {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries.entry(key.clone()).or_default();
        entry.generation += 1;
        debug!("invalidated {}", key);
    }

    /// Read the stored value for a key, fresh or stale, without fetching.
    pub fn peek(&self, key: &CacheKey) -> Option<Value> {
        let entries = self.entries.lock().unwrap();
        entries.get(key).and_then(|e| e.value.clone())
    }

    /// Check whether the stored value for a key is current.
    pub fn is_fresh(&self, key: &CacheKey) -> bool {
        let entries = self.entries.lock().unwrap();
        entries
            .get(key)
            .map(|e| e.value.is_some() && e.value_generation == e.generation)
            .unwrap_or(false)
    }

    /// Drop everything. Used on logout so no per-user data survives into the
    /// next session.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

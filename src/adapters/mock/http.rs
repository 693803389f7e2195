//! Mock HTTP client for testing.
//!
//! Provides a configurable mock HTTP client that can return predefined
//! responses, response sequences, or handler-computed responses, with
//! optional per-URL latency to open concurrency windows in tests.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::traits::{Headers, HttpClient, HttpError, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body (for POST/PATCH requests)
    pub body: Option<String>,
}

impl RecordedRequest {
    /// Get the bearer token from the Authorization header, if any.
    pub fn bearer_token(&self) -> Option<&str> {
        self.headers
            .get("Authorization")
            .and_then(|v| v.strip_prefix("Bearer "))
    }
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a successful (or any fixed-status) response
    Success(Response),
    /// Return a transport error
    Error(HttpError),
}

type Handler = Arc<dyn Fn(&RecordedRequest) -> MockResponse + Send + Sync>;

/// Mock HTTP client for testing.
///
/// Responses are resolved per URL (exact match first, then path-suffix
/// match, so `/jobs/` never shadows `/jobs/3/`) in
/// this order: handler, queued sequence, default. Sequences pop front until
/// one response remains, which then sticks. An optional per-URL delay is
/// awaited before resolving, so tests can hold several calls in flight at
/// once.
///
/// # Example
///
/// ```ignore
/// let client = MockHttpClient::new();
/// client.set_response(
///     "/jobs/",
///     MockResponse::Success(Response::new(200, Bytes::from("[]"))),
/// );
/// let response = client.get("http://api/jobs/", &Headers::new()).await?;
/// assert_eq!(client.requests_to("/jobs/").len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, VecDeque<MockResponse>>>>,
    handlers: Arc<Mutex<HashMap<String, Handler>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a sticky response for a URL pattern.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        self.set_response_sequence(url, vec![response]);
    }

    /// Set a response sequence for a URL pattern.
    ///
    /// Responses pop in order; the last one sticks for further requests.
    pub fn set_response_sequence(&self, url: &str, responses: Vec<MockResponse>) {
        let mut map = self.responses.lock().unwrap();
        map.insert(url.to_string(), responses.into());
    }

    /// Set a handler computing the response from the recorded request.
    ///
    /// Handlers take priority over queued responses for the same pattern.
    pub fn set_handler<F>(&self, url: &str, handler: F)
    where
        F: Fn(&RecordedRequest) -> MockResponse + Send + Sync + 'static,
    {
        let mut map = self.handlers.lock().unwrap();
        map.insert(url.to_string(), Arc::new(handler));
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        *self.default_response.lock().unwrap() = Some(response);
    }

    /// Delay every request to a URL pattern, opening a concurrency window.
    pub fn set_delay(&self, url: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(url.to_string(), delay);
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Get recorded requests whose URL contains the given fragment.
    pub fn requests_to(&self, fragment: &str) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.contains(fragment))
            .cloned()
            .collect()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    fn record(&self, method: &str, url: &str, headers: &Headers, body: Option<String>) -> RecordedRequest {
        let request = RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
        };
        self.requests.lock().unwrap().push(request.clone());
        request
    }

    fn matching_delay(&self, url: &str) -> Option<Duration> {
        let delays = self.delays.lock().unwrap();
        if let Some(d) = delays.get(url) {
            return Some(*d);
        }
        delays
            .iter()
            .find(|(pattern, _)| url.ends_with(pattern.as_str()))
            .map(|(_, d)| *d)
    }

    fn resolve(&self, request: &RecordedRequest) -> Option<MockResponse> {
        {
            let handlers = self.handlers.lock().unwrap();
            let handler = handlers.get(&request.url).cloned().or_else(|| {
                handlers
                    .iter()
                    .find(|(pattern, _)| request.url.ends_with(pattern.as_str()))
                    .map(|(_, h)| h.clone())
            });
            if let Some(handler) = handler {
                return Some(handler(request));
            }
        }

        {
            let mut responses = self.responses.lock().unwrap();
            let key = if responses.contains_key(&request.url) {
                Some(request.url.clone())
            } else {
                responses
                    .keys()
                    .find(|pattern| request.url.ends_with(pattern.as_str()))
                    .cloned()
            };
            if let Some(key) = key {
                let queue = responses.get_mut(&key).unwrap();
                if queue.len() > 1 {
                    return queue.pop_front();
                }
                return queue.front().cloned();
            }
        }

        self.default_response.lock().unwrap().clone()
    }

    async fn respond(&self, request: RecordedRequest) -> Result<Response, HttpError> {
        if let Some(delay) = self.matching_delay(&request.url) {
            tokio::time::sleep(delay).await;
        }

        match self.resolve(&request) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!(
                "No mock response for URL: {}",
                request.url
            ))),
        }
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        let request = self.record("GET", url, headers, None);
        self.respond(request).await
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        let request = self.record("POST", url, headers, Some(body.to_string()));
        self.respond(request).await
    }

    async fn patch(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<Response, HttpError> {
        let request = self.record("PATCH", url, headers, Some(body.to_string()));
        self.respond(request).await
    }

    async fn delete(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        let request = self.record("DELETE", url, headers, None);
        self.respond(request).await
    }
}

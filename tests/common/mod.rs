//! Shared fixtures for integration tests.
#![allow(dead_code)]

use bytes::Bytes;
use std::sync::{Arc, Once};

use jobtrack_client::adapters::mock::{
    InMemorySignalMirror, InMemoryTokenStorage, MockHttpClient, MockResponse, RecordingNavigator,
};
use jobtrack_client::traits::Response;
use jobtrack_client::{ClientConfig, JobtrackClient};

pub const GRANT_BODY: &str = r#"{"access": "access-1", "refresh": "refresh-1"}"#;
pub const PROFILE_BODY: &str = r#"{"id": 1, "email": "me@example.com", "username": "me"}"#;
pub const JOB_BODY: &str = r#"{
    "id": 3,
    "company_name": "Initech",
    "job_title": "Software Engineer",
    "status": "applied"
}"#;

static TRACING: Once = Once::new();

/// Install an env-filtered subscriber once so `RUST_LOG` reaches test output.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A fixed-status mock response with the given JSON body.
pub fn ok(status: u16, body: &str) -> MockResponse {
    MockResponse::Success(Response::new(status, Bytes::from(body.to_string())))
}

/// Wire a full client over the mock transport and in-memory adapters.
pub fn build_client(http: MockHttpClient) -> (JobtrackClient, Arc<RecordingNavigator>) {
    build_client_with_storage(http, Arc::new(InMemoryTokenStorage::new()))
}

/// Same as [`build_client`] but over caller-provided token storage, for
/// persistence-across-restart scenarios.
pub fn build_client_with_storage(
    http: MockHttpClient,
    storage: Arc<InMemoryTokenStorage>,
) -> (JobtrackClient, Arc<RecordingNavigator>) {
    init_tracing();
    let navigator = Arc::new(RecordingNavigator::new());
    let client = JobtrackClient::new(
        ClientConfig::new("http://localhost:8000/api").unwrap(),
        Arc::new(http),
        storage,
        Arc::new(InMemorySignalMirror::new()),
        navigator.clone(),
    );
    (client, navigator)
}

/// Stub the login and profile endpoints and sign the client in.
pub async fn login(http: &MockHttpClient, client: &JobtrackClient) {
    http.set_response("/auth/jwt/create/", ok(200, GRANT_BODY));
    http.set_response("/auth/users/me/", ok(200, PROFILE_BODY));
    client
        .session()
        .login("me@example.com", "hunter2")
        .await
        .expect("login should succeed");
}

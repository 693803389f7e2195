//! Integration tests for the session lifecycle: login, logout, restore, and
//! the route gate's view of it all.

mod common;

use common::{build_client, build_client_with_storage, login, ok, GRANT_BODY, PROFILE_BODY};
use std::sync::Arc;

use jobtrack_client::adapters::mock::{InMemoryTokenStorage, MockHttpClient};
use jobtrack_client::auth::{SessionStatus, TokenPair};
use jobtrack_client::error::{AuthError, ClientError};
use jobtrack_client::routing::{DASHBOARD_ROUTE, LOGIN_ROUTE};
use jobtrack_client::routing::GateDecision;

#[tokio::test]
async fn test_full_login_flow_updates_session_and_gate() {
    let http = MockHttpClient::new();
    let (client, _) = build_client(http.clone());

    // Signed out: protected pages bounce, auth pages render.
    assert_eq!(
        client.route_decision("/dashboard"),
        GateDecision::Redirect(LOGIN_ROUTE)
    );
    assert_eq!(client.route_decision("/login"), GateDecision::Allow);

    login(&http, &client).await;

    let session = client.session().snapshot();
    assert_eq!(session.status, SessionStatus::Authenticated);
    assert_eq!(session.user.as_ref().unwrap().email, "me@example.com");

    // Signed in: the gate flips both ways.
    assert_eq!(client.route_decision("/dashboard"), GateDecision::Allow);
    assert_eq!(
        client.route_decision("/login"),
        GateDecision::Redirect(DASHBOARD_ROUTE)
    );
    client.shutdown();
}

#[tokio::test]
async fn test_wrong_password_is_a_local_error() {
    let http = MockHttpClient::new();
    http.set_response(
        "/auth/jwt/create/",
        ok(401, r#"{"detail": "No active account found"}"#),
    );
    let (client, navigator) = build_client(http);

    let err = client
        .session()
        .login("me@example.com", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Auth(AuthError::InvalidCredentials { .. })
    ));
    // A rejected login never triggers the session-expiry machinery.
    assert_eq!(client.session().status(), SessionStatus::Anonymous);
    assert!(navigator.redirects().is_empty());
    client.shutdown();
}

#[tokio::test]
async fn test_profile_failure_after_login_leaves_no_half_open_session() {
    let http = MockHttpClient::new();
    http.set_response("/auth/jwt/create/", ok(200, GRANT_BODY));
    http.set_response("/auth/users/me/", ok(500, "boom"));
    let storage = Arc::new(InMemoryTokenStorage::new());
    let (client, _) = build_client_with_storage(http, storage.clone());

    assert!(client
        .session()
        .login("me@example.com", "hunter2")
        .await
        .is_err());
    assert_eq!(client.session().status(), SessionStatus::Anonymous);
    // The token grant stored mid-flow was rolled back everywhere.
    assert!(storage.stored().is_none());
    assert_eq!(
        client.route_decision("/dashboard"),
        GateDecision::Redirect(LOGIN_ROUTE)
    );
    client.shutdown();
}

#[tokio::test]
async fn test_logout_redirects_once_and_is_idempotent() {
    let http = MockHttpClient::new();
    let (client, navigator) = build_client(http.clone());
    login(&http, &client).await;

    client.session().logout().await;
    assert_eq!(client.session().status(), SessionStatus::Anonymous);
    assert_eq!(navigator.redirects(), vec![LOGIN_ROUTE.to_string()]);
    assert_eq!(
        client.route_decision("/jobs"),
        GateDecision::Redirect(LOGIN_ROUTE)
    );

    client.session().logout().await;
    assert_eq!(navigator.redirects().len(), 1);
    client.shutdown();
}

#[tokio::test]
async fn test_restart_restores_session_from_persisted_tokens() {
    let storage = Arc::new(InMemoryTokenStorage::new());
    storage.seed(TokenPair {
        access: "persisted-access".to_string(),
        refresh: "persisted-refresh".to_string(),
        access_expires_at: chrono::Utc::now().timestamp() + 300,
    });

    let http = MockHttpClient::new();
    http.set_response("/auth/users/me/", ok(200, PROFILE_BODY));
    let (client, _) = build_client_with_storage(http.clone(), storage);

    client.init().await;
    assert_eq!(client.session().status(), SessionStatus::Authenticated);
    assert_eq!(
        http.requests_to("/auth/users/me/")[0].bearer_token(),
        Some("persisted-access")
    );
    assert_eq!(client.route_decision("/dashboard"), GateDecision::Allow);
    client.shutdown();
}

#[tokio::test]
async fn test_restart_with_dead_tokens_stays_signed_out() {
    let storage = Arc::new(InMemoryTokenStorage::new());
    storage.seed(TokenPair {
        access: "dead-access".to_string(),
        refresh: "dead-refresh".to_string(),
        access_expires_at: 0,
    });

    let http = MockHttpClient::new();
    http.set_response("/auth/users/me/", ok(401, ""));
    http.set_response("/auth/jwt/refresh/", ok(401, ""));
    let (client, _) = build_client_with_storage(http, storage.clone());

    client.init().await;
    assert_ne!(client.session().status(), SessionStatus::Authenticated);
    // The dead pair was purged, not left around for the next start.
    assert!(storage.stored().is_none());
    client.shutdown();
}

#[tokio::test]
async fn test_register_then_login() {
    let http = MockHttpClient::new();
    http.set_response(
        "/auth/users/",
        ok(
            201,
            r#"{"id": 9, "email": "new@example.com", "username": "new"}"#,
        ),
    );
    let (client, _) = build_client(http.clone());

    let profile = client
        .auth()
        .register(&jobtrack_client::api::RegisterRequest {
            email: "new@example.com".to_string(),
            username: "new".to_string(),
            password: "hunter2".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(profile.id, 9);
    // Registration alone does not sign the user in.
    assert_eq!(client.session().status(), SessionStatus::Anonymous);

    login(&http, &client).await;
    assert!(client.session().is_authenticated());
    client.shutdown();
}

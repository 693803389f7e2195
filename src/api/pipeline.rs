//! Authenticated request pipeline.
//!
//! Every API call that needs a session goes through [`RequestPipeline`]. It
//! attaches the bearer token, watches for 401 rejections, runs a single-flight
//! token refresh, and retries the original request exactly once with the new
//! token. A second 401, a failed refresh, or a refresh timeout all end the
//! same way: tokens are cleared, an expiry event is broadcast, and the caller
//! gets [`AuthError::SessionExpired`].
//!
//! Single-flight means any number of concurrent 401s produce at most one
//! refresh call. The first rejected request creates the refresh future; every
//! other rejected request awaits a shared handle to the same future and
//! retries with whatever it produced.

use futures::future::{BoxFuture, FutureExt, Shared};
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::auth::{TokenPair, TokenStore};
use crate::config::ClientConfig;
use crate::error::{classify_http_error, AuthError, ClientError, ClientResult, ValidationError};
use crate::error::NetworkError;
use crate::traits::{Headers, HttpClient, Response};

/// Token refresh endpoint, relative to the API base.
const REFRESH_PATH: &str = "/auth/jwt/refresh/";

/// A refresh outcome shared between every caller queued on the same attempt.
type SharedRefresh = Shared<BoxFuture<'static, Result<(), AuthError>>>;

/// HTTP method for a pipeline dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

#[derive(serde::Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(serde::Deserialize)]
struct RefreshGrant {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

/// The authenticated request pipeline.
///
/// Cheap to share: clone the `Arc` it lives in. All interior state (the
/// refresh gate, the expiry broadcast) is owned here so the single-flight
/// guarantee holds across every caller.
pub struct RequestPipeline {
    http: Arc<dyn HttpClient>,
    tokens: Arc<TokenStore>,
    config: ClientConfig,
    /// Current in-flight refresh, if any, tagged with its attempt id so a
    /// finished attempt never clears a newer one.
    refresh_gate: Mutex<Option<(u64, SharedRefresh)>>,
    refresh_seq: AtomicU64,
    /// Bumped once per terminal session expiry. Subscribers (the session
    /// store) react by tearing down session state.
    expiry_tx: Arc<watch::Sender<u64>>,
}

impl RequestPipeline {
    /// Create a pipeline over the given transport and token store.
    pub fn new(http: Arc<dyn HttpClient>, tokens: Arc<TokenStore>, config: ClientConfig) -> Self {
        let (expiry_tx, _) = watch::channel(0);
        Self {
            http,
            tokens,
            config,
            refresh_gate: Mutex::new(None),
            refresh_seq: AtomicU64::new(0),
            expiry_tx: Arc::new(expiry_tx),
        }
    }

    /// Subscribe to terminal session-expiry events.
    ///
    /// The receiver's value is a counter; each change means one expiry.
    pub fn subscribe_expiry(&self) -> watch::Receiver<u64> {
        self.expiry_tx.subscribe()
    }

    /// The configuration this pipeline was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Execute an authenticated request against a path relative to the API
    /// base, with 401-triggered refresh and a single retry.
    ///
    /// `operation` is a short human label used in logs and error messages.
    pub async fn execute(
        &self,
        operation: &str,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> ClientResult<Response> {
        let url = self.config.endpoint(path);

        let access = self
            .tokens
            .access_token()
            .ok_or(ClientError::Auth(AuthError::NotAuthenticated))?;
        let response = self
            .dispatch(operation, method, &url, body.as_deref(), Some(&access))
            .await?;

        if response.status != 401 {
            return Self::finalize(operation, response);
        }

        debug!("{}: access token rejected, refreshing", operation);
        self.ensure_fresh_token().await.map_err(|err| {
            debug!("{}: refresh failed: {}", operation, err);
            ClientError::Auth(AuthError::SessionExpired)
        })?;

        let access = self
            .tokens
            .access_token()
            .ok_or(ClientError::Auth(AuthError::SessionExpired))?;
        let response = self
            .dispatch(operation, method, &url, body.as_deref(), Some(&access))
            .await?;

        if response.status == 401 {
            // The refreshed token was rejected too. One retry is the bound;
            // treat the session as gone rather than loop.
            warn!("{}: request rejected after refresh, session expired", operation);
            self.expire_session().await;
            return Err(ClientError::Auth(AuthError::SessionExpired));
        }

        Self::finalize(operation, response)
    }

    /// Execute an unauthenticated request (login, register). No bearer
    /// header, no refresh, no retry.
    pub async fn execute_public(
        &self,
        operation: &str,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> ClientResult<Response> {
        let url = self.config.endpoint(path);
        self.dispatch(operation, method, &url, body.as_deref(), None)
            .await
    }

    /// Decode a response body into its expected model.
    pub fn decode<T: DeserializeOwned>(response: &Response) -> ClientResult<T> {
        response.json().map_err(ClientError::from)
    }

    /// Clear tokens and broadcast a terminal expiry. Idempotent at the token
    /// level; every call bumps the broadcast counter.
    pub async fn expire_session(&self) {
        self.tokens.clear().await;
        self.expiry_tx.send_modify(|n| *n += 1);
    }

    async fn dispatch(
        &self,
        operation: &str,
        method: Method,
        url: &str,
        body: Option<&str>,
        access: Option<&str>,
    ) -> ClientResult<Response> {
        let mut headers = Headers::new();
        if let Some(token) = access {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        if body.is_some() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }

        let result = match method {
            Method::Get => self.http.get(url, &headers).await,
            Method::Post => self.http.post(url, body.unwrap_or(""), &headers).await,
            Method::Patch => self.http.patch(url, body.unwrap_or(""), &headers).await,
            Method::Delete => self.http.delete(url, &headers).await,
        };

        result.map_err(|err| ClientError::Network(classify_http_error(err, operation)))
    }

    /// Classify a terminal response: 2xx passes through, 400 becomes a
    /// field-level validation error when the body has that shape, everything
    /// else becomes a status error. 401s never reach here; `execute` resolves
    /// them through the refresh path first.
    fn finalize(operation: &str, response: Response) -> ClientResult<Response> {
        if response.is_success() {
            return Ok(response);
        }
        if response.status == 400 {
            if let Some(validation) = ValidationError::from_body(&response.body) {
                return Err(ClientError::Validation(validation));
            }
        }
        let message = response
            .text()
            .unwrap_or_else(|_| format!("{} failed", operation));
        Err(ClientError::Network(NetworkError::HttpStatus {
            status: response.status,
            message,
        }))
    }

    /// Join or start the single-flight refresh and await its outcome.
    async fn ensure_fresh_token(&self) -> Result<(), AuthError> {
        let (id, fut) = {
            let mut gate = self.refresh_gate.lock().unwrap();
            match gate.as_ref() {
                Some((id, fut)) => (*id, fut.clone()),
                None => {
                    let id = self.refresh_seq.fetch_add(1, Ordering::Relaxed);
                    let fut = self.start_refresh();
                    *gate = Some((id, fut.clone()));
                    (id, fut)
                }
            }
        };

        let result = fut.await;

        // Only the attempt that owns this gate entry may clear it. A caller
        // waking up late must not evict a newer in-flight attempt.
        let mut gate = self.refresh_gate.lock().unwrap();
        if matches!(gate.as_ref(), Some((gid, _)) if *gid == id) {
            *gate = None;
        }
        drop(gate);

        result
    }

    /// Build the shared refresh future. Side effects on failure (token clear,
    /// expiry broadcast) live inside the future so they run exactly once no
    /// matter how many callers are queued on it.
    fn start_refresh(&self) -> SharedRefresh {
        let http = Arc::clone(&self.http);
        let tokens = Arc::clone(&self.tokens);
        let expiry_tx = Arc::clone(&self.expiry_tx);
        let url = self.config.endpoint(REFRESH_PATH);
        let timeout_secs = self.config.refresh_timeout_secs;

        async move {
            let attempt = Self::perform_refresh(http, Arc::clone(&tokens), url);
            let outcome = tokio::time::timeout(Duration::from_secs(timeout_secs), attempt).await;

            match outcome {
                Ok(Ok(pair)) => {
                    info!("access token refreshed");
                    tokens.set(pair).await;
                    Ok(())
                }
                Ok(Err(err)) => {
                    warn!("token refresh failed: {}", err);
                    tokens.clear().await;
                    expiry_tx.send_modify(|n| *n += 1);
                    Err(err)
                }
                Err(_) => {
                    warn!("token refresh timed out after {}s", timeout_secs);
                    tokens.clear().await;
                    expiry_tx.send_modify(|n| *n += 1);
                    Err(AuthError::RefreshTimedOut {
                        seconds: timeout_secs,
                    })
                }
            }
        }
        .boxed()
        .shared()
    }

    async fn perform_refresh(
        http: Arc<dyn HttpClient>,
        tokens: Arc<TokenStore>,
        url: String,
    ) -> Result<TokenPair, AuthError> {
        let refresh = tokens.refresh_token().ok_or(AuthError::NotAuthenticated)?;

        let body = serde_json::to_string(&RefreshRequest { refresh: &refresh })
            .map_err(|e| AuthError::RefreshFailed {
                message: e.to_string(),
            })?;

        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        let response = http
            .post(&url, &body, &headers)
            .await
            .map_err(|err| AuthError::RefreshFailed {
                message: err.to_string(),
            })?;

        if !response.is_success() {
            return Err(AuthError::RefreshFailed {
                message: format!("refresh endpoint returned {}", response.status),
            });
        }

        let grant: RefreshGrant = response.json().map_err(|err| AuthError::RefreshFailed {
            message: format!("invalid refresh response: {}", err),
        })?;

        // The server may or may not rotate the refresh token; keep the old
        // one when it does not.
        let new_refresh = grant.refresh.unwrap_or(refresh);
        Ok(TokenPair::from_grant(grant.access, new_refresh))
    }
}

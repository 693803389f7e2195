//! Credential and account endpoints.
//!
//! Login and registration go out unauthenticated; the profile fetch goes
//! through the pipeline like any other session-bound call.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::pipeline::{Method, RequestPipeline};
use crate::auth::TokenPair;
use crate::error::{AuthError, ClientError, ClientResult, NetworkError, ValidationError};
use crate::models::UserProfile;

const LOGIN_PATH: &str = "/auth/jwt/create/";
const REGISTER_PATH: &str = "/auth/users/";
const PROFILE_PATH: &str = "/auth/users/me/";

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Payload for account creation.
///
/// The endpoint expects the password twice; the confirmation field is filled
/// in at serialization time so callers state it once.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    email: &'a str,
    username: &'a str,
    password: &'a str,
    re_password: &'a str,
}

#[derive(serde::Deserialize)]
struct TokenGrant {
    access: String,
    refresh: String,
}

/// Client for the auth endpoints.
pub struct AuthApi {
    pipeline: Arc<RequestPipeline>,
}

impl AuthApi {
    pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self { pipeline }
    }

    /// Exchange credentials for a token pair.
    ///
    /// POST /auth/jwt/create/
    ///
    /// A 400 or 401 from this endpoint means the credentials were rejected,
    /// never that a session expired.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<TokenPair> {
        let body = serde_json::to_string(&LoginRequest { email, password })?;
        let response = self
            .pipeline
            .execute_public("login", Method::Post, LOGIN_PATH, Some(body))
            .await?;

        if response.status == 400 || response.status == 401 {
            let message = response
                .text()
                .unwrap_or_else(|_| "credentials rejected".to_string());
            debug!("login rejected with status {}", response.status);
            return Err(ClientError::Auth(AuthError::InvalidCredentials { message }));
        }
        if !response.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "login failed".to_string());
            return Err(ClientError::Network(NetworkError::HttpStatus {
                status: response.status,
                message,
            }));
        }

        let grant: TokenGrant = RequestPipeline::decode(&response)?;
        info!("login succeeded");
        Ok(TokenPair::from_grant(grant.access, grant.refresh))
    }

    /// Create a new account.
    ///
    /// POST /auth/users/
    ///
    /// Field-level rejections (taken email, weak password) surface as
    /// [`ValidationError`].
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<UserProfile> {
        let body = serde_json::to_string(&RegisterBody {
            email: &request.email,
            username: &request.username,
            password: &request.password,
            re_password: &request.password,
        })?;
        let response = self
            .pipeline
            .execute_public("register", Method::Post, REGISTER_PATH, Some(body))
            .await?;

        if response.status == 400 {
            if let Some(validation) = ValidationError::from_body(&response.body) {
                return Err(ClientError::Validation(validation));
            }
        }
        if !response.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "registration failed".to_string());
            return Err(ClientError::Network(NetworkError::HttpStatus {
                status: response.status,
                message,
            }));
        }

        RequestPipeline::decode(&response)
    }

    /// Fetch the authenticated user's profile.
    ///
    /// GET /auth/users/me/
    pub async fn profile(&self) -> ClientResult<UserProfile> {
        let response = self
            .pipeline
            .execute("fetch profile", Method::Get, PROFILE_PATH, None)
            .await?;
        RequestPipeline::decode(&response)
    }
}

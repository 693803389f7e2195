//! Session state machine.
//!
//! [`SessionStore`] owns the user-visible answer to "who is signed in".
//! Token material lives in [`TokenStore`]; this layer coordinates the two so
//! they only ever move together: a session is reported authenticated only
//! after both the token exchange and the profile fetch succeeded, and any
//! terminal expiry tears down tokens, cached data, and session state in one
//! step.

use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

use crate::api::AuthApi;
use crate::auth::TokenStore;
use crate::cache::QueryCache;
use crate::error::{AuthError, ClientError, ClientResult};
use crate::models::UserProfile;
use crate::routing::LOGIN_ROUTE;
use crate::traits::Navigator;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No session. The default, and the state after logout.
    Anonymous,
    /// A login is in flight.
    Authenticating,
    /// Token pair and profile both present.
    Authenticated,
    /// The session ended without the user asking for it (refresh failed or
    /// the server rejected a refreshed token). Transient: expiry teardown
    /// settles the session back to anonymous.
    Expired,
}

/// A point-in-time view of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: Option<UserProfile>,
    pub status: SessionStatus,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            user: None,
            status: SessionStatus::Anonymous,
        }
    }
}

/// Owner of session state and the login/logout/restore flows.
pub struct SessionStore {
    state: RwLock<Session>,
    tokens: Arc<TokenStore>,
    auth: Arc<AuthApi>,
    cache: QueryCache,
    navigator: Arc<dyn Navigator>,
}

impl SessionStore {
    pub fn new(
        tokens: Arc<TokenStore>,
        auth: Arc<AuthApi>,
        cache: QueryCache,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            state: RwLock::new(Session::default()),
            tokens,
            auth,
            cache,
            navigator,
        }
    }

    /// A snapshot of the current session.
    pub fn snapshot(&self) -> Session {
        self.state.read().unwrap().clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.state.read().unwrap().status
    }

    pub fn is_authenticated(&self) -> bool {
        self.status() == SessionStatus::Authenticated
    }

    /// Sign in: exchange credentials for tokens, then fetch the profile.
    ///
    /// The session reports authenticated only after both steps succeed. If
    /// the profile fetch fails, the just-stored tokens are rolled back and
    /// the session stays anonymous, so the two stores never disagree.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<UserProfile> {
        self.set_status(SessionStatus::Authenticating);

        let pair = match self.auth.login(email, password).await {
            Ok(pair) => pair,
            Err(err) => {
                self.set_status(SessionStatus::Anonymous);
                return Err(err);
            }
        };
        self.tokens.set(pair).await;

        match self.auth.profile().await {
            Ok(profile) => {
                info!("session established for user {}", profile.id);
                *self.state.write().unwrap() = Session {
                    user: Some(profile.clone()),
                    status: SessionStatus::Authenticated,
                };
                Ok(profile)
            }
            Err(err) => {
                // Half-open session: tokens stored but no profile. Roll the
                // tokens back rather than report a user we cannot name.
                warn!("profile fetch after login failed: {}", err);
                self.tokens.clear().await;
                self.set_status(SessionStatus::Anonymous);
                Err(err)
            }
        }
    }

    /// Sign out. Idempotent: a second logout is a silent no-op and does not
    /// redirect again.
    pub async fn logout(&self) {
        let previous = {
            let mut state = self.state.write().unwrap();
            std::mem::take(&mut *state).status
        };
        self.tokens.clear().await;

        if previous != SessionStatus::Anonymous {
            info!("logged out");
            self.cache.clear();
            self.navigator.redirect(LOGIN_ROUTE);
        }
    }

    /// Restore the session from persisted tokens (process-start analogue of
    /// a page reload): load tokens, then fetch the profile to prove they are
    /// still good.
    pub async fn restore(&self) -> ClientResult<UserProfile> {
        self.tokens.load().await;
        self.fetch_user().await
    }

    /// Fetch the profile for the current tokens and move the session to
    /// authenticated.
    ///
    /// Auth failures leave the session anonymous; transient network failures
    /// leave it untouched so a retry can succeed.
    pub async fn fetch_user(&self) -> ClientResult<UserProfile> {
        if self.tokens.read().is_none() {
            self.set_status(SessionStatus::Anonymous);
            return Err(ClientError::Auth(AuthError::NotAuthenticated));
        }

        match self.auth.profile().await {
            Ok(profile) => {
                debug!("restored session for user {}", profile.id);
                *self.state.write().unwrap() = Session {
                    user: Some(profile.clone()),
                    status: SessionStatus::Authenticated,
                };
                Ok(profile)
            }
            Err(err) => {
                if matches!(err, ClientError::Auth(_)) {
                    self.set_status(SessionStatus::Anonymous);
                }
                Err(err)
            }
        }
    }

    /// React to a terminal expiry broadcast from the request pipeline.
    ///
    /// Tokens are already gone by the time this runs; tear down the rest,
    /// send the user to the login surface, and settle the session back to
    /// anonymous so the next login starts from a clean state. A no-op unless
    /// the session was live, so repeated broadcasts redirect once.
    pub async fn handle_expired(&self) {
        let was_live = {
            let mut state = self.state.write().unwrap();
            let live = matches!(
                state.status,
                SessionStatus::Authenticated | SessionStatus::Authenticating
            );
            if live {
                *state = Session {
                    user: None,
                    status: SessionStatus::Expired,
                };
            }
            live
        };

        if was_live {
            warn!("session expired");
            self.cache.clear();
            self.navigator.redirect(LOGIN_ROUTE);
            self.set_status(SessionStatus::Anonymous);
        }
    }

    fn set_status(&self, status: SessionStatus) {
        let mut state = self.state.write().unwrap();
        if status != SessionStatus::Authenticated {
            state.user = None;
        }
        state.status = status;
    }
}

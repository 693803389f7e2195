//! Authentication: token lifecycle and session state.

pub mod session;
pub mod tokens;

pub use session::{Session, SessionStatus, SessionStore};
pub use tokens::{jwt_expires_at, TokenPair, TokenStore, DEFAULT_ACCESS_LIFETIME_SECS};

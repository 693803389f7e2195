//! Token storage trait abstraction.
//!
//! Provides a trait-based abstraction for durable token pair storage,
//! enabling dependency injection and mocking in tests.

use async_trait::async_trait;

use crate::auth::TokenPair;

/// Token storage operation errors.
#[derive(Debug, Clone)]
pub enum StorageError {
    /// Failed to load the token pair
    LoadFailed(String),
    /// Failed to save the token pair
    SaveFailed(String),
    /// Failed to clear the token pair
    ClearFailed(String),
    /// IO error
    Io(String),
    /// Serialization/deserialization error
    Serialization(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::LoadFailed(msg) => write!(f, "Failed to load tokens: {}", msg),
            StorageError::SaveFailed(msg) => write!(f, "Failed to save tokens: {}", msg),
            StorageError::ClearFailed(msg) => write!(f, "Failed to clear tokens: {}", msg),
            StorageError::Io(msg) => write!(f, "IO error: {}", msg),
            StorageError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// Trait for durable token pair storage.
///
/// The [`TokenStore`](crate::auth::TokenStore) owns the in-memory pair and
/// writes through this trait so a reloaded process can restore its session
/// without re-entering credentials. Implementations include the production
/// file-based storage and an in-memory mock for tests.
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// Load the persisted token pair.
    ///
    /// Returns `Ok(None)` if nothing is stored.
    async fn load(&self) -> Result<Option<TokenPair>, StorageError>;

    /// Persist the token pair.
    async fn save(&self, pair: &TokenPair) -> Result<(), StorageError>;

    /// Remove the persisted token pair.
    ///
    /// Clearing an empty store is a success.
    async fn clear(&self) -> Result<(), StorageError>;
}

//! In-memory token storage and signal mirror for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::auth::TokenPair;
use crate::traits::{SignalMirror, StorageError, TokenStorage};

/// In-memory implementation of [`TokenStorage`].
#[derive(Debug, Default)]
pub struct InMemoryTokenStorage {
    stored: Mutex<Option<TokenPair>>,
    fail_saves: AtomicBool,
}

impl InMemoryTokenStorage {
    /// Create empty in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `save` calls fail, for write-failure paths.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Peek at the stored pair without going through the trait.
    pub fn stored(&self) -> Option<TokenPair> {
        self.stored.lock().unwrap().clone()
    }

    /// Preload a pair, as if persisted by an earlier run.
    pub fn seed(&self, pair: TokenPair) {
        *self.stored.lock().unwrap() = Some(pair);
    }
}

#[async_trait]
impl TokenStorage for InMemoryTokenStorage {
    async fn load(&self) -> Result<Option<TokenPair>, StorageError> {
        Ok(self.stored.lock().unwrap().clone())
    }

    async fn save(&self, pair: &TokenPair) -> Result<(), StorageError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::SaveFailed("simulated failure".to_string()));
        }
        *self.stored.lock().unwrap() = Some(pair.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        *self.stored.lock().unwrap() = None;
        Ok(())
    }
}

/// Atomic-flag implementation of [`SignalMirror`].
#[derive(Debug, Default)]
pub struct InMemorySignalMirror {
    present: AtomicBool,
}

impl InMemorySignalMirror {
    /// Create a mirror with the signal absent.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SignalMirror for InMemorySignalMirror {
    fn set_present(&self) {
        self.present.store(true, Ordering::SeqCst);
    }

    fn clear(&self) {
        self.present.store(false, Ordering::SeqCst);
    }

    fn is_present(&self) -> bool {
        self.present.load(Ordering::SeqCst)
    }
}

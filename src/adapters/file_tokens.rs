//! File-based token pair storage.
//!
//! Persists the token pair to `~/.jobtrack/tokens.json` so a restarted
//! process can restore its session without re-entering credentials.

use async_trait::async_trait;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use crate::auth::TokenPair;
use crate::traits::{StorageError, TokenStorage};

/// The storage directory name under the home directory.
const STORAGE_DIR: &str = ".jobtrack";

/// The token file name.
const TOKENS_FILE: &str = "tokens.json";

/// File-based implementation of [`TokenStorage`].
#[derive(Debug)]
pub struct FileTokenStorage {
    tokens_path: PathBuf,
}

impl FileTokenStorage {
    /// Create storage rooted at the user's home directory.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn new() -> Option<Self> {
        let home = dirs::home_dir()?;
        Some(Self {
            tokens_path: home.join(STORAGE_DIR).join(TOKENS_FILE),
        })
    }

    /// Create storage at an explicit file path (used by tests).
    pub fn with_path(tokens_path: PathBuf) -> Self {
        Self { tokens_path }
    }

    /// Get the path to the token file.
    pub fn tokens_path(&self) -> &PathBuf {
        &self.tokens_path
    }
}

#[async_trait]
impl TokenStorage for FileTokenStorage {
    async fn load(&self) -> Result<Option<TokenPair>, StorageError> {
        if !self.tokens_path.exists() {
            return Ok(None);
        }

        let file =
            File::open(&self.tokens_path).map_err(|e| StorageError::Io(e.to_string()))?;
        let reader = BufReader::new(file);
        let pair = serde_json::from_reader(reader)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(Some(pair))
    }

    async fn save(&self, pair: &TokenPair) -> Result<(), StorageError> {
        if let Some(parent) = self.tokens_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| StorageError::Io(e.to_string()))?;
            }
        }

        let file =
            File::create(&self.tokens_path).map_err(|e| StorageError::Io(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, pair)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| StorageError::SaveFailed(e.to_string()))
    }

    async fn clear(&self) -> Result<(), StorageError> {
        if !self.tokens_path.exists() {
            return Ok(());
        }
        fs::remove_file(&self.tokens_path).map_err(|e| StorageError::ClearFailed(e.to_string()))
    }
}

//! File-marker implementation of the edge signal.
//!
//! The browser original mirrors token presence into a cookie the edge
//! middleware can read before render. The headless analogue is a marker file
//! next to the token store: present means "an access token exists." The
//! marker carries no token material.

use std::fs::{self, File};
use std::path::PathBuf;
use tracing::warn;

use crate::traits::SignalMirror;

/// The marker file name under the storage directory.
const SIGNAL_FILE: &str = "session-signal";

/// File-marker implementation of [`SignalMirror`].
#[derive(Debug)]
pub struct FileSignalMirror {
    marker_path: PathBuf,
}

impl FileSignalMirror {
    /// Create a mirror rooted at the user's home directory.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn new() -> Option<Self> {
        let home = dirs::home_dir()?;
        Some(Self {
            marker_path: home.join(".jobtrack").join(SIGNAL_FILE),
        })
    }

    /// Create a mirror at an explicit marker path (used by tests).
    pub fn with_path(marker_path: PathBuf) -> Self {
        Self { marker_path }
    }
}

impl SignalMirror for FileSignalMirror {
    fn set_present(&self) {
        if let Some(parent) = self.marker_path.parent() {
            if !parent.exists() {
                if let Err(err) = fs::create_dir_all(parent) {
                    warn!("failed to create signal directory: {}", err);
                    return;
                }
            }
        }
        if let Err(err) = File::create(&self.marker_path) {
            warn!("failed to write signal marker: {}", err);
        }
    }

    fn clear(&self) {
        if self.marker_path.exists() {
            if let Err(err) = fs::remove_file(&self.marker_path) {
                warn!("failed to remove signal marker: {}", err);
            }
        }
    }

    fn is_present(&self) -> bool {
        self.marker_path.exists()
    }
}

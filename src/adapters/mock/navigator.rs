//! Recording navigator for testing.

use std::sync::Mutex;

use crate::traits::Navigator;

/// Navigator that records every redirect target instead of navigating.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Create a navigator with no recorded redirects.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded redirect targets, in order.
    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, target: &str) {
        self.redirects.lock().unwrap().push(target.to_string());
    }
}

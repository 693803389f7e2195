//! Navigation trait abstraction.
//!
//! Session expiry and logout force the UI to the login surface. The core
//! cannot perform navigation itself, so it calls through this trait and the
//! embedding host decides what a redirect means.

/// Trait for forced navigation.
pub trait Navigator: Send + Sync {
    /// Navigate the host UI to the given route.
    fn redirect(&self, target: &str);
}

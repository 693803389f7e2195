//! Edge-gate signal trait abstraction.
//!
//! The route gate runs earlier in the request lifecycle than anything that
//! can see the in-memory session, so it reads a minimal presence marker (the
//! browser-world equivalent is a named cookie). This trait is the write side
//! of that marker: the token store mirrors "an access token exists" into it
//! on every set/clear.
//!
//! The mirror is derived, best-effort state. It can lag the token store for a
//! bounded time across contexts; it must never diverge permanently.

/// Trait for the edge-gate presence signal.
///
/// Implementations are a file marker in production and an atomic flag in
/// tests. The signal carries no token material, only presence.
pub trait SignalMirror: Send + Sync {
    /// Mark the signal as present (a valid access token exists).
    fn set_present(&self);

    /// Clear the signal. Clearing an absent signal is a no-op.
    fn clear(&self);

    /// Check whether the signal is currently present.
    fn is_present(&self) -> bool;
}

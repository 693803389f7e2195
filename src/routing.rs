//! Edge route gate.
//!
//! A pure, synchronous access predicate evaluated before a protected or
//! auth-only page is allowed to render. The gate runs earlier in the request
//! lifecycle than anything that can see the in-memory session, so its only
//! input is the edge signal (cookie analogue) mirrored by the token store.
//!
//! Fail-closed: absence of the signal always wins over optimistic rendering.
//! The gate never allows a protected render while state is being resolved.

/// Route prefixes that require an authenticated session.
pub const PROTECTED_PREFIXES: &[&str] = &["/dashboard", "/jobs", "/analytics", "/lessons"];

/// Route prefixes only reachable while signed out.
pub const AUTH_PREFIXES: &[&str] = &["/login", "/register"];

/// The login surface.
pub const LOGIN_ROUTE: &str = "/login";

/// The post-login landing surface.
pub const DASHBOARD_ROUTE: &str = "/dashboard";

/// Outcome of a gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Render the requested page.
    Allow,
    /// Navigate to the given route instead of rendering.
    Redirect(&'static str),
}

/// Evaluate the gate for a path given the edge signal.
///
/// - Protected prefix without the signal: redirect to the login surface.
/// - Auth-only prefix with the signal present: redirect to the dashboard.
/// - Anything else: allow.
pub fn evaluate(path: &str, signal_present: bool) -> GateDecision {
    let is_protected = PROTECTED_PREFIXES.iter().any(|p| path.starts_with(p));
    let is_auth_route = AUTH_PREFIXES.iter().any(|p| path.starts_with(p));

    if is_protected && !signal_present {
        return GateDecision::Redirect(LOGIN_ROUTE);
    }
    if is_auth_route && signal_present {
        return GateDecision::Redirect(DASHBOARD_ROUTE);
    }
    GateDecision::Allow
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_without_signal_redirects_to_login() {
        assert_eq!(evaluate("/jobs", false), GateDecision::Redirect(LOGIN_ROUTE));
        assert_eq!(
            evaluate("/dashboard", false),
            GateDecision::Redirect(LOGIN_ROUTE)
        );
        assert_eq!(
            evaluate("/analytics", false),
            GateDecision::Redirect(LOGIN_ROUTE)
        );
    }

    #[test]
    fn test_protected_with_signal_allows() {
        assert_eq!(evaluate("/jobs", true), GateDecision::Allow);
        assert_eq!(evaluate("/jobs/42", true), GateDecision::Allow);
        assert_eq!(evaluate("/dashboard", true), GateDecision::Allow);
    }

    #[test]
    fn test_auth_route_with_signal_redirects_to_dashboard() {
        assert_eq!(
            evaluate("/login", true),
            GateDecision::Redirect(DASHBOARD_ROUTE)
        );
        assert_eq!(
            evaluate("/register", true),
            GateDecision::Redirect(DASHBOARD_ROUTE)
        );
    }

    #[test]
    fn test_auth_route_without_signal_allows() {
        assert_eq!(evaluate("/login", false), GateDecision::Allow);
        assert_eq!(evaluate("/register", false), GateDecision::Allow);
    }

    #[test]
    fn test_public_paths_always_allow() {
        assert_eq!(evaluate("/", false), GateDecision::Allow);
        assert_eq!(evaluate("/", true), GateDecision::Allow);
        assert_eq!(evaluate("/about", false), GateDecision::Allow);
    }

    #[test]
    fn test_nested_protected_paths() {
        assert_eq!(
            evaluate("/jobs/42/edit", false),
            GateDecision::Redirect(LOGIN_ROUTE)
        );
        assert_eq!(
            evaluate("/lessons/intro", false),
            GateDecision::Redirect(LOGIN_ROUTE)
        );
    }
}

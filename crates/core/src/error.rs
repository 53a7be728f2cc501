//! Navigation error model.

use thiserror::Error;

/// Result type used by the navigation guard and its collaborators.
pub type NavResult<T> = Result<T, NavError>;

/// Failure taxonomy of a single navigation attempt.
///
/// Every variant maps to exactly one terminal decision in the guard; none of
/// them escapes a navigation attempt. "Role denied" is deliberately absent:
/// a route removed by role filtering is simply not live, so it surfaces as
/// [`NavError::RouteNotFound`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavError {
    /// Unauthenticated access to a protected target.
    #[error("authentication required")]
    AuthRequired,

    /// The menu could not be materialized (fetch failed, invalid or empty).
    #[error("menu unavailable: {0}")]
    MenuUnavailable(String),

    /// The route registry rejected the descriptor batch.
    #[error("route registration failed: {0}")]
    RegistrationFailed(String),

    /// The target matched nothing, even after one re-registration.
    #[error("route not found: {0}")]
    RouteNotFound(String),

    /// The session changed while a registration pass was in flight; the
    /// pass result was discarded.
    #[error("session superseded during registration")]
    SessionSuperseded,
}

impl NavError {
    pub fn menu_unavailable(msg: impl Into<String>) -> Self {
        Self::MenuUnavailable(msg.into())
    }

    pub fn registration_failed(msg: impl Into<String>) -> Self {
        Self::RegistrationFailed(msg.into())
    }

    pub fn route_not_found(path: impl Into<String>) -> Self {
        Self::RouteNotFound(path.into())
    }

    /// Whether recovering from this error requires clearing the session.
    pub fn forces_logout(&self) -> bool {
        matches!(self, Self::AuthRequired | Self::MenuUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_auth_and_menu_failures_force_logout() {
        assert!(NavError::AuthRequired.forces_logout());
        assert!(NavError::menu_unavailable("down").forces_logout());
        assert!(!NavError::registration_failed("dup").forces_logout());
        assert!(!NavError::route_not_found("/x").forces_logout());
        assert!(!NavError::SessionSuperseded.forces_logout());
    }

    #[test]
    fn messages_carry_context() {
        assert_eq!(
            NavError::route_not_found("/missing").to_string(),
            "route not found: /missing"
        );
    }
}

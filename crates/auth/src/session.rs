//! Process-wide session state.
//!
//! The store is the single owner of the credential. Other components read
//! snapshots; only login/logout (and the guard's forced logout) mutate it.

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use navgate_core::{SessionId, UserId};

use crate::{LoginGrant, RoleSet, SessionToken, TokenValidationError};

/// Display profile of the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Snapshot of the session at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    session_id: SessionId,
    authenticated: bool,
    roles: RoleSet,
    token: Option<SessionToken>,
    user: Option<UserProfile>,
}

impl SessionState {
    /// A fresh unauthenticated session.
    pub fn anonymous() -> Self {
        Self {
            session_id: SessionId::new(),
            authenticated: false,
            roles: RoleSet::new(),
            token: None,
            user: None,
        }
    }

    fn from_grant(grant: LoginGrant) -> Self {
        Self {
            session_id: SessionId::new(),
            authenticated: true,
            roles: grant.roles,
            token: Some(grant.token),
            user: Some(grant.user),
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// Access token to forward to remote collaborators.
    pub fn access_token(&self) -> Option<&str> {
        self.token.as_ref().map(SessionToken::access)
    }

    /// Validate the held credential at `now`.
    ///
    /// Unauthenticated sessions have nothing to validate and always pass.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
        if !self.authenticated {
            return Ok(());
        }
        match &self.token {
            Some(token) => token.validate(now),
            None => Err(TokenValidationError::Empty),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::anonymous()
    }
}

/// Owner of the single active [`SessionState`].
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: RwLock<SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SessionState {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the session with an authenticated one built from `grant`.
    pub fn login(&self, grant: LoginGrant) -> SessionId {
        let state = SessionState::from_grant(grant);
        let id = state.session_id;
        tracing::info!(
            session_id = %id,
            roles = %state.roles,
            "session authenticated"
        );
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = state;
        id
    }

    /// Wipe roles, token and profile; the store becomes a new anonymous
    /// session. Returns the token that was held, if any.
    pub fn logout(&self) -> Option<SessionToken> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::take(&mut *guard);
        if previous.authenticated {
            tracing::info!(session_id = %previous.session_id, "session cleared");
        }
        previous.token
    }

    /// Log out only if `session_id` is still the current session, so a stale
    /// caller cannot clear a session that replaced it. Returns whether the
    /// store was cleared.
    pub fn logout_if_current(&self, session_id: SessionId) -> bool {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if guard.session_id != session_id {
            tracing::debug!(stale = %session_id, current = %guard.session_id, "ignoring logout for a replaced session");
            return false;
        }
        let previous = std::mem::take(&mut *guard);
        if previous.authenticated {
            tracing::info!(session_id = %previous.session_id, "session cleared");
        }
        true
    }

    /// Whether `session_id` still names the current authenticated session.
    pub fn is_current(&self, session_id: SessionId) -> bool {
        let state = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        state.authenticated && state.session_id == session_id
    }
}

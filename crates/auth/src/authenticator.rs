//! Authentication collaborator contract.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use navgate_core::UserId;

use crate::{RoleSet, SessionToken, UserProfile};

/// Username/password pair submitted by the login form.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// What a successful login yields; the session store consumes it whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginGrant {
    pub user: UserProfile,
    pub roles: RoleSet,
    pub token: SessionToken,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("authentication service unavailable: {0}")]
    Unavailable(String),

    #[error("invalid authenticator configuration: {0}")]
    Config(String),
}

/// Authentication backend.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, AuthError>;

    /// Notify the backend that `token` is no longer in use.
    async fn logout(&self, _token: &SessionToken) -> Result<(), AuthError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct StaticUser {
    username: String,
    password: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    roles: RoleSet,
}

/// In-memory user table, for local development and tests.
#[derive(Debug, Default)]
pub struct StaticAuthenticator {
    users: HashMap<String, StaticUser>,
}

impl StaticAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        roles: RoleSet,
    ) -> Self {
        let username = username.into();
        self.users.insert(
            username.clone(),
            StaticUser {
                username,
                password: password.into(),
                email: None,
                roles,
            },
        );
        self
    }

    /// Load users from a JSON array of `{username, password, email?, roles}`.
    pub fn from_json_str(json: &str) -> Result<Self, AuthError> {
        let users: Vec<StaticUser> =
            serde_json::from_str(json).map_err(|e| AuthError::Config(e.to_string()))?;
        Ok(Self {
            users: users
                .into_iter()
                .map(|u| (u.username.clone(), u))
                .collect(),
        })
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, AuthError> {
        let user = self
            .users
            .get(&credentials.username)
            .filter(|u| u.password == credentials.password)
            .ok_or(AuthError::InvalidCredentials)?;

        tracing::debug!(username = %user.username, "static login accepted");

        Ok(LoginGrant {
            user: UserProfile {
                user_id: UserId::new(),
                username: user.username.clone(),
                email: user.email.clone(),
            },
            roles: user.roles.clone(),
            token: SessionToken::new(format!("static-{}", UserId::new())),
        })
    }
}

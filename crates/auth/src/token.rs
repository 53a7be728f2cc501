use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque session credential.
///
/// The access token is never interpreted by the shell; it is only forwarded
/// to the remote collaborators. The optional time window lets the guard
/// detect an expired session without a round trip.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
    #[serde(default)]
    issued_at: Option<DateTime<Utc>>,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token is empty")]
    Empty,

    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

impl SessionToken {
    pub fn new(access: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: None,
            issued_at: None,
            expires_at: None,
        }
    }

    pub fn with_refresh(mut self, refresh: impl Into<String>) -> Self {
        self.refresh = Some(refresh.into());
        self
    }

    pub fn with_window(mut self, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        self.issued_at = Some(issued_at);
        self.expires_at = Some(expires_at);
        self
    }

    pub fn access(&self) -> &str {
        &self.access
    }

    pub fn refresh(&self) -> Option<&str> {
        self.refresh.as_deref()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Deterministically validate the token at `now`.
    ///
    /// Tokens without a time window only need a non-empty access value.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
        if self.access.trim().is_empty() {
            return Err(TokenValidationError::Empty);
        }
        if let (Some(issued_at), Some(expires_at)) = (self.issued_at, self.expires_at) {
            if expires_at <= issued_at {
                return Err(TokenValidationError::InvalidTimeWindow);
            }
        }
        if self.issued_at.is_some_and(|issued_at| now < issued_at) {
            return Err(TokenValidationError::NotYetValid);
        }
        if self.expires_at.is_some_and(|expires_at| now >= expires_at) {
            return Err(TokenValidationError::Expired);
        }
        Ok(())
    }
}

impl core::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionToken")
            .field("access", &"<redacted>")
            .field("has_refresh", &self.refresh.is_some())
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

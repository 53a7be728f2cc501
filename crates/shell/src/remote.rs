//! HTTP collaborators for the backend API.
//!
//! Responses may come bare or wrapped in a `{code, message, data}` envelope;
//! both are accepted.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use navgate_auth::{AuthError, Authenticator, Credentials, LoginGrant, RoleSet, SessionToken, UserProfile};
use navgate_core::UserId;
use navgate_menu::{FetchError, MenuFetcher, RemoteMenuEntry};

#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice::<Envelope<T>>(bytes).map(|env| match env {
        Envelope::Wrapped { data } => data,
        Envelope::Bare(value) => value,
    })
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    user: RemoteUser,
}

#[derive(Debug, Deserialize)]
struct RemoteUser {
    id: u64,
    username: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

impl LoginResponse {
    fn into_grant(self) -> LoginGrant {
        let mut token = SessionToken::new(self.access_token);
        if let Some(refresh) = self.refresh_token {
            token = token.with_refresh(refresh);
        }
        LoginGrant {
            user: UserProfile {
                user_id: UserId::from_uuid(uuid::Uuid::from_u64_pair(0, self.user.id)),
                username: self.user.username,
                email: self.user.email.filter(|e| !e.is_empty()),
            },
            roles: self.user.role.into_iter().collect::<RoleSet>(),
            token,
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// `POST {api_base}/auth/login`, `POST {api_base}/logout`.
#[derive(Debug, Clone)]
pub struct HttpAuthenticator {
    client: reqwest::Client,
    api_base: String,
}

impl HttpAuthenticator {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
        }
    }
}

#[async_trait]
impl Authenticator for HttpAuthenticator {
    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, AuthError> {
        let url = join_url(&self.api_base, "auth/login");
        let resp = self
            .client
            .post(&url)
            .json(&LoginRequest {
                username: &credentials.username,
                password: &credentials.password,
            })
            .send()
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::BAD_REQUEST {
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(AuthError::Unavailable(format!("login returned {status}")));
        }

        let bytes = resp.bytes().await.map_err(|e| AuthError::Unavailable(e.to_string()))?;
        let body: LoginResponse =
            decode_body(&bytes).map_err(|e| AuthError::Unavailable(format!("unexpected login payload: {e}")))?;
        Ok(body.into_grant())
    }

    async fn logout(&self, token: &SessionToken) -> Result<(), AuthError> {
        let url = join_url(&self.api_base, "logout");
        let resp = self
            .client
            .post(&url)
            .bearer_auth(token.access())
            .send()
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(AuthError::Unavailable(format!("logout returned {}", resp.status())));
        }
        Ok(())
    }
}

/// `GET {api_base}/menu` with the session's bearer token.
#[derive(Debug, Clone)]
pub struct HttpMenuFetcher {
    client: reqwest::Client,
    api_base: String,
}

impl HttpMenuFetcher {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
        }
    }
}

#[async_trait]
impl MenuFetcher for HttpMenuFetcher {
    async fn fetch_menu(&self, token: Option<&str>) -> Result<Vec<RemoteMenuEntry>, FetchError> {
        let url = join_url(&self.api_base, "menu");
        let mut req = self.client.get(&url);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(|e| FetchError::Network(e.to_string()))?;
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(FetchError::Unauthorized);
        }
        if !status.is_success() {
            return Err(FetchError::Network(format!("menu returned {status}")));
        }

        let bytes = resp.bytes().await.map_err(|e| FetchError::Network(e.to_string()))?;
        decode_body(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bare_and_wrapped_menus() {
        let bare: Vec<RemoteMenuEntry> =
            decode_body(br#"[{"name": "Orders", "path": "/orderlist"}]"#).unwrap();
        let wrapped: Vec<RemoteMenuEntry> =
            decode_body(br#"{"code": 200, "message": "ok", "data": [{"name": "Orders", "path": "/orderlist"}]}"#)
                .unwrap();
        assert_eq!(bare, wrapped);
    }

    #[test]
    fn login_payload_becomes_a_grant() {
        let body: LoginResponse = decode_body(
            br#"{"access_token": "a", "refresh_token": "r",
                 "user": {"id": 1, "username": "admin", "email": "", "role": "admin"}}"#,
        )
        .unwrap();
        let grant = body.into_grant();
        assert_eq!(grant.token.access(), "a");
        assert_eq!(grant.token.refresh(), Some("r"));
        assert!(grant.roles.contains("admin"));
        assert!(grant.user.email.is_none());
        assert_eq!(grant.user.user_id.as_uuid().as_u64_pair(), (0, 1));
    }

    #[test]
    fn urls_join_cleanly() {
        assert_eq!(join_url("http://h/api/v2/", "/menu"), "http://h/api/v2/menu");
    }
}

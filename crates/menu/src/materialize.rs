//! Menu materialization: raw source → canonical descriptor tree.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use navgate_auth::RoleSet;
use navgate_core::NavError;

use crate::{RemoteMenuEntry, RouteDescriptor, StaticMenuEntry};

/// Failure reported by a [`MenuFetcher`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("menu request was not authorized")]
    Unauthorized,

    #[error("unexpected menu payload: {0}")]
    Decode(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MenuError {
    #[error("menu fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("invalid menu definition: {0}")]
    Invalid(String),

    #[error("menu is empty")]
    Empty,
}

impl From<MenuError> for NavError {
    fn from(value: MenuError) -> Self {
        NavError::menu_unavailable(value.to_string())
    }
}

/// Remote menu collaborator.
#[async_trait]
pub trait MenuFetcher: Send + Sync {
    /// Fetch the raw menu for the session holding `token`.
    async fn fetch_menu(&self, token: Option<&str>) -> Result<Vec<RemoteMenuEntry>, FetchError>;
}

/// Where the menu comes from.
#[derive(Clone)]
pub enum MenuSource {
    /// Fixed local configuration.
    Static(Vec<StaticMenuEntry>),
    /// Backend menu endpoint.
    Remote(Arc<dyn MenuFetcher>),
}

impl core::fmt::Debug for MenuSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MenuSource::Static(entries) => f
                .debug_tuple("Static")
                .field(&format_args!("{} entries", entries.len()))
                .finish(),
            MenuSource::Remote(_) => f.write_str("Remote"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterializerConfig {
    /// Roles required for every top-level remote entry; the endpoint sends
    /// none of its own. An empty list leaves remote entries unrestricted.
    pub remote_default_roles: Vec<String>,
}

impl Default for MaterializerConfig {
    fn default() -> Self {
        Self {
            remote_default_roles: vec!["admin".to_string(), "super_admin".to_string()],
        }
    }
}

/// Produces the canonical, role-ready menu tree for a session.
#[derive(Debug, Clone)]
pub struct MenuMaterializer {
    source: MenuSource,
    config: MaterializerConfig,
}

impl MenuMaterializer {
    pub fn new(source: MenuSource) -> Self {
        Self::with_config(source, MaterializerConfig::default())
    }

    pub fn with_config(source: MenuSource, config: MaterializerConfig) -> Self {
        Self { source, config }
    }

    pub fn source(&self) -> &MenuSource {
        &self.source
    }

    /// Materialize the full (unfiltered) tree.
    ///
    /// Never returns a partial tree: any fetch or normalization failure fails
    /// the whole call.
    pub async fn materialize(&self, token: Option<&str>) -> Result<Vec<RouteDescriptor>, MenuError> {
        let tree: Vec<RouteDescriptor> = match &self.source {
            MenuSource::Static(entries) => entries
                .iter()
                .map(StaticMenuEntry::normalize)
                .collect::<Result<Vec<_>, _>>()?,
            MenuSource::Remote(fetcher) => {
                let raw = fetcher.fetch_menu(token).await.inspect_err(|e| {
                    tracing::warn!(error = %e, "remote menu fetch failed");
                })?;
                let roles: Option<RoleSet> = (!self.config.remote_default_roles.is_empty())
                    .then(|| self.config.remote_default_roles.iter().cloned().collect());
                raw.iter().map(|entry| entry.normalize(roles.as_ref())).collect()
            }
        };

        if tree.is_empty() {
            return Err(MenuError::Empty);
        }

        tracing::debug!(
            top_level = tree.len(),
            nodes = crate::descriptor::tree_size(&tree),
            "menu materialized"
        );
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedFetcher(Result<Vec<RemoteMenuEntry>, FetchError>);

    #[async_trait]
    impl MenuFetcher for FixedFetcher {
        async fn fetch_menu(&self, _token: Option<&str>) -> Result<Vec<RemoteMenuEntry>, FetchError> {
            self.0.clone()
        }
    }

    fn remote(name: &str, path: &str) -> RemoteMenuEntry {
        RemoteMenuEntry {
            id: None,
            name: name.to_string(),
            path: path.to_string(),
            icon: None,
            component: None,
            meta: Default::default(),
            children: None,
        }
    }

    #[tokio::test]
    async fn static_source_normalizes_every_entry() {
        let entries = StaticMenuEntry::list_from_json(
            r#"[{"path": "/dashboard", "name": "Dashboard"}, {"path": "/orders", "name": "Orders"}]"#,
        )
        .unwrap();
        let tree = MenuMaterializer::new(MenuSource::Static(entries))
            .materialize(None)
            .await
            .unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[1].name, "Orders");
    }

    #[tokio::test]
    async fn remote_source_applies_default_roles() {
        let fetcher = Arc::new(FixedFetcher(Ok(vec![remote("Orders", "/orders")])));
        let tree = MenuMaterializer::new(MenuSource::Remote(fetcher))
            .materialize(Some("token"))
            .await
            .unwrap();
        let roles = tree[0].meta.roles.as_ref().unwrap();
        assert!(roles.contains("admin") && roles.contains("super_admin"));
    }

    #[tokio::test]
    async fn empty_default_roles_leave_entries_unrestricted() {
        let fetcher = Arc::new(FixedFetcher(Ok(vec![remote("Orders", "/orders")])));
        let config = MaterializerConfig {
            remote_default_roles: vec![],
        };
        let tree = MenuMaterializer::with_config(MenuSource::Remote(fetcher), config)
            .materialize(None)
            .await
            .unwrap();
        assert!(tree[0].meta.roles.is_none());
    }

    #[tokio::test]
    async fn fetch_failure_is_reported_not_partial() {
        let fetcher = Arc::new(FixedFetcher(Err(FetchError::Network("timeout".into()))));
        let err = MenuMaterializer::new(MenuSource::Remote(fetcher))
            .materialize(Some("token"))
            .await
            .unwrap_err();
        assert_eq!(err, MenuError::Fetch(FetchError::Network("timeout".into())));
        assert!(matches!(NavError::from(err), NavError::MenuUnavailable(_)));
    }

    #[tokio::test]
    async fn empty_menu_is_an_error() {
        let fetcher = Arc::new(FixedFetcher(Ok(vec![])));
        let err = MenuMaterializer::new(MenuSource::Remote(fetcher))
            .materialize(None)
            .await
            .unwrap_err();
        assert_eq!(err, MenuError::Empty);
    }

    #[tokio::test]
    async fn one_bad_static_entry_fails_the_batch() {
        let entries = StaticMenuEntry::list_from_json(
            r#"[{"path": "/ok", "name": "Ok"}, {"path": "/anon"}]"#,
        )
        .unwrap();
        let err = MenuMaterializer::new(MenuSource::Static(entries))
            .materialize(None)
            .await
            .unwrap_err();
        assert!(matches!(err, MenuError::Invalid(_)));
    }
}

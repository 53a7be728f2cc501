//! The live, matchable route set.
//!
//! [`RouteTable`] is the seam to whatever routing engine renders pages. The
//! in-memory implementation matches `:param` segments and orders patterns by
//! specificity so literal routes win over parameterized ones.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use thiserror::Error;

use navgate_core::{collapse_separators, join_route_path, ROOT_PATH};
use navgate_menu::{ComponentRef, RouteDescriptor, RouteMeta};

/// One installed route, with its fully resolved path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveRoute {
    pub name: String,
    /// Full path pattern (e.g. `/payment/:orderId`).
    pub path: String,
    pub parent: Option<String>,
    pub component: Option<ComponentRef>,
    /// Effective metadata: a route under a public ancestor is public too.
    pub meta: RouteMeta,
}

/// Result of matching a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: LiveRoute,
    /// Path parameters (e.g. `{"orderId": "42"}`).
    pub params: BTreeMap<String, String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("route name '{0}' is already installed")]
    NameTaken(String),

    #[error("route '{name}' has an invalid path '{path}'")]
    InvalidPath { name: String, path: String },
}

/// Routing engine collaborator.
pub trait RouteTable: Send + Sync {
    fn install(&self, route: LiveRoute) -> Result<(), RouteTableError>;

    /// Remove a route by name, returning it if it was installed.
    fn uninstall(&self, name: &str) -> Option<LiveRoute>;

    fn contains(&self, name: &str) -> bool;

    fn match_path(&self, path: &str) -> Option<RouteMatch>;

    /// Installed route names, sorted.
    fn names(&self) -> Vec<String>;
}

/// Flatten a descriptor tree into live routes, parents before children.
pub fn flatten_routes(tree: &[RouteDescriptor]) -> Vec<LiveRoute> {
    let mut out = Vec::new();
    flatten_into(tree, "", None, false, &mut out);
    out
}

fn flatten_into(
    nodes: &[RouteDescriptor],
    parent_path: &str,
    parent_name: Option<&str>,
    parent_public: bool,
    out: &mut Vec<LiveRoute>,
) {
    for node in nodes {
        let path = normalize_request_path(&join_route_path(parent_path, &node.path));
        let public = parent_public || !node.meta.requires_auth;
        let mut meta = node.meta.clone();
        meta.requires_auth = !public;

        out.push(LiveRoute {
            name: node.name.clone(),
            path: path.clone(),
            parent: parent_name.map(str::to_string),
            component: node.component.clone(),
            meta,
        });
        flatten_into(node.children(), &path, Some(&node.name), public, out);
    }
}

/// Normalize a path: collapse separators, drop a trailing one.
pub(crate) fn normalize_request_path(path: &str) -> String {
    let collapsed = collapse_separators(path);
    let trimmed = collapsed.trim_end_matches('/');
    if trimmed.is_empty() {
        ROOT_PATH.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Match a route pattern against a path, extracting parameters.
///
/// Pattern: "/payment/:orderId"
/// Path: "/payment/42"
/// Result: Some({"orderId": "42"})
fn match_pattern(pattern: &str, path: &str) -> Option<BTreeMap<String, String>> {
    let pattern_parts: Vec<&str> = pattern.split('/').collect();
    let path_parts: Vec<&str> = path.split('/').collect();

    if pattern_parts.len() != path_parts.len() {
        return None;
    }

    let mut params = BTreeMap::new();
    for (pat, actual) in pattern_parts.iter().zip(path_parts.iter()) {
        if let Some(param_name) = pat.strip_prefix(':') {
            if actual.is_empty() {
                return None;
            }
            params.insert(param_name.to_string(), actual.to_string());
        } else if pat != actual {
            return None;
        }
    }
    Some(params)
}

#[derive(Debug, Default)]
struct TableInner {
    routes: HashMap<String, LiveRoute>,
    /// Route names in match order.
    order: Vec<String>,
}

impl TableInner {
    fn rebuild_order(&mut self) {
        let mut order: Vec<(usize, i64, String)> = self
            .routes
            .values()
            .map(|r| {
                let params = r.path.matches(':').count();
                let segments = r.path.matches('/').count() as i64;
                (params, -segments, r.name.clone())
            })
            .collect();
        order.sort();
        self.order = order.into_iter().map(|(_, _, name)| name).collect();
    }
}

/// Route table held in memory.
#[derive(Debug, Default)]
pub struct InMemoryRouteTable {
    inner: RwLock<TableInner>,
}

impl InMemoryRouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table preloaded with a fixed route tree (e.g. the static routes).
    pub fn with_routes(tree: &[RouteDescriptor]) -> Result<Self, RouteTableError> {
        let table = Self::new();
        for route in flatten_routes(tree) {
            table.install(route)?;
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .routes
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RouteTable for InMemoryRouteTable {
    fn install(&self, route: LiveRoute) -> Result<(), RouteTableError> {
        if !route.path.starts_with('/') {
            return Err(RouteTableError::InvalidPath {
                name: route.name,
                path: route.path,
            });
        }
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if inner.routes.contains_key(&route.name) {
            return Err(RouteTableError::NameTaken(route.name));
        }
        inner.routes.insert(route.name.clone(), route);
        inner.rebuild_order();
        Ok(())
    }

    fn uninstall(&self, name: &str) -> Option<LiveRoute> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let removed = inner.routes.remove(name);
        if removed.is_some() {
            inner.rebuild_order();
        }
        removed
    }

    fn contains(&self, name: &str) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .routes
            .contains_key(name)
    }

    fn match_path(&self, path: &str) -> Option<RouteMatch> {
        let path = normalize_request_path(path);
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.order.iter().find_map(|name| {
            let route = inner.routes.get(name)?;
            let params = match_pattern(&route.path, &path)?;
            Some(RouteMatch {
                route: route.clone(),
                params,
            })
        })
    }

    fn names(&self) -> Vec<String> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = inner.routes.keys().cloned().collect();
        names.sort();
        names
    }
}

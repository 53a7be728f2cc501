//! Canonical route descriptor.

use serde::{Deserialize, Serialize};

use navgate_auth::RoleSet;

/// Opaque handle resolved by the rendering layer (e.g. `/vmq/orderlist/index`).
///
/// The navigation core never looks inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentRef(String);

impl ComponentRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Route metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteMeta {
    pub title: String,
    pub icon: Option<String>,
    /// `None` = visible to every authenticated role set.
    pub roles: Option<RoleSet>,
    pub hide_in_menu: bool,
    /// Committing this route does not open a work tab.
    pub hide_tab: bool,
    /// The work tab for this route is pinned.
    pub fixed_tab: bool,
    pub requires_auth: bool,
}

impl Default for RouteMeta {
    fn default() -> Self {
        Self {
            title: String::new(),
            icon: None,
            roles: None,
            hide_in_menu: false,
            hide_tab: false,
            fixed_tab: false,
            requires_auth: true,
        }
    }
}

/// A node in the navigable tree.
///
/// `children: None` is a leaf. `Some(vec![])` is a branch whose children were
/// all pruned; it is *not* a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDescriptor {
    pub path: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentRef>,
    #[serde(default)]
    pub meta: RouteMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RouteDescriptor>>,
}

impl RouteDescriptor {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: path.into(),
            meta: RouteMeta {
                title: name.clone(),
                ..RouteMeta::default()
            },
            name,
            component: None,
            children: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.meta.title = title.into();
        self
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(ComponentRef::new(component));
        self
    }

    pub fn with_roles<I, R>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<navgate_auth::Role>,
    {
        self.meta.roles = Some(roles.into_iter().collect());
        self
    }

    pub fn with_children(mut self, children: Vec<RouteDescriptor>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.meta.hide_in_menu = true;
        self
    }

    pub fn without_tab(mut self) -> Self {
        self.meta.hide_tab = true;
        self
    }

    pub fn pinned(mut self) -> Self {
        self.meta.fixed_tab = true;
        self
    }

    /// Mark the route as reachable without a session.
    pub fn public(mut self) -> Self {
        self.meta.requires_auth = false;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn children(&self) -> &[RouteDescriptor] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Copy of this node without its subtree.
    pub(crate) fn detached(&self) -> Self {
        Self {
            path: self.path.clone(),
            name: self.name.clone(),
            component: self.component.clone(),
            meta: self.meta.clone(),
            children: None,
        }
    }

    /// Number of nodes in the subtree rooted here.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(Self::node_count).sum::<usize>()
    }
}

/// Number of nodes in a forest.
pub fn tree_size(tree: &[RouteDescriptor]) -> usize {
    tree.iter().map(RouteDescriptor::node_count).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_require_auth_and_title_from_name() {
        let d = RouteDescriptor::new("/dashboard", "Dashboard");
        assert!(d.meta.requires_auth);
        assert_eq!(d.meta.title, "Dashboard");
        assert!(d.is_leaf());
    }

    #[test]
    fn empty_children_is_not_a_leaf() {
        let d = RouteDescriptor::new("/x", "X").with_children(vec![]);
        assert!(!d.is_leaf());
        assert!(d.children().is_empty());
    }

    #[test]
    fn deserializes_with_missing_meta() {
        let d: RouteDescriptor =
            serde_json::from_str(r#"{"path": "/a", "name": "A"}"#).unwrap();
        assert!(d.meta.requires_auth);
        assert!(d.meta.roles.is_none());
        assert!(d.children.is_none());
    }

    #[test]
    fn counts_nodes() {
        let tree = vec![
            RouteDescriptor::new("/a", "A").with_children(vec![
                RouteDescriptor::new("b", "B"),
                RouteDescriptor::new("c", "C"),
            ]),
            RouteDescriptor::new("/d", "D"),
        ];
        assert_eq!(tree_size(&tree), 4);
    }
}

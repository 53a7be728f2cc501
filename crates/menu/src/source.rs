//! Raw menu shapes and their adapters into [`RouteDescriptor`].
//!
//! Two sources exist today:
//! - local configuration ([`StaticMenuEntry`]), camelCase JSON mirroring the
//!   client's route records (`meta.isHide`, `meta.noLogin`, ...);
//! - the backend menu endpoint ([`RemoteMenuEntry`]), which carries only
//!   title/icon metadata and no role information.

use serde::{Deserialize, Serialize};

use navgate_auth::RoleSet;

use crate::{ComponentRef, MenuError, RouteDescriptor, RouteMeta};

// ─────────────────────────────────────────────────────────────────────────────
// Local configuration
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaticMenuMeta {
    pub title: Option<String>,
    pub icon: Option<String>,
    pub roles: Option<Vec<String>>,
    pub is_hide: bool,
    pub is_hide_tab: bool,
    pub no_login: bool,
    pub fixed_tab: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticMenuEntry {
    pub path: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub component: Option<String>,
    #[serde(default)]
    pub meta: StaticMenuMeta,
    #[serde(default)]
    pub children: Option<Vec<StaticMenuEntry>>,
}

impl StaticMenuEntry {
    /// Parse a JSON array of entries.
    pub fn list_from_json(json: &str) -> Result<Vec<StaticMenuEntry>, MenuError> {
        serde_json::from_str(json).map_err(|e| MenuError::Invalid(e.to_string()))
    }

    /// Normalize into the canonical descriptor, recursively.
    ///
    /// Every entry must carry a name, since names identify live routes.
    pub fn normalize(&self) -> Result<RouteDescriptor, MenuError> {
        let name = self
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| MenuError::Invalid(format!("menu entry '{}' has no name", self.path)))?;

        let children = self
            .children
            .as_ref()
            .map(|children| children.iter().map(Self::normalize).collect::<Result<Vec<_>, _>>())
            .transpose()?;

        Ok(RouteDescriptor {
            path: self.path.clone(),
            meta: RouteMeta {
                title: self.meta.title.clone().unwrap_or_else(|| name.clone()),
                icon: self.meta.icon.clone(),
                roles: self
                    .meta
                    .roles
                    .as_ref()
                    .map(|roles| roles.iter().cloned().collect()),
                hide_in_menu: self.meta.is_hide,
                hide_tab: self.meta.is_hide_tab,
                fixed_tab: self.meta.fixed_tab,
                requires_auth: !self.meta.no_login,
            },
            name,
            component: self.component.clone().map(ComponentRef::new),
            children,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend menu endpoint
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteMenuMeta {
    pub title: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteMenuEntry {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub component: Option<String>,
    #[serde(default)]
    pub meta: RemoteMenuMeta,
    #[serde(default)]
    pub children: Option<Vec<RemoteMenuEntry>>,
}

impl RemoteMenuEntry {
    /// Normalize into the canonical descriptor.
    ///
    /// The endpoint sends `children: []` on leaves, so an empty list becomes
    /// a leaf here. `top_level_roles` is applied to this entry only; nested
    /// entries inherit visibility through pruning.
    pub fn normalize(&self, top_level_roles: Option<&RoleSet>) -> RouteDescriptor {
        let children = self
            .children
            .as_ref()
            .filter(|c| !c.is_empty())
            .map(|c| c.iter().map(|child| child.normalize(None)).collect());

        RouteDescriptor {
            path: self.path.clone(),
            name: self.name.clone(),
            component: self.component.clone().map(ComponentRef::new),
            meta: RouteMeta {
                title: self.meta.title.clone().unwrap_or_else(|| self.name.clone()),
                icon: self.meta.icon.clone().or_else(|| self.icon.clone()),
                roles: top_level_roles.cloned(),
                ..RouteMeta::default()
            },
            children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_entry_maps_client_meta() {
        let entries = StaticMenuEntry::list_from_json(
            r#"[{
                "path": "/wxqrcode",
                "name": "Wechat",
                "meta": {"title": "WeChat QR", "roles": ["admin"], "fixedTab": true},
                "children": [
                    {"path": "add", "name": "AddWechat", "component": "/vmq/wxqrcode/add/index",
                     "meta": {"isHide": true, "isHideTab": true}}
                ]
            }, {
                "path": "/payment", "name": "Payment", "meta": {"noLogin": true}
            }]"#,
        )
        .unwrap();

        let d = entries[0].normalize().unwrap();
        assert_eq!(d.meta.title, "WeChat QR");
        assert!(d.meta.fixed_tab);
        assert!(d.meta.roles.as_ref().unwrap().contains("admin"));
        let child = &d.children()[0];
        assert_eq!(child.meta.title, "AddWechat");
        assert!(child.meta.hide_in_menu);
        assert!(child.meta.hide_tab);
        assert!(child.meta.requires_auth);
        assert_eq!(child.component.as_ref().unwrap().as_str(), "/vmq/wxqrcode/add/index");

        let payment = entries[1].normalize().unwrap();
        assert!(!payment.meta.requires_auth);
        assert!(payment.meta.roles.is_none());
    }

    #[test]
    fn static_entry_without_name_is_invalid() {
        let entries = StaticMenuEntry::list_from_json(r#"[{"path": "/anon"}]"#).unwrap();
        assert!(matches!(entries[0].normalize(), Err(MenuError::Invalid(_))));
    }

    #[test]
    fn malformed_json_is_invalid() {
        assert!(matches!(
            StaticMenuEntry::list_from_json("{"),
            Err(MenuError::Invalid(_))
        ));
    }

    #[test]
    fn remote_entry_normalizes_icons_titles_and_leaves() {
        let entry: RemoteMenuEntry = serde_json::from_str(
            r#"{
                "id": 7, "name": "Orders", "path": "/orderlist", "icon": "top-icon",
                "component": "/vmq/orderlist/index",
                "meta": {"title": "Order list"},
                "children": []
            }"#,
        )
        .unwrap();
        let roles: RoleSet = ["admin", "super_admin"].into_iter().collect();
        let d = entry.normalize(Some(&roles));
        assert_eq!(d.meta.title, "Order list");
        assert_eq!(d.meta.icon.as_deref(), Some("top-icon"));
        assert!(d.is_leaf());
        assert_eq!(d.meta.roles.as_ref(), Some(&roles));
    }

    #[test]
    fn remote_children_carry_no_roles_of_their_own() {
        let entry: RemoteMenuEntry = serde_json::from_str(
            r#"{
                "name": "Alipay", "path": "/zfbqrcode", "meta": {"title": "Alipay", "icon": "meta-icon"},
                "children": [{"name": "AddAlipay", "path": "add"}]
            }"#,
        )
        .unwrap();
        let roles: RoleSet = ["admin"].into_iter().collect();
        let d = entry.normalize(Some(&roles));
        assert_eq!(d.meta.icon.as_deref(), Some("meta-icon"));
        let child = &d.children()[0];
        assert!(child.meta.roles.is_none());
        assert_eq!(child.meta.title, "AddAlipay");
    }
}

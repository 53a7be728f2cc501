//! Default landing page resolution.

use navgate_core::join_route_path;

use crate::RouteDescriptor;

fn is_candidate(node: &RouteDescriptor) -> bool {
    !node.path.trim().is_empty() && !node.meta.hide_in_menu
}

/// Full path of the first navigable leaf of `tree`, depth-first and
/// left-to-right.
///
/// Nodes with a blank path or hidden from the menu are skipped along with
/// their subtree. A branch whose children were all pruned is skipped too; it
/// never stands in for a leaf. Returns `None` when nothing qualifies.
pub fn first_leaf_path(tree: &[RouteDescriptor]) -> Option<String> {
    find_leaf(tree, "")
}

fn find_leaf(nodes: &[RouteDescriptor], parent: &str) -> Option<String> {
    nodes.iter().filter(|n| is_candidate(n)).find_map(|node| {
        let path = join_route_path(parent, &node.path);
        match node.children.as_deref() {
            None => Some(path),
            Some(children) => find_leaf(children, &path),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tree_has_no_home() {
        assert_eq!(first_leaf_path(&[]), None);
    }

    #[test]
    fn first_top_level_leaf_wins() {
        let tree = vec![
            RouteDescriptor::new("/dashboard", "Dashboard"),
            RouteDescriptor::new("/orders", "Orders"),
        ];
        assert_eq!(first_leaf_path(&tree).as_deref(), Some("/dashboard"));
    }

    #[test]
    fn descends_into_branches_and_joins_paths() {
        let tree = vec![
            RouteDescriptor::new("/wxqrcode/", "Wechat").with_children(vec![
                RouteDescriptor::new("add", "Add"),
                RouteDescriptor::new("manage", "Manage"),
            ]),
            RouteDescriptor::new("/orders", "Orders"),
        ];
        assert_eq!(first_leaf_path(&tree).as_deref(), Some("/wxqrcode/add"));
    }

    #[test]
    fn absolute_child_replaces_prefix() {
        let tree = vec![
            RouteDescriptor::new("/debug", "Debug")
                .with_children(vec![RouteDescriptor::new("/userDebug", "UserDebug")]),
        ];
        assert_eq!(first_leaf_path(&tree).as_deref(), Some("/userDebug"));
    }

    #[test]
    fn relative_top_level_path_is_rooted() {
        let tree = vec![RouteDescriptor::new("dashboard", "Dashboard")];
        assert_eq!(first_leaf_path(&tree).as_deref(), Some("/dashboard"));
    }

    #[test]
    fn hidden_and_blank_nodes_are_skipped_with_subtree() {
        let tree = vec![
            RouteDescriptor::new("  ", "Blank"),
            RouteDescriptor::new("/hidden", "Hidden")
                .hidden()
                .with_children(vec![RouteDescriptor::new("inner", "Inner")]),
            RouteDescriptor::new("/visible", "Visible"),
        ];
        assert_eq!(first_leaf_path(&tree).as_deref(), Some("/visible"));
    }

    #[test]
    fn pruned_branch_is_not_a_landing_page() {
        let tree = vec![
            RouteDescriptor::new("/empty", "Empty").with_children(vec![]),
            RouteDescriptor::new("/group", "Group").with_children(vec![
                RouteDescriptor::new("inner", "Inner").with_children(vec![]),
            ]),
            RouteDescriptor::new("/orders", "Orders"),
        ];
        assert_eq!(first_leaf_path(&tree).as_deref(), Some("/orders"));
    }

    #[test]
    fn only_pruned_branches_yield_none() {
        let tree = vec![RouteDescriptor::new("/empty", "Empty").with_children(vec![])];
        assert_eq!(first_leaf_path(&tree), None);
    }
}

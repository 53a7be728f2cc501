//! Role-based menu filtering.

use navgate_auth::RoleSet;

use crate::RouteDescriptor;

/// Return the part of `tree` visible to `roles`.
///
/// - A node is visible iff its `meta.roles` is absent or intersects `roles`.
/// - An invisible node is dropped together with its whole subtree.
/// - A visible branch keeps `Some(children)` even if every child is pruned.
/// - Sibling order is preserved.
///
/// The result is a freshly allocated tree; `tree` is never touched.
pub fn filter_by_roles(tree: &[RouteDescriptor], roles: &RoleSet) -> Vec<RouteDescriptor> {
    tree.iter()
        .filter(|node| RoleSet::admits(node.meta.roles.as_ref(), roles))
        .map(|node| {
            let mut kept = node.detached();
            kept.children = node
                .children
                .as_deref()
                .map(|children| filter_by_roles(children, roles));
            kept
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn roles(names: &[&'static str]) -> RoleSet {
        names.iter().copied().collect()
    }

    fn sample() -> Vec<RouteDescriptor> {
        vec![
            RouteDescriptor::new("/dashboard", "Dashboard").with_roles(["admin"]),
            RouteDescriptor::new("/public", "Public"),
            RouteDescriptor::new("/wxqrcode", "Wechat")
                .with_roles(["admin", "operator"])
                .with_children(vec![
                    RouteDescriptor::new("add", "AddWechat").with_roles(["admin"]),
                    RouteDescriptor::new("manage", "ManageWechat").with_roles(["operator"]),
                ]),
            RouteDescriptor::new("/secret", "Secret")
                .with_roles(["root"])
                .with_children(vec![RouteDescriptor::new("open", "OpenChild")]),
        ]
    }

    fn names(tree: &[RouteDescriptor]) -> Vec<String> {
        let mut out = Vec::new();
        for node in tree {
            out.push(node.name.clone());
            out.extend(names(node.children()));
        }
        out
    }

    #[test]
    fn keeps_unrestricted_and_intersecting_nodes() {
        let filtered = filter_by_roles(&sample(), &roles(&["admin"]));
        assert_eq!(names(&filtered), ["Dashboard", "Public", "Wechat", "AddWechat"]);
    }

    #[test]
    fn pruned_parent_drops_open_children() {
        let filtered = filter_by_roles(&sample(), &roles(&["operator"]));
        assert!(!names(&filtered).contains(&"OpenChild".to_string()));
        assert_eq!(names(&filtered), ["Public", "Wechat", "ManageWechat"]);
    }

    #[test]
    fn emptied_branch_stays_a_branch() {
        let tree = vec![
            RouteDescriptor::new("/group", "Group")
                .with_children(vec![RouteDescriptor::new("a", "A").with_roles(["admin"])]),
        ];
        let filtered = filter_by_roles(&tree, &roles(&["user"]));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].children, Some(vec![]));
    }

    #[test]
    fn no_roles_sees_only_unrestricted() {
        let filtered = filter_by_roles(&sample(), &RoleSet::new());
        assert_eq!(names(&filtered), ["Public"]);
    }

    #[test]
    fn input_is_untouched() {
        let tree = sample();
        let before = tree.clone();
        let _ = filter_by_roles(&tree, &roles(&["admin"]));
        assert_eq!(tree, before);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Properties
    // ─────────────────────────────────────────────────────────────────────────

    const ROLE_POOL: [&str; 4] = ["admin", "operator", "auditor", "guest"];

    fn arb_roles() -> impl Strategy<Value = Option<Vec<usize>>> {
        prop::option::of(prop::collection::vec(0..ROLE_POOL.len(), 0..3))
    }

    fn to_set(idx: &[usize]) -> RoleSet {
        idx.iter().map(|i| ROLE_POOL[*i]).collect()
    }

    fn arb_tree() -> impl Strategy<Value = Vec<RouteDescriptor>> {
        let leaf = ("[a-z]{1,6}", arb_roles()).prop_map(|(seg, r)| {
            let mut d = RouteDescriptor::new(seg.clone(), seg);
            d.meta.roles = r.map(|idx| to_set(&idx));
            d
        });
        let node = leaf.prop_recursive(4, 48, 4, |inner| {
            ("[a-z]{1,6}", arb_roles(), prop::collection::vec(inner, 0..4)).prop_map(
                |(seg, r, children)| {
                    let mut d = RouteDescriptor::new(seg.clone(), seg).with_children(children);
                    d.meta.roles = r.map(|idx| to_set(&idx));
                    d
                },
            )
        });
        prop::collection::vec(node, 0..5)
    }

    fn all_visible(tree: &[RouteDescriptor], held: &RoleSet) -> bool {
        tree.iter().all(|n| {
            RoleSet::admits(n.meta.roles.as_ref(), held) && all_visible(n.children(), held)
        })
    }

    /// Count nodes whose whole ancestor chain (including themselves) is visible.
    fn reachable_count(tree: &[RouteDescriptor], held: &RoleSet) -> usize {
        tree.iter()
            .filter(|n| RoleSet::admits(n.meta.roles.as_ref(), held))
            .map(|n| 1 + reachable_count(n.children(), held))
            .sum()
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        #[test]
        fn filter_is_idempotent(tree in arb_tree(), held in prop::collection::vec(0..ROLE_POOL.len(), 0..3)) {
            let held = to_set(&held);
            let once = filter_by_roles(&tree, &held);
            let twice = filter_by_roles(&once, &held);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn filter_is_sound(tree in arb_tree(), held in prop::collection::vec(0..ROLE_POOL.len(), 0..3)) {
            let held = to_set(&held);
            prop_assert!(all_visible(&filter_by_roles(&tree, &held), &held));
        }

        #[test]
        fn filter_is_complete_under_pruning(tree in arb_tree(), held in prop::collection::vec(0..ROLE_POOL.len(), 0..3)) {
            let held = to_set(&held);
            let filtered = filter_by_roles(&tree, &held);
            prop_assert_eq!(crate::descriptor::tree_size(&filtered), reachable_count(&tree, &held));
        }

        #[test]
        fn filter_preserves_branch_shape(tree in arb_tree(), held in prop::collection::vec(0..ROLE_POOL.len(), 0..3)) {
            let held = to_set(&held);
            fn same_shape(orig: &[RouteDescriptor], filtered: &[RouteDescriptor], held: &RoleSet) -> bool {
                let visible: Vec<&RouteDescriptor> = orig
                    .iter()
                    .filter(|o| RoleSet::admits(o.meta.roles.as_ref(), held))
                    .collect();
                visible.len() == filtered.len()
                    && visible.iter().zip(filtered).all(|(o, f)| {
                        o.name == f.name
                            && o.is_leaf() == f.is_leaf()
                            && same_shape(o.children(), f.children(), held)
                    })
            }
            prop_assert!(same_shape(&tree, &filter_by_roles(&tree, &held), &held));
        }
    }
}

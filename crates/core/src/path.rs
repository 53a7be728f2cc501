//! Route path helpers shared by the home resolver and the route registry.

/// The application root path.
pub const ROOT_PATH: &str = "/";

const SEPARATOR: char = '/';

/// Whether a route segment is absolute (starts with the path separator).
pub fn is_absolute(segment: &str) -> bool {
    segment.starts_with(SEPARATOR)
}

/// Collapse runs of repeated separators into one.
pub fn collapse_separators(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_sep = false;
    for c in path.chars() {
        if c == SEPARATOR {
            if !prev_sep {
                out.push(c);
            }
            prev_sep = true;
        } else {
            out.push(c);
            prev_sep = false;
        }
    }
    out
}

/// Resolve a route segment against its parent's accumulated path.
///
/// An absolute segment replaces the prefix as-is. A relative segment is
/// appended to the parent with a separator, collapsing repeated separators,
/// so top-level relative segments resolve under `/`.
pub fn join_route_path(parent: &str, segment: &str) -> String {
    if is_absolute(segment) {
        segment.to_string()
    } else {
        collapse_separators(&format!("{parent}{SEPARATOR}{segment}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn absolute_segment_replaces_prefix() {
        assert_eq!(join_route_path("/wxqrcode", "/orders"), "/orders");
    }

    #[test]
    fn relative_segment_is_appended() {
        assert_eq!(join_route_path("/wxqrcode", "add"), "/wxqrcode/add");
        assert_eq!(join_route_path("", "dashboard"), "/dashboard");
    }

    #[test]
    fn repeated_separators_collapse() {
        assert_eq!(join_route_path("/a/", "b"), "/a/b");
        assert_eq!(join_route_path("/a//", "b//c"), "/a/b/c");
        assert_eq!(collapse_separators("///"), "/");
    }

    proptest! {
        #[test]
        fn relative_joins_never_contain_double_separators(
            parent in "(/[a-z]{0,4}){0,4}/?",
            segment in "[a-z]{1,4}(/{1,3}[a-z]{1,4}){0,3}"
        ) {
            let joined = join_route_path(&parent, &segment);
            prop_assert!(!joined.contains("//"));
            prop_assert!(joined.starts_with('/'));
        }
    }
}

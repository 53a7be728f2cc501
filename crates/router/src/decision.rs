//! Outcome of one guard invocation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::LiveRoute;

/// A requested location: path plus optional query and fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NavTarget {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl NavTarget {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: None,
            hash: None,
        }
    }

    /// Split a raw location (`/orders?page=2#top`) into its parts.
    pub fn parse(raw: &str) -> Self {
        let (rest, hash) = match raw.split_once('#') {
            Some((rest, hash)) => (rest, Some(hash.to_string())),
            None => (raw, None),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (rest, None),
        };
        Self {
            path: path.to_string(),
            query: query.filter(|q| !q.is_empty()),
            hash: hash.filter(|h| !h.is_empty()),
        }
    }

    /// Reassemble the full location string.
    pub fn to_location(&self) -> String {
        let mut out = self.path.clone();
        if let Some(q) = &self.query {
            out.push('?');
            out.push_str(q);
        }
        if let Some(h) = &self.hash {
            out.push('#');
            out.push_str(h);
        }
        out
    }
}

impl From<&str> for NavTarget {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl core::fmt::Display for NavTarget {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.to_location())
    }
}

/// Navigate somewhere else instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    pub location: NavTarget,
    /// Replace the current history entry rather than pushing a new one.
    pub replace: bool,
}

impl Redirect {
    pub fn push(location: impl Into<NavTarget>) -> Self {
        Self {
            location: location.into(),
            replace: false,
        }
    }

    pub fn replace(location: impl Into<NavTarget>) -> Self {
        Self {
            location: location.into(),
            replace: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    NotFound,
}

impl BlockReason {
    /// HTTP-style status the blocked page represents.
    pub fn code(self) -> u16 {
        match self {
            BlockReason::NotFound => 404,
        }
    }
}

/// Stay on the requested location but render an error page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blocked {
    pub reason: BlockReason,
    pub target: NavTarget,
    /// Path of the page to render in place of the target.
    pub render: String,
}

/// The transition went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed {
    pub route: LiveRoute,
    pub params: BTreeMap<String, String>,
    pub target: NavTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavDecision {
    Proceed(Committed),
    Redirect(Redirect),
    Block(Blocked),
}

impl NavDecision {
    pub fn is_proceed(&self) -> bool {
        matches!(self, NavDecision::Proceed(_))
    }

    /// Redirect destination path, if this is a redirect.
    pub fn redirect_path(&self) -> Option<&str> {
        match self {
            NavDecision::Redirect(r) => Some(r.location.path.as_str()),
            _ => None,
        }
    }

    /// Name of the committed route, if this proceeds.
    pub fn route_name(&self) -> Option<&str> {
        match self {
            NavDecision::Proceed(c) => Some(c.route.name.as_str()),
            _ => None,
        }
    }
}

impl core::fmt::Display for NavDecision {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            NavDecision::Proceed(c) => write!(f, "proceed {} ({})", c.target, c.route.name),
            NavDecision::Redirect(r) if r.replace => write!(f, "redirect {} (replace)", r.location),
            NavDecision::Redirect(r) => write!(f, "redirect {}", r.location),
            NavDecision::Block(b) => write!(f, "block {} ({} -> {})", b.target, b.reason.code(), b.render),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_query_and_hash() {
        let t = NavTarget::parse("/orders?page=2#top");
        assert_eq!(t.path, "/orders");
        assert_eq!(t.query.as_deref(), Some("page=2"));
        assert_eq!(t.hash.as_deref(), Some("top"));
        assert_eq!(t.to_location(), "/orders?page=2#top");
    }

    #[test]
    fn hash_may_contain_question_marks() {
        let t = NavTarget::parse("/a#frag?x");
        assert_eq!(t.path, "/a");
        assert!(t.query.is_none());
        assert_eq!(t.hash.as_deref(), Some("frag?x"));
    }

    #[test]
    fn empty_parts_are_dropped() {
        let t = NavTarget::parse("/a?#");
        assert_eq!(t, NavTarget::new("/a"));
    }

    #[test]
    fn block_reason_code() {
        assert_eq!(BlockReason::NotFound.code(), 404);
    }
}

//! Work tabs: the strip of recently opened pages.

use serde::{Deserialize, Serialize};

use crate::{LiveRoute, RouteTable};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkTab {
    pub name: String,
    /// Concrete path that was opened (parameters filled in).
    pub path: String,
    pub title: String,
    /// Pinned tabs sort first and are kept on `close_others`.
    pub fixed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worktabs {
    tabs: Vec<WorkTab>,
    active: Option<String>,
}

impl Worktabs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tabs(&self) -> &[WorkTab] {
        &self.tabs
    }

    /// Path of the active tab.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Record a committed navigation.
    ///
    /// Routes marked `hide_tab` leave the strip untouched. Reopening a path
    /// only re-activates its tab.
    pub fn open(&mut self, route: &LiveRoute, path: &str) {
        if route.meta.hide_tab {
            return;
        }
        if !self.tabs.iter().any(|t| t.path == path) {
            let tab = WorkTab {
                name: route.name.clone(),
                path: path.to_string(),
                title: route.meta.title.clone(),
                fixed: route.meta.fixed_tab,
            };
            if tab.fixed {
                let at = self.tabs.iter().take_while(|t| t.fixed).count();
                self.tabs.insert(at, tab);
            } else {
                self.tabs.push(tab);
            }
        }
        self.active = Some(path.to_string());
    }

    /// Close one tab. The neighbour to its left (or right) becomes active.
    pub fn close(&mut self, path: &str) -> Option<WorkTab> {
        let idx = self.tabs.iter().position(|t| t.path == path)?;
        let removed = self.tabs.remove(idx);
        if self.active.as_deref() == Some(path) {
            self.active = self
                .tabs
                .get(idx.saturating_sub(1))
                .or_else(|| self.tabs.first())
                .map(|t| t.path.clone());
        }
        Some(removed)
    }

    /// Keep only pinned tabs and the one at `path`.
    pub fn close_others(&mut self, path: &str) {
        self.tabs.retain(|t| t.fixed || t.path == path);
        if !self.tabs.iter().any(|t| Some(t.path.as_str()) == self.active.as_deref()) {
            self.active = self.tabs.last().map(|t| t.path.clone());
        }
    }

    /// Drop tabs whose path no longer resolves in `table`. Returns how many
    /// were dropped.
    pub fn retain_routable(&mut self, table: &dyn RouteTable) -> usize {
        let before = self.tabs.len();
        self.tabs.retain(|t| table.match_path(&t.path).is_some());
        let active_gone = self
            .active
            .as_ref()
            .is_some_and(|active| !self.tabs.iter().any(|t| &t.path == active));
        if active_gone {
            self.active = None;
        }
        before - self.tabs.len()
    }

    pub fn clear(&mut self) {
        self.tabs.clear();
        self.active = None;
    }
}

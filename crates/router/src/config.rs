use std::time::Duration;

use serde::{Deserialize, Serialize};

use navgate_core::ROOT_PATH;
use navgate_menu::StaticPaths;

/// Navigation guard settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    pub login_path: String,
    /// Bare entry path; redirected to the session's home page.
    pub root_path: String,
    pub not_found_path: String,
    pub server_error_path: String,
    /// Pause after materializing the menu, before routes go live.
    pub settle_delay_ms: u64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            login_path: StaticPaths::LOGIN.to_string(),
            root_path: ROOT_PATH.to_string(),
            not_found_path: StaticPaths::NOT_FOUND.to_string(),
            server_error_path: StaticPaths::SERVER_ERROR.to_string(),
            settle_delay_ms: 300,
        }
    }
}

impl GuardConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }
}

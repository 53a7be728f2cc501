//! Shell configuration: a JSON file plus environment overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use navgate_menu::MaterializerConfig;
use navgate_observability::{LogConfig, LogFormat};
use navgate_router::GuardConfig;

pub const CONFIG_ENV: &str = "NAVGATE_CONFIG";
pub const API_BASE_ENV: &str = "NAVGATE_API_BASE";
pub const MENU_FILE_ENV: &str = "NAVGATE_MENU_FILE";
pub const SETTLE_DELAY_ENV: &str = "NAVGATE_SETTLE_DELAY_MS";
pub const LOG_FORMAT_ENV: &str = navgate_observability::tracing::LOG_FORMAT_ENV;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config in {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value '{value}' for {var}: {reason}")]
    Env {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Where the menu comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MenuSourceConfig {
    /// Local entries; the bundled menu when `file` is unset.
    Static {
        #[serde(default)]
        file: Option<PathBuf>,
    },
    /// The backend menu endpoint at `api_base`.
    Remote,
}

impl Default for MenuSourceConfig {
    fn default() -> Self {
        MenuSourceConfig::Static { file: None }
    }
}

/// Who checks credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuthSourceConfig {
    /// In-memory users; the bundled demo users when `users_file` is unset.
    Static {
        #[serde(default)]
        users_file: Option<PathBuf>,
    },
    /// The backend login endpoint at `api_base`.
    Remote,
}

impl Default for AuthSourceConfig {
    fn default() -> Self {
        AuthSourceConfig::Static { users_file: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Backend base URL, e.g. `http://localhost:8080/api/v2`.
    pub api_base: Option<String>,
    pub menu: MenuSourceConfig,
    pub auth: AuthSourceConfig,
    pub guard: GuardConfig,
    pub materializer: MaterializerConfig,
    pub log: LogConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            menu: MenuSourceConfig::default(),
            auth: AuthSourceConfig::default(),
            guard: GuardConfig::default(),
            materializer: MaterializerConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl ShellConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            origin: "inline config".to_string(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            origin: path.display().to_string(),
            source,
        })
    }

    /// Load from the file named by `NAVGATE_CONFIG` (defaults when unset),
    /// then apply environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let lookup = |var: &str| std::env::var(var).ok().filter(|v| !v.trim().is_empty());
        let mut config = match lookup(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    /// Apply `NAVGATE_*` overrides read through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(base) = lookup(API_BASE_ENV) {
            self.api_base = Some(base.trim_end_matches('/').to_string());
        }
        if let Some(file) = lookup(MENU_FILE_ENV) {
            self.menu = MenuSourceConfig::Static {
                file: Some(PathBuf::from(file)),
            };
        }
        if let Some(raw) = lookup(SETTLE_DELAY_ENV) {
            self.guard.settle_delay_ms = raw.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::Env {
                var: SETTLE_DELAY_ENV,
                value: raw.clone(),
                reason: e.to_string(),
            })?;
        }
        if let Some(raw) = lookup(LOG_FORMAT_ENV) {
            self.log.format = raw.parse::<LogFormat>().map_err(|e| ConfigError::Env {
                var: LOG_FORMAT_ENV,
                value: raw.clone(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_use_bundled_sources() {
        let cfg = ShellConfig::default();
        assert_eq!(cfg.menu, MenuSourceConfig::Static { file: None });
        assert_eq!(cfg.auth, AuthSourceConfig::Static { users_file: None });
        assert_eq!(cfg.guard.settle_delay_ms, 300);
    }

    #[test]
    fn parses_remote_config() {
        let cfg = ShellConfig::from_json_str(
            r#"{
                "api_base": "http://localhost:8080/api/v2",
                "menu": {"kind": "remote"},
                "auth": {"kind": "remote"},
                "guard": {"settle_delay_ms": 0},
                "materializer": {"remote_default_roles": ["admin"]}
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.menu, MenuSourceConfig::Remote);
        assert_eq!(cfg.guard.settle_delay_ms, 0);
        assert_eq!(cfg.guard.login_path, "/login");
        assert_eq!(cfg.materializer.remote_default_roles, ["admin"]);
    }

    #[test]
    fn env_overrides_win() {
        let mut cfg = ShellConfig::default();
        cfg.apply_overrides(env(&[
            (API_BASE_ENV, "http://api.local/"),
            (MENU_FILE_ENV, "/etc/navgate/menu.json"),
            (SETTLE_DELAY_ENV, "25"),
            (LOG_FORMAT_ENV, "pretty"),
        ]))
        .unwrap();
        assert_eq!(cfg.api_base.as_deref(), Some("http://api.local"));
        assert_eq!(
            cfg.menu,
            MenuSourceConfig::Static {
                file: Some(PathBuf::from("/etc/navgate/menu.json"))
            }
        );
        assert_eq!(cfg.guard.settle_delay_ms, 25);
        assert_eq!(cfg.log.format, LogFormat::Pretty);
    }

    #[test]
    fn bad_env_values_are_reported() {
        let mut cfg = ShellConfig::default();
        let err = cfg
            .apply_overrides(env(&[(SETTLE_DELAY_ENV, "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: SETTLE_DELAY_ENV, .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ShellConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}

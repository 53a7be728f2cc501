//! `navgate-shell`
//!
//! **Responsibility:** wire the navigation core into a runnable client.
//!
//! This crate provides:
//! - [`Shell`], the composition root with login/logout
//! - configuration loading from a JSON file and `NAVGATE_*` variables
//! - HTTP authenticator and menu fetcher (feature `http`)

pub mod app;
pub mod config;
#[cfg(feature = "http")]
pub mod remote;

pub use app::{Shell, ShellError, TracingUi};
pub use config::{AuthSourceConfig, ConfigError, MenuSourceConfig, ShellConfig};
#[cfg(feature = "http")]
pub use remote::{HttpAuthenticator, HttpMenuFetcher};

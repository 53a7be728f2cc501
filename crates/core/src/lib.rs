//! `navgate-core`: shared building blocks for the navigation shell.
//!
//! This crate holds the error taxonomy, strongly-typed identifiers and route
//! path helpers. It has no async or IO concerns.

pub mod error;
pub mod id;
pub mod path;

pub use error::{NavError, NavResult};
pub use id::{SessionId, UserId};
pub use path::{collapse_separators, is_absolute, join_route_path, ROOT_PATH};

//! `navgate-menu`: the navigable tree and the pure transforms over it.
//!
//! - [`descriptor`]: canonical [`RouteDescriptor`] shape
//! - [`source`] / [`materialize`]: raw menu shapes and their normalization
//! - [`filter`]: role-based pruning
//! - [`home`]: default landing path resolution
//! - [`static_routes`]: routes that exist before any menu is registered

pub mod descriptor;
pub mod filter;
pub mod home;
pub mod materialize;
pub mod source;
pub mod static_routes;

pub use descriptor::{tree_size, ComponentRef, RouteDescriptor, RouteMeta};
pub use filter::filter_by_roles;
pub use home::first_leaf_path;
pub use materialize::{FetchError, MaterializerConfig, MenuError, MenuFetcher, MenuMaterializer, MenuSource};
pub use source::{RemoteMenuEntry, RemoteMenuMeta, StaticMenuEntry, StaticMenuMeta};
pub use static_routes::{static_routes, StaticPaths};

//! `navgate-router`: live route set and the navigation guard.
//!
//! The guard runs before every client-side page transition and resolves it
//! to one [`NavDecision`]: proceed, redirect, or block. Dynamic routes are
//! installed once per session from the materialized, role-filtered menu.

pub mod config;
pub mod decision;
pub mod guard;
pub mod registration;
pub mod registry;
pub mod table;
pub mod ui;
pub mod worktab;

pub use config::GuardConfig;
pub use decision::{BlockReason, Blocked, Committed, NavDecision, NavTarget, Redirect};
pub use guard::NavigationGuard;
pub use registration::{RegisteredMenu, Registration, RegistrationController};
pub use registry::{RegistrationError, RouteRegistry};
pub use table::{flatten_routes, InMemoryRouteTable, LiveRoute, RouteMatch, RouteTable, RouteTableError};
pub use ui::{LoadingHandle, NoopUi, RecordingUi, UiFeedback};
pub use worktab::{WorkTab, Worktabs};

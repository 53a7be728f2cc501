//! `navgate-auth`: session and role boundary of the navigation shell.
//!
//! This crate is intentionally decoupled from transport and storage: it owns
//! the process-wide session state and the role vocabulary used by menu
//! filtering, and defines the authentication collaborator contract.

pub mod authenticator;
pub mod roles;
pub mod session;
pub mod token;

pub use authenticator::{AuthError, Authenticator, Credentials, LoginGrant, StaticAuthenticator};
pub use roles::{Role, RoleSet};
pub use session::{SessionState, SessionStore, UserProfile};
pub use token::{SessionToken, TokenValidationError};

//! The composition root: one session, one route table, one guard.

use std::sync::Arc;

use thiserror::Error;

use navgate_auth::{AuthError, Authenticator, Credentials, SessionState, SessionStore, StaticAuthenticator};
use navgate_menu::{static_routes, MenuError, MenuMaterializer, MenuSource, StaticMenuEntry};
use navgate_router::{
    InMemoryRouteTable, LiveRoute, LoadingHandle, NavDecision, NavTarget, NavigationGuard, Redirect,
    RouteTableError, UiFeedback,
};

use crate::config::{AuthSourceConfig, ConfigError, MenuSourceConfig, ShellConfig};

const DEFAULT_MENU: &str = include_str!("../assets/default_menu.json");
const DEMO_USERS: &str = include_str!("../assets/demo_users.json");

#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Menu(#[from] MenuError),

    #[error("static routes rejected: {0}")]
    Routes(#[from] RouteTableError),

    #[error("{0} requires 'api_base' to be set")]
    MissingApiBase(&'static str),

    #[error("{0} requires the 'http' feature")]
    HttpDisabled(&'static str),
}

/// Logs UI feedback through `tracing`; the shell has no real UI.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingUi;

impl UiFeedback for TracingUi {
    fn begin_loading(&self) -> LoadingHandle {
        tracing::debug!("loading started");
        LoadingHandle::new(|| tracing::debug!("loading finished"))
    }

    fn set_page_title(&self, route: &LiveRoute) {
        tracing::info!(title = %route.meta.title, route = %route.name, "page title");
    }
}

pub struct Shell {
    authenticator: Arc<dyn Authenticator>,
    session: Arc<SessionStore>,
    guard: NavigationGuard,
}

impl Shell {
    /// Wire a shell from explicit collaborators.
    pub fn new(
        config: &ShellConfig,
        authenticator: Arc<dyn Authenticator>,
        source: MenuSource,
        ui: Arc<dyn UiFeedback>,
    ) -> Result<Self, ShellError> {
        let session = Arc::new(SessionStore::new());
        let table = Arc::new(InMemoryRouteTable::with_routes(&static_routes())?);
        let materializer = MenuMaterializer::with_config(source, config.materializer.clone());
        let guard = NavigationGuard::new(config.guard.clone(), Arc::clone(&session), table, materializer, ui);
        Ok(Self {
            authenticator,
            session,
            guard,
        })
    }

    /// Wire a shell from configuration alone.
    pub fn from_config(config: &ShellConfig, ui: Arc<dyn UiFeedback>) -> Result<Self, ShellError> {
        let authenticator = build_authenticator(config)?;
        let source = build_menu_source(config)?;
        tracing::info!(source = ?source, "shell configured");
        Self::new(config, authenticator, source, ui)
    }

    pub fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    pub fn session(&self) -> SessionState {
        self.session.snapshot()
    }

    /// Authenticate, start a fresh session and land on the root path.
    ///
    /// On bad credentials the previous session is left as it was.
    pub async fn login(&self, credentials: &Credentials) -> Result<NavDecision, ShellError> {
        let grant = self.authenticator.login(credentials).await.inspect_err(|e| {
            tracing::warn!(username = %credentials.username, error = %e, "login rejected");
        })?;
        let session_id = self.session.login(grant);
        tracing::info!(session_id = %session_id, username = %credentials.username, "logged in");

        let root = NavTarget::new(self.guard.config().root_path.clone());
        Ok(self.guard.navigate(root).await)
    }

    /// End the session and return the redirect to the login page.
    ///
    /// The backend is notified best-effort; local state is cleared either way.
    pub async fn logout(&self) -> NavDecision {
        if let Some(token) = self.session.logout() {
            if let Err(e) = self.authenticator.logout(&token).await {
                tracing::warn!(error = %e, "backend logout failed; session cleared locally");
            }
        }
        self.guard.reset_routes().await;
        NavDecision::Redirect(Redirect::push(NavTarget::new(self.guard.config().login_path.clone())))
    }

    pub async fn navigate(&self, raw: &str) -> NavDecision {
        self.guard.navigate(NavTarget::parse(raw)).await
    }
}

impl core::fmt::Debug for Shell {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Shell")
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}

fn build_authenticator(config: &ShellConfig) -> Result<Arc<dyn Authenticator>, ShellError> {
    match &config.auth {
        AuthSourceConfig::Static { users_file } => {
            let json = match users_file {
                Some(path) => read_file(path)?,
                None => DEMO_USERS.to_string(),
            };
            Ok(Arc::new(StaticAuthenticator::from_json_str(&json)?))
        }
        AuthSourceConfig::Remote => {
            let base = config.api_base.as_deref().ok_or(ShellError::MissingApiBase("remote auth"))?;
            remote_authenticator(base)
        }
    }
}

fn build_menu_source(config: &ShellConfig) -> Result<MenuSource, ShellError> {
    match &config.menu {
        MenuSourceConfig::Static { file } => {
            let entries = match file {
                Some(path) => StaticMenuEntry::list_from_json(&read_file(path)?)?,
                None => StaticMenuEntry::list_from_json(DEFAULT_MENU)?,
            };
            Ok(MenuSource::Static(entries))
        }
        MenuSourceConfig::Remote => {
            let base = config.api_base.as_deref().ok_or(ShellError::MissingApiBase("remote menu"))?;
            remote_menu_source(base)
        }
    }
}

fn read_file(path: &std::path::Path) -> Result<String, ShellError> {
    std::fs::read_to_string(path).map_err(|source| {
        ShellError::Config(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    })
}

#[cfg(feature = "http")]
fn remote_authenticator(base: &str) -> Result<Arc<dyn Authenticator>, ShellError> {
    Ok(Arc::new(crate::remote::HttpAuthenticator::new(base)))
}

#[cfg(not(feature = "http"))]
fn remote_authenticator(_base: &str) -> Result<Arc<dyn Authenticator>, ShellError> {
    Err(ShellError::HttpDisabled("remote auth"))
}

#[cfg(feature = "http")]
fn remote_menu_source(base: &str) -> Result<MenuSource, ShellError> {
    Ok(MenuSource::Remote(Arc::new(crate::remote::HttpMenuFetcher::new(base))))
}

#[cfg(not(feature = "http"))]
fn remote_menu_source(_base: &str) -> Result<MenuSource, ShellError> {
    Err(ShellError::HttpDisabled("remote menu"))
}

//! The navigation guard.
//!
//! Every client-side transition goes through [`NavigationGuard::navigate`],
//! which always resolves to exactly one [`NavDecision`]. Errors raised while
//! evaluating a target never escape: they are mapped to a redirect or a
//! block in [`NavigationGuard::recover`].

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tracing::instrument;

use navgate_auth::{SessionState, SessionStore};
use navgate_core::{NavError, NavResult, SessionId};
use navgate_menu::{MenuMaterializer, RouteDescriptor};

use crate::decision::{BlockReason, Blocked, Committed, NavDecision, NavTarget, Redirect};
use crate::table::normalize_request_path;
use crate::{GuardConfig, RegisteredMenu, RegistrationController, RouteMatch, RouteTable, UiFeedback, Worktabs};

pub struct NavigationGuard {
    config: GuardConfig,
    session: Arc<SessionStore>,
    table: Arc<dyn RouteTable>,
    registration: RegistrationController,
    ui: Arc<dyn UiFeedback>,
    worktabs: Mutex<Worktabs>,
}

impl NavigationGuard {
    pub fn new(
        config: GuardConfig,
        session: Arc<SessionStore>,
        table: Arc<dyn RouteTable>,
        materializer: MenuMaterializer,
        ui: Arc<dyn UiFeedback>,
    ) -> Self {
        let registration = RegistrationController::new(
            Arc::clone(&session),
            Arc::clone(&table),
            materializer,
            Arc::clone(&ui),
            config.settle_delay(),
        );
        Self {
            config,
            session,
            table,
            registration,
            ui,
            worktabs: Mutex::new(Worktabs::new()),
        }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn table(&self) -> &Arc<dyn RouteTable> {
        &self.table
    }

    pub fn registration(&self) -> &RegistrationController {
        &self.registration
    }

    /// Role-filtered menu of the current session, for sidebar rendering.
    pub fn menu(&self) -> Option<Arc<Vec<RouteDescriptor>>> {
        self.registration.current().map(|m| m.menu)
    }

    pub fn home_path(&self) -> Option<String> {
        self.registration.current().and_then(|m| m.home_path)
    }

    /// Snapshot of the work tab strip.
    pub fn worktabs(&self) -> Worktabs {
        self.lock_tabs().clone()
    }

    pub fn close_tab(&self, path: &str) -> bool {
        self.lock_tabs().close(path).is_some()
    }

    pub fn close_other_tabs(&self, path: &str) {
        self.lock_tabs().close_others(path);
    }

    /// Resolve one navigation attempt.
    #[instrument(skip(self, target), fields(path = %target.path))]
    pub async fn navigate(&self, target: NavTarget) -> NavDecision {
        let mut session = self.session.snapshot();
        if let Err(e) = session.validate(Utc::now()) {
            tracing::warn!(session_id = %session.session_id(), error = %e, "session token rejected");
            self.force_logout(session.session_id()).await;
            session = self.session.snapshot();
        }

        let outcome = if session.is_authenticated() {
            self.evaluate_authenticated(&session, &target).await
        } else {
            self.evaluate_anonymous(&target)
        };
        let decision = match outcome {
            Ok(decision) => decision,
            Err(err) => self.recover(session.session_id(), &target, err).await,
        };
        match &decision {
            NavDecision::Proceed(c) => tracing::debug!(route = %c.route.name, "navigation committed"),
            NavDecision::Redirect(r) => tracing::debug!(to = %r.location, replace = r.replace, "navigation redirected"),
            NavDecision::Block(b) => tracing::debug!(code = b.reason.code(), "navigation blocked"),
        }
        decision
    }

    /// Remove the dynamic routes and the tab strip. The session is untouched.
    pub async fn reset_routes(&self) {
        self.registration.reset().await;
        self.lock_tabs().clear();
    }

    fn evaluate_anonymous(&self, target: &NavTarget) -> NavResult<NavDecision> {
        let is_login = self.same_path(&target.path, &self.config.login_path);
        match self.table.match_path(&target.path) {
            Some(m) if is_login || !m.route.meta.requires_auth => Ok(self.commit(m, target)),
            _ if is_login => Err(NavError::route_not_found(target.path.clone())),
            _ => Err(NavError::AuthRequired),
        }
    }

    async fn evaluate_authenticated(&self, session: &SessionState, target: &NavTarget) -> NavResult<NavDecision> {
        let registration = self.registration.ensure_registered(session).await?;
        if registration.was_installed() {
            self.prune_tabs();
        }
        let mut menu: RegisteredMenu = registration.into_menu();
        let mut retried = false;

        loop {
            if self.same_path(&target.path, &self.config.root_path) {
                if let Some(home) = menu
                    .home_path
                    .as_deref()
                    .filter(|home| !self.same_path(home, &self.config.root_path))
                {
                    return Ok(NavDecision::Redirect(Redirect::replace(NavTarget::new(home))));
                }
            }

            if let Some(m) = self.table.match_path(&target.path) {
                return Ok(self.commit(m, target));
            }

            if retried {
                return Err(NavError::route_not_found(target.path.clone()));
            }
            retried = true;

            tracing::info!(generation = menu.generation, "no live route matched; re-registering once");
            let again = self.registration.reregister(session, menu.generation).await?;
            if again.was_installed() {
                self.prune_tabs();
            }
            menu = again.into_menu();
        }
    }

    /// Map an evaluation error to its terminal decision. `epoch` is the
    /// session the attempt was evaluated under.
    async fn recover(&self, epoch: SessionId, target: &NavTarget, err: NavError) -> NavDecision {
        let err = if err.forces_logout() && self.session.snapshot().session_id() != epoch {
            tracing::debug!(error = %err, "failure belongs to a replaced session");
            NavError::SessionSuperseded
        } else {
            err
        };
        match err {
            NavError::AuthRequired => {
                tracing::info!("authentication required");
                self.logout_to_login(epoch).await
            }
            // Menu failures land on login rather than the server error page,
            // which is itself protected and unreachable once logged out.
            NavError::MenuUnavailable(_) => {
                tracing::error!(error = %err, "menu unavailable; logging out");
                self.logout_to_login(epoch).await
            }
            NavError::SessionSuperseded => {
                tracing::warn!("session changed mid-navigation");
                if self.session.snapshot().is_authenticated() {
                    NavDecision::Redirect(Redirect::replace(target.clone()))
                } else {
                    NavDecision::Redirect(Redirect::push(NavTarget::new(self.config.login_path.clone())))
                }
            }
            NavError::RegistrationFailed(_) => {
                tracing::error!(error = %err, "route registration failed");
                NavDecision::Redirect(Redirect::push(NavTarget::new(self.config.server_error_path.clone())))
            }
            NavError::RouteNotFound(_) => {
                tracing::info!("no route for target");
                NavDecision::Block(Blocked {
                    reason: BlockReason::NotFound,
                    target: target.clone(),
                    render: self.config.not_found_path.clone(),
                })
            }
        }
    }

    fn commit(&self, m: RouteMatch, target: &NavTarget) -> NavDecision {
        self.lock_tabs().open(&m.route, &target.path);
        self.ui.set_page_title(&m.route);
        NavDecision::Proceed(Committed {
            route: m.route,
            params: m.params,
            target: target.clone(),
        })
    }

    async fn logout_to_login(&self, epoch: SessionId) -> NavDecision {
        self.force_logout(epoch).await;
        NavDecision::Redirect(Redirect::push(NavTarget::new(self.config.login_path.clone())))
    }

    /// Clear `epoch` and its routes. A newer session is left alone.
    async fn force_logout(&self, epoch: SessionId) {
        if self.session.logout_if_current(epoch) {
            self.reset_routes().await;
        }
    }

    fn prune_tabs(&self) {
        let dropped = self.lock_tabs().retain_routable(self.table.as_ref());
        if dropped > 0 {
            tracing::debug!(dropped, "closed tabs for routes that are no longer live");
        }
    }

    fn same_path(&self, a: &str, b: &str) -> bool {
        normalize_request_path(a) == normalize_request_path(b)
    }

    fn lock_tabs(&self) -> std::sync::MutexGuard<'_, Worktabs> {
        self.worktabs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl core::fmt::Debug for NavigationGuard {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NavigationGuard")
            .field("config", &self.config)
            .field("registration", &self.registration)
            .finish_non_exhaustive()
    }
}

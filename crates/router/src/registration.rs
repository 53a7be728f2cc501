//! Per-session registration of the dynamic route set.
//!
//! At most one registration pass runs at a time. Callers that arrive while a
//! pass is in flight wait on the gate and then observe its result instead of
//! starting their own.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::instrument;

use navgate_auth::{SessionState, SessionStore};
use navgate_core::{NavError, NavResult, SessionId};
use navgate_menu::{filter_by_roles, first_leaf_path, MenuMaterializer, RouteDescriptor};

use crate::{RouteRegistry, RouteTable, UiFeedback};

/// Result of a successful registration pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredMenu {
    /// Session the routes were installed for.
    pub session_id: SessionId,
    /// Monotonic pass counter; bumps on every successful pass.
    pub generation: u64,
    /// Role-filtered menu, as rendered in the sidebar.
    pub menu: Arc<Vec<RouteDescriptor>>,
    /// First visible leaf, the landing page for `/`.
    pub home_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// Routes were already live for this session.
    Existing(RegisteredMenu),
    /// This call ran the pass that installed them.
    Installed(RegisteredMenu),
}

impl Registration {
    pub fn menu(&self) -> &RegisteredMenu {
        match self {
            Registration::Existing(m) | Registration::Installed(m) => m,
        }
    }

    pub fn into_menu(self) -> RegisteredMenu {
        match self {
            Registration::Existing(m) | Registration::Installed(m) => m,
        }
    }

    pub fn was_installed(&self) -> bool {
        matches!(self, Registration::Installed(_))
    }
}

#[derive(Debug)]
struct RegistrationInner {
    registry: RouteRegistry,
    current: Option<RegisteredMenu>,
    generation: u64,
}

impl RegistrationInner {
    fn teardown(&mut self) -> usize {
        self.current = None;
        self.registry.teardown_all()
    }
}

/// Owns the registration state and serializes passes.
pub struct RegistrationController {
    session: Arc<SessionStore>,
    materializer: MenuMaterializer,
    ui: Arc<dyn UiFeedback>,
    settle_delay: Duration,
    inner: Mutex<RegistrationInner>,
    /// Lock-free view of `inner.current` for readers that must not wait on
    /// an in-flight pass.
    mirror: RwLock<Option<RegisteredMenu>>,
    passes: AtomicU64,
}

impl RegistrationController {
    pub fn new(
        session: Arc<SessionStore>,
        table: Arc<dyn RouteTable>,
        materializer: MenuMaterializer,
        ui: Arc<dyn UiFeedback>,
        settle_delay: Duration,
    ) -> Self {
        Self {
            session,
            materializer,
            ui,
            settle_delay,
            inner: Mutex::new(RegistrationInner {
                registry: RouteRegistry::new(table),
                current: None,
                generation: 0,
            }),
            mirror: RwLock::new(None),
            passes: AtomicU64::new(0),
        }
    }

    /// The registered menu, if routes are live.
    pub fn current(&self) -> Option<RegisteredMenu> {
        self.mirror
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of registration passes started so far.
    pub fn passes(&self) -> u64 {
        self.passes.load(Ordering::SeqCst)
    }

    /// Make sure the routes for `session` are live, running a pass if needed.
    #[instrument(skip(self, session), fields(session_id = %session.session_id()), err)]
    pub async fn ensure_registered(&self, session: &SessionState) -> NavResult<Registration> {
        let mut inner = self.inner.lock().await;

        if let Some(current) = &inner.current {
            if current.session_id == session.session_id() {
                return Ok(Registration::Existing(current.clone()));
            }
        }
        self.check_current(session)?;

        if inner.current.is_some() {
            tracing::info!("routes belong to a previous session; tearing down");
            inner.teardown();
            self.publish(None);
        }

        self.run_pass(&mut inner, session).await.map(Registration::Installed)
    }

    /// Tear down and register again, unless another caller already did so
    /// since `observed_generation` was read.
    #[instrument(skip(self, session), fields(session_id = %session.session_id()), err)]
    pub async fn reregister(&self, session: &SessionState, observed_generation: u64) -> NavResult<Registration> {
        let mut inner = self.inner.lock().await;

        if let Some(current) = &inner.current {
            if current.session_id == session.session_id() && current.generation != observed_generation {
                tracing::debug!(generation = current.generation, "re-registration already happened");
                return Ok(Registration::Existing(current.clone()));
            }
        }
        self.check_current(session)?;

        let removed = inner.teardown();
        self.publish(None);
        tracing::info!(routes = removed, "re-registering dynamic routes");

        self.run_pass(&mut inner, session).await.map(Registration::Installed)
    }

    /// Remove every dynamic route and forget the registered menu.
    ///
    /// Waits for an in-flight pass to finish first.
    pub async fn reset(&self) -> usize {
        let mut inner = self.inner.lock().await;
        let removed = inner.teardown();
        self.publish(None);
        if removed > 0 {
            tracing::info!(routes = removed, "registration reset");
        }
        removed
    }

    fn check_current(&self, session: &SessionState) -> NavResult<()> {
        if self.session.is_current(session.session_id()) {
            Ok(())
        } else {
            Err(NavError::SessionSuperseded)
        }
    }

    async fn run_pass(&self, inner: &mut RegistrationInner, session: &SessionState) -> NavResult<RegisteredMenu> {
        let pass = self.passes.fetch_add(1, Ordering::SeqCst) + 1;
        let session_id = session.session_id();
        tracing::debug!(pass, "registration pass started");
        let _loading = self.ui.begin_loading();

        let tree = match self.materializer.materialize(session.access_token()).await {
            Ok(tree) => tree,
            Err(err) => return Err(self.stale_or(pass, session_id, err.into())),
        };
        let menu = filter_by_roles(&tree, session.roles());
        if menu.is_empty() {
            let err = NavError::menu_unavailable(format!(
                "no menu entries visible to roles [{}]",
                session.roles()
            ));
            return Err(self.stale_or(pass, session_id, err));
        }

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        if !self.session.is_current(session_id) {
            tracing::warn!(pass, "session changed during registration; discarding result");
            return Err(NavError::SessionSuperseded);
        }

        let count = inner.registry.register_all(&menu)?;
        inner.generation += 1;

        let registered = RegisteredMenu {
            session_id,
            generation: inner.generation,
            home_path: first_leaf_path(&menu),
            menu: Arc::new(menu),
        };
        inner.current = Some(registered.clone());
        self.publish(Some(registered.clone()));

        tracing::info!(
            pass,
            routes = count,
            generation = registered.generation,
            home = registered.home_path.as_deref().unwrap_or("-"),
            "dynamic routes registered"
        );
        Ok(registered)
    }

    /// A failure seen by a pass whose session has since been replaced belongs
    /// to nobody; report it as superseded.
    fn stale_or(&self, pass: u64, session_id: SessionId, err: NavError) -> NavError {
        if self.session.is_current(session_id) {
            err
        } else {
            tracing::warn!(pass, error = %err, "session changed during registration; dropping failure");
            NavError::SessionSuperseded
        }
    }

    fn publish(&self, value: Option<RegisteredMenu>) {
        *self.mirror.write().unwrap_or_else(PoisonError::into_inner) = value;
    }
}

impl core::fmt::Debug for RegistrationController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RegistrationController")
            .field("source", self.materializer.source())
            .field("settle_delay", &self.settle_delay)
            .field("passes", &self.passes())
            .finish_non_exhaustive()
    }
}

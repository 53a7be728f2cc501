//! Route registry: bulk install and precise teardown of dynamic routes.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use navgate_core::NavError;
use navgate_menu::RouteDescriptor;

use crate::table::{flatten_routes, RouteTable, RouteTableError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("route '{0}' has an empty path")]
    EmptyPath(String),

    #[error("route at '{0}' has an empty name")]
    EmptyName(String),

    #[error("duplicate route name '{0}' in batch")]
    DuplicateName(String),

    #[error("route name '{0}' is already live")]
    AlreadyLive(String),

    #[error(transparent)]
    Table(#[from] RouteTableError),
}

impl From<RegistrationError> for NavError {
    fn from(value: RegistrationError) -> Self {
        NavError::registration_failed(value.to_string())
    }
}

/// Tracks exactly which routes it installed into a [`RouteTable`].
///
/// Precondition: `register_all` is not called again before `teardown_all`.
/// The registration controller enforces this; the registry only documents it.
pub struct RouteRegistry {
    table: Arc<dyn RouteTable>,
    installed: Vec<String>,
}

impl RouteRegistry {
    pub fn new(table: Arc<dyn RouteTable>) -> Self {
        Self {
            table,
            installed: Vec::new(),
        }
    }

    /// Names installed by this registry, in install order.
    pub fn installed(&self) -> &[String] {
        &self.installed
    }

    pub fn is_empty(&self) -> bool {
        self.installed.is_empty()
    }

    /// Install every descriptor (recursively) into the live table.
    ///
    /// The batch is validated up front, so a malformed batch installs
    /// nothing. If the table rejects a route midway, the routes installed so
    /// far in this batch are removed again before the error is returned.
    pub fn register_all(&mut self, descriptors: &[RouteDescriptor]) -> Result<usize, RegistrationError> {
        if !self.installed.is_empty() {
            tracing::warn!(
                installed = self.installed.len(),
                "register_all called without teardown; previous routes stay tracked"
            );
        }

        let mut seen = HashSet::new();
        self.validate(descriptors, &mut seen)?;

        let mut batch: Vec<String> = Vec::new();
        for route in flatten_routes(descriptors) {
            let name = route.name.clone();
            if let Err(e) = self.table.install(route) {
                tracing::error!(route = %name, error = %e, "route install failed; rolling back batch");
                for installed in batch.iter().rev() {
                    self.table.uninstall(installed);
                }
                return Err(e.into());
            }
            batch.push(name);
        }

        let count = batch.len();
        self.installed.extend(batch);
        tracing::debug!(routes = count, "dynamic routes installed");
        Ok(count)
    }

    fn validate<'a>(
        &self,
        nodes: &'a [RouteDescriptor],
        seen: &mut HashSet<&'a str>,
    ) -> Result<(), RegistrationError> {
        for node in nodes {
            if node.name.trim().is_empty() {
                return Err(RegistrationError::EmptyName(node.path.clone()));
            }
            if node.path.trim().is_empty() {
                return Err(RegistrationError::EmptyPath(node.name.clone()));
            }
            if !seen.insert(node.name.as_str()) {
                return Err(RegistrationError::DuplicateName(node.name.clone()));
            }
            if self.table.contains(&node.name) {
                return Err(RegistrationError::AlreadyLive(node.name.clone()));
            }
            self.validate(node.children(), seen)?;
        }
        Ok(())
    }

    /// Remove every route this registry installed. Idempotent.
    pub fn teardown_all(&mut self) -> usize {
        let count = self.installed.len();
        for name in self.installed.drain(..).rev() {
            if self.table.uninstall(&name).is_none() {
                tracing::warn!(route = %name, "route already gone at teardown");
            }
        }
        if count > 0 {
            tracing::debug!(routes = count, "dynamic routes removed");
        }
        count
    }
}

impl core::fmt::Debug for RouteRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RouteRegistry")
            .field("installed", &self.installed)
            .finish_non_exhaustive()
    }
}

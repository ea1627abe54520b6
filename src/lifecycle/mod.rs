//! Two-phase startup driver.
//!
//! `load_all` validates the registered graph, computes a dependency order
//! over the eager modules, then runs two passes over that order: construct
//! and `init` everything, then `start` everything. Init completes for every
//! eager module before any `start` runs, so a starting module never
//! observes a sibling that is constructed but not yet initialized.

use crate::error::{ModulithError, Result};
use crate::graph;
use crate::loader::Loader;
use crate::module::ModuleState;
use std::sync::PoisonError;

impl Loader {
    /// Validate, order, construct, and start every eager module.
    ///
    /// Returns the load order for diagnostics. Any failure aborts the call
    /// with the offending module named in the error; modules constructed
    /// before the failure stay cached (there is no rollback), and the host
    /// is expected to treat a failed bootstrap as fatal.
    pub fn load_all(&self) -> Result<Vec<String>> {
        self.registry.validate_dependencies()?;

        let adjacency = self.registry.adjacency();
        graph::detect_cycles(&adjacency)?;

        let lazy = self.registry.lazy_names();
        let order = graph::topological_order(&adjacency, &lazy, false);
        tracing::info!("loading {} modules", order.len());

        let mut instances = Vec::with_capacity(order.len());
        for name in &order {
            instances.push(self.ensure_loaded(name)?);
        }

        for (name, instance) in order.iter().zip(&instances) {
            tracing::debug!("starting module '{}'", name);
            instance.start().map_err(|source| {
                tracing::error!("start failed for module '{}': {:#}", name, source);
                ModulithError::StartFailure {
                    module: name.clone(),
                    source,
                }
            })?;
            self.states.insert(name.clone(), ModuleState::Started);
        }

        *self
            .load_order
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = order.clone();
        tracing::info!("module load complete ({} modules started)", order.len());
        Ok(order)
    }
}

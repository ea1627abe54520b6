use super::Instance;
use crate::error::{ModulithError, Result};
use crate::loader::Loader;
use std::collections::HashMap;

/// Dependency injection context handed to [`Module::init`](super::Module::init).
///
/// Carries the resolved instances for exactly the names the module declared
/// at registration time, plus a handle back to the loader for on-demand
/// resolution of modules not known at registration time. Lookups outside
/// the declared set fail; dependencies are never reached through ambient
/// lookup.
pub struct ModuleContext {
    module: String,
    dependencies: HashMap<String, Instance>,
    loader: Loader,
}

impl ModuleContext {
    pub(crate) fn new(
        module: impl Into<String>,
        dependencies: HashMap<String, Instance>,
        loader: Loader,
    ) -> Self {
        Self {
            module: module.into(),
            dependencies,
            loader,
        }
    }

    /// Name of the module being initialized.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Look up a declared dependency by name.
    pub fn dependency(&self, name: &str) -> Result<Instance> {
        self.dependencies
            .get(name)
            .cloned()
            .ok_or_else(|| ModulithError::UndeclaredDependency {
                module: self.module.clone(),
                name: name.to_owned(),
            })
    }

    /// The full declared-dependency map.
    pub fn dependencies(&self) -> &HashMap<String, Instance> {
        &self.dependencies
    }

    /// Handle back to the loader, for on-demand resolution.
    pub fn loader(&self) -> &Loader {
        &self.loader
    }
}

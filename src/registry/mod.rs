//! Descriptor storage and registration-time validation.

use crate::error::{ModulithError, Result};
use crate::module::Locator;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Per-module registration options.
#[derive(Debug, Clone, Copy)]
pub struct ModuleOptions {
    /// Skip eager instantiation during `load_all`. A lazy module is still
    /// constructed eagerly when an eager module depends on it.
    pub lazy: bool,
    /// Cache one instance for all `get` calls. When false, every request
    /// constructs a private instance.
    pub singleton: bool,
}

impl Default for ModuleOptions {
    fn default() -> Self {
        Self {
            lazy: false,
            singleton: true,
        }
    }
}

impl ModuleOptions {
    pub fn lazy() -> Self {
        Self {
            lazy: true,
            ..Self::default()
        }
    }

    pub fn transient() -> Self {
        Self {
            singleton: false,
            ..Self::default()
        }
    }
}

/// Registered metadata for a module, prior to instantiation.
#[derive(Clone)]
pub struct ModuleDescriptor {
    pub name: String,
    pub locator: Locator,
    pub dependencies: Vec<String>,
    pub options: ModuleOptions,
}

/// Thread-safe store of module descriptors and the derived adjacency list.
///
/// The only validation performed eagerly is the duplicate-name check;
/// dependency existence is checked by [`Registry::validate_dependencies`]
/// once the full graph is known, since dependents are commonly registered
/// before their dependencies.
#[derive(Clone, Default)]
pub struct Registry {
    descriptors: Arc<DashMap<String, ModuleDescriptor>>,
    adjacency: Arc<DashMap<String, Vec<String>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an eager singleton module.
    pub fn register(
        &self,
        name: impl Into<String>,
        locator: Locator,
        dependencies: &[&str],
    ) -> Result<()> {
        self.register_with(name, locator, dependencies, ModuleOptions::default())
    }

    /// Register a module excluded from eager instantiation.
    pub fn register_lazy(
        &self,
        name: impl Into<String>,
        locator: Locator,
        dependencies: &[&str],
    ) -> Result<()> {
        self.register_with(name, locator, dependencies, ModuleOptions::lazy())
    }

    /// Register a module with explicit options.
    pub fn register_with(
        &self,
        name: impl Into<String>,
        locator: Locator,
        dependencies: &[&str],
        options: ModuleOptions,
    ) -> Result<()> {
        let name = name.into();
        let dependencies: Vec<String> = dependencies.iter().map(|dep| (*dep).to_owned()).collect();

        match self.descriptors.entry(name.clone()) {
            Entry::Occupied(_) => Err(ModulithError::DuplicateModule { name }),
            Entry::Vacant(slot) => {
                tracing::debug!(
                    "registered module '{}' ({} dependencies)",
                    name,
                    dependencies.len()
                );
                self.adjacency.insert(name.clone(), dependencies.clone());
                slot.insert(ModuleDescriptor {
                    name,
                    locator,
                    dependencies,
                    options,
                });
                Ok(())
            }
        }
    }

    /// Check that every declared dependency resolves to a registered
    /// descriptor. Runs before any graph algorithm so a missing reference
    /// produces an actionable error instead of a silently absent edge.
    pub fn validate_dependencies(&self) -> Result<()> {
        for entry in self.adjacency.iter() {
            for dep in entry.value() {
                if !self.descriptors.contains_key(dep) {
                    return Err(ModulithError::UnknownDependency {
                        module: entry.key().clone(),
                        missing: dep.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.descriptors.iter().map(|e| e.key().clone()).collect()
    }

    pub fn dependencies_of(&self, name: &str) -> Option<Vec<String>> {
        self.adjacency.get(name).map(|deps| deps.value().clone())
    }

    pub fn is_lazy(&self, name: &str) -> bool {
        self.descriptors
            .get(name)
            .is_some_and(|desc| desc.options.lazy)
    }

    pub(crate) fn descriptor(&self, name: &str) -> Option<ModuleDescriptor> {
        self.descriptors.get(name).map(|desc| desc.value().clone())
    }

    pub(crate) fn lazy_names(&self) -> HashSet<String> {
        self.descriptors
            .iter()
            .filter(|e| e.value().options.lazy)
            .map(|e| e.key().clone())
            .collect()
    }

    /// Snapshot of the dependency graph as `name -> dependencies`.
    pub(crate) fn adjacency(&self) -> HashMap<String, Vec<String>> {
        self.adjacency
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::Module;

    struct Noop;
    impl Module for Noop {}

    fn noop() -> Locator {
        Locator::constructor(|| Noop)
    }

    #[test]
    fn duplicate_registration_fails() {
        let registry = Registry::new();
        registry.register("economy", noop(), &[]).unwrap();

        // A different locator and dependency list make no difference.
        let err = registry
            .register("economy", Locator::value(1u32), &["data-access"])
            .unwrap_err();
        assert!(matches!(err, ModulithError::DuplicateModule { name } if name == "economy"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn dependents_may_register_before_dependencies() {
        let registry = Registry::new();
        registry.register("economy", noop(), &["data-access"]).unwrap();
        registry.register("data-access", noop(), &[]).unwrap();
        registry.validate_dependencies().unwrap();
    }

    #[test]
    fn validation_reports_missing_dependency() {
        let registry = Registry::new();
        registry.register("economy", noop(), &["data-access"]).unwrap();

        let err = registry.validate_dependencies().unwrap_err();
        assert!(matches!(
            err,
            ModulithError::UnknownDependency { module, missing }
                if module == "economy" && missing == "data-access"
        ));
    }

    #[test]
    fn lazy_registration_sets_the_flag() {
        let registry = Registry::new();
        registry.register_lazy("rate-limiter", noop(), &[]).unwrap();
        registry.register("economy", noop(), &[]).unwrap();

        assert!(registry.is_lazy("rate-limiter"));
        assert!(!registry.is_lazy("economy"));
        assert_eq!(registry.lazy_names().len(), 1);
    }

    #[test]
    fn adjacency_snapshot_covers_all_modules() {
        let registry = Registry::new();
        registry.register("a", noop(), &[]).unwrap();
        registry.register("b", noop(), &["a"]).unwrap();

        let graph = registry.adjacency();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph["b"], vec!["a"]);
        assert!(graph["a"].is_empty());
        assert_eq!(registry.dependencies_of("b").unwrap(), vec!["a"]);
        assert!(registry.dependencies_of("missing").is_none());
    }
}

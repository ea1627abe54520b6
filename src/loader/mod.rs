//! Instantiation runtime: recursive dependency resolution, the
//! construction policy, the singleton cache, and teardown.

mod builder;

pub use builder::LoaderBuilder;

use crate::config::LoaderConfig;
use crate::error::{ModulithError, Result};
use crate::module::{DefinitionKind, Instance, Locator, ModuleContext, ModuleState};
use crate::registry::{ModuleDescriptor, ModuleOptions, Registry};
use dashmap::{DashMap, DashSet};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// The module loader.
///
/// Modules register under unique names with declared dependency lists, then
/// `load_all` validates the graph and drives the two-phase startup, or `get`
/// constructs an individual module chain on demand. Cloning a `Loader`
/// clones a handle to the same runtime.
#[derive(Clone)]
pub struct Loader {
    pub(crate) registry: Registry,
    pub(crate) config: LoaderConfig,
    pub(crate) loaded: Arc<DashMap<String, Instance>>,
    loading: Arc<DashSet<String>>,
    pub(crate) states: Arc<DashMap<String, ModuleState>>,
    pub(crate) load_order: Arc<Mutex<Vec<String>>>,
}

impl std::fmt::Debug for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader").finish_non_exhaustive()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader {
    pub fn new() -> Self {
        Self::with_config(LoaderConfig::default())
    }

    pub fn with_config(config: LoaderConfig) -> Self {
        Self::from_parts(Registry::new(), config)
    }

    pub(crate) fn from_parts(registry: Registry, config: LoaderConfig) -> Self {
        Self {
            registry,
            config,
            loaded: Arc::new(DashMap::new()),
            loading: Arc::new(DashSet::new()),
            states: Arc::new(DashMap::new()),
            load_order: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn builder() -> LoaderBuilder {
        LoaderBuilder::new()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Register an eager singleton module.
    pub fn register(
        &self,
        name: impl Into<String>,
        locator: Locator,
        dependencies: &[&str],
    ) -> Result<()> {
        self.registry.register(name, locator, dependencies)
    }

    /// Register a module constructed only on first `get`.
    pub fn register_lazy(
        &self,
        name: impl Into<String>,
        locator: Locator,
        dependencies: &[&str],
    ) -> Result<()> {
        self.registry.register_lazy(name, locator, dependencies)
    }

    /// Register a module with explicit options.
    pub fn register_with(
        &self,
        name: impl Into<String>,
        locator: Locator,
        dependencies: &[&str],
        options: ModuleOptions,
    ) -> Result<()> {
        self.registry.register_with(name, locator, dependencies, options)
    }

    /// Obtain a live instance, constructing it (and its whole dependency
    /// chain) on demand if necessary.
    ///
    /// This is the only way to reach an instance. It is safe at any time
    /// after registration: before `load_all` it triggers on-demand
    /// construction, afterwards it returns the cached singleton.
    pub fn get(&self, name: &str) -> Result<Instance> {
        self.ensure_loaded(name)
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains_key(name)
    }

    /// The order produced by the last successful `load_all`.
    pub fn load_order(&self) -> Vec<String> {
        self.load_order
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn dependencies(&self, name: &str) -> Option<Vec<String>> {
        self.registry.dependencies_of(name)
    }

    pub fn loaded_modules(&self) -> Vec<String> {
        self.loaded.iter().map(|e| e.key().clone()).collect()
    }

    /// Lifecycle state of a name, derived from the runtime tables.
    pub fn state(&self, name: &str) -> ModuleState {
        if let Some(state) = self.states.get(name) {
            return *state;
        }
        if self.registry.contains(name) {
            ModuleState::Registered
        } else {
            ModuleState::Unregistered
        }
    }

    pub fn definition_kind(&self, name: &str) -> Option<DefinitionKind> {
        self.registry.descriptor(name).map(|desc| desc.locator.kind())
    }

    /// Remove a module from the cache, invoking its `destroy` hook best
    /// effort. The descriptor stays registered; a later `get` reconstructs
    /// the module and re-runs `init` (but not `start`).
    pub fn unload(&self, name: &str) {
        let Some((_, instance)) = self.loaded.remove(name) else {
            return;
        };
        tracing::debug!("unloading module '{}'", name);
        if let Err(err) = instance.destroy() {
            tracing::warn!("destroy hook failed for module '{}': {:#}", name, err);
        }
        self.states.insert(name.to_owned(), ModuleState::Unloaded);
    }

    /// Unload every loaded module, walking the recorded load order in
    /// reverse so dependents tear down before their dependencies, then any
    /// modules loaded on demand outside that order.
    pub fn unload_all(&self) {
        let order = self.load_order();
        for name in order.iter().rev() {
            self.unload(name);
        }
        let remaining: Vec<String> = self.loaded.iter().map(|e| e.key().clone()).collect();
        for name in remaining {
            self.unload(&name);
        }
    }

    /// Development-only: `unload` followed by `get`.
    pub fn hot_reload(&self, name: &str) -> Result<Instance> {
        if !self.config.dev_mode() {
            return Err(ModulithError::HotReloadDisabled);
        }
        tracing::info!("hot reloading module '{}'", name);
        self.unload(name);
        self.get(name)
    }

    pub(crate) fn ensure_loaded(&self, name: &str) -> Result<Instance> {
        if let Some(cached) = self.loaded.get(name) {
            return Ok(cached.value().clone());
        }
        if self.loading.contains(name) {
            return Err(ModulithError::RuntimeCircularDependency {
                name: name.to_owned(),
            });
        }
        let descriptor = self
            .registry
            .descriptor(name)
            .ok_or_else(|| ModulithError::UnknownModule {
                name: name.to_owned(),
            })?;

        let _loading = LoadingGuard::enter(&self.loading, name);
        self.states.insert(name.to_owned(), ModuleState::Constructing);

        match self.construct_and_init(name, &descriptor) {
            Ok(instance) => {
                self.states.insert(name.to_owned(), ModuleState::Initialized);
                if descriptor.options.singleton {
                    self.loaded.insert(name.to_owned(), instance.clone());
                }
                Ok(instance)
            }
            Err(err) => {
                self.states.remove(name);
                Err(err)
            }
        }
    }

    fn construct_and_init(&self, name: &str, descriptor: &ModuleDescriptor) -> Result<Instance> {
        let mut dependencies = HashMap::with_capacity(descriptor.dependencies.len());
        for dep in &descriptor.dependencies {
            dependencies.insert(dep.clone(), self.ensure_loaded(dep)?);
        }

        tracing::debug!(
            "constructing module '{}' ({})",
            name,
            descriptor.locator.kind()
        );
        let instance = self.construct(name, &descriptor.locator)?;

        let context = ModuleContext::new(name, dependencies, self.clone());
        instance.init(&context).map_err(|source| {
            tracing::error!("init failed for module '{}': {:#}", name, source);
            ModulithError::InitFailure {
                module: name.to_owned(),
                source,
            }
        })?;
        Ok(instance)
    }

    fn construct(&self, name: &str, locator: &Locator) -> Result<Instance> {
        let resolution_failure = |source| ModulithError::ResolutionFailure {
            module: name.to_owned(),
            source,
        };
        let instance = match locator {
            Locator::Constructor(factory) => {
                let module = factory().map_err(resolution_failure)?;
                Instance::Service(Arc::new(Mutex::new(module)))
            }
            Locator::ServiceObject(cell) => Instance::Service(Arc::clone(cell)),
            Locator::Callable(factory) => Instance::Value(factory().map_err(resolution_failure)?),
            Locator::Value(value) => Instance::Value(Arc::clone(value)),
        };
        Ok(instance)
    }
}

/// Marks a name as mid-construction for the runtime cycle check; the mark
/// is dropped on every exit path, success or failure.
struct LoadingGuard<'a> {
    loading: &'a DashSet<String>,
    name: String,
}

impl<'a> LoadingGuard<'a> {
    fn enter(loading: &'a DashSet<String>, name: &str) -> Self {
        loading.insert(name.to_owned());
        Self {
            loading,
            name: name.to_owned(),
        }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.loading.remove(&self.name);
    }
}

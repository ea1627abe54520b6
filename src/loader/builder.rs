use super::Loader;
use crate::config::LoaderConfig;
use crate::error::{ModulithError, Result};
use crate::module::Locator;
use crate::registry::{ModuleOptions, Registry};

/// Fluent construction of a [`Loader`].
///
/// Registration errors are deferred and surfaced by [`LoaderBuilder::build`],
/// so chains stay readable.
///
/// # Example
/// ```rust,ignore
/// let loader = Loader::builder()
///     .config(LoaderConfig::from_env())
///     .register("data-access", Locator::constructor(DataAccess::new), &[])
///     .register("economy", Locator::constructor(Economy::new), &["data-access"])
///     .register_lazy("rate-limiter", Locator::constructor(RateLimiter::new), &[])
///     .build()?;
/// ```
pub struct LoaderBuilder {
    registry: Registry,
    config: LoaderConfig,
    deferred: Option<ModulithError>,
}

impl LoaderBuilder {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            config: LoaderConfig::default(),
            deferred: None,
        }
    }

    pub fn config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn register(
        self,
        name: impl Into<String>,
        locator: Locator,
        dependencies: &[&str],
    ) -> Self {
        self.register_with(name, locator, dependencies, ModuleOptions::default())
    }

    pub fn register_lazy(
        self,
        name: impl Into<String>,
        locator: Locator,
        dependencies: &[&str],
    ) -> Self {
        self.register_with(name, locator, dependencies, ModuleOptions::lazy())
    }

    pub fn register_with(
        mut self,
        name: impl Into<String>,
        locator: Locator,
        dependencies: &[&str],
        options: ModuleOptions,
    ) -> Self {
        if self.deferred.is_none() {
            if let Err(err) = self
                .registry
                .register_with(name, locator, dependencies, options)
            {
                self.deferred = Some(err);
            }
        }
        self
    }

    /// Build the loader, surfacing the first deferred registration error.
    pub fn build(self) -> Result<Loader> {
        if let Some(err) = self.deferred {
            return Err(err);
        }
        Ok(Loader::from_parts(self.registry, self.config))
    }
}

impl Default for LoaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::Module;

    struct Noop;
    impl Module for Noop {}

    #[test]
    fn builds_a_working_loader() {
        let loader = Loader::builder()
            .register("base", Locator::constructor(|| Noop), &[])
            .register("top", Locator::constructor(|| Noop), &["base"])
            .build()
            .unwrap();

        let order = loader.load_all().unwrap();
        assert_eq!(order, vec!["base", "top"]);
    }

    #[test]
    fn surfaces_the_first_registration_error() {
        let err = Loader::builder()
            .register("dup", Locator::constructor(|| Noop), &[])
            .register("dup", Locator::constructor(|| Noop), &[])
            .build()
            .unwrap_err();
        assert!(matches!(err, ModulithError::DuplicateModule { name } if name == "dup"));
    }

    #[test]
    fn applies_the_configured_environment() {
        let loader = Loader::builder()
            .config(LoaderConfig::development())
            .build()
            .unwrap();
        assert!(loader.config().dev_mode());
    }
}

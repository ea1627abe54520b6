use super::Module;
use std::any::Any;
use std::sync::{Arc, Mutex};
use strum_macros::Display;

/// Factory producing a fresh lifecycle-capable instance per construction.
pub type ConstructorFn = Arc<dyn Fn() -> anyhow::Result<Box<dyn Module>> + Send + Sync>;

/// Nullary factory whose return value becomes the instance as-is.
pub type CallableFn = Arc<dyn Fn() -> anyhow::Result<Arc<dyn Any + Send + Sync>> + Send + Sync>;

/// How a module's concrete definition is obtained.
///
/// The four variants cover the module shapes the loader accepts, resolved
/// once at registration time rather than probed on every access:
///
/// 1. [`Locator::Constructor`] builds a new instance for each construction.
/// 2. [`Locator::ServiceObject`] adopts a pre-built object as the instance
///    directly. Reloading after an unload re-adopts the same object and
///    re-runs `init` on it.
/// 3. [`Locator::Callable`] invokes a factory and uses the return value as
///    an opaque instance with no lifecycle hooks.
/// 4. [`Locator::Value`] is an immutable static value, no lifecycle hooks.
#[derive(Clone)]
pub enum Locator {
    Constructor(ConstructorFn),
    ServiceObject(Arc<Mutex<Box<dyn Module>>>),
    Callable(CallableFn),
    Value(Arc<dyn Any + Send + Sync>),
}

impl Locator {
    /// Locator for a module constructed freshly on each load.
    pub fn constructor<M, F>(factory: F) -> Self
    where
        M: Module + 'static,
        F: Fn() -> M + Send + Sync + 'static,
    {
        Locator::Constructor(Arc::new(move || Ok(Box::new(factory()) as Box<dyn Module>)))
    }

    /// Same as [`Locator::constructor`] for factories that can fail.
    pub fn try_constructor<M, F>(factory: F) -> Self
    where
        M: Module + 'static,
        F: Fn() -> anyhow::Result<M> + Send + Sync + 'static,
    {
        Locator::Constructor(Arc::new(move || Ok(Box::new(factory()?) as Box<dyn Module>)))
    }

    /// Locator adopting `module` as the singleton instance directly.
    pub fn service<M: Module + 'static>(module: M) -> Self {
        Locator::ServiceObject(Arc::new(Mutex::new(Box::new(module))))
    }

    /// Locator invoking `factory` and using its return value as the
    /// instance. The value carries no lifecycle hooks.
    pub fn callable<T, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Locator::Callable(Arc::new(move || {
            Ok(Arc::new(factory()?) as Arc<dyn Any + Send + Sync>)
        }))
    }

    /// Locator wrapping an immutable static value.
    pub fn value<T: Send + Sync + 'static>(value: T) -> Self {
        Locator::Value(Arc::new(value))
    }

    pub fn kind(&self) -> DefinitionKind {
        match self {
            Locator::Constructor(_) => DefinitionKind::Constructible,
            Locator::ServiceObject(_) => DefinitionKind::ServiceObject,
            Locator::Callable(_) => DefinitionKind::Callable,
            Locator::Value(_) => DefinitionKind::StaticValue,
        }
    }
}

/// The resolved shape of a module definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DefinitionKind {
    Constructible,
    ServiceObject,
    Callable,
    StaticValue,
}

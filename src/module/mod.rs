//! Module contract and the runtime representation of loaded modules.
//!
//! A module registers under a unique name with a [`Locator`] describing how
//! its definition is obtained, and optionally participates in the loader
//! lifecycle by implementing the [`Module`] hooks.

mod context;
mod instance;
mod locator;

pub use context::ModuleContext;
pub use instance::Instance;
pub use locator::{CallableFn, ConstructorFn, DefinitionKind, Locator};

use std::any::Any;
use strum_macros::Display;

/// Upcast helper so `dyn Module` instances can be downcast to their
/// concrete type through [`Instance::with_service`].
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Lifecycle contract for registered modules.
///
/// Every hook is optional; the provided defaults do nothing. Hooks are
/// invoked synchronously by the loader:
///
/// - `init` runs once per construction, after the module's declared
///   dependencies have been loaded. The [`ModuleContext`] carries the
///   resolved dependency map and a handle back to the loader; clone out
///   whatever the module needs to keep.
/// - `start` runs during the second pass of `Loader::load_all`, after every
///   eager module has been initialized.
/// - `destroy` runs on `Loader::unload`; failures are logged and swallowed.
///
/// # Example
///
/// ```
/// use modulith::{Instance, Module, ModuleContext};
///
/// struct Economy {
///     store: Option<Instance>,
/// }
///
/// impl Module for Economy {
///     fn init(&mut self, ctx: &ModuleContext) -> anyhow::Result<()> {
///         self.store = Some(ctx.dependency("data-store")?);
///         Ok(())
///     }
/// }
/// ```
pub trait Module: AsAny + Send + Sync {
    /// Called once per construction, after dependencies are resolved.
    fn init(&mut self, _ctx: &ModuleContext) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called after every eager module has been initialized.
    fn start(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called on unload. Best effort; errors are logged, not propagated.
    fn destroy(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Observable lifecycle state of a registered name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ModuleState {
    Unregistered,
    Registered,
    Constructing,
    Initialized,
    Started,
    Unloaded,
}

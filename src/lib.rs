//! # Modulith
//!
//! A module dependency loader with cycle detection, dependency injection,
//! and a two-phase startup lifecycle.
//!
//! Modulith registers named modules with declared dependency lists,
//! validates the resulting graph, and boots everything in a safe order:
//! every module is constructed and initialized before any module is
//! started. Dependencies are handed to each module through an injected
//! context rather than ambient lookup, so a module can only reach what it
//! declared.
//!
//! ## Features
//!
//! - **Named registration**: modules register under unique string names
//!   with explicit dependency lists, in any order
//! - **Graph validation**: missing references and circular dependencies
//!   are reported before anything is constructed
//! - **Two-phase startup**: `init` runs for every eager module before
//!   `start` runs for any
//! - **Lazy modules**: deferred until first `get`, unless an eager module
//!   depends on them
//! - **Heterogeneous module shapes**: constructors, pre-built service
//!   objects, factories, and plain static values share one loader
//!
//! ## Quick Start
//!
//! ```
//! use modulith::{Instance, Loader, Locator, Module, ModuleContext};
//!
//! struct DataStore {
//!     ready: bool,
//! }
//!
//! impl Module for DataStore {
//!     fn init(&mut self, _ctx: &ModuleContext) -> anyhow::Result<()> {
//!         self.ready = true;
//!         Ok(())
//!     }
//! }
//!
//! struct Economy {
//!     store: Option<Instance>,
//! }
//!
//! impl Module for Economy {
//!     fn init(&mut self, ctx: &ModuleContext) -> anyhow::Result<()> {
//!         self.store = Some(ctx.dependency("data-store")?);
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> modulith::Result<()> {
//!     let loader = Loader::new();
//!     loader.register(
//!         "data-store",
//!         Locator::constructor(|| DataStore { ready: false }),
//!         &[],
//!     )?;
//!     loader.register(
//!         "economy",
//!         Locator::constructor(|| Economy { store: None }),
//!         &["data-store"],
//!     )?;
//!
//!     let order = loader.load_all()?;
//!     assert_eq!(order, vec!["data-store", "economy"]);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
mod graph;
mod lifecycle;
pub mod loader;
pub mod module;
pub mod registry;

// Re-export core types
pub use config::{LoaderConfig, RuntimeEnv};
pub use error::{ModulithError, Result};
pub use loader::{Loader, LoaderBuilder};
pub use module::{
    AsAny, DefinitionKind, Instance, Locator, Module, ModuleContext, ModuleState,
};
pub use registry::{ModuleDescriptor, ModuleOptions, Registry};

/// Prelude module for convenient imports
///
/// ```
/// use modulith::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{LoaderConfig, RuntimeEnv};
    pub use crate::error::{ModulithError, Result};
    pub use crate::loader::{Loader, LoaderBuilder};
    pub use crate::module::{
        DefinitionKind, Instance, Locator, Module, ModuleContext, ModuleState,
    };
    pub use crate::registry::{ModuleOptions, Registry};
}

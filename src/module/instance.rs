use super::{Module, ModuleContext};
use crate::error::{ModulithError, Result};
use std::any::Any;
use std::sync::{Arc, Mutex, PoisonError};

/// A live module instance handle.
///
/// Cloning an `Instance` clones a handle to the same underlying object;
/// identity is observable via [`Instance::ptr_eq`]. Lifecycle-capable
/// modules sit behind a lock because their hooks take `&mut self`; plain
/// values resolved from `Callable`/`Value` locators are shared directly.
#[derive(Clone)]
pub enum Instance {
    Service(Arc<Mutex<Box<dyn Module>>>),
    Value(Arc<dyn Any + Send + Sync>),
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instance::Service(_) => f.write_str("Instance::Service"),
            Instance::Value(_) => f.write_str("Instance::Value"),
        }
    }
}

impl Instance {
    /// Whether this instance participates in the lifecycle hooks.
    pub fn is_service(&self) -> bool {
        matches!(self, Instance::Service(_))
    }

    /// True when both handles point at the same underlying object.
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        match (self, other) {
            (Instance::Service(a), Instance::Service(b)) => Arc::ptr_eq(a, b),
            (Instance::Value(a), Instance::Value(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Run `f` against the concrete service type.
    pub fn with_service<T, R>(&self, f: impl FnOnce(&T) -> R) -> Result<R>
    where
        T: Module + 'static,
    {
        match self {
            Instance::Service(cell) => {
                let module = cell.lock().unwrap_or_else(PoisonError::into_inner);
                let concrete = module
                    .as_ref()
                    .as_any()
                    .downcast_ref::<T>()
                    .ok_or_else(|| downcast_failed::<T>())?;
                Ok(f(concrete))
            }
            Instance::Value(_) => Err(downcast_failed::<T>()),
        }
    }

    /// Run `f` against the concrete service type with mutable access.
    pub fn with_service_mut<T, R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R>
    where
        T: Module + 'static,
    {
        match self {
            Instance::Service(cell) => {
                let mut module = cell.lock().unwrap_or_else(PoisonError::into_inner);
                let concrete = module
                    .as_mut()
                    .as_any_mut()
                    .downcast_mut::<T>()
                    .ok_or_else(|| downcast_failed::<T>())?;
                Ok(f(concrete))
            }
            Instance::Value(_) => Err(downcast_failed::<T>()),
        }
    }

    /// Downcast a value instance to its concrete type.
    pub fn downcast_value<T: Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        match self {
            Instance::Value(value) => value
                .clone()
                .downcast::<T>()
                .map_err(|_| downcast_failed::<T>()),
            Instance::Service(_) => Err(downcast_failed::<T>()),
        }
    }

    pub(crate) fn init(&self, ctx: &ModuleContext) -> anyhow::Result<()> {
        match self {
            Instance::Service(cell) => {
                let mut module = cell.lock().unwrap_or_else(PoisonError::into_inner);
                module.init(ctx)
            }
            Instance::Value(_) => Ok(()),
        }
    }

    pub(crate) fn start(&self) -> anyhow::Result<()> {
        match self {
            Instance::Service(cell) => {
                let mut module = cell.lock().unwrap_or_else(PoisonError::into_inner);
                module.start()
            }
            Instance::Value(_) => Ok(()),
        }
    }

    pub(crate) fn destroy(&self) -> anyhow::Result<()> {
        match self {
            Instance::Service(cell) => {
                let mut module = cell.lock().unwrap_or_else(PoisonError::into_inner);
                module.destroy()
            }
            Instance::Value(_) => Ok(()),
        }
    }
}

fn downcast_failed<T>() -> ModulithError {
    ModulithError::DowncastFailed {
        type_name: std::any::type_name::<T>().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::Locator;

    struct Counter {
        count: u32,
    }

    impl Module for Counter {}

    fn service_instance(count: u32) -> Instance {
        match Locator::service(Counter { count }) {
            Locator::ServiceObject(cell) => Instance::Service(cell),
            _ => unreachable!(),
        }
    }

    #[test]
    fn clones_share_identity() {
        let instance = service_instance(1);
        let other = instance.clone();
        assert!(instance.ptr_eq(&other));
    }

    #[test]
    fn separate_instances_differ() {
        let a = service_instance(1);
        let b = service_instance(1);
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn with_service_downcasts_to_concrete_type() {
        let instance = service_instance(7);
        let count = instance.with_service(|c: &Counter| c.count).unwrap();
        assert_eq!(count, 7);
    }

    #[test]
    fn with_service_mut_allows_mutation() {
        let instance = service_instance(0);
        instance
            .with_service_mut(|c: &mut Counter| c.count = 42)
            .unwrap();
        assert_eq!(instance.with_service(|c: &Counter| c.count).unwrap(), 42);
    }

    #[test]
    fn wrong_downcast_type_is_an_error() {
        struct Other;
        impl Module for Other {}

        let instance = service_instance(1);
        let err = instance.with_service(|_: &Other| ()).unwrap_err();
        assert!(matches!(err, ModulithError::DowncastFailed { .. }));
    }

    #[test]
    fn value_instances_downcast() {
        let instance = Instance::Value(Arc::new(vec![1u32, 2, 3]));
        let values = instance.downcast_value::<Vec<u32>>().unwrap();
        assert_eq!(*values, vec![1, 2, 3]);

        assert!(instance.downcast_value::<String>().is_err());
        assert!(!instance.is_service());
    }
}

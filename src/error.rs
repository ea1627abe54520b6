use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModulithError>;

#[derive(Debug, Error)]
pub enum ModulithError {
    #[error("Module already registered: {name}")]
    DuplicateModule { name: String },

    #[error("Module {module} depends on {missing}, which is not registered")]
    UnknownDependency { module: String, missing: String },

    #[error("Circular dependency detected involving module: {name}")]
    CircularDependency { name: String },

    #[error("Circular dependency detected at runtime while loading module: {name}")]
    RuntimeCircularDependency { name: String },

    #[error("Module not registered: {name}")]
    UnknownModule { name: String },

    #[error("Failed to resolve a definition for module {module}: {source}")]
    ResolutionFailure {
        module: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Init failed for module {module}: {source}")]
    InitFailure {
        module: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Start failed for module {module}: {source}")]
    StartFailure {
        module: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Module {module} requested dependency {name}, which it did not declare")]
    UndeclaredDependency { module: String, name: String },

    #[error("Failed to downcast instance to type: {type_name}")]
    DowncastFailed { type_name: String },

    #[error("Hot reload is only available in development mode")]
    HotReloadDisabled,
}

use std::env;
use strum_macros::{Display, EnumString};

/// Runtime environment the loader is running under.
///
/// Controls development-only operations such as `Loader::hot_reload`.
/// Parsed case-insensitively, so `MODULITH_ENV=development` and
/// `MODULITH_ENV=Development` are equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum RuntimeEnv {
    #[default]
    Production,
    Development,
}

/// Loader configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct LoaderConfig {
    pub env: RuntimeEnv,
}

impl LoaderConfig {
    /// Read the configuration from the process environment.
    ///
    /// Unset or unrecognized values of `MODULITH_ENV` fall back to
    /// [`RuntimeEnv::Production`].
    pub fn from_env() -> Self {
        let env = env::var("MODULITH_ENV")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default();
        Self { env }
    }

    /// Configuration with development-only operations enabled.
    pub fn development() -> Self {
        Self {
            env: RuntimeEnv::Development,
        }
    }

    pub fn dev_mode(&self) -> bool {
        self.env == RuntimeEnv::Development
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_production() {
        let config = LoaderConfig::default();
        assert_eq!(config.env, RuntimeEnv::Production);
        assert!(!config.dev_mode());
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(
            "development".parse::<RuntimeEnv>().unwrap(),
            RuntimeEnv::Development
        );
        assert_eq!(
            "PRODUCTION".parse::<RuntimeEnv>().unwrap(),
            RuntimeEnv::Production
        );
        assert!("staging".parse::<RuntimeEnv>().is_err());
    }

    #[test]
    fn development_config_enables_dev_mode() {
        assert!(LoaderConfig::development().dev_mode());
    }
}

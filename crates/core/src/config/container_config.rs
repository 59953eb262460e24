use crate::config::{parse_flag, ConfigError, ConfigSource};
use serde::Deserialize;
use std::env;

/// Environment variable enabling constructor autowiring
pub const AUTOWIRE_ENV: &str = "RIVET_AUTOWIRE";

/// Container-wide settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ContainerConfig {
    /// Splice registered services into missing constructor parameters
    #[serde(default)]
    pub autowire: bool,
    #[serde(skip)]
    source: ConfigSource,
}

impl ContainerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from `RIVET_AUTOWIRE`, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var(AUTOWIRE_ENV) {
            Ok(value) => Ok(Self {
                autowire: parse_flag("autowire", &value)?,
                source: ConfigSource::EnvVar(AUTOWIRE_ENV.to_string()),
            }),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(env::VarError::NotUnicode(_)) => Err(ConfigError::environment_error(format!(
                "{} is not valid unicode",
                AUTOWIRE_ENV
            ))),
        }
    }

    /// Settings read from a configuration document at `path`
    pub fn from_document(autowire: bool, path: impl Into<String>) -> Self {
        Self {
            autowire,
            source: ConfigSource::File(path.into()),
        }
    }

    /// Builder-style toggle for autowiring
    pub fn with_autowire(mut self, autowire: bool) -> Self {
        self.autowire = autowire;
        self.source = ConfigSource::Programmatic;
        self
    }

    /// Where the settings came from
    pub fn source(&self) -> &ConfigSource {
        &self.source
    }
}

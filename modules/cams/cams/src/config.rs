use std::path::Path;

use cams_db::DocumentDbConfig;
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::Deserialize;

/// Prefix of environment overrides, e.g. `CAMS_DOCUMENT_DB__DATABASE_NAME`.
pub const ENV_PREFIX: &str = "CAMS_";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct CamsConfig {
    pub document_db: DocumentDbConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_owned()
}

impl CamsConfig {
    /// Load from an optional YAML file, then `CAMS_`-prefixed environment variables
    /// (nested keys separated by `__`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if a source cannot be read or required keys are
    /// missing.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }
}

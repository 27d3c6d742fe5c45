//! Configuration value objects
//!
//! `AppConfig` is the typed configuration passed, unmodified, to every
//! service and controller constructor. Loading lives in the infrastructure
//! crate; these types only describe the shape and defaults.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default application name
pub const DEFAULT_APP_NAME: &str = "onebun";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON output format
    pub json_format: bool,

    /// Log to file in addition to stdout
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json_format: false,
            file_output: None,
        }
    }
}

/// What the composition root does with controller dependencies it cannot wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WiringPolicy {
    /// Log a warning and construct the controller without the argument
    #[default]
    BestEffort,
    /// Abort module setup
    Strict,
}

impl fmt::Display for WiringPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BestEffort => write!(f, "best_effort"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

/// Dependency wiring configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WiringConfig {
    /// Policy for unresolved controller dependencies
    pub policy: WiringPolicy,
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application name, used as the root logger context
    pub name: String,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Dependency wiring configuration
    pub wiring: WiringConfig,

    /// Free-form application settings read by user services
    pub settings: BTreeMap<String, serde_json::Value>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_APP_NAME.to_string(),
            logging: LoggingConfig::default(),
            wiring: WiringConfig::default(),
            settings: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Read a typed application setting
    ///
    /// Returns `Ok(None)` when the key is absent and an error when the stored
    /// value cannot be deserialized into `T`.
    pub fn setting<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.settings.get(key) {
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| Error::type_mismatch(format!("setting '{key}': {e}"))),
            None => Ok(None),
        }
    }

    /// Store an application setting
    pub fn with_setting<K: Into<String>, V: Serialize>(mut self, key: K, value: V) -> Result<Self> {
        let value = serde_json::to_value(value)?;
        self.settings.insert(key.into(), value);
        Ok(self)
    }
}

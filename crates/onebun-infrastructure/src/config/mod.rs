//! Configuration management
//!
//! Figment-based loading of [`AppConfig`](onebun_domain::value_objects::AppConfig)
//! from defaults, an optional TOML file and `ONEBUN__`-prefixed environment
//! variables.

pub mod loader;

pub use loader::{ConfigBuilder, ConfigLoader, validate_app_config};
pub use onebun_domain::value_objects::{AppConfig, LoggingConfig, WiringConfig, WiringPolicy};

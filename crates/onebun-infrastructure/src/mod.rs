//! Infrastructure Layer - OneBun
//!
//! Ambient services around the composition core: configuration loading,
//! logging setup and application bootstrap.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment-based `AppConfig` loading and validation |
//! | [`logging`] | `tracing` subscriber installation |
//! | [`bootstrap`] | `init_app` entry points returning a wired module |
//! | [`error_ext`] | Context helpers converting foreign errors |
//! | [`constants`] | File names and environment variable names |

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod logging;

pub use bootstrap::{init_app, init_app_from, init_app_with_registry};
pub use config::{ConfigBuilder, ConfigLoader};
pub use error_ext::ErrorContext;
pub use logging::init_logging;

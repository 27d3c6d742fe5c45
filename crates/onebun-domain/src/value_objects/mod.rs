//! Value objects
//!
//! Immutable records shared by the registry, the composition root and the
//! configuration loader.

pub mod config;
pub mod route;

pub use config::{AppConfig, LoggingConfig, WiringConfig, WiringPolicy};
pub use route::{HttpMethod, ParamKind, ParamMetadata, ParamValidator, RouteMetadata};

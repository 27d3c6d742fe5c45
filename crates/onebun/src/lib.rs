//! # OneBun
//!
//! Decorator-driven dependency composition: modules declare providers,
//! controllers and imports; services are realized from a lazy layer graph
//! and controllers receive the dependencies their constructors name.
//!
//! ## Example
//!
//! ```ignore
//! use onebun::application::{module, service};
//!
//! service!(UserService);
//! module!(AppModule { imports: [], controllers: [UserController], providers: [UserService] });
//!
//! let config = onebun::infrastructure::ConfigLoader::new().load()?;
//! let app = onebun::infrastructure::init_app::<AppModule>(config)?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - error taxonomy, configuration and route value objects
//! - `application` - metadata registry, resolver, layers and the module root
//! - `infrastructure` - config loading, logging setup and bootstrap
//! - `demo` - a small shop application used by the `onebun` binary

/// Domain layer - error taxonomy and value objects
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use onebun_domain::*;
}

/// Application layer - composition core
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use onebun_application::*;
}

/// Infrastructure layer - config, logging and bootstrap
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use onebun_infrastructure::*;
}

pub mod demo;

// Re-export commonly used types at the crate root
pub use domain::{Error, Result};
pub use onebun_application::{
    BaseService, Class, ClassRef, ConstructorArgs, Controller, ControllerBase, Injectable, Logger,
    OneBunModule, controller, module, param, route, service,
};
pub use onebun_infrastructure::{ConfigLoader, init_app, init_logging};

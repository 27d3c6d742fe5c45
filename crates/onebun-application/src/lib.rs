//! Application Layer - OneBun
//!
//! This crate contains the composition core of the OneBun framework: the
//! metadata registry populated by decorators, the dependency resolver, the
//! layer/context primitives and the module composition root.
//!
//! ## Architecture
//!
//! ```text
//! decorators ──► MetadataRegistry ──► OneBunModule ──► Layer ──► Context
//!                      │                    │
//!                      ▼                    ▼
//!              ReflectionAdapter ◄── DependencyResolver ──► controllers
//! ```
//!
//! ## Modules
//!
//! - `class`: runtime class handles, instances and constructor arguments
//! - `metadata`: decorator records, the registry and the reflection adapter
//! - `resolver`: constructor dependency inference
//! - `layer`: lazy layers and realized contexts
//! - `service` / `controller`: base types embedded by user code
//! - `module`: the composition root
//!
//! ## Dependencies
//!
//! This crate depends only on:
//! - `onebun-domain`: error taxonomy, configuration and route value objects
//! - Pure Rust libraries for concurrency, registration and logging

pub mod class;
pub mod controller;
pub mod layer;
pub mod logger;
pub mod macros;
pub mod metadata;
pub mod module;
pub mod resolver;
pub mod service;
pub mod tag;

use std::sync::Arc;

use onebun_domain::value_objects::AppConfig;

/// Shared application configuration handed to constructors
pub type Config = Arc<AppConfig>;

pub use class::{Class, ClassId, ClassRef, ConstructorArgs, Injectable, Instance};
pub use controller::{Controller, ControllerBase, ServiceLookup};
pub use layer::{Context, Layer};
pub use logger::Logger;
pub use metadata::{
    ControllerMetadata, MetadataRegistry, MetadataValue, ModuleMetadata, ServiceMetadata,
};
pub use module::{ModuleState, OneBunModule, WiringReport};
pub use resolver::{AvailableServices, DependencyResolver, Resolution, UnresolvedParam};
pub use service::{BaseService, ServiceLayerFactory, create_service_layer};
pub use tag::ServiceTag;

#[doc(hidden)]
pub mod __private {
    pub use linkme;
    pub use onebun_domain::value_objects::{HttpMethod, RouteMetadata};
}

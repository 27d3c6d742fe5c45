//! Decorator metadata
//!
//! Records attached to classes by the `Service`, `Controller`, `Module`,
//! route and parameter decorators, the registry that stores them and the
//! reflection adapter that answers constructor-type queries.
//!
//! ```text
//! service!/controller!/module!          decorators::*
//!          │ (link time)                     │ (explicit)
//!          ▼                                 ▼
//!      DECORATORS slice ──────────► MetadataRegistry ◄── ReflectionAdapter
//!                                          │
//!                                          ▼
//!                           OneBunModule / DependencyResolver
//! ```

pub mod decorators;
pub mod reflection;
pub mod registry;

pub use reflection::{
    EmittedReflection, Reflection, ReflectionAdapter, ReflectionTier, host_reflection,
    install_host_reflection,
};
pub use registry::{DECORATORS, Decorator, MetadataRegistry};

use onebun_domain::value_objects::{ParamMetadata, RouteMetadata};

use crate::class::{Class, ClassRef, Injectable};
use crate::controller::Controller;
use crate::tag::ServiceTag;

/// Metadata attached by `@Service`
#[derive(Debug, Clone)]
pub struct ServiceMetadata {
    /// Canonical tag the service is bound to
    pub tag: ServiceTag,
    /// Class constructed for the tag
    pub impl_class: ClassRef,
}

/// Metadata attached by `@Controller`
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerMetadata {
    /// Path prefix shared by every route
    pub base_path: String,
    /// Route records, with parameter records merged in
    pub routes: Vec<RouteMetadata>,
}

/// Metadata attached by `@Module`
///
/// Doubles as the explicit builder used to declare a module:
///
/// ```ignore
/// let metadata = ModuleMetadata::new()
///     .import::<UsersModule>()
///     .provider::<CacheService>()
///     .controller::<HealthController>();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModuleMetadata {
    /// Sub-modules whose layers are merged into this module
    pub imports: Vec<ClassRef>,
    /// Controllers instantiated by this module
    pub controllers: Vec<ClassRef>,
    /// Providers exposed as services
    pub providers: Vec<ClassRef>,
}

impl ModuleMetadata {
    /// Empty module declaration
    pub fn new() -> Self {
        Self::default()
    }

    /// Import a sub-module
    pub fn import<M: Class>(mut self) -> Self {
        self.imports.push(ClassRef::of::<M>());
        self
    }

    /// Declare a provider
    pub fn provider<S: Injectable>(mut self) -> Self {
        self.providers.push(ClassRef::provider::<S>());
        self
    }

    /// Declare a controller
    pub fn controller<C: Injectable + Controller>(mut self) -> Self {
        self.controllers.push(ClassRef::controller::<C>());
        self
    }
}

/// Class-level metadata, one variant per class decorator
#[derive(Debug, Clone)]
pub enum ClassMetadata {
    Service(ServiceMetadata),
    Controller(ControllerMetadata),
    Module(ModuleMetadata),
}

/// A value stored in the registry
#[derive(Debug, Clone)]
pub enum MetadataValue {
    /// Class decorator payload (scalar)
    Class(ClassMetadata),
    /// Route records (append-only list)
    Routes(Vec<RouteMetadata>),
    /// Parameter records (append-only list)
    Params(Vec<ParamMetadata>),
    /// Constructor parameter types (scalar)
    ParamTypes(Vec<ClassRef>),
    /// Free-form user metadata (scalar)
    Json(serde_json::Value),
}

impl MetadataValue {
    /// Whether new values are appended instead of ignored
    pub fn is_list(&self) -> bool {
        matches!(self, Self::Routes(_) | Self::Params(_))
    }

    /// Append the items of `other` when both values are the same list kind
    ///
    /// Returns `false` when the kinds differ and nothing was appended.
    pub fn append(&mut self, other: MetadataValue) -> bool {
        match (self, other) {
            (Self::Routes(existing), Self::Routes(more)) => {
                existing.extend(more);
                true
            }
            (Self::Params(existing), Self::Params(more)) => {
                existing.extend(more);
                true
            }
            _ => false,
        }
    }

    /// Parameter types, if this value holds them
    pub fn as_param_types(&self) -> Option<&[ClassRef]> {
        match self {
            Self::ParamTypes(types) => Some(types),
            _ => None,
        }
    }
}

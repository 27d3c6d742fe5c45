//! Decorator functions
//!
//! Explicit registration calls against the global [`MetadataRegistry`]. The
//! `service!`, `controller!`, `module!`, `route!` and `param!` macros expand
//! to the same calls at link time.

use onebun_domain::value_objects::{ParamMetadata, RouteMetadata};

use super::{MetadataRegistry, ModuleMetadata};
use crate::class::{Class, ClassRef, Injectable};
use crate::controller::Controller;
use crate::tag::ServiceTag;

/// Mark `T` as a service bound to its canonical tag
pub fn service<T: Injectable>() -> ServiceTag {
    MetadataRegistry::global().register_service::<T>()
}

/// Mark `T` as a service bound to `tag`
pub fn service_with_tag<T: Injectable>(tag: ServiceTag) -> ServiceTag {
    MetadataRegistry::global().register_service_with_tag::<T>(tag)
}

/// Mark `T` as a controller mounted at `base_path`
pub fn controller<T: Injectable + Controller>(base_path: &str) {
    MetadataRegistry::global().register_controller::<T>(base_path);
}

/// Add a route to controller `T`
pub fn route<T: Class>(route: RouteMetadata) {
    MetadataRegistry::global().register_route::<T>(route);
}

/// Add a parameter record to a handler of controller `T`
pub fn param<T: Class>(handler_name: &str, param: ParamMetadata) {
    MetadataRegistry::global().register_param::<T>(handler_name, param);
}

/// Mark `M` as a module
pub fn module<M: Class>(metadata: ModuleMetadata) {
    MetadataRegistry::global().register_module::<M>(metadata);
}

/// Record constructor parameter types for `T`
pub fn param_types<T: Class>(types: Vec<ClassRef>) {
    MetadataRegistry::global().register_param_types::<T>(types);
}

/// Canonical tag of `T`
pub fn service_tag<T: Class>() -> ServiceTag {
    MetadataRegistry::global().get_service_tag(&ClassRef::of::<T>())
}

//! Reflection Adapter Tests

use std::sync::Arc;

use onebun_application::metadata::{
    EmittedReflection, Reflection, ReflectionAdapter, ReflectionTier, host_reflection,
    install_host_reflection,
};
use onebun_application::{Class, ClassRef, Logger, MetadataRegistry, MetadataValue};
use onebun_domain::constants::DESIGN_PARAMTYPES_KEY;

use crate::fixtures::{CacheService, EmittedController, UserController, UserService};

/// Host that never knows anything
struct BlindReflection;

impl Reflection for BlindReflection {
    fn name(&self) -> &'static str {
        "blind"
    }

    fn get_metadata(&self, _key: &str, _target: &ClassRef, _property: Option<&str>) -> Option<MetadataValue> {
        None
    }
}

struct OnlyLogger;

impl Class for OnlyLogger {
    fn param_types() -> Vec<ClassRef> {
        vec![ClassRef::of::<Logger>()]
    }
}

fn names(types: &[ClassRef]) -> Vec<&'static str> {
    types.iter().map(ClassRef::name).collect()
}

#[test]
fn test_emitted_reflection_reads_param_types() {
    let host = EmittedReflection;
    let target = ClassRef::of::<EmittedController>();

    let value = host
        .get_metadata(DESIGN_PARAMTYPES_KEY, &target, None)
        .expect("emitted types");
    assert_eq!(
        names(value.as_param_types().unwrap_or_default()),
        ["CacheService", "LoggerService", "UserService"]
    );

    assert!(host.get_metadata("other", &target, None).is_none());
    assert!(
        host.get_metadata(DESIGN_PARAMTYPES_KEY, &ClassRef::of::<UserController>(), None)
            .is_none()
    );
}

#[test]
fn test_host_tier_filters_reserved_types() {
    let adapter = ReflectionAdapter::new(Arc::new(EmittedReflection), Arc::new(MetadataRegistry::new()));

    let (tier, types) = adapter
        .lookup_constructor_param_types(&ClassRef::of::<EmittedController>())
        .expect("types");
    assert_eq!(tier, ReflectionTier::HostReflection);
    assert_eq!(names(&types), ["CacheService", "UserService"]);
}

#[test]
fn test_store_tier_used_when_host_is_silent() {
    let store = Arc::new(MetadataRegistry::new());
    store.register_param_types::<UserController>(vec![
        ClassRef::of::<UserService>(),
        ClassRef::of::<CacheService>(),
    ]);
    let adapter = ReflectionAdapter::new(Arc::new(BlindReflection), Arc::clone(&store));

    let (tier, types) = adapter
        .lookup_constructor_param_types(&ClassRef::of::<UserController>())
        .expect("types");
    assert_eq!(tier, ReflectionTier::MetadataStore);
    assert_eq!(names(&types), ["UserService", "CacheService"]);
}

#[test]
fn test_fully_filtered_host_list_falls_through() {
    let store = Arc::new(MetadataRegistry::new());
    store.register_param_types::<OnlyLogger>(vec![ClassRef::of::<CacheService>()]);
    let adapter = ReflectionAdapter::new(Arc::new(EmittedReflection), store);

    let (tier, types) = adapter
        .lookup_constructor_param_types(&ClassRef::of::<OnlyLogger>())
        .expect("types");
    assert_eq!(tier, ReflectionTier::MetadataStore);
    assert_eq!(names(&types), ["CacheService"]);
}

#[test]
fn test_no_types_anywhere() {
    let adapter = ReflectionAdapter::new(Arc::new(EmittedReflection), Arc::new(MetadataRegistry::new()));
    assert!(
        adapter
            .get_constructor_param_types(&ClassRef::of::<UserController>())
            .is_none()
    );
}

#[test]
fn test_host_reflection_is_installed_on_first_use() {
    let host = host_reflection();
    assert!(!host.name().is_empty());
    assert!(!install_host_reflection(Arc::new(EmittedReflection)));
}

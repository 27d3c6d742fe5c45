//! End-to-end composition scenarios

use std::sync::Arc;

use onebun_application::metadata::{EmittedReflection, ReflectionAdapter};
use onebun_application::{
    AvailableServices, Class, ClassRef, DependencyResolver, MetadataRegistry, ModuleMetadata,
    OneBunModule,
};

use crate::fixtures::{
    AppModule, ConfigService, LeftModule, Plain, RightModule, SettingsController, UserService,
    UsersModule, config, logger,
};

/// `constructor(private userService: UserService)` rendered in Rust
struct Foo;

impl Class for Foo {
    const SIGNATURE: &'static str = stringify!(fn new(user_service: UserService) -> Self);
}

fn resolver() -> DependencyResolver {
    DependencyResolver::new(ReflectionAdapter::new(
        Arc::new(EmittedReflection),
        Arc::new(MetadataRegistry::new()),
    ))
}

fn create(registry: &Arc<MetadataRegistry>, module: ClassRef) -> OneBunModule {
    OneBunModule::create_with_registry(module, logger(), config(), Arc::clone(registry))
        .expect("create")
}

#[test]
fn scenario_a_signature_resolution() {
    let available = AvailableServices::new().with(ClassRef::of::<UserService>());
    let resolution = resolver().resolve(&ClassRef::of::<Foo>(), &available);

    assert_eq!(resolution.dependencies, [ClassRef::of::<UserService>()]);
}

#[test]
fn scenario_b_plain_provider_fallback() {
    let registry = Arc::new(MetadataRegistry::new());
    registry.register_module::<AppModule>(ModuleMetadata::new().provider::<Plain>());

    let mut module = create(&registry, ClassRef::of::<AppModule>());
    module.setup().expect("setup succeeds without @Service");

    let plain = module.service::<Plain>().expect("plain provider realized");
    assert_eq!(plain.ping(), "pong");

    let tag = registry.get_service_tag(&ClassRef::of::<Plain>());
    assert!(module.get_service_instance(&tag).is_some());
}

#[test]
fn scenario_c_sibling_imports_are_not_aliased() {
    let registry = Arc::new(MetadataRegistry::new());
    registry.register_service::<UserService>();
    registry.register_module::<UsersModule>(ModuleMetadata::new().provider::<UserService>());
    registry.register_module::<LeftModule>(ModuleMetadata::new().import::<UsersModule>());
    registry.register_module::<RightModule>(ModuleMetadata::new().import::<UsersModule>());

    let tag = registry.get_service_tag(&ClassRef::of::<UserService>());
    let mut left = create(&registry, ClassRef::of::<LeftModule>());
    let mut right = create(&registry, ClassRef::of::<RightModule>());
    assert!(left.get_layer().provides(&tag));
    assert!(right.get_layer().provides(&tag));

    left.setup().expect("left setup");
    right.setup().expect("right setup");

    let from_left = left.service::<UserService>().expect("left users");
    let from_right = right.service::<UserService>().expect("right users");
    assert!(!Arc::ptr_eq(&from_left, &from_right));
}

#[test]
fn scenario_c_diamond_import_builds_child_once() {
    let registry = Arc::new(MetadataRegistry::new());
    registry.register_service::<UserService>();
    registry.register_module::<UsersModule>(ModuleMetadata::new().provider::<UserService>());
    registry.register_module::<LeftModule>(ModuleMetadata::new().import::<UsersModule>());
    registry.register_module::<RightModule>(ModuleMetadata::new().import::<UsersModule>());
    registry.register_module::<AppModule>(
        ModuleMetadata::new()
            .import::<LeftModule>()
            .import::<RightModule>(),
    );

    let mut module = create(&registry, ClassRef::of::<AppModule>());
    assert_eq!(module.get_imports().len(), 3);
    module.setup().expect("setup");

    // logger + one UserService despite two import paths
    assert_eq!(module.service_instances().len(), 2);
}

#[test]
fn scenario_d_config_parameter_is_skipped() {
    let available = AvailableServices::new().with(ClassRef::of::<ConfigService>());
    let resolution = resolver().resolve(&ClassRef::of::<SettingsController>(), &available);

    assert!(resolution.dependencies.is_empty());
    assert!(resolution.unresolved.is_empty());
}

//! Metadata Registry Tests

use onebun_application::metadata::Decorator;
use onebun_application::{ClassRef, MetadataRegistry, MetadataValue, ModuleMetadata, ServiceTag};
use onebun_domain::constants::{ROUTES_METADATA_KEY, SERVICE_METADATA_KEY};
use onebun_domain::value_objects::{HttpMethod, ParamKind, ParamMetadata, RouteMetadata};

use crate::fixtures::{AppModule, CacheService, UserController, UserService};

#[test]
fn test_scalar_metadata_first_write_wins() {
    let registry = MetadataRegistry::new();
    let target = ClassRef::of::<UserService>();

    assert!(registry.define_metadata("custom", MetadataValue::Json(1.into()), &target, None));
    assert!(!registry.define_metadata("custom", MetadataValue::Json(2.into()), &target, None));

    match registry.get_metadata("custom", &target, None) {
        Some(MetadataValue::Json(value)) => assert_eq!(value, serde_json::json!(1)),
        other => panic!("unexpected metadata: {other:?}"),
    }
}

#[test]
fn test_list_metadata_appends() {
    let registry = MetadataRegistry::new();
    registry.register_route::<UserController>(RouteMetadata::new(HttpMethod::Get, "/", "list"));
    registry.register_route::<UserController>(RouteMetadata::new(HttpMethod::Post, "/", "create"));

    let stored = registry.get_metadata(ROUTES_METADATA_KEY, &ClassRef::of::<UserController>(), None);
    match stored {
        Some(MetadataValue::Routes(routes)) => {
            let handlers: Vec<_> = routes.iter().map(|r| r.handler_name.as_str()).collect();
            assert_eq!(handlers, ["list", "create"]);
        }
        other => panic!("unexpected metadata: {other:?}"),
    }
}

#[test]
fn test_lookup_miss_is_none() {
    let registry = MetadataRegistry::new();
    let target = ClassRef::of::<CacheService>();

    assert!(registry.get_metadata(SERVICE_METADATA_KEY, &target, None).is_none());
    assert!(!registry.has_metadata(SERVICE_METADATA_KEY, &target, None));
    assert!(registry.metadata_keys(&target).is_empty());
    assert!(registry.is_empty());
}

#[test]
fn test_metadata_keys_are_sorted() {
    let registry = MetadataRegistry::new();
    registry.register_service::<UserController>();
    registry.register_controller::<UserController>("/users");

    assert_eq!(
        registry.metadata_keys(&ClassRef::of::<UserController>()),
        ["onebun:controller", "onebun:service"]
    );
}

#[test]
fn test_service_tag_is_memoized() {
    let registry = MetadataRegistry::new();
    let class = ClassRef::of::<UserService>();

    let first = registry.get_service_tag(&class);
    let second = registry.get_service_tag(&class);
    assert!(first.same_identity(&second));
    assert_eq!(first.identifier(), "UserService");
}

#[test]
fn test_service_registration_binds_canonical_tag() {
    let registry = MetadataRegistry::new();
    let tag = registry.register_service::<UserService>();

    let canonical = registry.get_service_tag(&ClassRef::of::<UserService>());
    assert!(tag.same_identity(&canonical));

    let metadata = registry
        .service_metadata(&ClassRef::of::<UserService>())
        .expect("service metadata");
    assert!(metadata.tag.same_identity(&tag));
    assert!(metadata.impl_class.factory().is_some());
}

#[test]
fn test_explicit_tag_wins_and_repeats_are_ignored() {
    let registry = MetadataRegistry::new();
    let explicit = ServiceTag::new("Users");

    let bound = registry.register_service_with_tag::<UserService>(explicit.clone());
    let again = registry.register_service::<UserService>();

    assert!(bound.same_identity(&explicit));
    assert!(again.same_identity(&explicit));
    assert!(
        registry
            .get_service_tag(&ClassRef::of::<UserService>())
            .same_identity(&explicit)
    );
}

#[test]
fn test_explicit_tag_after_canonical_tag_is_ignored() {
    let registry = MetadataRegistry::new();
    let class = ClassRef::of::<UserService>();
    assert!(!registry.has_service_tag(&class));

    let canonical = registry.get_service_tag(&class);
    assert!(registry.has_service_tag(&class));

    let bound = registry.register_service_with_tag::<UserService>(ServiceTag::new("Users"));
    assert!(bound.same_identity(&canonical));
    assert_eq!(bound.identifier(), "UserService");
    assert!(registry.service_tag_of(&class).is_some_and(|tag| tag.same_identity(&canonical)));
}

#[test]
fn test_params_merge_into_routes_in_any_order() {
    let registry = MetadataRegistry::new();
    registry.register_param::<UserController>(
        "find_one",
        ParamMetadata::new(ParamKind::Query, "verbose", 1),
    );
    registry.register_route::<UserController>(RouteMetadata::new(HttpMethod::Get, "/:id", "find_one"));
    registry.register_param::<UserController>(
        "find_one",
        ParamMetadata::new(ParamKind::Path, "id", 0).required(),
    );
    registry.register_param::<UserController>("other", ParamMetadata::new(ParamKind::Body, "dto", 0));
    registry.register_controller::<UserController>("/users");

    let metadata = registry
        .controller_metadata(&ClassRef::of::<UserController>())
        .expect("controller metadata");

    assert_eq!(metadata.base_path, "/users");
    assert_eq!(metadata.routes.len(), 1);
    let names: Vec<_> = metadata.routes[0].params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["id", "verbose"]);
    assert!(metadata.routes[0].params[0].required);
}

#[test]
fn test_controller_metadata_requires_controller_decorator() {
    let registry = MetadataRegistry::new();
    registry.register_route::<UserController>(RouteMetadata::new(HttpMethod::Get, "/", "list"));

    assert!(registry.controller_metadata(&ClassRef::of::<UserController>()).is_none());
}

#[test]
fn test_module_metadata_round_trip() {
    let registry = MetadataRegistry::new();
    registry.register_module::<AppModule>(
        ModuleMetadata::new()
            .provider::<UserService>()
            .controller::<UserController>(),
    );

    let metadata = registry
        .module_metadata(&ClassRef::of::<AppModule>())
        .expect("module metadata");
    assert_eq!(metadata.providers, [ClassRef::of::<UserService>()]);
    assert_eq!(metadata.controllers, [ClassRef::of::<UserController>()]);
    assert!(metadata.imports.is_empty());
}

#[test]
fn test_registered_constructors_are_kept() {
    let registry = MetadataRegistry::new();
    registry.register_route::<UserController>(RouteMetadata::new(HttpMethod::Get, "/", "list"));
    registry.register_controller::<UserController>("/users");

    let known = registry
        .class(ClassRef::of::<UserController>().id())
        .expect("known class");
    assert!(known.controller_factory().is_some());
}

#[test]
fn test_apply_decorators() {
    let registry = MetadataRegistry::new();
    let decorators = [
        Decorator {
            class_name: "CacheService",
            apply: |registry| {
                registry.register_service::<CacheService>();
            },
        },
        Decorator {
            class_name: "UserService",
            apply: |registry| {
                registry.register_service::<UserService>();
            },
        },
    ];

    assert_eq!(registry.apply_decorators(&decorators), 2);
    assert!(registry.service_metadata(&ClassRef::of::<CacheService>()).is_some());
    assert!(registry.service_metadata(&ClassRef::of::<UserService>()).is_some());
    assert_eq!(registry.len(), 2);
}

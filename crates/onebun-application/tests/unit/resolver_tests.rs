//! Dependency Resolver Tests

use std::sync::Arc;

use onebun_application::metadata::{EmittedReflection, ReflectionAdapter};
use onebun_application::resolver::{ResolutionSource, ScopeKey};
use onebun_application::{
    AvailableServices, Class, ClassRef, DependencyResolver, MetadataRegistry,
};

use crate::fixtures::{
    AppModule, AuditController, CacheService, ConfigService, EmittedController, GuessController,
    SettingsController, UserController, UserService, UsersModule,
};

mod shadow {
    use onebun_application::Class;

    /// Shares its class name with `fixtures::UserService`
    pub struct UserService;

    impl Class for UserService {}
}

struct Foo;

impl Class for Foo {
    const SIGNATURE: &'static str = stringify!(fn new(user_service: UserService) -> Self);
}

struct Untyped;

impl Class for Untyped {
    const SIGNATURE: &'static str = "constructor(cache, mystery)";
}

struct Modified;

impl Class for Modified {
    const SIGNATURE: &'static str = "constructor(private userService: UserService) {}";
}

struct Destructured;

impl Class for Destructured {
    const SIGNATURE: &'static str = "constructor({ users }, private readonly cache: CacheService)";
}

struct Mistyped;

impl Class for Mistyped {
    const SIGNATURE: &'static str = "fn new(user_service: Arc<Users>)";
}

fn resolver_with(store: Arc<MetadataRegistry>) -> DependencyResolver {
    DependencyResolver::new(ReflectionAdapter::new(Arc::new(EmittedReflection), store))
}

fn resolver() -> DependencyResolver {
    resolver_with(Arc::new(MetadataRegistry::new()))
}

fn services() -> AvailableServices {
    [
        ClassRef::of::<UserService>(),
        ClassRef::of::<CacheService>(),
        ClassRef::of::<ConfigService>(),
    ]
    .into_iter()
    .collect()
}

fn names(types: &[ClassRef]) -> Vec<&'static str> {
    types.iter().map(ClassRef::name).collect()
}

#[test]
fn test_annotated_types_are_looked_up_directly() {
    let resolution = resolver().resolve(&ClassRef::of::<Foo>(), &services());

    assert_eq!(resolution.source, ResolutionSource::Signature);
    assert_eq!(resolution.dependencies, [ClassRef::of::<UserService>()]);
    assert!(resolution.is_complete());
}

#[test]
fn test_identifiers_are_guessed_without_annotations() {
    let resolution = resolver().resolve(&ClassRef::of::<GuessController>(), &services());
    assert_eq!(names(&resolution.dependencies), ["UserService"]);

    let resolution = resolver().resolve(&ClassRef::of::<Untyped>(), &services());
    assert_eq!(names(&resolution.dependencies), ["CacheService"]);
    assert_eq!(resolution.unresolved.len(), 1);
    assert_eq!(resolution.unresolved[0].candidate, "MysteryService");
}

#[test]
fn test_config_parameter_is_never_resolved() {
    let available = services();
    assert!(available.get("ConfigService").is_some());

    let resolution = resolver().resolve(&ClassRef::of::<SettingsController>(), &available);
    assert!(resolution.dependencies.is_empty());
    assert!(resolution.unresolved.is_empty());
}

#[test]
fn test_access_modifiers_do_not_hide_parameters() {
    let resolution = resolver().resolve(&ClassRef::of::<Modified>(), &services());

    assert_eq!(resolution.source, ResolutionSource::Signature);
    assert_eq!(resolution.dependencies, [ClassRef::of::<UserService>()]);
    assert!(resolution.is_complete());
}

#[test]
fn test_destructured_parameter_is_reported_unresolved() {
    let resolution = resolver().resolve(&ClassRef::of::<Destructured>(), &services());

    assert_eq!(names(&resolution.dependencies), ["CacheService"]);
    assert_eq!(resolution.unresolved.len(), 1);
    assert_eq!(resolution.unresolved[0].name, "{ users }");
    assert_eq!(resolution.unresolved[0].to_string(), "{ users }");
    assert!(!resolution.is_complete());
}

#[test]
fn test_annotation_miss_does_not_fall_back_to_guessing() {
    let resolution = resolver().resolve(&ClassRef::of::<Mistyped>(), &services());

    assert!(resolution.dependencies.is_empty());
    assert_eq!(resolution.unresolved[0].type_name.as_deref(), Some("Users"));
    assert_eq!(resolution.unresolved[0].to_string(), "user_service: Users");
}

#[test]
fn test_heuristic_output_is_bounded_and_reachable() {
    let available = services();
    for class in [
        ClassRef::of::<UserController>(),
        ClassRef::of::<GuessController>(),
        ClassRef::of::<AuditController>(),
        ClassRef::of::<Untyped>(),
    ] {
        let resolution = resolver().resolve(&class, &available);
        let declared = onebun_application::resolver::signature::parse_signature(class.signature())
            .into_iter()
            .filter(|param| !param.is_reserved())
            .count();

        assert!(resolution.dependencies.len() <= declared, "{class}");
        for dependency in &resolution.dependencies {
            assert_eq!(available.get(dependency.name()), Some(*dependency));
        }
    }
}

#[test]
fn test_emitted_types_are_returned_verbatim() {
    // The signature names AuditService, which must be ignored
    let resolution = resolver().resolve(&ClassRef::of::<EmittedController>(), &AvailableServices::new());

    assert_eq!(resolution.source, ResolutionSource::HostReflection);
    assert_eq!(names(&resolution.dependencies), ["CacheService", "UserService"]);
    assert!(resolution.is_complete());
}

#[test]
fn test_stored_types_take_precedence_over_signature() {
    let store = Arc::new(MetadataRegistry::new());
    store.register_param_types::<Foo>(vec![ClassRef::of::<CacheService>()]);

    let resolution = resolver_with(store).resolve(&ClassRef::of::<Foo>(), &services());
    assert_eq!(resolution.source, ResolutionSource::MetadataStore);
    assert_eq!(names(&resolution.dependencies), ["CacheService"]);
}

#[test]
fn test_empty_signature() {
    let resolution = resolver().resolve(&ClassRef::of::<UserService>(), &services());
    assert_eq!(resolution.source, ResolutionSource::Empty);
    assert!(resolution.dependencies.is_empty());
}

#[test]
fn test_resolution_is_cached_per_scope() {
    let resolver = resolver();
    let available = services();
    let class = ClassRef::of::<UserController>();

    let first = resolver.resolve(&class, &available);
    let second = resolver.resolve(&class, &available);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(resolver.cache_len(), 1);
    assert_eq!(
        resolver.cached(&class, available.scope()),
        Some(first.dependencies.clone())
    );
}

#[test]
fn test_same_class_resolves_per_module_scope() {
    let resolver = resolver();
    let class = ClassRef::of::<UserController>();

    let full = AvailableServices::for_module(&ClassRef::of::<AppModule>())
        .with(ClassRef::of::<UserService>())
        .with(ClassRef::of::<CacheService>());
    let partial = AvailableServices::for_module(&ClassRef::of::<UsersModule>())
        .with(ClassRef::of::<UserService>());

    assert_eq!(resolver.resolve(&class, &full).dependencies.len(), 2);
    assert_eq!(resolver.resolve(&class, &partial).dependencies.len(), 1);
    assert_eq!(full.scope(), ScopeKey::Module(ClassRef::of::<AppModule>().id()));
    assert_eq!(resolver.cache_len(), 2);
}

#[test]
fn test_anonymous_maps_have_distinct_scopes() {
    assert_ne!(AvailableServices::new().scope(), AvailableServices::new().scope());
}

#[test]
fn test_colliding_names_keep_first() {
    let available = AvailableServices::new()
        .with(ClassRef::of::<UserService>())
        .with(ClassRef::of::<shadow::UserService>());

    assert_eq!(available.len(), 1);
    assert_eq!(available.get("UserService"), Some(ClassRef::of::<UserService>()));
    assert!(!ClassRef::of::<shadow::UserService>().is::<UserService>());
}

#[test]
fn test_into_result() {
    let complete = resolver().resolve(&ClassRef::of::<Foo>(), &services());
    assert_eq!(
        (*complete).clone().into_result(),
        Ok(vec![ClassRef::of::<UserService>()])
    );

    let partial = resolver().resolve(&ClassRef::of::<AuditController>(), &services());
    let unresolved = (*partial).clone().into_result().expect_err("audit is unresolved");
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].name, "audit");
}

#[test]
fn test_global_resolver_is_shared() {
    let a = DependencyResolver::global();
    let b = DependencyResolver::global();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(<Foo as Class>::class_name(), "Foo");
}

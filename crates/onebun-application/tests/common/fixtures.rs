//! Shared test classes
//!
//! Services, controllers and modules used across the unit and integration
//! suites. Registries are built per test so suites never depend on the
//! global decorator table.

#![allow(dead_code)]

use std::sync::Arc;

use onebun_application::{
    BaseService, Class, ClassRef, Config, ConstructorArgs, Controller, ControllerBase, Injectable,
    Logger, MetadataRegistry, ModuleMetadata,
};
use onebun_domain::Result;
use onebun_domain::value_objects::{AppConfig, WiringPolicy};

// ============================================================================
// Services
// ============================================================================

pub struct UserService {
    base: BaseService,
}

impl Class for UserService {}

impl Injectable for UserService {
    fn construct(args: &ConstructorArgs) -> Result<Self> {
        Ok(Self {
            base: BaseService::from_args::<Self>(args)?,
        })
    }
}

impl UserService {
    pub fn greet(&self, name: &str) -> String {
        format!("hello {name} from {}", self.base.config().name)
    }

    pub fn base(&self) -> &BaseService {
        &self.base
    }
}

pub struct CacheService {
    base: BaseService,
}

impl Class for CacheService {}

impl Injectable for CacheService {
    fn construct(args: &ConstructorArgs) -> Result<Self> {
        Ok(Self {
            base: BaseService::from_args::<Self>(args)?,
        })
    }
}

pub struct ConfigService {
    base: BaseService,
}

impl Class for ConfigService {}

impl Injectable for ConfigService {
    fn construct(args: &ConstructorArgs) -> Result<Self> {
        Ok(Self {
            base: BaseService::from_args::<Self>(args)?,
        })
    }
}

/// Provider without `@Service` metadata
pub struct Plain;

impl Class for Plain {}

impl Injectable for Plain {
    fn construct(_args: &ConstructorArgs) -> Result<Self> {
        Ok(Plain)
    }
}

impl Plain {
    pub fn ping(&self) -> &'static str {
        "pong"
    }
}

// ============================================================================
// Controllers
// ============================================================================

/// Annotated signature: `user_service` and `cache` are looked up by type
pub struct UserController {
    base: ControllerBase,
    pub users: Option<Arc<UserService>>,
    pub cache: Option<Arc<CacheService>>,
}

impl Class for UserController {
    const SIGNATURE: &'static str = stringify!(
        fn new(user_service: Arc<UserService>, cache: &CacheService, logger: Logger, config: Config)
    );
}

impl Injectable for UserController {
    fn construct(args: &ConstructorArgs) -> Result<Self> {
        Ok(Self {
            base: ControllerBase::from_args::<Self>(args)?,
            users: args.dependency::<UserService>(),
            cache: args.dependency::<CacheService>(),
        })
    }
}

impl Controller for UserController {
    fn base(&self) -> &ControllerBase {
        &self.base
    }
}

/// Unannotated signature: dependencies are guessed from identifiers
pub struct GuessController {
    base: ControllerBase,
    pub users: Option<Arc<UserService>>,
}

impl Class for GuessController {
    const SIGNATURE: &'static str = "constructor(userService, config, logger)";
}

impl Injectable for GuessController {
    fn construct(args: &ConstructorArgs) -> Result<Self> {
        Ok(Self {
            base: ControllerBase::from_args::<Self>(args)?,
            users: args.dependency::<UserService>(),
        })
    }
}

impl Controller for GuessController {
    fn base(&self) -> &ControllerBase {
        &self.base
    }
}

/// Only takes the framework-reserved config
pub struct SettingsController {
    base: ControllerBase,
}

impl Class for SettingsController {
    const SIGNATURE: &'static str = "constructor(config)";
}

impl Injectable for SettingsController {
    fn construct(args: &ConstructorArgs) -> Result<Self> {
        Ok(Self {
            base: ControllerBase::from_args::<Self>(args)?,
        })
    }
}

impl Controller for SettingsController {
    fn base(&self) -> &ControllerBase {
        &self.base
    }
}

/// Emits its constructor types; the signature text disagrees on purpose
pub struct EmittedController {
    base: ControllerBase,
    pub dependencies: usize,
}

impl Class for EmittedController {
    const SIGNATURE: &'static str = stringify!(fn new(audit: Arc<AuditService>));

    fn param_types() -> Vec<ClassRef> {
        vec![
            ClassRef::of::<CacheService>(),
            ClassRef::of::<Logger>(),
            ClassRef::of::<UserService>(),
        ]
    }
}

impl Injectable for EmittedController {
    fn construct(args: &ConstructorArgs) -> Result<Self> {
        Ok(Self {
            base: ControllerBase::from_args::<Self>(args)?,
            dependencies: args.dependencies().len(),
        })
    }
}

impl Controller for EmittedController {
    fn base(&self) -> &ControllerBase {
        &self.base
    }
}

/// Depends on a service no module provides
pub struct AuditController {
    base: ControllerBase,
    pub has_audit: bool,
}

impl Class for AuditController {
    const SIGNATURE: &'static str = stringify!(fn new(audit: Arc<AuditService>, users: Arc<UserService>));
}

impl Injectable for AuditController {
    fn construct(args: &ConstructorArgs) -> Result<Self> {
        Ok(Self {
            base: ControllerBase::from_args::<Self>(args)?,
            has_audit: args.dependencies().len() > 1,
        })
    }
}

impl Controller for AuditController {
    fn base(&self) -> &ControllerBase {
        &self.base
    }
}

// ============================================================================
// Modules
// ============================================================================

pub struct AppModule;
impl Class for AppModule {}

pub struct UsersModule;
impl Class for UsersModule {}

pub struct LeftModule;
impl Class for LeftModule {}

pub struct RightModule;
impl Class for RightModule {}

pub struct CycleA;
impl Class for CycleA {}

pub struct CycleB;
impl Class for CycleB {}

// ============================================================================
// Helpers
// ============================================================================

pub fn logger() -> Logger {
    Logger::new("test-app")
}

pub fn config() -> Config {
    Arc::new(AppConfig::default())
}

pub fn strict_config() -> Config {
    let mut config = AppConfig::default();
    config.wiring.policy = WiringPolicy::Strict;
    Arc::new(config)
}

/// Args as a service layer would hand them out
pub fn service_args() -> ConstructorArgs {
    ConstructorArgs::new(logger(), config())
}

/// Registry with `UserService`, `CacheService` and an `AppModule` exposing
/// them to `UserController`
pub fn app_registry() -> Arc<MetadataRegistry> {
    let registry = MetadataRegistry::new();
    registry.register_service::<UserService>();
    registry.register_service::<CacheService>();
    registry.register_controller::<UserController>("/users");
    registry.register_module::<AppModule>(
        ModuleMetadata::new()
            .provider::<UserService>()
            .provider::<CacheService>()
            .controller::<UserController>(),
    );
    Arc::new(registry)
}

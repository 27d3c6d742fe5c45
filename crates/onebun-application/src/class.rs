//! Class model
//!
//! A "class" is any `'static` type the framework can describe at runtime.
//! [`ClassRef`] is the copyable runtime handle used wherever decorators,
//! modules and the resolver need to refer to a type: it carries the type
//! identity, the class name, the constructor signature text and, for
//! injectable types, an erased constructor.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use onebun_domain::error::{Error, Result};

use crate::Config;
use crate::controller::Controller;
use crate::logger::Logger;

/// Runtime identity of a class
pub type ClassId = TypeId;

/// Erased constructor producing a service instance
pub type InstanceFactory = fn(&ConstructorArgs) -> Result<Instance>;

/// Erased constructor producing a controller
pub type ControllerFactory = fn(&ConstructorArgs) -> Result<Arc<dyn Controller>>;

/// A type the framework can describe
///
/// All items have defaults, so marker types such as modules only need an
/// empty `impl Class for AppModule {}`.
pub trait Class: Send + Sync + 'static {
    /// Constructor signature text
    ///
    /// Read by the dependency resolver when no parameter types are known.
    /// Usually produced with `stringify!` over the `fn new(...)` header.
    const SIGNATURE: &'static str = "";

    /// Class name used for tags, name-based lookup and logging
    fn class_name() -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Constructor parameter types known at compile time
    fn param_types() -> Vec<ClassRef> {
        Vec::new()
    }
}

/// A class the framework can construct
pub trait Injectable: Class + Sized {
    /// Build an instance from framework-supplied arguments
    fn construct(args: &ConstructorArgs) -> Result<Self>;
}

/// Strip module paths and generic arguments from a type name
///
/// `app::users::UserService` becomes `UserService` and
/// `app::Wrapper<app::Inner>` becomes `Wrapper`.
pub fn short_type_name(full: &str) -> &str {
    let head = full.split('<').next().unwrap_or(full);
    head.rsplit("::").next().unwrap_or(head)
}

/// Copyable runtime handle to a class
#[derive(Clone, Copy)]
pub struct ClassRef {
    type_id: fn() -> TypeId,
    name: fn() -> &'static str,
    signature: &'static str,
    param_types: fn() -> Vec<ClassRef>,
    factory: Option<InstanceFactory>,
    controller_factory: Option<ControllerFactory>,
}

impl ClassRef {
    /// Describe a class without a constructor (modules, tag owners)
    pub const fn of<T: Class>() -> Self {
        Self {
            type_id: TypeId::of::<T>,
            name: T::class_name,
            signature: T::SIGNATURE,
            param_types: T::param_types,
            factory: None,
            controller_factory: None,
        }
    }

    /// Describe a constructible class (services and plain providers)
    pub const fn provider<T: Injectable>() -> Self {
        Self {
            factory: Some(construct_instance::<T>),
            ..Self::of::<T>()
        }
    }

    /// Describe a controller class
    pub const fn controller<T: Injectable + Controller>() -> Self {
        Self {
            controller_factory: Some(construct_controller::<T>),
            ..Self::of::<T>()
        }
    }

    /// Type identity of the class
    pub fn id(&self) -> ClassId {
        (self.type_id)()
    }

    /// Class name
    pub fn name(&self) -> &'static str {
        (self.name)()
    }

    /// Constructor signature text (may be empty)
    pub fn signature(&self) -> &'static str {
        self.signature
    }

    /// Parameter types emitted at compile time
    pub fn emitted_param_types(&self) -> Vec<ClassRef> {
        (self.param_types)()
    }

    /// Erased service constructor, if the class is constructible
    pub fn factory(&self) -> Option<InstanceFactory> {
        self.factory
    }

    /// Erased controller constructor, if the class is a controller
    pub fn controller_factory(&self) -> Option<ControllerFactory> {
        self.controller_factory
    }

    /// Whether this handle describes the type `T`
    pub fn is<T: Class>(&self) -> bool {
        self.id() == TypeId::of::<T>()
    }

    /// Combine two handles to the same class, keeping every known constructor
    pub(crate) fn merged_with(self, other: &ClassRef) -> ClassRef {
        ClassRef {
            factory: self.factory.or(other.factory),
            controller_factory: self.controller_factory.or(other.controller_factory),
            ..self
        }
    }
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for ClassRef {}

impl Hash for ClassRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClassRef").field(&self.name()).finish()
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn construct_instance<T: Injectable>(args: &ConstructorArgs) -> Result<Instance> {
    T::construct(args).map(|value| Instance::new(Arc::new(value)))
}

fn construct_controller<T: Injectable + Controller>(
    args: &ConstructorArgs,
) -> Result<Arc<dyn Controller>> {
    T::construct(args).map(|value| Arc::new(value) as Arc<dyn Controller>)
}

/// A constructed, type-erased value together with its concrete class
#[derive(Clone)]
pub struct Instance {
    class: ClassRef,
    value: Arc<dyn Any + Send + Sync>,
}

impl Instance {
    /// Wrap a shared value
    pub fn new<T: Class>(value: Arc<T>) -> Self {
        Self {
            class: ClassRef::of::<T>(),
            value,
        }
    }

    /// Concrete class of the wrapped value
    pub fn class(&self) -> ClassRef {
        self.class
    }

    /// Whether the wrapped value is an instance of `class`
    pub fn is_instance_of(&self, class: &ClassRef) -> bool {
        self.class == *class
    }

    /// Recover the typed value
    pub fn downcast<T: Class>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.value).downcast::<T>().ok()
    }

    /// Whether both handles point at the same allocation
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.value), Arc::as_ptr(&other.value))
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.class.name())
            .finish_non_exhaustive()
    }
}

/// Arguments handed to [`Injectable::construct`]
///
/// Services receive a logger and the config. Controllers additionally receive
/// their resolved dependencies; unresolved ones are simply absent. Plain
/// providers are built with empty arguments.
#[derive(Clone, Default)]
pub struct ConstructorArgs {
    dependencies: Vec<Instance>,
    logger: Option<Logger>,
    config: Option<Config>,
}

impl ConstructorArgs {
    /// Arguments for a zero-argument constructor
    pub fn empty() -> Self {
        Self::default()
    }

    /// Arguments carrying the framework-reserved logger and config
    pub fn new(logger: Logger, config: Config) -> Self {
        Self {
            dependencies: Vec::new(),
            logger: Some(logger),
            config: Some(config),
        }
    }

    /// Append a resolved dependency
    pub fn with_dependency(mut self, instance: Instance) -> Self {
        self.dependencies.push(instance);
        self
    }

    /// Resolved dependencies in constructor order
    pub fn dependencies(&self) -> &[Instance] {
        &self.dependencies
    }

    /// First dependency of type `T`, if it was resolved
    pub fn dependency<T: Class>(&self) -> Option<Arc<T>> {
        self.dependencies.iter().find_map(Instance::downcast::<T>)
    }

    /// Dependency of type `T`, failing when it was not resolved
    pub fn require<T: Class>(&self) -> Result<Arc<T>> {
        self.dependency::<T>()
            .ok_or_else(|| Error::service_not_found(T::class_name()))
    }

    /// Framework-supplied logger
    pub fn logger(&self) -> Option<&Logger> {
        self.logger.as_ref()
    }

    /// Framework-supplied config
    pub fn config(&self) -> Option<&Config> {
        self.config.as_ref()
    }
}

impl fmt::Debug for ConstructorArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorArgs")
            .field("dependencies", &self.dependencies)
            .field("logger", &self.logger.is_some())
            .field("config", &self.config.is_some())
            .finish()
    }
}

//! Controller contract
//!
//! User controllers embed a [`ControllerBase`] and implement [`Controller`].
//! After construction the composition root copies every realized service
//! into the base, so `get_service` works for services the constructor never
//! declared.
//!
//! ```ignore
//! pub struct UserController {
//!     base: ControllerBase,
//!     users: Option<Arc<UserService>>,
//! }
//!
//! impl Class for UserController {
//!     const SIGNATURE: &'static str = stringify!(fn new(users: Arc<UserService>, logger: Logger, config: Config));
//! }
//!
//! impl Injectable for UserController {
//!     fn construct(args: &ConstructorArgs) -> Result<Self> {
//!         Ok(Self {
//!             base: ControllerBase::from_args::<Self>(args)?,
//!             users: args.dependency::<UserService>(),
//!         })
//!     }
//! }
//!
//! impl Controller for UserController {
//!     fn base(&self) -> &ControllerBase {
//!         &self.base
//!     }
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use downcast_rs::{DowncastSync, impl_downcast};
use onebun_domain::error::{Error, Result};

use crate::Config;
use crate::class::{Class, ClassRef, ConstructorArgs, Instance};
use crate::logger::Logger;
use crate::tag::ServiceTag;

/// A constructed controller
pub trait Controller: DowncastSync {
    /// Embedded framework state
    fn base(&self) -> &ControllerBase;
}

impl_downcast!(sync Controller);

/// Key accepted by [`ControllerBase::get_service`]
#[derive(Debug, Clone)]
pub enum ServiceLookup {
    /// Look up by tag
    Tag(ServiceTag),
    /// Look up by the class the tag was derived from
    Class(ClassRef),
}

impl From<ServiceTag> for ServiceLookup {
    fn from(tag: ServiceTag) -> Self {
        Self::Tag(tag)
    }
}

impl From<&ServiceTag> for ServiceLookup {
    fn from(tag: &ServiceTag) -> Self {
        Self::Tag(tag.clone())
    }
}

impl From<ClassRef> for ServiceLookup {
    fn from(class: ClassRef) -> Self {
        Self::Class(class)
    }
}

impl From<&ClassRef> for ServiceLookup {
    fn from(class: &ClassRef) -> Self {
        Self::Class(*class)
    }
}

/// Framework state embedded in every controller
pub struct ControllerBase {
    class_name: &'static str,
    logger: Logger,
    config: Config,
    services: DashMap<ServiceTag, Instance>,
}

impl ControllerBase {
    /// Build from constructor arguments for controller `T`
    ///
    /// Fails with [`Error::MissingLogger`] when no logger was supplied; a
    /// missing config falls back to the default configuration.
    pub fn from_args<T: Class>(args: &ConstructorArgs) -> Result<Self> {
        let class_name = T::class_name();
        let logger = args
            .logger()
            .ok_or_else(|| Error::missing_logger(class_name))?
            .child(class_name);
        let config = args.config().cloned().unwrap_or_default();
        logger.debug("Controller initialized");

        Ok(Self {
            class_name,
            logger,
            config,
            services: DashMap::new(),
        })
    }

    /// Controller class name
    pub fn class_name(&self) -> &'static str {
        self.class_name
    }

    /// Child logger scoped to the controller
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Application configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Bind a service instance in the private lookup map
    pub fn register_service(&self, tag: ServiceTag, instance: Instance) {
        self.services.insert(tag, instance);
    }

    /// Number of services in the lookup map
    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    /// Look up a service by tag or by class
    ///
    /// Tag lookups try identity, then the tag identifier. Class lookups take
    /// the first instance of that class, then a tag whose identifier is the
    /// class name.
    pub fn get_service(&self, key: impl Into<ServiceLookup>) -> Result<Instance> {
        match key.into() {
            ServiceLookup::Tag(tag) => self
                .services
                .get(&tag)
                .map(|entry| entry.value().clone())
                .or_else(|| self.find_by_identifier(tag.identifier()))
                .ok_or_else(|| Error::service_not_found(tag.identifier())),
            ServiceLookup::Class(class) => self
                .services
                .iter()
                .find(|entry| entry.value().is_instance_of(&class))
                .map(|entry| entry.value().clone())
                .or_else(|| self.find_by_identifier(class.name()))
                .ok_or_else(|| Error::service_not_found(class.name())),
        }
    }

    fn find_by_identifier(&self, identifier: &str) -> Option<Instance> {
        self.services
            .iter()
            .find(|entry| entry.key().identifier() == identifier)
            .map(|entry| entry.value().clone())
    }

    /// Typed service lookup by class
    pub fn service<T: Class>(&self) -> Result<Arc<T>> {
        self.get_service(ClassRef::of::<T>())?
            .downcast::<T>()
            .ok_or_else(|| {
                Error::type_mismatch(format!("service is not a {}", T::class_name()))
            })
    }
}

impl fmt::Debug for ControllerBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerBase")
            .field("class_name", &self.class_name)
            .field("services", &self.services.len())
            .finish_non_exhaustive()
    }
}

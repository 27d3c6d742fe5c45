//! Services
//!
//! [`ServiceLayerFactory`] turns a `@Service` class into a singleton layer,
//! and [`BaseService`] is the framework state user services embed.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use onebun_domain::error::{Error, Result};
use tracing::debug;

use crate::Config;
use crate::class::{Class, ClassRef, ConstructorArgs};
use crate::layer::Layer;
use crate::logger::Logger;
use crate::metadata::MetadataRegistry;

/// Builds singleton layers for service classes
#[derive(Debug, Clone)]
pub struct ServiceLayerFactory {
    registry: Arc<MetadataRegistry>,
}

impl ServiceLayerFactory {
    /// Factory reading service metadata from `registry`
    pub fn new(registry: Arc<MetadataRegistry>) -> Self {
        Self { registry }
    }

    /// Factory over the global registry
    pub fn global() -> Self {
        Self::new(MetadataRegistry::global())
    }

    /// Layer that constructs `service_class` once and binds it to its tag
    ///
    /// The class receives a child logger and the config. Fails immediately
    /// with [`Error::MissingDecorator`] when the class is not a service.
    pub fn create_service_layer(
        &self,
        service_class: &ClassRef,
        logger: &Logger,
        config: &Config,
    ) -> Result<Layer> {
        let metadata = self
            .registry
            .service_metadata(service_class)
            .ok_or_else(|| Error::missing_decorator(service_class.name(), "Service"))?;

        let impl_class = metadata.impl_class;
        let factory = impl_class
            .factory()
            .or_else(|| service_class.factory())
            .ok_or_else(|| {
                Error::construction(impl_class.name(), "service class has no constructor")
            })?;

        let args = ConstructorArgs::new(logger.clone(), Arc::clone(config));
        debug!(class = impl_class.name(), tag = %metadata.tag, "Created service layer");

        Ok(Layer::sync(metadata.tag, impl_class.name(), move |_| {
            factory(&args)
        }))
    }
}

/// Layer for `service_class` using the global registry
pub fn create_service_layer(
    service_class: &ClassRef,
    logger: &Logger,
    config: &Config,
) -> Result<Layer> {
    ServiceLayerFactory::global().create_service_layer(service_class, logger, config)
}

/// Framework state embedded in every service
#[derive(Debug, Clone)]
pub struct BaseService {
    class_name: &'static str,
    logger: Logger,
    config: Config,
}

impl BaseService {
    /// Build from constructor arguments for service `T`
    ///
    /// Fails with [`Error::MissingLogger`] when no logger was supplied.
    pub fn from_args<T: Class>(args: &ConstructorArgs) -> Result<Self> {
        let class_name = T::class_name();
        let logger = args
            .logger()
            .ok_or_else(|| Error::missing_logger(class_name))?
            .child(class_name);
        let config = args.config().cloned().unwrap_or_default();
        logger.debug("Service initialized");

        Ok(Self {
            class_name,
            logger,
            config,
        })
    }

    /// Service class name
    pub fn class_name(&self) -> &'static str {
        self.class_name
    }

    /// Child logger scoped to the service
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Application configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run a fallible future, normalizing its error and any panic
    pub async fn run_effect<F, T, E>(&self, effect: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, E>>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        match AssertUnwindSafe(effect).catch_unwind().await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(error)) => {
                let error: Box<dyn std::error::Error + Send + Sync> = error.into();
                let message = error.to_string();
                self.logger.error(format_args!("Effect failed: {message}"));
                Err(Error::effect_with_source(message, error))
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                self.logger.error(format_args!("Effect panicked: {message}"));
                Err(Error::effect(message))
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

//! Application bootstrap
//!
//! Turns a loaded [`AppConfig`] into a wired [`OneBunModule`].
//!
//! ```text
//! ConfigLoader ──► AppConfig ──► init_app::<M>() ──► OneBunModule (ControllersWired)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let config = ConfigLoader::new().load()?;
//! init_logging(config.logging.clone())?;
//! let app = init_app::<AppModule>(config)?;
//! println!("{}", app.wiring_report());
//! ```

use std::sync::Arc;

use onebun_application::{ClassRef, Class, Logger, MetadataRegistry, OneBunModule};
use onebun_domain::error::Result;
use onebun_domain::value_objects::AppConfig;
use tracing::info;

/// Create and set up module `M` from the global decorator registry
pub fn init_app<M: Class>(config: AppConfig) -> Result<OneBunModule> {
    init_app_from(ClassRef::of::<M>(), config)
}

/// Create and set up a module class from the global decorator registry
pub fn init_app_from(module_class: ClassRef, config: AppConfig) -> Result<OneBunModule> {
    info!("Initializing application module {}", module_class.name());

    let (logger, config) = root_services(config);
    let mut module = OneBunModule::create_from(module_class, logger, config)?;
    finish(&mut module)?;
    Ok(module)
}

/// Create and set up a module class from an explicit registry
pub fn init_app_with_registry(
    module_class: ClassRef,
    config: AppConfig,
    registry: Arc<MetadataRegistry>,
) -> Result<OneBunModule> {
    info!(
        "Initializing application module {} from a private registry",
        module_class.name()
    );

    let (logger, config) = root_services(config);
    let mut module = OneBunModule::create_with_registry(module_class, logger, config, registry)?;
    finish(&mut module)?;
    Ok(module)
}

fn root_services(config: AppConfig) -> (Logger, Arc<AppConfig>) {
    let logger = Logger::new(config.name.as_str());
    (logger, Arc::new(config))
}

fn finish(module: &mut OneBunModule) -> Result<()> {
    info!(
        "Composed {} provider(s) for {}",
        module.get_layer().len(),
        module.module_class().name()
    );

    module.setup()?;

    info!(
        "Application ready: {} service(s), {} controller(s)",
        module.service_instances().len(),
        module.get_controller_instances().len()
    );
    Ok(())
}

//! Module composition root
//!
//! [`OneBunModule`] turns a `@Module` class into a running object graph.
//!
//! ```text
//! Uninitialized ──create──► LayersComposed ──setup──► ServicesRealized ──► ControllersWired
//!                           (Layer described)         (Context built)      (controllers built)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let module = OneBunModule::bootstrap::<AppModule>(Logger::new("shop"), config)?;
//! let users = module.controller::<UserController>();
//! let cache = module.service::<CacheService>();
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use onebun_domain::error::{Error, Result};
use onebun_domain::value_objects::WiringPolicy;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::Config;
use crate::class::{Class, ClassRef, ConstructorArgs, Instance};
use crate::controller::Controller;
use crate::layer::{Context, Layer};
use crate::logger::Logger;
use crate::metadata::{MetadataRegistry, ModuleMetadata, ReflectionAdapter, host_reflection};
use crate::resolver::{AvailableServices, DependencyResolver, Resolution};
use crate::service::ServiceLayerFactory;
use crate::tag::ServiceTag;

/// Lifecycle of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleState {
    Uninitialized,
    LayersComposed,
    ServicesRealized,
    ControllersWired,
}

impl fmt::Display for ModuleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::LayersComposed => write!(f, "layers_composed"),
            Self::ServicesRealized => write!(f, "services_realized"),
            Self::ControllersWired => write!(f, "controllers_wired"),
        }
    }
}

/// A module class together with its declaration
#[derive(Debug, Clone)]
struct DeclaredModule {
    class: ClassRef,
    metadata: ModuleMetadata,
}

struct WiredController {
    module: ClassRef,
    class: ClassRef,
    instance: Arc<dyn Controller>,
    resolution: Arc<Resolution>,
}

/// Composition root built from a `@Module` class
pub struct OneBunModule {
    root: DeclaredModule,
    imported: Vec<DeclaredModule>,
    registry: Arc<MetadataRegistry>,
    resolver: Arc<DependencyResolver>,
    logger: Logger,
    config: Config,
    layer: Layer,
    state: ModuleState,
    service_instances: Context,
    controllers: Vec<WiredController>,
}

impl OneBunModule {
    /// Compose the layer of module `M` from the global registry
    pub fn create<M: Class>(logger: Logger, config: Config) -> Result<Self> {
        Self::create_from(ClassRef::of::<M>(), logger, config)
    }

    /// Compose the layer of a module class from the global registry
    pub fn create_from(module_class: ClassRef, logger: Logger, config: Config) -> Result<Self> {
        Self::compose(
            module_class,
            logger,
            config,
            MetadataRegistry::global(),
            DependencyResolver::global(),
        )
    }

    /// Compose the layer of a module class from an explicit registry
    ///
    /// Constructor types are read from the global host reflection and from
    /// `registry`. Resolutions are cached in a resolver private to the call.
    pub fn create_with_registry(
        module_class: ClassRef,
        logger: Logger,
        config: Config,
        registry: Arc<MetadataRegistry>,
    ) -> Result<Self> {
        let reflection = ReflectionAdapter::new(host_reflection(), Arc::clone(&registry));
        let resolver = Arc::new(DependencyResolver::new(reflection));
        Self::compose(module_class, logger, config, registry, resolver)
    }

    /// Create and set up module `M`
    pub fn bootstrap<M: Class>(logger: Logger, config: Config) -> Result<Self> {
        let mut module = Self::create::<M>(logger, config)?;
        module.setup()?;
        Ok(module)
    }

    fn compose(
        module_class: ClassRef,
        logger: Logger,
        config: Config,
        registry: Arc<MetadataRegistry>,
        resolver: Arc<DependencyResolver>,
    ) -> Result<Self> {
        let metadata = registry
            .module_metadata(&module_class)
            .ok_or_else(|| Error::missing_decorator(module_class.name(), "Module"))?;

        let mut module = Self {
            root: DeclaredModule {
                class: module_class,
                metadata,
            },
            imported: Vec::new(),
            registry,
            resolver,
            logger,
            config,
            layer: Layer::empty(),
            state: ModuleState::Uninitialized,
            service_instances: Context::new(),
            controllers: Vec::new(),
        };

        let logger_tag = module.logger_tag();
        let logger_layer = Layer::succeed(logger_tag, Instance::new(Arc::new(module.logger.clone())));

        let mut stack = Vec::new();
        let mut imported = Vec::new();
        let module_layer = module.module_layer(&module.root, &mut stack, &mut imported)?;

        module.layer = logger_layer.merge(module_layer);
        module.imported = imported;
        module.state = ModuleState::LayersComposed;

        info!(
            module = module_class.name(),
            provisions = module.layer.len(),
            imports = module.imported.len(),
            "Composed module layer"
        );
        Ok(module)
    }

    /// Providers of `declared` followed by every imported module's layer
    fn module_layer(
        &self,
        declared: &DeclaredModule,
        stack: &mut Vec<ClassRef>,
        imported: &mut Vec<DeclaredModule>,
    ) -> Result<Layer> {
        if stack.contains(&declared.class) {
            let mut path: Vec<String> = stack
                .iter()
                .skip_while(|class| **class != declared.class)
                .map(|class| class.name().to_string())
                .collect();
            path.push(declared.class.name().to_string());
            return Err(Error::CyclicImport { path });
        }
        stack.push(declared.class);

        let factory = ServiceLayerFactory::new(Arc::clone(&self.registry));
        let mut layers = Vec::with_capacity(declared.metadata.providers.len());
        for provider in &declared.metadata.providers {
            if let Some(layer) = self.provider_layer(&factory, provider)? {
                layers.push(layer);
            }
        }

        for import in &declared.metadata.imports {
            let metadata = self
                .registry
                .module_metadata(import)
                .ok_or_else(|| Error::missing_decorator(import.name(), "Module"))?;
            let child = DeclaredModule {
                class: *import,
                metadata,
            };
            layers.push(self.module_layer(&child, stack, imported)?);
            if !imported.iter().any(|known| known.class == child.class) {
                debug!(
                    module = declared.class.name(),
                    import = child.class.name(),
                    "Merged imported module layer"
                );
                imported.push(child);
            }
        }

        stack.pop();
        Ok(Layer::merge_all(layers))
    }

    fn provider_layer(
        &self,
        factory: &ServiceLayerFactory,
        provider: &ClassRef,
    ) -> Result<Option<Layer>> {
        if self.registry.service_metadata(provider).is_some() {
            return factory
                .create_service_layer(provider, &self.logger, &self.config)
                .map(Some);
        }

        let constructor = provider
            .factory()
            .or_else(|| self.registry.class(provider.id()).and_then(|known| known.factory()));
        let Some(constructor) = constructor else {
            warn!(
                provider = provider.name(),
                "Provider has no @Service metadata and no constructor; skipping"
            );
            return Ok(None);
        };

        warn!(
            provider = provider.name(),
            "Provider has no @Service metadata; constructing it without arguments"
        );
        let tag = self.registry.get_service_tag(provider);
        Ok(Some(Layer::sync(tag, provider.name(), move |_| {
            constructor(&ConstructorArgs::empty())
        })))
    }

    fn logger_tag(&self) -> ServiceTag {
        self.registry.get_service_tag(&ClassRef::of::<Logger>())
    }

    /// Realize services and wire every controller
    ///
    /// Can run once; a second call fails with [`Error::InvalidState`].
    pub fn setup(&mut self) -> Result<()> {
        if self.state != ModuleState::LayersComposed {
            return Err(Error::invalid_state(ModuleState::LayersComposed, self.state));
        }

        self.service_instances = self.layer.build()?;
        self.state = ModuleState::ServicesRealized;
        info!(
            module = self.root.class.name(),
            services = self.service_instances.len(),
            "Realized module services"
        );

        let modules: Vec<DeclaredModule> = std::iter::once(self.root.clone())
            .chain(self.imported.iter().cloned())
            .collect();
        for declared in &modules {
            let available: AvailableServices = declared
                .metadata
                .providers
                .iter()
                .fold(AvailableServices::for_module(&declared.class), |map, provider| {
                    map.with(*provider)
                });

            for controller_class in &declared.metadata.controllers {
                let wired = self.wire_controller(declared.class, controller_class, &available)?;
                self.controllers.push(wired);
            }
        }

        self.state = ModuleState::ControllersWired;
        info!(
            module = self.root.class.name(),
            controllers = self.controllers.len(),
            "Wired module controllers"
        );
        Ok(())
    }

    fn wire_controller(
        &self,
        module: ClassRef,
        controller_class: &ClassRef,
        available: &AvailableServices,
    ) -> Result<WiredController> {
        if self.registry.controller_metadata(controller_class).is_none() {
            warn!(
                controller = controller_class.name(),
                "Controller has no @Controller metadata"
            );
        }

        let resolution = self.resolver.resolve(controller_class, available);
        let strict = self.config.wiring.policy == WiringPolicy::Strict;

        let mut unresolved: Vec<String> =
            resolution.unresolved.iter().map(ToString::to_string).collect();
        let mut args = ConstructorArgs::new(self.logger.clone(), Arc::clone(&self.config));
        for dependency in &resolution.dependencies {
            let realized = self
                .service_instances
                .iter()
                .map(|(_, instance)| instance)
                .find(|instance| instance.is_instance_of(dependency));
            match realized {
                Some(instance) => args = args.with_dependency(instance.clone()),
                None => unresolved.push(format!("{dependency} (not realized)")),
            }
        }

        if !unresolved.is_empty() {
            if strict {
                return Err(Error::UnresolvedDependencies {
                    class: controller_class.name().to_string(),
                    params: unresolved,
                });
            }
            for param in &unresolved {
                warn!(
                    module = module.name(),
                    controller = controller_class.name(),
                    param = %param,
                    "Could not resolve controller dependency; argument omitted"
                );
            }
        }

        let construct = controller_class
            .controller_factory()
            .or_else(|| {
                self.registry
                    .class(controller_class.id())
                    .and_then(|known| known.controller_factory())
            })
            .ok_or_else(|| {
                Error::construction(controller_class.name(), "class is not a controller")
            })?;
        let instance = construct(&args)?;

        for (tag, service) in self.service_instances.iter() {
            instance.base().register_service(tag.clone(), service.clone());
        }

        debug!(
            module = module.name(),
            controller = controller_class.name(),
            dependencies = args.dependencies().len(),
            source = %resolution.source,
            "Wired controller"
        );
        Ok(WiredController {
            module,
            class: *controller_class,
            instance,
            resolution,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Module class
    pub fn module_class(&self) -> ClassRef {
        self.root.class
    }

    /// Current lifecycle state
    pub fn state(&self) -> ModuleState {
        self.state
    }

    /// Composed layer, embeddable in a larger application
    pub fn get_layer(&self) -> &Layer {
        &self.layer
    }

    /// Imported module classes, transitively, in first-seen order
    pub fn get_imports(&self) -> Vec<ClassRef> {
        self.imported.iter().map(|declared| declared.class).collect()
    }

    /// Declared controller classes, own first, then imported ones
    pub fn get_controllers(&self) -> Vec<ClassRef> {
        let mut seen = HashSet::new();
        std::iter::once(&self.root)
            .chain(self.imported.iter())
            .flat_map(|declared| declared.metadata.controllers.iter().copied())
            .filter(|class| seen.insert(class.id()))
            .collect()
    }

    /// Constructed controller of `class`
    pub fn get_controller_instance(&self, class: &ClassRef) -> Option<Arc<dyn Controller>> {
        self.controllers
            .iter()
            .find(|wired| wired.class == *class)
            .map(|wired| Arc::clone(&wired.instance))
    }

    /// Typed controller lookup
    pub fn controller<T: Controller + Class>(&self) -> Option<Arc<T>> {
        self.get_controller_instance(&ClassRef::of::<T>())?
            .downcast_arc::<T>()
            .ok()
    }

    /// Every constructed controller, in wiring order
    pub fn get_controller_instances(&self) -> Vec<(ClassRef, Arc<dyn Controller>)> {
        self.controllers
            .iter()
            .map(|wired| (wired.class, Arc::clone(&wired.instance)))
            .collect()
    }

    /// Realized instance bound to `tag`, by identity then identifier
    pub fn get_service_instance(&self, tag: &ServiceTag) -> Option<Instance> {
        self.service_instances
            .get(tag)
            .or_else(|| self.service_instances.get_by_identifier(tag.identifier()))
            .cloned()
    }

    /// Typed service lookup
    pub fn service<T: Class>(&self) -> Option<Arc<T>> {
        let class = ClassRef::of::<T>();
        let tag = self
            .registry
            .service_tag_of(&class)
            .unwrap_or_else(|| self.registry.get_service_tag(&class));
        self.get_service_instance(&tag)
            .and_then(|instance| instance.downcast::<T>())
            .or_else(|| {
                self.service_instances
                    .iter()
                    .find_map(|(_, instance)| instance.downcast::<T>())
            })
    }

    /// Realized service map
    pub fn service_instances(&self) -> &Context {
        &self.service_instances
    }

    /// Root logger
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Application configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Snapshot of what was composed and wired
    pub fn wiring_report(&self) -> WiringReport {
        WiringReport {
            module: self.root.class.name().to_string(),
            state: self.state,
            policy: self.config.wiring.policy,
            imports: self
                .imported
                .iter()
                .map(|declared| declared.class.name().to_string())
                .collect(),
            services: self
                .service_instances
                .iter()
                .map(|(tag, instance)| ServiceReport {
                    tag: tag.identifier().to_string(),
                    class: instance.class().name().to_string(),
                })
                .collect(),
            controllers: self
                .controllers
                .iter()
                .map(|wired| ControllerReport {
                    module: wired.module.name().to_string(),
                    controller: wired.class.name().to_string(),
                    source: wired.resolution.source.to_string(),
                    dependencies: wired
                        .resolution
                        .dependencies
                        .iter()
                        .map(|class| class.name().to_string())
                        .collect(),
                    unresolved: wired
                        .resolution
                        .unresolved
                        .iter()
                        .map(ToString::to_string)
                        .collect(),
                    services: wired.instance.base().service_count(),
                })
                .collect(),
        }
    }
}

impl fmt::Debug for OneBunModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneBunModule")
            .field("module", &self.root.class)
            .field("state", &self.state)
            .field("layer", &self.layer)
            .field("controllers", &self.controllers.len())
            .finish_non_exhaustive()
    }
}

/// Realized service entry of a [`WiringReport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceReport {
    pub tag: String,
    pub class: String,
}

/// Wired controller entry of a [`WiringReport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerReport {
    pub module: String,
    pub controller: String,
    pub source: String,
    pub dependencies: Vec<String>,
    pub unresolved: Vec<String>,
    pub services: usize,
}

/// Summary of a module's composition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WiringReport {
    pub module: String,
    pub state: ModuleState,
    pub policy: WiringPolicy,
    pub imports: Vec<String>,
    pub services: Vec<ServiceReport>,
    pub controllers: Vec<ControllerReport>,
}

impl fmt::Display for WiringReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "module {} ({}, policy {})", self.module, self.state, self.policy)?;
        if !self.imports.is_empty() {
            writeln!(f, "  imports: {}", self.imports.join(", "))?;
        }
        writeln!(f, "  services:")?;
        for service in &self.services {
            writeln!(f, "    {} => {}", service.tag, service.class)?;
        }
        writeln!(f, "  controllers:")?;
        for controller in &self.controllers {
            writeln!(
                f,
                "    {}::{} [{}] deps=[{}] services={}",
                controller.module,
                controller.controller,
                controller.source,
                controller.dependencies.join(", "),
                controller.services
            )?;
            for param in &controller.unresolved {
                writeln!(f, "      unresolved: {param}")?;
            }
        }
        Ok(())
    }
}

//! Metadata Registry
//!
//! Process-wide store of decorator metadata, keyed by class identity. Values
//! are addressed by `(class, key, property)`; the property is `None` for
//! class-level metadata and the handler name for per-method parameter lists.
//!
//! ## Write semantics
//!
//! - Scalar values are idempotent: the first write wins and later writes are
//!   ignored (logged at debug level).
//! - List values ([`MetadataValue::Routes`], [`MetadataValue::Params`]) are
//!   appended, never overwritten.
//!
//! ## Link-time decorators
//!
//! Decorated types contribute entries to [`DECORATORS`] through the
//! `service!`, `controller!`, `module!`, `route!` and `param!` macros. The
//! global registry applies every entry once, on first access:
//!
//! ```ignore
//! #[linkme::distributed_slice(DECORATORS)]
//! static USER_SERVICE: Decorator = Decorator {
//!     class_name: "UserService",
//!     apply: |registry| { registry.register_service::<UserService>(); },
//! };
//! ```

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use onebun_domain::constants::{
    CONTROLLER_METADATA_KEY, DESIGN_PARAMTYPES_KEY, MODULE_METADATA_KEY, PARAMS_METADATA_KEY,
    ROUTES_METADATA_KEY, SERVICE_METADATA_KEY,
};
use onebun_domain::value_objects::{ParamMetadata, RouteMetadata};
use tracing::{debug, warn};

use super::{ClassMetadata, ControllerMetadata, MetadataValue, ModuleMetadata, ServiceMetadata};
use crate::class::{Class, ClassId, ClassRef, Injectable};
use crate::controller::Controller;
use crate::tag::ServiceTag;

/// Link-time decorator entry
pub struct Decorator {
    /// Name of the decorated class, for diagnostics
    pub class_name: &'static str,
    /// Registration applied to the registry
    pub apply: fn(&MetadataRegistry),
}

// Auto-collection via linkme distributed slices - decorated types submit entries at compile time
#[linkme::distributed_slice]
pub static DECORATORS: [Decorator] = [..];

static GLOBAL_REGISTRY: LazyLock<Arc<MetadataRegistry>> = LazyLock::new(|| {
    let registry = MetadataRegistry::new();
    let applied = registry.apply_decorators(&DECORATORS);
    debug!(decorators = applied, "Global metadata registry initialized");
    Arc::new(registry)
});

type PropertyKey = Option<String>;

struct ClassEntry {
    class: ClassRef,
    values: HashMap<String, HashMap<PropertyKey, MetadataValue>>,
}

/// Decorator metadata store
pub struct MetadataRegistry {
    entries: DashMap<ClassId, ClassEntry>,
    tags: DashMap<ClassId, ServiceTag>,
}

impl MetadataRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            tags: DashMap::new(),
        }
    }

    /// Process-wide registry with every link-time decorator applied
    pub fn global() -> Arc<MetadataRegistry> {
        Arc::clone(&GLOBAL_REGISTRY)
    }

    /// Apply a batch of decorator entries, returning how many ran
    pub fn apply_decorators(&self, decorators: &[Decorator]) -> usize {
        for decorator in decorators {
            debug!(class = decorator.class_name, "Applying decorator");
            (decorator.apply)(self);
        }
        decorators.len()
    }

    // ========================================================================
    // Raw metadata access
    // ========================================================================

    /// Store a value for `(target, key, property)`
    ///
    /// Returns `true` when the store changed.
    pub fn define_metadata(
        &self,
        key: &str,
        value: MetadataValue,
        target: &ClassRef,
        property: Option<&str>,
    ) -> bool {
        let mut entry = self.entries.entry(target.id()).or_insert_with(|| ClassEntry {
            class: *target,
            values: HashMap::new(),
        });
        entry.class = entry.class.merged_with(target);

        let slot = entry.values.entry(key.to_string()).or_default();
        match slot.entry(property.map(str::to_string)) {
            Entry::Vacant(vacant) => {
                vacant.insert(value);
                true
            }
            Entry::Occupied(mut occupied) if value.is_list() => {
                let appended = occupied.get_mut().append(value);
                if !appended {
                    debug!(class = target.name(), key, "Metadata kind mismatch; value ignored");
                }
                appended
            }
            Entry::Occupied(_) => {
                debug!(class = target.name(), key, "Metadata already defined; keeping first value");
                false
            }
        }
    }

    /// Read the value stored for `(target, key, property)`
    pub fn get_metadata(
        &self,
        key: &str,
        target: &ClassRef,
        property: Option<&str>,
    ) -> Option<MetadataValue> {
        let entry = self.entries.get(&target.id())?;
        entry
            .values
            .get(key)?
            .get(&property.map(str::to_string))
            .cloned()
    }

    /// Whether a value exists for `(target, key, property)`
    pub fn has_metadata(&self, key: &str, target: &ClassRef, property: Option<&str>) -> bool {
        self.entries
            .get(&target.id())
            .and_then(|entry| {
                entry
                    .values
                    .get(key)
                    .map(|slot| slot.contains_key(&property.map(str::to_string)))
            })
            .unwrap_or(false)
    }

    /// Keys with at least one value for `target`, sorted
    pub fn metadata_keys(&self, target: &ClassRef) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .get(&target.id())
            .map(|entry| entry.values.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Best-known handle for a class id, including registered constructors
    pub fn class(&self, id: ClassId) -> Option<ClassRef> {
        self.entries.get(&id).map(|entry| entry.class)
    }

    /// Number of classes carrying metadata
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no class carries metadata
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ========================================================================
    // Service tags
    // ========================================================================

    /// Canonical tag of a class, created on first request
    pub fn get_service_tag(&self, class: &ClassRef) -> ServiceTag {
        self.tags
            .entry(class.id())
            .or_insert_with(|| ServiceTag::new(class.name()))
            .clone()
    }

    /// Tag declared by the class's `Service` metadata
    pub fn service_tag_of(&self, class: &ClassRef) -> Option<ServiceTag> {
        self.service_metadata(class).map(|metadata| metadata.tag)
    }

    /// Whether a tag is already bound to the class
    pub fn has_service_tag(&self, class: &ClassRef) -> bool {
        self.tags.contains_key(&class.id())
    }

    fn bind_tag(&self, class: &ClassRef, tag: ServiceTag) -> ServiceTag {
        let bound = self
            .tags
            .entry(class.id())
            .or_insert_with(|| tag.clone())
            .clone();
        if !bound.same_identity(&tag) {
            warn!(
                class = class.name(),
                requested = %tag,
                bound = %bound,
                "Service tag already bound; explicit tag ignored"
            );
        }
        bound
    }

    // ========================================================================
    // Decorator registrations
    // ========================================================================

    /// `@Service` with the class's canonical tag
    pub fn register_service<T: Injectable>(&self) -> ServiceTag {
        self.register_service_class(&ClassRef::provider::<T>(), None)
    }

    /// `@Service(tag)` with an explicit tag
    ///
    /// The first tag bound to a class wins. If the canonical tag was already
    /// handed out (for example by [`get_service_tag`](Self::get_service_tag)),
    /// `tag` is ignored with a warning and the bound tag is returned.
    pub fn register_service_with_tag<T: Injectable>(&self, tag: ServiceTag) -> ServiceTag {
        self.register_service_class(&ClassRef::provider::<T>(), Some(tag))
    }

    /// `@Service` for an erased class handle
    pub fn register_service_class(&self, class: &ClassRef, tag: Option<ServiceTag>) -> ServiceTag {
        let tag = match tag {
            Some(tag) => self.bind_tag(class, tag),
            None => self.get_service_tag(class),
        };
        let metadata = ServiceMetadata {
            tag: tag.clone(),
            impl_class: *class,
        };
        self.define_metadata(
            SERVICE_METADATA_KEY,
            MetadataValue::Class(ClassMetadata::Service(metadata)),
            class,
            None,
        );
        debug!(class = class.name(), tag = %tag, "Registered service");
        self.service_tag_of(class).unwrap_or(tag)
    }

    /// `@Controller(base_path)`
    pub fn register_controller<T: Injectable + Controller>(&self, base_path: &str) {
        self.register_controller_class(&ClassRef::controller::<T>(), base_path);
    }

    /// `@Controller(base_path)` for an erased class handle
    pub fn register_controller_class(&self, class: &ClassRef, base_path: &str) {
        let metadata = ControllerMetadata {
            base_path: base_path.to_string(),
            routes: Vec::new(),
        };
        self.define_metadata(
            CONTROLLER_METADATA_KEY,
            MetadataValue::Class(ClassMetadata::Controller(metadata)),
            class,
            None,
        );
        debug!(class = class.name(), base_path, "Registered controller");
    }

    /// Route decorator on a controller handler
    pub fn register_route<T: Class>(&self, route: RouteMetadata) {
        self.define_metadata(
            ROUTES_METADATA_KEY,
            MetadataValue::Routes(vec![route]),
            &ClassRef::of::<T>(),
            None,
        );
    }

    /// Parameter decorator on a controller handler
    pub fn register_param<T: Class>(&self, handler_name: &str, param: ParamMetadata) {
        self.define_metadata(
            PARAMS_METADATA_KEY,
            MetadataValue::Params(vec![param]),
            &ClassRef::of::<T>(),
            Some(handler_name),
        );
    }

    /// `@Module({ imports, controllers, providers })`
    pub fn register_module<M: Class>(&self, metadata: ModuleMetadata) {
        self.register_module_class(&ClassRef::of::<M>(), metadata);
    }

    /// `@Module` for an erased class handle
    pub fn register_module_class(&self, class: &ClassRef, metadata: ModuleMetadata) {
        debug!(
            class = class.name(),
            imports = metadata.imports.len(),
            controllers = metadata.controllers.len(),
            providers = metadata.providers.len(),
            "Registered module"
        );
        self.define_metadata(
            MODULE_METADATA_KEY,
            MetadataValue::Class(ClassMetadata::Module(metadata)),
            class,
            None,
        );
    }

    /// Constructor parameter types recorded at runtime
    pub fn register_param_types<T: Class>(&self, types: Vec<ClassRef>) {
        self.define_metadata(
            DESIGN_PARAMTYPES_KEY,
            MetadataValue::ParamTypes(types),
            &ClassRef::of::<T>(),
            None,
        );
    }

    // ========================================================================
    // Typed readers
    // ========================================================================

    /// `@Service` metadata of a class
    pub fn service_metadata(&self, class: &ClassRef) -> Option<ServiceMetadata> {
        match self.get_metadata(SERVICE_METADATA_KEY, class, None)? {
            MetadataValue::Class(ClassMetadata::Service(metadata)) => Some(metadata),
            _ => None,
        }
    }

    /// `@Module` metadata of a class
    pub fn module_metadata(&self, class: &ClassRef) -> Option<ModuleMetadata> {
        match self.get_metadata(MODULE_METADATA_KEY, class, None)? {
            MetadataValue::Class(ClassMetadata::Module(metadata)) => Some(metadata),
            _ => None,
        }
    }

    /// `@Controller` metadata with routes and their parameters merged in
    pub fn controller_metadata(&self, class: &ClassRef) -> Option<ControllerMetadata> {
        let mut metadata = match self.get_metadata(CONTROLLER_METADATA_KEY, class, None)? {
            MetadataValue::Class(ClassMetadata::Controller(metadata)) => metadata,
            _ => return None,
        };

        if let Some(MetadataValue::Routes(routes)) =
            self.get_metadata(ROUTES_METADATA_KEY, class, None)
        {
            metadata.routes.extend(routes);
        }

        for route in &mut metadata.routes {
            if let Some(MetadataValue::Params(params)) =
                self.get_metadata(PARAMS_METADATA_KEY, class, Some(&route.handler_name))
            {
                route.params.extend(params);
            }
            route.params.sort_by_key(|param| param.index);
        }

        Some(metadata)
    }
}

impl Default for MetadataRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MetadataRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataRegistry")
            .field("classes", &self.entries.len())
            .field("tags", &self.tags.len())
            .finish()
    }
}

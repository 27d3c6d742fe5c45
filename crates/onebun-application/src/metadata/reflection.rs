//! Reflection adapter
//!
//! Answers "which types does this constructor take?" from two sources, in
//! order: the installed host reflection (compile-time emitted parameter
//! types by default) and the metadata registry acting as a polyfill store.

use std::sync::{Arc, OnceLock};

use onebun_domain::constants::{
    DESIGN_PARAMTYPES_KEY, PRIMITIVE_TYPE_NAMES, RESERVED_PARAM_FRAGMENTS,
};
use tracing::debug;

use super::{MetadataRegistry, MetadataValue};
use crate::class::ClassRef;

/// Reflection API used for constructor type lookup
pub trait Reflection: Send + Sync {
    /// Short name for logging
    fn name(&self) -> &'static str;

    /// Read a metadata value for `(target, key, property)`
    fn get_metadata(
        &self,
        key: &str,
        target: &ClassRef,
        property: Option<&str>,
    ) -> Option<MetadataValue>;
}

/// Host reflection backed by [`Class::param_types`](crate::class::Class::param_types)
#[derive(Debug, Default, Clone, Copy)]
pub struct EmittedReflection;

impl Reflection for EmittedReflection {
    fn name(&self) -> &'static str {
        "emitted"
    }

    fn get_metadata(
        &self,
        key: &str,
        target: &ClassRef,
        property: Option<&str>,
    ) -> Option<MetadataValue> {
        if key != DESIGN_PARAMTYPES_KEY || property.is_some() {
            return None;
        }
        let types = target.emitted_param_types();
        if types.is_empty() {
            None
        } else {
            Some(MetadataValue::ParamTypes(types))
        }
    }
}

impl Reflection for MetadataRegistry {
    fn name(&self) -> &'static str {
        "metadata-store"
    }

    fn get_metadata(
        &self,
        key: &str,
        target: &ClassRef,
        property: Option<&str>,
    ) -> Option<MetadataValue> {
        MetadataRegistry::get_metadata(self, key, target, property)
    }
}

static HOST_REFLECTION: OnceLock<Arc<dyn Reflection>> = OnceLock::new();

/// Install the process-wide host reflection
///
/// Returns `false` if a host was already installed (explicitly or by first
/// use), in which case `host` is dropped.
pub fn install_host_reflection(host: Arc<dyn Reflection>) -> bool {
    let name = host.name();
    let installed = HOST_REFLECTION.set(host).is_ok();
    if installed {
        debug!(host = name, "Installed host reflection");
    }
    installed
}

/// Process-wide host reflection, installing [`EmittedReflection`] on first use
pub fn host_reflection() -> Arc<dyn Reflection> {
    Arc::clone(HOST_REFLECTION.get_or_init(|| Arc::new(EmittedReflection)))
}

/// Which source produced a constructor type list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectionTier {
    /// Installed host reflection
    HostReflection,
    /// Registry polyfill store
    MetadataStore,
}

/// Constructor type lookup with host-then-store fallback
#[derive(Clone)]
pub struct ReflectionAdapter {
    host: Arc<dyn Reflection>,
    store: Arc<MetadataRegistry>,
}

impl ReflectionAdapter {
    /// Adapter over the global host reflection and the global registry
    pub fn global() -> Self {
        Self::new(host_reflection(), MetadataRegistry::global())
    }

    /// Adapter over explicit sources
    pub fn new(host: Arc<dyn Reflection>, store: Arc<MetadataRegistry>) -> Self {
        Self { host, store }
    }

    /// Registry used as the polyfill store
    pub fn store(&self) -> &Arc<MetadataRegistry> {
        &self.store
    }

    /// Constructor parameter types and the tier that supplied them
    pub fn lookup_constructor_param_types(
        &self,
        target: &ClassRef,
    ) -> Option<(ReflectionTier, Vec<ClassRef>)> {
        let tiers: [(ReflectionTier, &dyn Reflection); 2] = [
            (ReflectionTier::HostReflection, self.host.as_ref()),
            (ReflectionTier::MetadataStore, self.store.as_ref()),
        ];

        tiers.into_iter().find_map(|(tier, source)| {
            let value = source.get_metadata(DESIGN_PARAMTYPES_KEY, target, None)?;
            let types = filter_injectable(value.as_param_types()?);
            if types.is_empty() {
                None
            } else {
                debug!(class = target.name(), source = source.name(), "Constructor types found");
                Some((tier, types))
            }
        })
    }

    /// Constructor parameter types, filtered to injectable classes
    pub fn get_constructor_param_types(&self, target: &ClassRef) -> Option<Vec<ClassRef>> {
        self.lookup_constructor_param_types(target)
            .map(|(_, types)| types)
    }
}

impl std::fmt::Debug for ReflectionAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReflectionAdapter")
            .field("host", &self.host.name())
            .field("store", &self.store)
            .finish()
    }
}

fn filter_injectable(types: &[ClassRef]) -> Vec<ClassRef> {
    types
        .iter()
        .filter(|class| is_injectable_name(class.name()))
        .copied()
        .collect()
}

/// Whether a type name can stand for an injectable dependency
///
/// Primitive names and framework-reserved logger/config types are excluded.
pub fn is_injectable_name(name: &str) -> bool {
    if PRIMITIVE_TYPE_NAMES.contains(&name) {
        return false;
    }
    let lower = name.to_ascii_lowercase();
    !RESERVED_PARAM_FRAGMENTS
        .iter()
        .any(|fragment| lower.contains(fragment))
}

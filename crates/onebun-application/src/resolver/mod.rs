//! Dependency Resolver
//!
//! Computes the ordered constructor dependencies of a class against the
//! services available in a module.
//!
//! ## Resolution tiers
//!
//! 1. Constructor types from the [`ReflectionAdapter`] (host reflection, then
//!    the registry store). A non-empty list is returned verbatim.
//! 2. The constructor signature text ([`Class::SIGNATURE`]). Each parameter
//!    is matched by its annotated type name, or by a class name guessed from
//!    its identifier when it has no annotation. Logger and config parameters
//!    are skipped.
//!
//! Parsed signatures are cached per class and resolutions per
//! `(scope, class)`, so the same controller declared in two modules may
//! resolve differently in each.
//!
//! [`Class::SIGNATURE`]: crate::class::Class::SIGNATURE

pub mod signature;

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::class::{ClassId, ClassRef};
use crate::metadata::{ReflectionAdapter, ReflectionTier};
use signature::{SignatureParam, guess_class_name, parse_signature};

static NEXT_ANONYMOUS_SCOPE: AtomicU64 = AtomicU64::new(1);

static GLOBAL_RESOLVER: LazyLock<Arc<DependencyResolver>> =
    LazyLock::new(|| Arc::new(DependencyResolver::new(ReflectionAdapter::global())));

/// Cache scope of an available-services map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKey {
    /// Map built from a module's providers
    Module(ClassId),
    /// Ad-hoc map, unique per construction
    Anonymous(u64),
}

/// Name → class map of services a constructor may depend on
#[derive(Debug, Clone)]
pub struct AvailableServices {
    scope: ScopeKey,
    by_name: HashMap<String, ClassRef>,
}

impl AvailableServices {
    /// Empty ad-hoc map with its own cache scope
    pub fn new() -> Self {
        Self {
            scope: ScopeKey::Anonymous(NEXT_ANONYMOUS_SCOPE.fetch_add(1, Ordering::Relaxed)),
            by_name: HashMap::new(),
        }
    }

    /// Empty map scoped to a module
    pub fn for_module(module: &ClassRef) -> Self {
        Self {
            scope: ScopeKey::Module(module.id()),
            by_name: HashMap::new(),
        }
    }

    /// Add a class under its name; the first class for a name is kept
    pub fn insert(&mut self, class: ClassRef) {
        match self.by_name.get(class.name()) {
            Some(existing) if *existing != class => {
                warn!(
                    name = class.name(),
                    "Two providers share a class name; keeping the first"
                );
            }
            Some(_) => {}
            None => {
                self.by_name.insert(class.name().to_string(), class);
            }
        }
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, class: ClassRef) -> Self {
        self.insert(class);
        self
    }

    /// Class registered under `name`
    pub fn get(&self, name: &str) -> Option<ClassRef> {
        self.by_name.get(name).copied()
    }

    /// Cache scope
    pub fn scope(&self) -> ScopeKey {
        self.scope
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Iterate over `(name, class)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, ClassRef)> {
        self.by_name.iter().map(|(name, class)| (name.as_str(), *class))
    }
}

impl Default for AvailableServices {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<ClassRef> for AvailableServices {
    fn from_iter<I: IntoIterator<Item = ClassRef>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::with)
    }
}

/// Where a resolution came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// Installed host reflection
    HostReflection,
    /// Registry-stored constructor types
    MetadataStore,
    /// Constructor signature text
    Signature,
    /// Nothing to read
    Empty,
}

impl From<ReflectionTier> for ResolutionSource {
    fn from(tier: ReflectionTier) -> Self {
        match tier {
            ReflectionTier::HostReflection => Self::HostReflection,
            ReflectionTier::MetadataStore => Self::MetadataStore,
        }
    }
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HostReflection => write!(f, "host reflection"),
            Self::MetadataStore => write!(f, "metadata store"),
            Self::Signature => write!(f, "signature"),
            Self::Empty => write!(f, "empty"),
        }
    }
}

/// A constructor parameter that matched no available service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedParam {
    /// Parameter identifier
    pub name: String,
    /// Annotated type name, if any
    pub type_name: Option<String>,
    /// Class name that was looked up
    pub candidate: String,
}

impl fmt::Display for UnresolvedParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.type_name {
            Some(type_name) => write!(f, "{}: {}", self.name, type_name),
            None if self.candidate == self.name => f.write_str(&self.name),
            None => write!(f, "{} (guessed {})", self.name, self.candidate),
        }
    }
}

/// Result of resolving one class
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Matched dependencies in constructor order
    pub dependencies: Vec<ClassRef>,
    /// Parameters that matched nothing
    pub unresolved: Vec<UnresolvedParam>,
    /// Tier that produced the result
    pub source: ResolutionSource,
}

impl Resolution {
    /// Whether every non-reserved parameter was matched
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Dependencies, or the unresolved parameters when any exist
    pub fn into_result(self) -> std::result::Result<Vec<ClassRef>, Vec<UnresolvedParam>> {
        if self.unresolved.is_empty() {
            Ok(self.dependencies)
        } else {
            Err(self.unresolved)
        }
    }
}

/// Constructor dependency resolver with per-scope caching
pub struct DependencyResolver {
    reflection: ReflectionAdapter,
    signatures: DashMap<ClassId, Arc<Vec<SignatureParam>>>,
    graph: DashMap<(ScopeKey, ClassId), Arc<Resolution>>,
}

impl DependencyResolver {
    /// Resolver over a reflection adapter
    pub fn new(reflection: ReflectionAdapter) -> Self {
        Self {
            reflection,
            signatures: DashMap::new(),
            graph: DashMap::new(),
        }
    }

    /// Process-wide resolver over the global reflection adapter
    pub fn global() -> Arc<DependencyResolver> {
        Arc::clone(&GLOBAL_RESOLVER)
    }

    /// Resolve `target` against `available`, caching per scope
    pub fn resolve(&self, target: &ClassRef, available: &AvailableServices) -> Arc<Resolution> {
        let key = (available.scope(), target.id());
        if let Some(cached) = self.graph.get(&key) {
            return Arc::clone(&cached);
        }

        let resolution = Arc::new(self.compute(target, available));
        debug!(
            class = target.name(),
            source = %resolution.source,
            dependencies = resolution.dependencies.len(),
            unresolved = resolution.unresolved.len(),
            "Resolved constructor dependencies"
        );
        Arc::clone(self.graph.entry(key).or_insert(resolution).value())
    }

    /// Cached dependency list for `(scope, target)`, if resolved before
    pub fn cached(&self, target: &ClassRef, scope: ScopeKey) -> Option<Vec<ClassRef>> {
        self.graph
            .get(&(scope, target.id()))
            .map(|resolution| resolution.dependencies.clone())
    }

    /// Number of cached resolutions
    pub fn cache_len(&self) -> usize {
        self.graph.len()
    }

    fn compute(&self, target: &ClassRef, available: &AvailableServices) -> Resolution {
        if let Some((tier, types)) = self.reflection.lookup_constructor_param_types(target) {
            return Resolution {
                dependencies: types,
                unresolved: Vec::new(),
                source: tier.into(),
            };
        }

        let params = self.signature_of(target);
        if params.is_empty() {
            return Resolution {
                dependencies: Vec::new(),
                unresolved: Vec::new(),
                source: ResolutionSource::Empty,
            };
        }

        let mut dependencies = Vec::new();
        let mut unresolved = Vec::new();
        for param in params.iter().filter(|param| !param.is_reserved()) {
            let candidate = match &param.type_name {
                Some(type_name) => type_name.clone(),
                None if param.destructured => param.name.clone(),
                None => guess_class_name(&param.name),
            };
            // A destructured binding never names a single service
            let found = if param.destructured {
                None
            } else {
                available.get(&candidate)
            };
            match found {
                Some(class) => dependencies.push(class),
                None => unresolved.push(UnresolvedParam {
                    name: param.name.clone(),
                    type_name: param.type_name.clone(),
                    candidate,
                }),
            }
        }

        Resolution {
            dependencies,
            unresolved,
            source: ResolutionSource::Signature,
        }
    }

    fn signature_of(&self, target: &ClassRef) -> Arc<Vec<SignatureParam>> {
        let entry = self
            .signatures
            .entry(target.id())
            .or_insert_with(|| Arc::new(parse_signature(target.signature())));
        Arc::clone(entry.value())
    }
}

impl fmt::Debug for DependencyResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyResolver")
            .field("reflection", &self.reflection)
            .field("signatures", &self.signatures.len())
            .field("resolutions", &self.graph.len())
            .finish()
    }
}

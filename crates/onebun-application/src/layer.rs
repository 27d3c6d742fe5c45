//! Layers and contexts
//!
//! A [`Layer`] describes how to populate a tag → instance [`Context`]
//! without running anything. Layers merge freely; [`Layer::build`] runs
//! each provision once, in merge order, skipping tags already built.

use std::fmt;
use std::sync::Arc;

use onebun_domain::error::{Error, Result};

use crate::class::{Class, Instance};
use crate::tag::ServiceTag;

type BuildFn = dyn Fn(&Context) -> Result<Instance> + Send + Sync;

#[derive(Clone)]
struct Provision {
    tag: ServiceTag,
    label: String,
    build: Arc<BuildFn>,
}

/// Lazy description of how to populate a [`Context`]
#[derive(Clone, Default)]
pub struct Layer {
    provisions: Vec<Provision>,
}

impl Layer {
    /// Layer that provides nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Layer binding an already-built instance
    pub fn succeed(tag: ServiceTag, instance: Instance) -> Self {
        let label = instance.class().name().to_string();
        Self::sync(tag, label, move |_| Ok(instance.clone()))
    }

    /// Layer whose instance is built on demand
    ///
    /// `build` receives the context built so far, so it can read
    /// provisions merged before it.
    pub fn sync<F>(tag: ServiceTag, label: impl Into<String>, build: F) -> Self
    where
        F: Fn(&Context) -> Result<Instance> + Send + Sync + 'static,
    {
        Self {
            provisions: vec![Provision {
                tag,
                label: label.into(),
                build: Arc::new(build),
            }],
        }
    }

    /// Combine two layers; `other`'s provisions run after this one's
    pub fn merge(mut self, other: Layer) -> Self {
        self.provisions.extend(other.provisions);
        self
    }

    /// Combine many layers in order
    pub fn merge_all<I: IntoIterator<Item = Layer>>(layers: I) -> Self {
        layers.into_iter().fold(Self::empty(), Self::merge)
    }

    /// Tags provided, in merge order (duplicates included)
    pub fn tags(&self) -> impl Iterator<Item = &ServiceTag> {
        self.provisions.iter().map(|provision| &provision.tag)
    }

    /// Whether a provision for `tag` exists, by identity
    pub fn provides(&self, tag: &ServiceTag) -> bool {
        self.tags().any(|provided| provided.same_identity(tag))
    }

    /// Number of provisions
    pub fn len(&self) -> usize {
        self.provisions.len()
    }

    /// Whether the layer provides nothing
    pub fn is_empty(&self) -> bool {
        self.provisions.is_empty()
    }

    /// Run every provision and collect the results
    ///
    /// Each distinct tag is built exactly once per call; later provisions
    /// for an already-built tag are skipped. Two calls never share instances.
    pub fn build(&self) -> Result<Context> {
        let mut context = Context::new();
        for provision in &self.provisions {
            if context.contains(&provision.tag) {
                continue;
            }
            let instance = (provision.build)(&context).map_err(|e| match e {
                Error::Construction { .. } | Error::MissingLogger { .. } => e,
                other => Error::construction_with_source(
                    provision.label.clone(),
                    "layer provision failed",
                    other,
                ),
            })?;
            context.add(provision.tag.clone(), instance);
        }
        Ok(context)
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.provisions
                    .iter()
                    .map(|provision| format!("{} => {}", provision.tag, provision.label)),
            )
            .finish()
    }
}

/// Realized tag → instance map
#[derive(Clone, Default)]
pub struct Context {
    entries: Vec<(ServiceTag, Instance)>,
}

impl Context {
    /// Empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`add`](Self::add)
    pub fn insert(mut self, tag: ServiceTag, instance: Instance) -> Self {
        self.add(tag, instance);
        self
    }

    /// Bind `instance` to `tag`, replacing an identity-equal binding
    pub fn add(&mut self, tag: ServiceTag, instance: Instance) {
        match self.entries.iter_mut().find(|(bound, _)| bound.same_identity(&tag)) {
            Some(entry) => entry.1 = instance,
            None => self.entries.push((tag, instance)),
        }
    }

    /// Instance bound to `tag`, by identity
    pub fn get(&self, tag: &ServiceTag) -> Option<&Instance> {
        self.entries
            .iter()
            .find(|(bound, _)| bound.same_identity(tag))
            .map(|(_, instance)| instance)
    }

    /// Instance bound to a tag with this identifier
    pub fn get_by_identifier(&self, identifier: &str) -> Option<&Instance> {
        self.entries
            .iter()
            .find(|(bound, _)| bound.identifier() == identifier)
            .map(|(_, instance)| instance)
    }

    /// Typed instance bound to `tag`
    pub fn get_as<T: Class>(&self, tag: &ServiceTag) -> Option<Arc<T>> {
        self.get(tag).and_then(Instance::downcast::<T>)
    }

    /// Whether `tag` is bound, by identity
    pub fn contains(&self, tag: &ServiceTag) -> bool {
        self.get(tag).is_some()
    }

    /// Iterate bindings in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&ServiceTag, &Instance)> {
        self.entries.iter().map(|(tag, instance)| (tag, instance))
    }

    /// Bound tags in insertion order
    pub fn tags(&self) -> impl Iterator<Item = &ServiceTag> {
        self.entries.iter().map(|(tag, _)| tag)
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is bound
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(tag, instance)| (tag, instance.class())))
            .finish()
    }
}

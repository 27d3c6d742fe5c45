//! Service tags
//!
//! A [`ServiceTag`] is the lookup key of a realized service inside a
//! [`Context`](crate::layer::Context). Every tag has a unique identity and a
//! symbolic identifier. Tags handed out by the registry are canonical (one per
//! class), while tags built by hand with [`ServiceTag::new`] are distinct even
//! when their identifiers match; lookups fall back to identifier equality for
//! those.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TAG_KEY: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
struct TagInner {
    key: u64,
    identifier: String,
}

/// Nominal capability token used as a context lookup key
#[derive(Clone)]
pub struct ServiceTag {
    inner: Arc<TagInner>,
}

impl ServiceTag {
    /// Create a fresh tag with its own identity
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(TagInner {
                key: NEXT_TAG_KEY.fetch_add(1, Ordering::Relaxed),
                identifier: identifier.into(),
            }),
        }
    }

    /// Symbolic identifier
    pub fn identifier(&self) -> &str {
        &self.inner.identifier
    }

    /// Unique identity key
    pub fn key(&self) -> u64 {
        self.inner.key
    }

    /// Identity comparison
    pub fn same_identity(&self, other: &ServiceTag) -> bool {
        self.inner.key == other.inner.key
    }

    /// Identity comparison with identifier fallback
    pub fn matches(&self, other: &ServiceTag) -> bool {
        self.same_identity(other) || self.identifier() == other.identifier()
    }
}

impl PartialEq for ServiceTag {
    fn eq(&self, other: &Self) -> bool {
        self.same_identity(other)
    }
}

impl Eq for ServiceTag {}

impl Hash for ServiceTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.key.hash(state);
    }
}

impl fmt::Debug for ServiceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceTag({}#{})", self.inner.identifier, self.inner.key)
    }
}

impl fmt::Display for ServiceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.identifier)
    }
}

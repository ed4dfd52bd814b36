use crate::core::Key;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Predicate applied to the keys of one dimension.
///
/// A record passes a dimension's filter when *any* of its keys matches, so a
/// game listed under "2", "3" and "4" players passes an `Exact("3")` filter.
/// Records without keys never pass an active filter.
#[derive(Clone)]
pub enum FilterPredicate {
    Exact(Key),
    OneOf(BTreeSet<Key>),
    /// Half-open range `[lo, hi)`.
    Range(Key, Key),
    Custom(Arc<dyn Fn(&Key) -> bool + Send + Sync>),
}

impl FilterPredicate {
    pub fn exact(key: impl Into<Key>) -> Self {
        Self::Exact(key.into())
    }

    pub fn one_of<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        Self::OneOf(keys.into_iter().map(Into::into).collect())
    }

    pub fn range(lo: impl Into<Key>, hi: impl Into<Key>) -> Self {
        Self::Range(lo.into(), hi.into())
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Key) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    pub fn matches(&self, key: &Key) -> bool {
        match self {
            Self::Exact(k) => k == key,
            Self::OneOf(keys) => keys.contains(key),
            Self::Range(lo, hi) => lo <= key && key < hi,
            Self::Custom(f) => f(key),
        }
    }

    /// A record passes when any of its keys matches.
    pub fn accepts(&self, keys: &[Key]) -> bool {
        keys.iter().any(|k| self.matches(k))
    }
}

/// `None` stands for "no filter", which lets every key through.
pub(crate) fn key_passes(predicate: Option<&FilterPredicate>, key: &Key) -> bool {
    predicate.is_none_or(|p| p.matches(key))
}

pub(crate) fn record_passes(predicate: Option<&FilterPredicate>, keys: &[Key]) -> bool {
    predicate.is_none_or(|p| p.accepts(keys))
}

impl fmt::Debug for FilterPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(k) => f.debug_tuple("Exact").field(k).finish(),
            Self::OneOf(keys) => f.debug_tuple("OneOf").field(keys).finish(),
            Self::Range(lo, hi) => f.debug_tuple("Range").field(lo).field(hi).finish(),
            Self::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

impl fmt::Display for FilterPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(k) => write!(f, "= {}", k),
            Self::OneOf(keys) => {
                let parts: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
                write!(f, "in [{}]", parts.join(", "))
            }
            Self::Range(lo, hi) => write!(f, "in [{}, {})", lo, hi),
            Self::Custom(_) => write!(f, "custom"),
        }
    }
}

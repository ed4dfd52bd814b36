use crate::core::{DashError, GameRecord, Key, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub type KeyExtractor = Arc<dyn Fn(&GameRecord) -> Vec<Key> + Send + Sync>;

/// Whether a dimension produces one key per record or a list of keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Single,
    Multi,
}

/// Handle to a dimension registered on a [`Crossfilter`](super::Crossfilter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DimensionId(pub(crate) usize);

impl DimensionId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Definition of a dimension: a name, a key extractor and its arity.
#[derive(Clone)]
pub struct DimensionSpec {
    name: String,
    arity: Arity,
    extractor: KeyExtractor,
}

impl DimensionSpec {
    /// A dimension with exactly one key per record.
    pub fn single<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&GameRecord) -> Key + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity: Arity::Single,
            extractor: Arc::new(move |record| vec![f(record)]),
        }
    }

    /// An array-valued dimension; a record counts under every key it yields.
    pub fn multi<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&GameRecord) -> Vec<Key> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity: Arity::Multi,
            extractor: Arc::new(f),
        }
    }

    /// Build from a raw extractor and an explicit arity flag. A `Single`
    /// extractor that yields anything but one key is rejected at index time.
    pub fn with_arity(name: impl Into<String>, arity: Arity, extractor: KeyExtractor) -> Self {
        Self {
            name: name.into(),
            arity,
            extractor,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }
}

impl fmt::Debug for DimensionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DimensionSpec")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Keys of every record for one dimension, plus the inverted index used to
/// find the records affected by a filter change.
#[derive(Debug)]
pub(crate) struct DimensionIndex {
    spec: DimensionSpec,
    keys: Vec<Vec<Key>>,
    postings: BTreeMap<Key, Vec<usize>>,
    keyless: Vec<usize>,
}

impl DimensionIndex {
    pub(crate) fn build(spec: DimensionSpec, records: &[GameRecord]) -> Result<Self> {
        let mut keys = Vec::with_capacity(records.len());
        let mut postings: BTreeMap<Key, Vec<usize>> = BTreeMap::new();
        let mut keyless = Vec::new();

        for (id, record) in records.iter().enumerate() {
            let mut record_keys = (spec.extractor)(record);
            if spec.arity == Arity::Single && record_keys.len() != 1 {
                return Err(DashError::ArityMismatch(
                    spec.name.clone(),
                    format!(
                        "record {} produced {} keys for a single-valued dimension",
                        record.id,
                        record_keys.len()
                    ),
                ));
            }
            record_keys.sort();
            record_keys.dedup();

            if record_keys.is_empty() {
                keyless.push(id);
            }
            for key in &record_keys {
                postings.entry(key.clone()).or_default().push(id);
            }
            keys.push(record_keys);
        }

        Ok(Self {
            spec,
            keys,
            postings,
            keyless,
        })
    }

    pub(crate) fn name(&self) -> &str {
        &self.spec.name
    }

    pub(crate) fn arity(&self) -> Arity {
        self.spec.arity
    }

    pub(crate) fn keys_of(&self, record: usize) -> &[Key] {
        &self.keys[record]
    }

    pub(crate) fn postings(&self) -> &BTreeMap<Key, Vec<usize>> {
        &self.postings
    }

    pub(crate) fn keyless(&self) -> &[usize] {
        &self.keyless
    }

    /// Distinct keys in ascending order.
    pub(crate) fn distinct_keys(&self) -> impl Iterator<Item = &Key> {
        self.postings.keys()
    }
}

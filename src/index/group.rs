use super::dimension::DimensionId;
use crate::core::{GameRecord, Key};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Handle to a rollup registered on a [`Crossfilter`](super::Crossfilter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub(crate) usize);

impl GroupId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Running state of one rollup bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Accumulator {
    pub count: u64,
    pub total: f64,
}

/// Incremental aggregate: `add` and `remove` must be exact inverses so a
/// bucket returns to its previous state when a filter is undone.
pub trait Reducer: Send + Sync {
    fn seed(&self) -> Accumulator {
        Accumulator::default()
    }

    fn add(&self, acc: &mut Accumulator, record: &GameRecord);

    fn remove(&self, acc: &mut Accumulator, record: &GameRecord);

    fn value(&self, acc: &Accumulator) -> f64;
}

/// Numeric record attributes that can be summed or averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Rating,
    NumRatings,
    MinPlayers,
    MaxPlayers,
    MinPlaytime,
    MaxPlaytime,
}

impl Metric {
    pub fn extract(&self, record: &GameRecord) -> f64 {
        match self {
            Self::Rating => record.stats.average,
            Self::NumRatings => record.stats.users_rated as f64,
            Self::MinPlayers => f64::from(record.min_players),
            Self::MaxPlayers => f64::from(record.max_players),
            Self::MinPlaytime => f64::from(record.min_playtime),
            Self::MaxPlaytime => f64::from(record.max_playtime),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CountReducer;

impl Reducer for CountReducer {
    fn add(&self, acc: &mut Accumulator, _record: &GameRecord) {
        acc.count += 1;
    }

    fn remove(&self, acc: &mut Accumulator, _record: &GameRecord) {
        acc.count = acc.count.saturating_sub(1);
    }

    fn value(&self, acc: &Accumulator) -> f64 {
        acc.count as f64
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SumReducer(pub Metric);

impl Reducer for SumReducer {
    fn add(&self, acc: &mut Accumulator, record: &GameRecord) {
        acc.count += 1;
        acc.total += self.0.extract(record);
    }

    fn remove(&self, acc: &mut Accumulator, record: &GameRecord) {
        acc.count = acc.count.saturating_sub(1);
        acc.total -= self.0.extract(record);
    }

    fn value(&self, acc: &Accumulator) -> f64 {
        acc.total
    }
}

/// Running sum and count; the value is `total / count`, or `0` for an empty
/// bucket.
#[derive(Debug, Clone, Copy)]
pub struct AverageReducer(pub Metric);

impl Reducer for AverageReducer {
    fn add(&self, acc: &mut Accumulator, record: &GameRecord) {
        acc.count += 1;
        acc.total += self.0.extract(record);
    }

    fn remove(&self, acc: &mut Accumulator, record: &GameRecord) {
        acc.count = acc.count.saturating_sub(1);
        acc.total -= self.0.extract(record);
    }

    fn value(&self, acc: &Accumulator) -> f64 {
        average(acc)
    }
}

pub fn average(acc: &Accumulator) -> f64 {
    if acc.count == 0 {
        0.0
    } else {
        acc.total / acc.count as f64
    }
}

type ReduceFn = Arc<dyn Fn(&mut Accumulator, &GameRecord) + Send + Sync>;
type ValueFn = Arc<dyn Fn(&Accumulator) -> f64 + Send + Sync>;

/// Reducer assembled from closures, for one-off rollups.
#[derive(Clone)]
pub struct FnReducer {
    seed: Accumulator,
    add: ReduceFn,
    remove: ReduceFn,
    value: ValueFn,
}

impl FnReducer {
    pub fn new<A, R, V>(seed: Accumulator, add: A, remove: R, value: V) -> Self
    where
        A: Fn(&mut Accumulator, &GameRecord) + Send + Sync + 'static,
        R: Fn(&mut Accumulator, &GameRecord) + Send + Sync + 'static,
        V: Fn(&Accumulator) -> f64 + Send + Sync + 'static,
    {
        Self {
            seed,
            add: Arc::new(add),
            remove: Arc::new(remove),
            value: Arc::new(value),
        }
    }
}

impl Reducer for FnReducer {
    fn seed(&self) -> Accumulator {
        self.seed
    }

    fn add(&self, acc: &mut Accumulator, record: &GameRecord) {
        (self.add)(acc, record)
    }

    fn remove(&self, acc: &mut Accumulator, record: &GameRecord) {
        (self.remove)(acc, record)
    }

    fn value(&self, acc: &Accumulator) -> f64 {
        (self.value)(acc)
    }
}

impl fmt::Debug for FnReducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnReducer").field("seed", &self.seed).finish_non_exhaustive()
    }
}

/// One bucket of a keyed rollup as seen by views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupEntry {
    pub key: Key,
    pub value: f64,
    pub count: u64,
}

pub(crate) enum GroupTarget {
    Keyed {
        dimension: DimensionId,
        buckets: BTreeMap<Key, Accumulator>,
    },
    All {
        acc: Accumulator,
    },
}

pub(crate) struct GroupState {
    pub(crate) reducer: Arc<dyn Reducer>,
    pub(crate) target: GroupTarget,
}

impl GroupState {
    pub(crate) fn dimension(&self) -> Option<DimensionId> {
        match &self.target {
            GroupTarget::Keyed { dimension, .. } => Some(*dimension),
            GroupTarget::All { .. } => None,
        }
    }

    pub(crate) fn entries(&self) -> Vec<GroupEntry> {
        match &self.target {
            GroupTarget::Keyed { buckets, .. } => buckets
                .iter()
                .map(|(key, acc)| GroupEntry {
                    key: key.clone(),
                    value: self.reducer.value(acc),
                    count: acc.count,
                })
                .collect(),
            GroupTarget::All { .. } => Vec::new(),
        }
    }
}

// ============================================================================
// src/index/crossfilter.rs - Incremental cross-filter engine
// ============================================================================
//
// Each record carries a bitmask with one bit per dimension; a set bit means
// the record fails that dimension's filter. A keyed group on dimension `d`
// counts a record iff its mask is zero once bit `d` is ignored, so a view's
// own filter never removes records from its own rollup. A group-all counts
// a record iff the whole mask is zero.
//
// A filter change only visits records that hold a key whose match state
// flipped, found through the dimension's inverted index, and moves each of
// them in or out of the affected rollups.
//
// ============================================================================

use super::dimension::{DimensionId, DimensionIndex, DimensionSpec};
use super::filter::{key_passes, record_passes, FilterPredicate};
use super::group::{CountReducer, GroupEntry, GroupId, GroupState, GroupTarget, Reducer};
use crate::core::{DashError, GameRecord, Key, Result};
use crate::storage::Dataset;
use log::debug;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Maximum number of dimensions; one bit of the per-record mask each.
pub const MAX_DIMENSIONS: usize = 64;

/// Outcome of one filter mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterChange {
    pub dimension: DimensionId,
    /// Records whose pass/fail state on this dimension flipped.
    pub changed_records: usize,
}

pub struct Crossfilter {
    dataset: Dataset,
    dimensions: Vec<DimensionIndex>,
    filters: Vec<Option<FilterPredicate>>,
    groups: Vec<GroupState>,
    masks: Vec<u64>,
}

impl Crossfilter {
    pub fn new(dataset: Dataset) -> Self {
        let masks = vec![0; dataset.len()];
        Self {
            dataset,
            dimensions: Vec::new(),
            filters: Vec::new(),
            groups: Vec::new(),
            masks,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn size(&self) -> usize {
        self.dataset.len()
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    pub fn define_dimension(&mut self, spec: DimensionSpec) -> Result<DimensionId> {
        if self.dimensions.len() >= MAX_DIMENSIONS {
            return Err(DashError::DimensionLimit(MAX_DIMENSIONS));
        }
        let index = DimensionIndex::build(spec, self.dataset.records())?;
        let id = DimensionId(self.dimensions.len());
        debug!(
            "Defined dimension #{} '{}' ({:?}, {} distinct keys)",
            id.0,
            index.name(),
            index.arity(),
            index.postings().len()
        );
        self.dimensions.push(index);
        self.filters.push(None);
        Ok(id)
    }

    /// Count rollup keyed by the dimension's keys.
    pub fn group(&mut self, dimension: DimensionId) -> Result<GroupId> {
        self.group_with(dimension, CountReducer)
    }

    pub fn group_with<R: Reducer + 'static>(
        &mut self,
        dimension: DimensionId,
        reducer: R,
    ) -> Result<GroupId> {
        let index = self.dimension_index(dimension)?;
        let reducer: Arc<dyn Reducer> = Arc::new(reducer);
        let ignore = !bit(dimension);

        let mut buckets: BTreeMap<Key, _> = index
            .distinct_keys()
            .map(|k| (k.clone(), reducer.seed()))
            .collect();
        for (id, record) in self.dataset.iter().enumerate() {
            if self.masks[id] & ignore != 0 {
                continue;
            }
            for key in index.keys_of(id) {
                if let Some(acc) = buckets.get_mut(key) {
                    reducer.add(acc, record);
                }
            }
        }

        let id = GroupId(self.groups.len());
        debug!("Defined group #{} on dimension '{}'", id.0, index.name());
        self.groups.push(GroupState {
            reducer,
            target: GroupTarget::Keyed { dimension, buckets },
        });
        Ok(id)
    }

    /// Count of records passing every filter.
    pub fn group_all(&mut self) -> GroupId {
        self.group_all_with(CountReducer)
    }

    pub fn group_all_with<R: Reducer + 'static>(&mut self, reducer: R) -> GroupId {
        let reducer: Arc<dyn Reducer> = Arc::new(reducer);
        let mut acc = reducer.seed();
        for (id, record) in self.dataset.iter().enumerate() {
            if self.masks[id] == 0 {
                reducer.add(&mut acc, record);
            }
        }
        let id = GroupId(self.groups.len());
        debug!("Defined group-all #{}", id.0);
        self.groups.push(GroupState {
            reducer,
            target: GroupTarget::All { acc },
        });
        id
    }

    // ------------------------------------------------------------------------
    // Filtering
    // ------------------------------------------------------------------------

    /// Replace the filter on `dimension`; `None` removes it.
    pub fn set_filter(
        &mut self,
        dimension: DimensionId,
        predicate: Option<FilterPredicate>,
    ) -> Result<FilterChange> {
        self.dimension_index(dimension)?;
        let old = self.filters[dimension.0].take();
        let candidates = self.affected_records(dimension, old.as_ref(), predicate.as_ref());

        let mut changed = 0;
        let dim_bit = bit(dimension);
        for id in candidates {
            let passes = record_passes(
                predicate.as_ref(),
                self.dimensions[dimension.0].keys_of(id),
            );
            let old_mask = self.masks[id];
            let new_mask = if passes {
                old_mask & !dim_bit
            } else {
                old_mask | dim_bit
            };
            if new_mask != old_mask {
                self.masks[id] = new_mask;
                self.apply_to_groups(id, old_mask, new_mask);
                changed += 1;
            }
        }

        debug!(
            "Filter on '{}' {} -> {} ({} records changed)",
            self.dimensions[dimension.0].name(),
            describe(old.as_ref()),
            describe(predicate.as_ref()),
            changed
        );
        self.filters[dimension.0] = predicate;
        Ok(FilterChange {
            dimension,
            changed_records: changed,
        })
    }

    pub fn clear_filter(&mut self, dimension: DimensionId) -> Result<FilterChange> {
        self.set_filter(dimension, None)
    }

    pub fn clear_all(&mut self) {
        for i in 0..self.dimensions.len() {
            if self.filters[i].is_some() {
                // Handles in range, cannot fail.
                let _ = self.set_filter(DimensionId(i), None);
            }
        }
    }

    pub fn filter(&self, dimension: DimensionId) -> Result<Option<&FilterPredicate>> {
        self.dimension_index(dimension)?;
        Ok(self.filters[dimension.0].as_ref())
    }

    pub fn has_filters(&self) -> bool {
        self.filters.iter().any(Option::is_some)
    }

    /// Records that may flip state: those holding a key whose match result
    /// differs between the old and new predicate, plus keyless records when
    /// the dimension goes from unfiltered to filtered or back.
    fn affected_records(
        &self,
        dimension: DimensionId,
        old: Option<&FilterPredicate>,
        new: Option<&FilterPredicate>,
    ) -> Vec<usize> {
        if old.is_none() && new.is_none() {
            return Vec::new();
        }
        let index = &self.dimensions[dimension.0];
        let mut candidates = Vec::new();
        for (key, ids) in index.postings() {
            if key_passes(old, key) != key_passes(new, key) {
                candidates.extend_from_slice(ids);
            }
        }
        if old.is_none() != new.is_none() {
            candidates.extend_from_slice(index.keyless());
        }
        candidates.sort_unstable();
        candidates.dedup();
        candidates
    }

    fn apply_to_groups(&mut self, id: usize, old_mask: u64, new_mask: u64) {
        let record = &self.dataset[id];
        for group in &mut self.groups {
            match &mut group.target {
                GroupTarget::Keyed { dimension, buckets } => {
                    let ignore = !bit(*dimension);
                    let was_in = old_mask & ignore == 0;
                    let now_in = new_mask & ignore == 0;
                    if was_in == now_in {
                        continue;
                    }
                    for key in self.dimensions[dimension.0].keys_of(id) {
                        if let Some(acc) = buckets.get_mut(key) {
                            if now_in {
                                group.reducer.add(acc, record);
                            } else {
                                group.reducer.remove(acc, record);
                            }
                        }
                    }
                }
                GroupTarget::All { acc } => {
                    let was_in = old_mask == 0;
                    let now_in = new_mask == 0;
                    if was_in && !now_in {
                        group.reducer.remove(acc, record);
                    } else if !was_in && now_in {
                        group.reducer.add(acc, record);
                    }
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Reading
    // ------------------------------------------------------------------------

    /// All buckets of a keyed group in ascending key order, zero buckets
    /// included.
    pub fn group_entries(&self, group: GroupId) -> Result<Vec<GroupEntry>> {
        let state = self.group_state(group)?;
        match &state.target {
            GroupTarget::Keyed { .. } => Ok(state.entries()),
            GroupTarget::All { .. } => Err(DashError::UnsupportedOperation(format!(
                "group #{} is a group-all and has no keys",
                group.0
            ))),
        }
    }

    /// The `k` largest buckets by value, ties broken by key.
    pub fn group_top(&self, group: GroupId, k: usize) -> Result<Vec<GroupEntry>> {
        let mut entries = self.group_entries(group)?;
        entries.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.key.cmp(&b.key)));
        entries.truncate(k);
        Ok(entries)
    }

    /// Value of a group-all rollup.
    pub fn group_all_value(&self, group: GroupId) -> Result<f64> {
        let state = self.group_state(group)?;
        match &state.target {
            GroupTarget::All { acc } => Ok(state.reducer.value(acc)),
            GroupTarget::Keyed { .. } => Err(DashError::UnsupportedOperation(format!(
                "group #{} is keyed; read it with group_entries",
                group.0
            ))),
        }
    }

    pub fn group_dimension(&self, group: GroupId) -> Result<Option<DimensionId>> {
        Ok(self.group_state(group)?.dimension())
    }

    pub fn dimension_name(&self, dimension: DimensionId) -> Result<&str> {
        Ok(self.dimension_index(dimension)?.name())
    }

    /// Distinct keys of a dimension in ascending order.
    pub fn dimension_keys(&self, dimension: DimensionId) -> Result<Vec<Key>> {
        Ok(self.dimension_index(dimension)?.distinct_keys().cloned().collect())
    }

    /// Indices of records passing every active filter, in dataset order.
    pub fn filtered_ids(&self) -> Vec<usize> {
        self.masks
            .iter()
            .enumerate()
            .filter(|(_, mask)| **mask == 0)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn filtered_records(&self) -> impl Iterator<Item = &GameRecord> {
        self.masks
            .iter()
            .zip(self.dataset.iter())
            .filter(|(mask, _)| **mask == 0)
            .map(|(_, record)| record)
    }

    pub fn filtered_count(&self) -> usize {
        self.masks.iter().filter(|m| **m == 0).count()
    }

    fn dimension_index(&self, dimension: DimensionId) -> Result<&DimensionIndex> {
        self.dimensions
            .get(dimension.0)
            .ok_or(DashError::DimensionNotFound(dimension.0))
    }

    fn group_state(&self, group: GroupId) -> Result<&GroupState> {
        self.groups
            .get(group.0)
            .ok_or(DashError::GroupNotFound(group.0))
    }
}

impl fmt::Debug for Crossfilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Crossfilter")
            .field("records", &self.dataset.len())
            .field("dimensions", &self.dimensions.len())
            .field("groups", &self.groups.len())
            .field("filters", &self.filters)
            .finish()
    }
}

fn bit(dimension: DimensionId) -> u64 {
    1u64 << dimension.0
}

fn describe(predicate: Option<&FilterPredicate>) -> String {
    predicate.map_or_else(|| "none".to_string(), |p| p.to_string())
}

use crate::core::{DashError, Key, Result};
use crate::index::{Crossfilter, DimensionId, GroupEntry, GroupId};
use crate::result::NumberFormat;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Kind of widget a view renders as. Drawing itself happens outside the
/// crate; the kind decides which view-model fields are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViewKind {
    SelectMenu,
    BarChart,
    RowChart,
    PieChart,
    NumberDisplay,
}

/// Order in which a chart lists its rows.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOrdering {
    /// Ascending key order.
    ByKey,
    /// Largest value first, ties by key.
    ByValueDesc,
    /// Fixed ordinal domain; keys outside it follow in key order.
    Domain(Vec<Key>),
}

/// Handle to a view in a [`ViewRegistry`](super::ViewRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ViewId(pub(crate) usize);

impl ViewId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct ViewSpec {
    pub name: String,
    pub kind: ViewKind,
    /// Dimension the view filters; number displays have none.
    pub dimension: Option<DimensionId>,
    pub group: GroupId,
    /// Maximum number of rows rendered.
    pub cap: Option<usize>,
    pub ordering: RowOrdering,
    pub format: NumberFormat,
}

impl ViewSpec {
    fn new(name: impl Into<String>, kind: ViewKind, dimension: Option<DimensionId>, group: GroupId) -> Self {
        Self {
            name: name.into(),
            kind,
            dimension,
            group,
            cap: None,
            ordering: RowOrdering::ByKey,
            format: NumberFormat::Count,
        }
    }

    pub fn select_menu(name: impl Into<String>, dimension: DimensionId, group: GroupId) -> Self {
        Self::new(name, ViewKind::SelectMenu, Some(dimension), group)
    }

    pub fn bar_chart(name: impl Into<String>, dimension: DimensionId, group: GroupId) -> Self {
        Self::new(name, ViewKind::BarChart, Some(dimension), group)
    }

    pub fn row_chart(name: impl Into<String>, dimension: DimensionId, group: GroupId) -> Self {
        Self::new(name, ViewKind::RowChart, Some(dimension), group).ordering(RowOrdering::ByValueDesc)
    }

    pub fn pie_chart(name: impl Into<String>, dimension: DimensionId, group: GroupId) -> Self {
        Self::new(name, ViewKind::PieChart, Some(dimension), group).ordering(RowOrdering::ByValueDesc)
    }

    /// Single number read from a group-all rollup.
    pub fn number_display(name: impl Into<String>, group: GroupId, format: NumberFormat) -> Self {
        Self::new(name, ViewKind::NumberDisplay, None, group).format(format)
    }

    pub fn cap(mut self, cap: usize) -> Self {
        self.cap = Some(cap);
        self
    }

    pub fn ordering(mut self, ordering: RowOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn format(mut self, format: NumberFormat) -> Self {
        self.format = format;
        self
    }
}

/// A view: its static definition plus the keys the user has selected on it.
#[derive(Debug, Clone)]
pub struct View {
    pub(crate) id: ViewId,
    pub(crate) spec: ViewSpec,
    pub(crate) selection: BTreeSet<Key>,
}

impl View {
    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn kind(&self) -> ViewKind {
        self.spec.kind
    }

    pub fn spec(&self) -> &ViewSpec {
        &self.spec
    }

    pub fn selection(&self) -> &BTreeSet<Key> {
        &self.selection
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// The dimension this view filters, or an error for views that cannot
    /// filter.
    pub fn filter_dimension(&self) -> Result<DimensionId> {
        self.spec.dimension.ok_or_else(|| {
            DashError::UnsupportedOperation(format!("view '{}' does not filter", self.spec.name))
        })
    }

    /// Build the view model from the current rollups.
    pub fn render(&self, cf: &Crossfilter) -> Result<ViewModel> {
        if self.spec.kind == ViewKind::NumberDisplay {
            let value = cf.group_all_value(self.spec.group)?;
            return Ok(ViewModel {
                view: self.id,
                name: self.spec.name.clone(),
                kind: self.spec.kind,
                rows: Vec::new(),
                display: Some(self.spec.format.format(value)),
                value: Some(value),
                filters: Vec::new(),
            });
        }

        let mut entries = cf.group_entries(self.spec.group)?;
        order_entries(&mut entries, &self.spec.ordering);
        if let Some(cap) = self.spec.cap {
            entries.truncate(cap);
        }
        let rows = entries
            .into_iter()
            .map(|e| ChartRow {
                selected: self.selection.contains(&e.key),
                key: e.key,
                value: e.value,
                count: e.count,
            })
            .collect();

        Ok(ViewModel {
            view: self.id,
            name: self.spec.name.clone(),
            kind: self.spec.kind,
            rows,
            display: None,
            value: None,
            filters: self.selection.iter().cloned().collect(),
        })
    }
}

fn order_entries(entries: &mut [GroupEntry], ordering: &RowOrdering) {
    match ordering {
        RowOrdering::ByKey => entries.sort_by(|a, b| a.key.cmp(&b.key)),
        RowOrdering::ByValueDesc => {
            entries.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.key.cmp(&b.key)))
        }
        RowOrdering::Domain(domain) => {
            let position: HashMap<&Key, usize> =
                domain.iter().enumerate().map(|(i, k)| (k, i)).collect();
            entries.sort_by(|a, b| {
                let pa = position.get(&a.key).copied().unwrap_or(usize::MAX);
                let pb = position.get(&b.key).copied().unwrap_or(usize::MAX);
                pa.cmp(&pb).then_with(|| a.key.cmp(&b.key))
            });
        }
    }
}

/// One bar, row, slice or menu option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub key: Key,
    pub value: f64,
    pub count: u64,
    pub selected: bool,
}

/// What a view shows after a redraw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub view: ViewId,
    pub name: String,
    pub kind: ViewKind,
    pub rows: Vec<ChartRow>,
    /// Formatted value of a number display.
    pub display: Option<String>,
    pub value: Option<f64>,
    /// Keys currently selected on this view.
    pub filters: Vec<Key>,
}

impl ViewModel {
    pub fn row(&self, key: &Key) -> Option<&ChartRow> {
        self.rows.iter().find(|r| &r.key == key)
    }
}

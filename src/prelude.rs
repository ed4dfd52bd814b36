//! Common imports grouped by abstraction level.
//!
//! `board` is the default for hosts that just want the board-game dashboard.
//! `engine` exposes the crossfilter and coordination layer for building
//! other dashboards over the same records.

pub mod board {
    //! The assembled dashboard and what it needs to load and render.
    pub use crate::config::{DashboardConfig, ThresholdComparison, YearBuckets};
    pub use crate::core::{DashError, GameRecord, Key, Result};
    pub use crate::dashboard::{PageDirection, TableControls, TablePage, TableSortKey, ViewModel};
    pub use crate::facade::{Dashboard, views};
    pub use crate::result::{render_table, render_view};
    pub use crate::storage::Dataset;
}

pub mod engine {
    //! Dimensions, rollups, views and the coordinator that keeps them in step.
    pub use crate::dashboard::{
        DataTable, DualViewSync, RedrawListener, RowOrdering, SelectionCoordinator, ViewId,
        ViewKind, ViewSpec,
    };
    pub use crate::index::{
        Accumulator, Arity, AverageReducer, CountReducer, Crossfilter, DimensionId, DimensionSpec,
        FilterPredicate, FnReducer, GroupEntry, GroupId, Metric, Reducer, SumReducer, extractors,
    };
    pub use crate::result::NumberFormat;
}

// ============================================================================
// bggdash Library
// ============================================================================

pub mod core;
pub mod storage;
pub mod index;
pub mod dashboard;
pub mod result;
pub mod config;
pub mod facade;
pub mod prelude;

// Re-export main types for convenience
pub use facade::Dashboard;
pub use config::{DashboardConfig, ThresholdComparison, YearBuckets};
pub use core::{DashError, GameRecord, Key, Result};
pub use storage::Dataset;

// Re-export the engine API
pub use index::{
    Crossfilter, DimensionId, DimensionSpec, FilterChange, FilterPredicate, GroupEntry, GroupId,
    Reducer,
};
pub use dashboard::{
    DataTable, DualViewSync, PageDirection, SelectionCoordinator, TablePage, TableSortKey,
    ViewId, ViewModel, ViewSpec,
};

// ============================================================================
// Loading helpers
// ============================================================================

/// Build the full dashboard from a JSON array of BoardGameGeek records.
///
/// # Examples
///
/// ```
/// use bggdash::{DashboardConfig, TableSortKey};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let json = r#"[
///     {"id": 1, "name": "Brass", "yearpublished": 2018,
///      "stats": {"average": 8.6, "usersrated": 40000}},
///     {"id": 2, "name": "Go", "stats": {"average": 7.6, "usersrated": 15000}}
/// ]"#;
///
/// let mut dashboard = bggdash::dashboard_from_json(json, DashboardConfig::default())?;
/// let newest_first = dashboard.sort_by(TableSortKey::Year);
/// assert_eq!(newest_first.rows[0].name, "Brass");
///
/// // Sorting by the same column again flips the direction; games without a
/// // year sort below every real year.
/// let oldest_first = dashboard.sort_by(TableSortKey::Year);
/// assert_eq!(oldest_first.rows[0].name, "Go");
/// # Ok(())
/// # }
/// ```
pub fn dashboard_from_json(json: &str, config: DashboardConfig) -> Result<Dashboard> {
    Dashboard::with_config(Dataset::from_json_str(json)?, config)
}

/// Load a dataset file and build the dashboard over it.
pub fn open(path: impl AsRef<std::path::Path>, config: DashboardConfig) -> Result<Dashboard> {
    Dashboard::with_config(Dataset::load(path)?, config)
}

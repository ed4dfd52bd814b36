pub mod coordinator;
pub mod registry;
pub mod sync;
pub mod table;
pub mod view;

pub use coordinator::{RedrawListener, SelectionCoordinator};
pub use registry::ViewRegistry;
pub use sync::{DualViewSync, PairSide};
pub use table::{
    ColumnHeader, DataTable, PageControls, PageDirection, RecordComparator, SortDirection,
    TableColumn, TablePage, TablePager, TableRow, TableSortKey, TableControls,
    MISSING_YEAR_RANK,
};
pub use view::{ChartRow, RowOrdering, View, ViewId, ViewKind, ViewModel, ViewSpec};

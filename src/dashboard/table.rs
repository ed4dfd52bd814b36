// ============================================================================
// src/dashboard/table.rs - Paginated, sortable game table
// ============================================================================
//
// The pager is a plain state machine over {sort key, direction, offset,
// page size}; the filtered record count is passed in on every move so the
// pager never holds a stale total. The comparator sorts numerically and
// ranks a missing publication year as a far-below-any-year sentinel, which
// puts such games last when sorting descending.
//
// ============================================================================

use crate::core::GameRecord;
use crate::index::Crossfilter;
use crate::result::format_count;
use serde::Serialize;
use std::cmp::Ordering;

/// Sort rank of a game with no publication year.
pub const MISSING_YEAR_RANK: f64 = -100_000.0;

// ============================================================================
// SORT KEY / DIRECTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TableSortKey {
    Year,
    Rating,
    NumRatings,
}

impl TableSortKey {
    /// Numeric rank used for ordering.
    pub fn rank(&self, record: &GameRecord) -> f64 {
        match self {
            Self::Year => record
                .year_published
                .map_or(MISSING_YEAR_RANK, f64::from),
            Self::Rating => record.stats.average,
            Self::NumRatings => record.stats.users_rated as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageDirection {
    First,
    Prev,
    Next,
    Last,
}

// ============================================================================
// RECORD COMPARATOR
// ============================================================================

/// Compares records by one sort key in one direction.
pub struct RecordComparator {
    key: TableSortKey,
    direction: SortDirection,
}

impl RecordComparator {
    pub fn new(key: TableSortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    pub fn compare(&self, a: &GameRecord, b: &GameRecord) -> Ordering {
        let ordering = self.key.rank(a).total_cmp(&self.key.rank(b));
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    /// Stable sort: equal ranks keep dataset order.
    pub fn sort(&self, records: &mut [&GameRecord]) {
        records.sort_by(|a, b| self.compare(a, b));
    }
}

// ============================================================================
// PAGER
// ============================================================================

/// Offset is 1-based: the first row of the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TablePager {
    sort_key: TableSortKey,
    direction: SortDirection,
    offset: usize,
    page_size: usize,
}

impl TablePager {
    /// Starts on the first page, highest rating first. `page_size` of zero
    /// is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            sort_key: TableSortKey::Rating,
            direction: SortDirection::Desc,
            offset: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn sort_key(&self) -> TableSortKey {
        self.sort_key
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Same key toggles direction, a new key starts descending. Either way
    /// the table returns to its first page.
    pub fn sort_by(&mut self, key: TableSortKey) {
        if key == self.sort_key {
            self.direction = self.direction.toggled();
        } else {
            self.sort_key = key;
            self.direction = SortDirection::Desc;
        }
        self.offset = 1;
    }

    pub fn can_next(&self, total: usize) -> bool {
        self.offset + self.page_size <= total
    }

    pub fn can_prev(&self) -> bool {
        self.offset > 1
    }

    /// Returns whether the offset moved.
    pub fn next_page(&mut self, total: usize) -> bool {
        if !self.can_next(total) {
            return false;
        }
        self.offset += self.page_size;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if !self.can_prev() {
            return false;
        }
        self.offset = self.offset.saturating_sub(self.page_size).max(1);
        true
    }

    pub fn first_page(&mut self) {
        self.offset = 1;
    }

    /// Jump to the last non-empty page: 37 rows of 15 → offset 31,
    /// 30 rows of 15 → offset 16.
    pub fn last_page(&mut self, total: usize) {
        let mut offset = (total / self.page_size) * self.page_size + 1;
        if total % self.page_size == 0 {
            offset = offset.saturating_sub(self.page_size);
        }
        self.offset = offset.max(1);
    }

    pub fn page(&mut self, direction: PageDirection, total: usize) {
        match direction {
            PageDirection::First => self.first_page(),
            PageDirection::Prev => {
                self.prev_page();
            }
            PageDirection::Next => {
                self.next_page(total);
            }
            PageDirection::Last => self.last_page(total),
        }
    }

    /// Zero-based `[begin, end)` slice bounds, clipped to `total`.
    pub fn slice_bounds(&self, total: usize) -> (usize, usize) {
        let begin = (self.offset - 1).min(total);
        let end = (self.offset - 1 + self.page_size).min(total);
        (begin, end)
    }

    pub fn controls(&self, total: usize) -> PageControls {
        let (begin, end) = self.slice_bounds(total);
        let (begin, end) = if end > begin { (begin + 1, end) } else { (0, 0) };
        PageControls {
            begin,
            end,
            total,
            first_enabled: self.offset != 1,
            prev_enabled: self.can_prev(),
            next_enabled: self.can_next(total),
            last_enabled: self.can_next(total),
        }
    }
}

/// The "showing x-y of z" line and which navigation buttons are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageControls {
    /// 1-based index of the first row shown, 0 for an empty page.
    pub begin: usize,
    pub end: usize,
    pub total: usize,
    pub first_enabled: bool,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub last_enabled: bool,
}

// ============================================================================
// TABLE CONTROLS
// ============================================================================

/// Commands a host wires to the table's header and pagination buttons.
pub trait TableControls {
    fn on_sort_requested(&mut self, key: TableSortKey);

    fn on_page_requested(&mut self, direction: PageDirection);
}

// ============================================================================
// DATA TABLE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableColumn {
    pub label: &'static str,
    pub sort_key: Option<TableSortKey>,
}

/// Header state after a redraw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnHeader {
    pub label: &'static str,
    pub sort_key: Option<TableSortKey>,
    /// Set on the column the table is currently sorted by.
    pub active: Option<SortDirection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub id: u64,
    pub name: String,
    pub url: String,
    pub year: String,
    pub rating: String,
    pub num_ratings: String,
}

impl TableRow {
    fn from_record(record: &GameRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            url: record.url(),
            year: record
                .year_published
                .map_or_else(|| "not given".to_string(), |y| y.to_string()),
            rating: format!("{:.2}", record.stats.average),
            num_ratings: record.stats.users_rated.to_string(),
        }
    }

    /// Link cell as rendered in the table's name column.
    pub fn anchor(&self) -> String {
        format!(
            "<a href='{}' target='_blank'>{}</a>",
            self.url,
            escape_html(&self.name)
        )
    }

    pub fn cells(&self) -> [&str; 4] {
        [&self.name, &self.year, &self.rating, &self.num_ratings]
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Current page of the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePage {
    pub headers: Vec<ColumnHeader>,
    pub rows: Vec<TableRow>,
    pub controls: PageControls,
}

impl TablePage {
    pub fn summary(&self) -> String {
        format!(
            "showing {}-{} of {}",
            self.controls.begin,
            self.controls.end,
            format_count(self.controls.total as u64)
        )
    }
}

/// The game table: fixed columns and a pager. It owns its sortable headers
/// instead of looking them up after each redraw.
#[derive(Debug, Clone)]
pub struct DataTable {
    columns: Vec<TableColumn>,
    pager: TablePager,
}

impl DataTable {
    pub fn new(page_size: usize) -> Self {
        Self {
            columns: vec![
                TableColumn {
                    label: "Name",
                    sort_key: None,
                },
                TableColumn {
                    label: "Year Published",
                    sort_key: Some(TableSortKey::Year),
                },
                TableColumn {
                    label: "Average Rating",
                    sort_key: Some(TableSortKey::Rating),
                },
                TableColumn {
                    label: "Number of Ratings",
                    sort_key: Some(TableSortKey::NumRatings),
                },
            ],
            pager: TablePager::new(page_size),
        }
    }

    pub fn pager(&self) -> &TablePager {
        &self.pager
    }

    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    pub fn sort_by(&mut self, key: TableSortKey) {
        self.pager.sort_by(key);
    }

    pub fn page(&mut self, direction: PageDirection, total: usize) {
        self.pager.page(direction, total);
    }

    pub fn first_page(&mut self) {
        self.pager.first_page();
    }

    pub fn headers(&self) -> Vec<ColumnHeader> {
        self.columns
            .iter()
            .map(|c| ColumnHeader {
                label: c.label,
                sort_key: c.sort_key,
                active: (c.sort_key == Some(self.pager.sort_key)).then_some(self.pager.direction),
            })
            .collect()
    }

    /// Filtered records in the active order.
    pub fn sorted<'a>(&self, cf: &'a Crossfilter) -> Vec<&'a GameRecord> {
        let mut records: Vec<&GameRecord> = cf.filtered_records().collect();
        RecordComparator::new(self.pager.sort_key, self.pager.direction).sort(&mut records);
        records
    }

    pub fn render(&self, cf: &Crossfilter) -> TablePage {
        let records = self.sorted(cf);
        let total = records.len();
        let (begin, end) = self.pager.slice_bounds(total);
        TablePage {
            headers: self.headers(),
            rows: records[begin..end]
                .iter()
                .map(|r| TableRow::from_record(r))
                .collect(),
            controls: self.pager.controls(total),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_page_offsets() {
        let mut pager = TablePager::new(15);
        pager.last_page(37);
        assert_eq!(pager.offset(), 31);
        assert_eq!(pager.slice_bounds(37), (30, 37));

        pager.last_page(30);
        assert_eq!(pager.offset(), 16);

        pager.last_page(0);
        assert_eq!(pager.offset(), 1);

        pager.last_page(7);
        assert_eq!(pager.offset(), 1);
    }

    #[test]
    fn test_next_and_prev() {
        let mut pager = TablePager::new(15);
        assert!(!pager.can_prev());
        assert!(!pager.prev_page());

        assert!(pager.next_page(37));
        assert_eq!(pager.offset(), 16);
        assert!(pager.next_page(37));
        assert_eq!(pager.offset(), 31);
        assert!(!pager.next_page(37));
        assert_eq!(pager.offset(), 31);

        assert!(pager.prev_page());
        assert_eq!(pager.offset(), 16);
    }

    #[test]
    fn test_next_disabled_on_exact_last_page() {
        let mut pager = TablePager::new(15);
        assert!(pager.next_page(30));
        assert!(!pager.can_next(30));
        assert!(!pager.next_page(30));
    }

    #[test]
    fn test_sort_toggle() {
        let mut pager = TablePager::new(15);
        pager.next_page(100);

        pager.sort_by(TableSortKey::Rating);
        assert_eq!(pager.direction(), SortDirection::Asc);
        assert_eq!(pager.offset(), 1);

        pager.sort_by(TableSortKey::Rating);
        assert_eq!(pager.direction(), SortDirection::Desc);

        pager.sort_by(TableSortKey::Rating);
        pager.sort_by(TableSortKey::Year);
        assert_eq!(pager.sort_key(), TableSortKey::Year);
        assert_eq!(pager.direction(), SortDirection::Desc);
    }

    #[test]
    fn test_controls() {
        let mut pager = TablePager::new(15);
        let c = pager.controls(37);
        assert_eq!((c.begin, c.end, c.total), (1, 15, 37));
        assert!(!c.first_enabled && !c.prev_enabled && c.next_enabled && c.last_enabled);

        pager.last_page(37);
        let c = pager.controls(37);
        assert_eq!((c.begin, c.end), (31, 37));
        assert!(c.first_enabled && c.prev_enabled && !c.next_enabled && !c.last_enabled);

        let empty = TablePager::new(15).controls(0);
        assert_eq!((empty.begin, empty.end, empty.total), (0, 0, 0));

        // Offset left behind by a shrinking filter: nothing shown.
        let stale = pager.controls(5);
        assert_eq!((stale.begin, stale.end, stale.total), (0, 0, 5));
    }

    #[test]
    fn test_year_comparator_puts_missing_last_descending() {
        let a = GameRecord::new(1, "A").year(1995);
        let b = GameRecord::new(2, "B");
        let c = GameRecord::new(3, "C").year(2015);
        let mut records = vec![&a, &b, &c];

        RecordComparator::new(TableSortKey::Year, SortDirection::Desc).sort(&mut records);
        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, [3, 1, 2]);

        RecordComparator::new(TableSortKey::Year, SortDirection::Asc).sort(&mut records);
        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, [2, 1, 3]);
    }

    #[test]
    fn test_num_ratings_sorted_numerically() {
        let a = GameRecord::new(1, "A").rating(7.0, 9);
        let b = GameRecord::new(2, "B").rating(7.0, 10);
        let c = GameRecord::new(3, "C").rating(7.0, 100);
        let mut records = vec![&a, &b, &c];
        RecordComparator::new(TableSortKey::NumRatings, SortDirection::Desc).sort(&mut records);
        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, [3, 2, 1]);
    }

    #[test]
    fn test_row_rendering() {
        let game = GameRecord::new(13, "Catan & <Friends>").rating(7.1, 90000);
        let row = TableRow::from_record(&game);
        assert_eq!(row.year, "not given");
        assert_eq!(row.rating, "7.10");
        assert_eq!(row.num_ratings, "90000");
        assert_eq!(
            row.anchor(),
            "<a href='https://boardgamegeek.com/boardgame/13/' target='_blank'>Catan &amp; &lt;Friends&gt;</a>"
        );
    }

    #[test]
    fn test_headers_track_active_sort() {
        let mut table = DataTable::new(15);
        let headers = table.headers();
        assert_eq!(headers[0].active, None);
        assert_eq!(headers[2].active, Some(SortDirection::Desc));

        table.sort_by(TableSortKey::Year);
        let headers = table.headers();
        assert_eq!(headers[1].active, Some(SortDirection::Desc));
        assert_eq!(headers[2].active, None);
    }
}

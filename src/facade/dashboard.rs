use crate::config::DashboardConfig;
use crate::core::{Key, Result};
use crate::dashboard::{
    DataTable, DualViewSync, PageDirection, RedrawListener, RowOrdering, SelectionCoordinator,
    TableControls, TablePage, TableSortKey, ViewId, ViewModel, ViewSpec,
};
use crate::index::{
    AverageReducer, Crossfilter, DimensionId, DimensionSpec, FilterPredicate, Metric, extractors,
};
use crate::result::NumberFormat;
use crate::storage::Dataset;
use log::{info, warn};

/// View names of the board-game dashboard.
pub mod views {
    pub const TYPE: &str = "type-select";
    pub const PLAYER_COUNT: &str = "player-count-select";
    pub const PLAYTIME: &str = "playtime-select";
    pub const MIN_RATINGS: &str = "min-ratings-select";
    pub const NUM_GAMES: &str = "num-games";
    pub const AVG_RATING: &str = "avg-rating";
    pub const AVG_NUM_RATINGS: &str = "avg-num-ratings";
    pub const YEAR_BAR: &str = "year-bar-chart";
    pub const YEAR_ROW: &str = "year-row-chart";
    pub const MECHANICS: &str = "mechanics-row-chart";
    pub const CATEGORIES: &str = "categories-row-chart";
    pub const DESIGNERS: &str = "designers-row-chart";
    pub const PUBLISHERS: &str = "publishers-row-chart";
    pub const RATING_PIE: &str = "avg-rating-pie-chart";
}

/// The board-game dashboard: every dimension, rollup and view wired over one
/// dataset, plus the game table and the synchronized pair of year charts.
///
/// Any change of filters returns the table to its first page.
///
/// # Examples
///
/// ```
/// use bggdash::{Dashboard, Dataset, GameRecord, Key};
/// use bggdash::facade::views;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dataset = Dataset::new(vec![
///     GameRecord::new(1, "Azul").year(2017).players(2, 4).rating(7.8, 60000),
///     GameRecord::new(2, "Chess").players(2, 2).rating(7.1, 30000),
/// ]);
/// let mut dashboard = Dashboard::new(dataset)?;
///
/// dashboard.toggle(views::PLAYER_COUNT, Key::from("3"))?;
/// assert_eq!(dashboard.number(views::NUM_GAMES)?, "1");
/// assert_eq!(dashboard.table_page().rows[0].name, "Azul");
/// # Ok(())
/// # }
/// ```
pub struct Dashboard {
    config: DashboardConfig,
    coordinator: SelectionCoordinator,
    table: DataTable,
    year_sync: DualViewSync,
    year_domain: Vec<Key>,
}

impl Dashboard {
    pub fn new(dataset: Dataset) -> Result<Self> {
        Self::with_config(dataset, DashboardConfig::default())
    }

    pub fn with_config(dataset: Dataset, config: DashboardConfig) -> Result<Self> {
        config.validate()?;
        let year_domain = extractors::year_domain(&config.year_buckets, dataset.max_year());
        let records = dataset.len();
        let mut c = SelectionCoordinator::new(Crossfilter::new(dataset));

        let suffix = config.type_suffix.clone();
        let type_dim = c.define_dimension(DimensionSpec::multi("type", move |r| {
            extractors::game_types(r, &suffix)
        }))?;
        let max_listed = config.max_listed_players;
        let players_dim = c.define_dimension(DimensionSpec::multi("player_count", move |r| {
            extractors::player_counts(r, max_listed)
        }))?;
        let candidates = config.playtime_candidates.clone();
        let playtime_dim = c.define_dimension(DimensionSpec::multi("playtime", move |r| {
            extractors::play_times(r, &candidates)
        }))?;
        let ladder = config.ratings_ladder.clone();
        let comparison = config.threshold;
        let min_ratings_dim = c.define_dimension(DimensionSpec::multi("min_ratings", move |r| {
            extractors::min_ratings(r, &ladder, comparison)
        }))?;
        let buckets = config.year_buckets;
        let year_dim = c.define_dimension(DimensionSpec::single("year", move |r| {
            Key::Text(extractors::year_bucket(r.year_published, &buckets))
        }))?;
        let mechanics_dim = c.define_dimension(DimensionSpec::multi("mechanics", |r| {
            extractors::text_keys(&r.mechanics)
        }))?;
        let categories_dim = c.define_dimension(DimensionSpec::multi("categories", |r| {
            extractors::text_keys(&r.categories)
        }))?;
        let designers_dim = c.define_dimension(DimensionSpec::multi("designers", |r| {
            extractors::text_keys(&r.designers)
        }))?;
        let publishers_dim = c.define_dimension(DimensionSpec::multi("publishers", |r| {
            extractors::text_keys(&r.publishers)
        }))?;
        let rating_dim = c.define_dimension(DimensionSpec::single("rating_band", |r| {
            Key::Text(extractors::rating_band(r.stats.average))
        }))?;

        for (name, dim) in [
            (views::TYPE, type_dim),
            (views::PLAYER_COUNT, players_dim),
            (views::PLAYTIME, playtime_dim),
            (views::MIN_RATINGS, min_ratings_dim),
        ] {
            let group = c.group(dim)?;
            c.register_view(ViewSpec::select_menu(name, dim, group))?;
        }

        let all = c.group_all();
        c.register_view(ViewSpec::number_display(views::NUM_GAMES, all, NumberFormat::Count))?;
        let avg_rating = c.group_all_with(AverageReducer(Metric::Rating));
        c.register_view(ViewSpec::number_display(
            views::AVG_RATING,
            avg_rating,
            NumberFormat::Fixed(2),
        ))?;
        let avg_num_ratings = c.group_all_with(AverageReducer(Metric::NumRatings));
        c.register_view(ViewSpec::number_display(
            views::AVG_NUM_RATINGS,
            avg_num_ratings,
            NumberFormat::Count,
        ))?;

        let year_group = c.group(year_dim)?;
        let year_bar = c.register_view(
            ViewSpec::bar_chart(views::YEAR_BAR, year_dim, year_group)
                .ordering(RowOrdering::Domain(year_domain.clone())),
        )?;
        let year_row = c.register_view(
            ViewSpec::row_chart(views::YEAR_ROW, year_dim, year_group)
                .ordering(RowOrdering::Domain(year_domain.clone())),
        )?;

        for (name, dim) in [
            (views::MECHANICS, mechanics_dim),
            (views::CATEGORIES, categories_dim),
            (views::DESIGNERS, designers_dim),
            (views::PUBLISHERS, publishers_dim),
        ] {
            let group = c.group(dim)?;
            c.register_view(ViewSpec::row_chart(name, dim, group).cap(config.rows_cap))?;
        }

        let rating_group = c.group(rating_dim)?;
        c.register_view(
            ViewSpec::pie_chart(views::RATING_PIE, rating_dim, rating_group).cap(config.pie_cap),
        )?;

        info!(
            "Dashboard ready: {} games, {} views",
            records,
            c.registry().len()
        );
        Ok(Self {
            table: DataTable::new(config.page_size),
            year_sync: DualViewSync::new(year_bar, year_row)?,
            config,
            coordinator: c,
            year_domain,
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn coordinator(&self) -> &SelectionCoordinator {
        &self.coordinator
    }

    pub fn crossfilter(&self) -> &Crossfilter {
        self.coordinator.crossfilter()
    }

    pub fn table(&self) -> &DataTable {
        &self.table
    }

    pub fn year_sync(&self) -> &DualViewSync {
        &self.year_sync
    }

    /// Ordinal domain of the two year charts.
    pub fn year_domain(&self) -> &[Key] {
        &self.year_domain
    }

    pub fn view_id(&self, name: &str) -> Result<ViewId> {
        self.coordinator.view_id(name)
    }

    pub fn add_listener(&mut self, listener: Box<dyn RedrawListener>) {
        self.coordinator.add_listener(listener);
    }

    // ------------------------------------------------------------------------
    // Filtering
    // ------------------------------------------------------------------------

    /// Replace a view's selection.
    pub fn select<I>(&mut self, view: &str, keys: I) -> Result<Vec<ViewModel>>
    where
        I: IntoIterator<Item = Key>,
    {
        let id = self.interact(view)?;
        let models = self.coordinator.select(id, keys)?;
        self.table.first_page();
        Ok(models)
    }

    /// Chart click on one key.
    pub fn toggle(&mut self, view: &str, key: Key) -> Result<Vec<ViewModel>> {
        let id = self.interact(view)?;
        let models = self.coordinator.toggle(id, key)?;
        self.table.first_page();
        Ok(models)
    }

    /// Select by displayed labels, e.g. `"2015"` on the year chart or `"60"`
    /// on the play-time menu.
    pub fn select_labels(&mut self, view: &str, labels: &[&str]) -> Result<Vec<ViewModel>> {
        let keys = labels
            .iter()
            .map(|label| self.resolve_label(view, label))
            .collect::<Result<Vec<_>>>()?;
        self.select(view, keys)
    }

    /// The key a view shows under `label`; unknown labels are parsed.
    pub fn resolve_label(&self, view: &str, label: &str) -> Result<Key> {
        let id = self.coordinator.view_id(view)?;
        let dimension = self.coordinator.view(id)?.filter_dimension()?;
        let known = self.crossfilter().dimension_keys(dimension)?;
        Ok(match known.into_iter().find(|k| k.to_string() == label) {
            Some(key) => key,
            None => {
                warn!("View '{}' has no key '{}'; selecting it matches nothing", view, label);
                Key::parse(label)
            }
        })
    }

    /// Reset one view, like the per-chart "clear" buttons.
    pub fn clear(&mut self, view: &str) -> Result<Vec<ViewModel>> {
        self.select(view, std::iter::empty())
    }

    pub fn reset_all(&mut self) -> Result<Vec<ViewModel>> {
        let models = self.coordinator.reset_all()?;
        self.table.first_page();
        Ok(models)
    }

    pub fn set_filter(
        &mut self,
        dimension: DimensionId,
        predicate: Option<FilterPredicate>,
    ) -> Result<Vec<ViewModel>> {
        let models = self.coordinator.set_filter(dimension, predicate)?;
        self.table.first_page();
        Ok(models)
    }

    pub fn clear_filter(&mut self, dimension: DimensionId) -> Result<Vec<ViewModel>> {
        self.set_filter(dimension, None)
    }

    // ------------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------------

    /// A click landed on a view's container.
    pub fn observe_click(&mut self, view: &str) -> Result<()> {
        let id = self.coordinator.view_id(view)?;
        self.year_sync.observe_interaction(id);
        Ok(())
    }

    /// Resize or orientation change: bring the hidden year chart in line
    /// with the one the user last touched.
    pub fn layout_changed(&mut self) -> Result<Option<Vec<ViewModel>>> {
        let models = self.year_sync.on_layout_change(&mut self.coordinator)?;
        if models.is_some() {
            self.table.first_page();
        }
        Ok(models)
    }

    fn interact(&mut self, view: &str) -> Result<ViewId> {
        let id = self.coordinator.view_id(view)?;
        self.year_sync.observe_interaction(id);
        Ok(id)
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    pub fn render_all(&mut self) -> Result<Vec<ViewModel>> {
        self.coordinator.redraw_all()
    }

    pub fn render(&self, view: &str) -> Result<ViewModel> {
        self.coordinator.render(self.coordinator.view_id(view)?)
    }

    /// Formatted value of a number display.
    pub fn number(&self, view: &str) -> Result<String> {
        Ok(self.render(view)?.display.unwrap_or_default())
    }

    pub fn table_page(&self) -> TablePage {
        self.table.render(self.crossfilter())
    }

    // ------------------------------------------------------------------------
    // Table
    // ------------------------------------------------------------------------

    pub fn sort_by(&mut self, key: TableSortKey) -> TablePage {
        self.table.sort_by(key);
        self.table_page()
    }

    pub fn page(&mut self, direction: PageDirection) -> TablePage {
        let total = self.crossfilter().filtered_count();
        self.table.page(direction, total);
        self.table_page()
    }
}

impl TableControls for Dashboard {
    fn on_sort_requested(&mut self, key: TableSortKey) {
        self.table.sort_by(key);
    }

    fn on_page_requested(&mut self, direction: PageDirection) {
        let total = self.crossfilter().filtered_count();
        self.table.page(direction, total);
    }
}

use anyhow::{Context, Result, anyhow};
use bggdash::dashboard::{PageDirection, TableSortKey, ViewKind};
use bggdash::result::{render_table, render_view};
use bggdash::{Dashboard, DashboardConfig, Dataset};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bggdash")]
#[command(about = "Cross-filtered BoardGameGeek dashboard in the terminal")]
struct Cli {
    /// JSON array of BoardGameGeek game records.
    data: PathBuf,

    /// Dashboard configuration (JSON); defaults apply to missing fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Toggle a key on a view, e.g. `player-count-select=4` or
    /// `year-bar-chart=1980s`. Repeatable; applied in order.
    #[arg(long = "select", value_name = "VIEW=KEY")]
    selections: Vec<String>,

    /// Click a table column header. Repeating a column flips its direction.
    #[arg(long = "sort", value_enum)]
    sorts: Vec<SortArg>,

    /// Press a paging button. Repeatable.
    #[arg(long = "page", value_enum)]
    pages: Vec<PageArg>,

    /// Simulate a layout change after the selections, syncing the two year charts.
    #[arg(long)]
    layout_change: bool,

    /// Print every chart and menu, not only the number displays.
    #[arg(long)]
    charts: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Year,
    Rating,
    NumRatings,
}

impl From<SortArg> for TableSortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Year => TableSortKey::Year,
            SortArg::Rating => TableSortKey::Rating,
            SortArg::NumRatings => TableSortKey::NumRatings,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PageArg {
    First,
    Prev,
    Next,
    Last,
}

impl From<PageArg> for PageDirection {
    fn from(arg: PageArg) -> Self {
        match arg {
            PageArg::First => PageDirection::First,
            PageArg::Prev => PageDirection::Prev,
            PageArg::Next => PageDirection::Next,
            PageArg::Last => PageDirection::Last,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    let dataset = Dataset::load_async(&cli.data)
        .await
        .with_context(|| format!("failed to load dataset {}", cli.data.display()))?;
    info!(games = dataset.len(), "dataset loaded");

    let mut dashboard = Dashboard::with_config(dataset, config).context("failed to build dashboard")?;

    for selection in &cli.selections {
        let (view, label) = selection
            .split_once('=')
            .ok_or_else(|| anyhow!("expected VIEW=KEY, got '{}'", selection))?;
        let key = dashboard.resolve_label(view, label)?;
        dashboard
            .toggle(view, key)
            .with_context(|| format!("failed to select '{}'", selection))?;
    }
    if cli.layout_change {
        dashboard.layout_changed()?;
    }
    for sort in &cli.sorts {
        dashboard.sort_by((*sort).into());
    }
    for page in &cli.pages {
        dashboard.page((*page).into());
    }

    let models = dashboard.render_all()?;
    for model in models.iter().filter(|m| m.kind == ViewKind::NumberDisplay) {
        print!("{}", render_view(model));
    }
    if cli.charts {
        for model in models.iter().filter(|m| m.kind != ViewKind::NumberDisplay) {
            println!();
            print!("{}", render_view(model));
        }
    }
    println!();
    print!("{}", render_table(&dashboard.table_page()));
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bggdash=info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

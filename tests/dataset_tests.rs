use bggdash::{DashError, Dashboard, DashboardConfig, Dataset, ThresholdComparison};
use bggdash::facade::views;
use std::io::Write;
use tempfile::NamedTempFile;

const EXPORT: &str = r#"[
    {
        "id": 174430,
        "name": "Gloomhaven",
        "yearpublished": "2017",
        "minplayers": 1,
        "maxplayers": "4",
        "minplaytime": 60,
        "maxplaytime": 120,
        "mechanics": ["Campaign / Battle Card Driven", "Hand Management"],
        "categories": ["Adventure", "Fantasy"],
        "designers": ["Isaac Childres"],
        "publishers": ["Cephalofair Games"],
        "stats": {
            "average": "8.6",
            "usersrated": 47000,
            "ranks": [
                {"friendlyname": "Board Game Rank"},
                {"friendlyname": "Strategy Game Rank"},
                {"friendlyname": "Thematic Rank"}
            ]
        }
    },
    {
        "id": 1,
        "name": "Die Macher",
        "yearpublished": 0,
        "minplayers": 3,
        "maxplayers": 5,
        "stats": {"average": 7.6, "usersrated": "5000"}
    }
]"#;

fn export_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(EXPORT.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_lenient_export() {
    let file = export_file();
    let dataset = Dataset::load(file.path()).unwrap();

    assert_eq!(dataset.len(), 2);
    let gloomhaven = &dataset[0];
    assert_eq!(gloomhaven.year_published, Some(2017));
    assert_eq!(gloomhaven.max_players, 4);
    assert_eq!(gloomhaven.stats.average, 8.6);
    assert_eq!(gloomhaven.stats.ranks.len(), 3);

    let die_macher = &dataset[1];
    assert_eq!(die_macher.year_published, None);
    assert_eq!(die_macher.stats.users_rated, 5000);
    assert!(die_macher.mechanics.is_empty());
    assert_eq!(dataset.max_year(), Some(2017));
}

#[tokio::test]
async fn test_load_async_matches_sync_load() {
    let file = export_file();
    let sync = Dataset::load(file.path()).unwrap();
    let asynchronous = Dataset::load_async(file.path()).await.unwrap();
    assert_eq!(sync.records(), asynchronous.records());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Dataset::load(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, DashError::IoError(_)));
}

#[test]
fn test_malformed_export_is_parse_error() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"[{\"name\": \"no id\"}]").unwrap();
    assert!(matches!(
        Dataset::load(file.path()),
        Err(DashError::ParseError(_))
    ));
}

#[test]
fn test_dashboard_over_loaded_export() {
    let file = export_file();
    let mut dashboard = bggdash::open(file.path(), DashboardConfig::default()).unwrap();

    let types = dashboard.render(views::TYPE).unwrap();
    let keys: Vec<String> = types.rows.iter().map(|r| r.key.to_string()).collect();
    assert_eq!(keys, vec!["Strategy Game", "Thematic"]);

    dashboard
        .select_labels(views::YEAR_BAR, &["not given"])
        .unwrap();
    let page = dashboard.table_page();
    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.rows[0].name, "Die Macher");
    assert_eq!(
        page.rows[0].anchor(),
        "<a href='https://boardgamegeek.com/boardgame/1/' target='_blank'>Die Macher</a>"
    );
}

#[test]
fn test_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        br#"{"page_size": 1, "threshold": "exclusive", "year_buckets": {"cutoff": 1980}}"#,
    )
    .unwrap();

    let config = DashboardConfig::load(file.path()).unwrap();
    assert_eq!(config.page_size, 1);
    assert_eq!(config.threshold, ThresholdComparison::Exclusive);
    assert_eq!(config.year_buckets.cutoff, 1980);
    assert_eq!(config.year_buckets.modern_from, 2000);
    assert_eq!(config.rows_cap, 10);

    let dashboard = Dashboard::with_config(Dataset::load(export_file().path()).unwrap(), config)
        .unwrap();
    assert_eq!(dashboard.table_page().rows.len(), 1);
    assert_eq!(dashboard.year_domain()[1].to_string(), "<1980");
}

#[test]
fn test_invalid_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(br#"{"ratings_ladder": [500, 100]}"#).unwrap();
    assert!(matches!(
        DashboardConfig::load(file.path()),
        Err(DashError::InvalidConfig(_))
    ));
}

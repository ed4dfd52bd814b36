use crate::core::{DashError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a game's rating count is compared against a minimum-ratings threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdComparison {
    /// `threshold <= users_rated`
    #[default]
    Inclusive,
    /// `threshold < users_rated`
    Exclusive,
}

impl ThresholdComparison {
    pub fn admits(&self, threshold: u64, users_rated: u64) -> bool {
        match self {
            Self::Inclusive => threshold <= users_rated,
            Self::Exclusive => threshold < users_rated,
        }
    }
}

/// Publication-year bucketing.
///
/// Years before `cutoff` share one bucket, years in `[cutoff, modern_from)`
/// are grouped by decade, later years stand alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YearBuckets {
    pub cutoff: i32,
    pub modern_from: i32,
}

impl Default for YearBuckets {
    fn default() -> Self {
        Self {
            cutoff: 1970,
            modern_from: 2000,
        }
    }
}

/// Dashboard configuration
///
/// Every value has a default matching the published dashboard, so a JSON
/// config file only needs the fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub year_buckets: YearBuckets,

    /// Player counts listed individually; anything above gets one "N+" key.
    pub max_listed_players: u32,

    pub playtime_candidates: Vec<u32>,

    pub ratings_ladder: Vec<u64>,

    pub threshold: ThresholdComparison,

    /// Rows per table page.
    pub page_size: usize,

    /// Rows shown by each row chart.
    pub rows_cap: usize,

    /// Slices shown by the pie chart.
    pub pie_cap: usize,

    /// Suffix stripped from rank names to obtain game types.
    pub type_suffix: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            year_buckets: YearBuckets::default(),
            max_listed_players: 6,
            playtime_candidates: vec![15, 30, 45, 60, 90, 120, 180],
            ratings_ladder: vec![100, 200, 500, 1000, 2000, 5000, 10000],
            threshold: ThresholdComparison::Inclusive,
            page_size: 15,
            rows_cap: 10,
            pie_cap: 10,
            type_suffix: " Rank".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn year_cutoff(mut self, cutoff: i32) -> Self {
        self.year_buckets.cutoff = cutoff;
        self
    }

    pub fn modern_from(mut self, year: i32) -> Self {
        self.year_buckets.modern_from = year;
        self
    }

    pub fn max_listed_players(mut self, players: u32) -> Self {
        self.max_listed_players = players;
        self
    }

    pub fn playtime_candidates(mut self, candidates: Vec<u32>) -> Self {
        self.playtime_candidates = candidates;
        self
    }

    pub fn ratings_ladder(mut self, ladder: Vec<u64>) -> Self {
        self.ratings_ladder = ladder;
        self
    }

    pub fn threshold(mut self, comparison: ThresholdComparison) -> Self {
        self.threshold = comparison;
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    pub fn rows_cap(mut self, cap: usize) -> Self {
        self.rows_cap = cap;
        self
    }

    pub fn pie_cap(mut self, cap: usize) -> Self {
        self.pie_cap = cap;
        self
    }

    /// Parse a JSON config; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(DashError::InvalidConfig("page_size must be at least 1".into()));
        }
        if self.max_listed_players == 0 {
            return Err(DashError::InvalidConfig(
                "max_listed_players must be at least 1".into(),
            ));
        }
        let YearBuckets { cutoff, modern_from } = self.year_buckets;
        if cutoff > modern_from {
            return Err(DashError::InvalidConfig(format!(
                "year cutoff {} is after modern_from {}",
                cutoff, modern_from
            )));
        }
        if !self.playtime_candidates.windows(2).all(|w| w[0] < w[1]) {
            return Err(DashError::InvalidConfig(
                "playtime_candidates must be strictly ascending".into(),
            ));
        }
        if !self.ratings_ladder.windows(2).all(|w| w[0] < w[1]) {
            return Err(DashError::InvalidConfig(
                "ratings_ladder must be strictly ascending".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.page_size, 15);
        assert_eq!(config.year_buckets.cutoff, 1970);
    }

    #[test]
    fn test_builder() {
        let config = DashboardConfig::new()
            .page_size(25)
            .year_cutoff(1900)
            .threshold(ThresholdComparison::Exclusive);
        assert_eq!(config.page_size, 25);
        assert_eq!(config.year_buckets.cutoff, 1900);
        assert_eq!(config.year_buckets.modern_from, 2000);
        assert_eq!(config.threshold, ThresholdComparison::Exclusive);
    }

    #[test]
    fn test_partial_json() {
        let config = DashboardConfig::from_json_str(
            r#"{"page_size": 25, "year_buckets": {"cutoff": 1900}, "threshold": "exclusive"}"#,
        )
        .unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.year_buckets.cutoff, 1900);
        assert_eq!(config.year_buckets.modern_from, 2000);
        assert_eq!(config.threshold, ThresholdComparison::Exclusive);
        assert_eq!(config.rows_cap, 10);
    }

    #[test]
    fn test_validation_errors() {
        assert!(DashboardConfig::new().page_size(0).validate().is_err());
        assert!(DashboardConfig::new().year_cutoff(2010).validate().is_err());
        assert!(
            DashboardConfig::new()
                .ratings_ladder(vec![200, 100])
                .validate()
                .is_err()
        );
        assert!(matches!(
            DashboardConfig::from_json_str(r#"{"page_size": 0}"#),
            Err(DashError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_threshold_semantics() {
        assert!(ThresholdComparison::Inclusive.admits(100, 100));
        assert!(!ThresholdComparison::Exclusive.admits(100, 100));
        assert!(ThresholdComparison::Exclusive.admits(100, 101));
    }
}

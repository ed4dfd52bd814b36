//! Key extractors for the board-game dimensions.
//!
//! Each function maps one record to the keys it contributes under a
//! dimension. They are plain functions so hosts can build their own
//! [`DimensionSpec`](super::DimensionSpec)s around them.

use crate::config::{ThresholdComparison, YearBuckets};
use crate::core::{GameRecord, Key};

/// Bucket label for games without a usable publication year.
pub const YEAR_NOT_GIVEN: &str = "not given";

/// Every player count in `1..=max_listed` the game supports, as text keys,
/// plus `"{max_listed+1}+"` when the game goes beyond it.
///
/// A 2-4 player game yields `"2"`, `"3"`, `"4"`.
pub fn player_counts(record: &GameRecord, max_listed: u32) -> Vec<Key> {
    let mut keys: Vec<Key> = (1..=max_listed)
        .filter(|n| record.min_players <= *n && *n <= record.max_players)
        .map(|n| Key::Text(n.to_string()))
        .collect();
    if record.max_players > max_listed {
        keys.push(Key::Text(overflow_players_label(max_listed)));
    }
    keys
}

pub fn overflow_players_label(max_listed: u32) -> String {
    format!("{}+", max_listed + 1)
}

/// Candidate play times inside `[min_playtime, max_playtime]`.
pub fn play_times(record: &GameRecord, candidates: &[u32]) -> Vec<Key> {
    candidates
        .iter()
        .filter(|t| record.min_playtime <= **t && **t <= record.max_playtime)
        .map(|t| Key::from(*t))
        .collect()
}

/// Every ladder threshold the game's rating count reaches.
pub fn min_ratings(record: &GameRecord, ladder: &[u64], comparison: ThresholdComparison) -> Vec<Key> {
    ladder
        .iter()
        .filter(|t| comparison.admits(**t, record.stats.users_rated))
        .map(|t| Key::Int(*t as i64))
        .collect()
}

/// Bucket label for a publication year.
pub fn year_bucket(year: Option<i32>, buckets: &YearBuckets) -> String {
    match year {
        None => YEAR_NOT_GIVEN.to_string(),
        Some(y) if y < buckets.cutoff => format!("<{}", buckets.cutoff),
        Some(y) if y < buckets.modern_from => format!("{}s", 10 * y.div_euclid(10)),
        Some(y) => y.to_string(),
    }
}

/// Ordinal domain of the year charts: "not given", the early bucket, each
/// decade, then every year from `modern_from` up to `max_year`.
pub fn year_domain(buckets: &YearBuckets, max_year: Option<i32>) -> Vec<Key> {
    let mut domain = vec![
        Key::from(YEAR_NOT_GIVEN),
        Key::Text(format!("<{}", buckets.cutoff)),
    ];
    let mut decade = 10 * buckets.cutoff.div_euclid(10);
    while decade < buckets.modern_from {
        domain.push(Key::Text(format!("{}s", decade)));
        decade += 10;
    }
    if let Some(max_year) = max_year {
        domain.extend((buckets.modern_from..=max_year).map(|y| Key::Text(y.to_string())));
    }
    domain
}

/// Game types from the rank list: entry 0 is the overall rank and is
/// skipped; later entries lose their `suffix` ("Strategy Game Rank" →
/// "Strategy Game"). Names without the suffix are kept whole.
pub fn game_types(record: &GameRecord, suffix: &str) -> Vec<Key> {
    record
        .stats
        .ranks
        .iter()
        .skip(1)
        .map(|rank| {
            let name = rank.friendly_name.as_str();
            Key::from(name.strip_suffix(suffix).unwrap_or(name))
        })
        .collect()
}

/// Integer band of the average rating, e.g. 7.42 → "7-8".
pub fn rating_band(average: f64) -> String {
    let lower = average.floor() as i64;
    format!("{}-{}", lower, lower + 1)
}

pub fn text_keys(items: &[String]) -> Vec<Key> {
    items.iter().map(|s| Key::from(s.as_str())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RankInfo;

    fn texts(keys: &[Key]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_player_counts() {
        let game = GameRecord::new(1, "x").players(2, 4);
        assert_eq!(texts(&player_counts(&game, 6)), ["2", "3", "4"]);

        let game = GameRecord::new(1, "x").players(2, 5);
        assert_eq!(texts(&player_counts(&game, 6)), ["2", "3", "4", "5"]);

        let party = GameRecord::new(1, "x").players(4, 12);
        assert_eq!(texts(&player_counts(&party, 6)), ["4", "5", "6", "7+"]);

        let solo = GameRecord::new(1, "x").players(1, 1);
        assert_eq!(texts(&player_counts(&solo, 6)), ["1"]);
    }

    #[test]
    fn test_play_times() {
        let candidates = [15, 30, 45, 60, 90, 120, 180];
        let game = GameRecord::new(1, "x").playtime(30, 90);
        assert_eq!(
            play_times(&game, &candidates),
            vec![Key::Int(30), Key::Int(45), Key::Int(60), Key::Int(90)]
        );

        let odd = GameRecord::new(1, "x").playtime(20, 25);
        assert!(play_times(&odd, &candidates).is_empty());
    }

    #[test]
    fn test_min_ratings_inclusive_and_exclusive() {
        let ladder = [100, 200, 500, 1000];
        let game = GameRecord::new(1, "x").rating(7.0, 500);
        assert_eq!(
            min_ratings(&game, &ladder, ThresholdComparison::Inclusive),
            vec![Key::Int(100), Key::Int(200), Key::Int(500)]
        );
        assert_eq!(
            min_ratings(&game, &ladder, ThresholdComparison::Exclusive),
            vec![Key::Int(100), Key::Int(200)]
        );
    }

    #[test]
    fn test_year_buckets() {
        let b = YearBuckets::default();
        assert_eq!(year_bucket(None, &b), "not given");
        assert_eq!(year_bucket(Some(1968), &b), "<1970");
        assert_eq!(year_bucket(Some(1970), &b), "1970s");
        assert_eq!(year_bucket(Some(1985), &b), "1980s");
        assert_eq!(year_bucket(Some(1999), &b), "1990s");
        assert_eq!(year_bucket(Some(2000), &b), "2000");
        assert_eq!(year_bucket(Some(2015), &b), "2015");
    }

    #[test]
    fn test_year_buckets_with_1900_cutoff() {
        let b = YearBuckets {
            cutoff: 1900,
            modern_from: 2000,
        };
        assert_eq!(year_bucket(Some(1890), &b), "<1900");
        assert_eq!(year_bucket(Some(1968), &b), "1960s");
        let domain = year_domain(&b, Some(2001));
        assert_eq!(domain.len(), 2 + 10 + 2);
        assert_eq!(domain[2], Key::from("1900s"));
    }

    #[test]
    fn test_year_domain() {
        let domain = year_domain(&YearBuckets::default(), Some(2003));
        assert_eq!(
            texts(&domain),
            ["not given", "<1970", "1970s", "1980s", "1990s", "2000", "2001", "2002", "2003"]
        );
        let no_modern = year_domain(&YearBuckets::default(), Some(1995));
        assert_eq!(no_modern.len(), 5);
    }

    #[test]
    fn test_game_types() {
        let game = GameRecord::new(1, "x").types(["Strategy Game", "Family Game"]);
        assert_eq!(texts(&game_types(&game, " Rank")), ["Strategy Game", "Family Game"]);

        let mut odd = GameRecord::new(2, "y");
        odd.stats.ranks = vec![
            RankInfo { friendly_name: "Board Game Rank".into() },
            RankInfo { friendly_name: "Unranked".into() },
        ];
        assert_eq!(texts(&game_types(&odd, " Rank")), ["Unranked"]);

        let unranked = GameRecord::new(3, "z");
        assert!(game_types(&unranked, " Rank").is_empty());
    }

    #[test]
    fn test_rating_band() {
        assert_eq!(rating_band(7.42), "7-8");
        assert_eq!(rating_band(8.0), "8-9");
        assert_eq!(rating_band(0.0), "0-1");
    }
}

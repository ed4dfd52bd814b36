use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Base URL of a game's BoardGameGeek page; the numeric id and a trailing
/// slash are appended.
pub const BGG_GAME_URL: &str = "https://boardgamegeek.com/boardgame/";

/// One board game as exported from BoardGameGeek. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    #[serde(deserialize_with = "lenient::u64_value")]
    pub id: u64,

    #[serde(default)]
    pub name: String,

    /// `None` when the export has no usable year (missing, null, `0`).
    #[serde(
        rename = "yearpublished",
        default,
        deserialize_with = "lenient::year"
    )]
    pub year_published: Option<i32>,

    #[serde(rename = "minplayers", default, deserialize_with = "lenient::u32_value")]
    pub min_players: u32,

    #[serde(rename = "maxplayers", default, deserialize_with = "lenient::u32_value")]
    pub max_players: u32,

    #[serde(rename = "minplaytime", default, deserialize_with = "lenient::u32_value")]
    pub min_playtime: u32,

    #[serde(rename = "maxplaytime", default, deserialize_with = "lenient::u32_value")]
    pub max_playtime: u32,

    #[serde(default)]
    pub mechanics: Vec<String>,

    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(default)]
    pub designers: Vec<String>,

    #[serde(default)]
    pub publishers: Vec<String>,

    #[serde(default)]
    pub stats: GameStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    #[serde(default, deserialize_with = "lenient::f64_value")]
    pub average: f64,

    #[serde(rename = "usersrated", default, deserialize_with = "lenient::u64_value")]
    pub users_rated: u64,

    /// Entry 0 is the overall board game rank, later entries are per-type ranks.
    #[serde(default)]
    pub ranks: Vec<RankInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankInfo {
    #[serde(rename = "friendlyname", default)]
    pub friendly_name: String,
}

impl GameRecord {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            year_published: None,
            min_players: 0,
            max_players: 0,
            min_playtime: 0,
            max_playtime: 0,
            mechanics: Vec::new(),
            categories: Vec::new(),
            designers: Vec::new(),
            publishers: Vec::new(),
            stats: GameStats::default(),
        }
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year_published = Some(year).filter(|y| *y != 0);
        self
    }

    pub fn players(mut self, min: u32, max: u32) -> Self {
        self.min_players = min;
        self.max_players = max;
        self
    }

    pub fn playtime(mut self, min: u32, max: u32) -> Self {
        self.min_playtime = min;
        self.max_playtime = max;
        self
    }

    pub fn rating(mut self, average: f64, users_rated: u64) -> Self {
        self.stats.average = average;
        self.stats.users_rated = users_rated;
        self
    }

    /// Set the per-type ranks. An overall "Board Game Rank" entry is placed
    /// first, and each type gets the usual `" Rank"` suffix.
    pub fn types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ranks = vec![RankInfo {
            friendly_name: "Board Game Rank".to_string(),
        }];
        ranks.extend(types.into_iter().map(|t| RankInfo {
            friendly_name: format!("{} Rank", t.as_ref()),
        }));
        self.stats.ranks = ranks;
        self
    }

    pub fn mechanics<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mechanics = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn categories<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn designers<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.designers = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn publishers<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.publishers = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn url(&self) -> String {
        format!("{}{}/", BGG_GAME_URL, self.id)
    }
}

/// Deserializers for the BGG export, which mixes JSON numbers, numeric
/// strings and nulls for the same field.
mod lenient {
    use super::*;
    use serde_json::Value as Json;

    fn number(value: &Json) -> Option<f64> {
        let n = match value {
            Json::Number(n) => n.as_f64(),
            Json::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        n.filter(|n| n.is_finite())
    }

    pub fn f64_value<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        let value = Json::deserialize(d)?;
        match value {
            Json::Null => Ok(0.0),
            other => number(&other)
                .ok_or_else(|| de::Error::custom(format!("expected a number, got {}", other))),
        }
    }

    pub fn u64_value<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        let n = f64_value(d)?;
        if n < 0.0 {
            return Err(de::Error::custom(format!("expected a non-negative number, got {}", n)));
        }
        Ok(n as u64)
    }

    pub fn u32_value<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        let n = u64_value(d)?;
        u32::try_from(n).map_err(|_| de::Error::custom(format!("{} is out of range", n)))
    }

    pub fn year<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
        let value = Json::deserialize(d)?;
        Ok(number(&value)
            .filter(|y| y.is_finite() && *y != 0.0)
            .map(|y| y as i32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_bgg_shape() {
        let json = r#"{
            "id": 174430,
            "name": "Gloomhaven",
            "yearpublished": 2017,
            "minplayers": 1,
            "maxplayers": 4,
            "minplaytime": 60,
            "maxplaytime": 120,
            "mechanics": ["Campaign / Battle Card Driven"],
            "categories": ["Adventure"],
            "designers": ["Isaac Childres"],
            "publishers": ["Cephalofair Games"],
            "stats": {
                "average": 8.85,
                "usersrated": 31254,
                "ranks": [
                    {"friendlyname": "Board Game Rank", "value": 1},
                    {"friendlyname": "Strategy Game Rank", "value": 1}
                ]
            }
        }"#;
        let record: GameRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 174430);
        assert_eq!(record.year_published, Some(2017));
        assert_eq!(record.max_players, 4);
        assert_eq!(record.stats.users_rated, 31254);
        assert_eq!(record.stats.ranks.len(), 2);
        assert_eq!(record.url(), "https://boardgamegeek.com/boardgame/174430/");
    }

    #[test]
    fn test_absent_year_variants() {
        for year in [r#""yearpublished": 0,"#, r#""yearpublished": null,"#, ""] {
            let json = format!(r#"{{"id": 1, "name": "x", {} "stats": {{}}}}"#, year);
            let record: GameRecord = serde_json::from_str(&json).unwrap();
            assert_eq!(record.year_published, None, "input: {}", json);
        }
    }

    #[test]
    fn test_numeric_strings() {
        let json = r#"{"id": "7", "name": "x", "yearpublished": "1995",
            "minplayers": "2", "maxplayers": "5",
            "stats": {"average": "6.5", "usersrated": "120"}}"#;
        let record: GameRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.year_published, Some(1995));
        assert_eq!(record.max_players, 5);
        assert_eq!(record.stats.average, 6.5);
        assert_eq!(record.stats.users_rated, 120);
    }

    #[test]
    fn test_rejects_garbage_number() {
        let json = r#"{"id": "abc", "name": "x"}"#;
        assert!(serde_json::from_str::<GameRecord>(json).is_err());
    }

    #[test]
    fn test_rejects_non_finite_strings() {
        for average in ["NaN", "inf", "-infinity"] {
            let json = format!(r#"{{"id": 1, "name": "x", "stats": {{"average": "{}"}}}}"#, average);
            assert!(serde_json::from_str::<GameRecord>(&json).is_err(), "input: {}", json);
        }
        let json = r#"{"id": 1, "name": "x", "yearpublished": "NaN"}"#;
        let record: GameRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.year_published, None);
    }

    #[test]
    fn test_types_builder_prepends_overall_rank() {
        let record = GameRecord::new(1, "x").types(["Strategy Game"]);
        assert_eq!(record.stats.ranks[0].friendly_name, "Board Game Rank");
        assert_eq!(record.stats.ranks[1].friendly_name, "Strategy Game Rank");
    }
}

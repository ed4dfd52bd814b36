use serde::{Deserialize, Serialize};
use std::fmt;

/// A derived dimension key.
///
/// Integer keys order numerically and always sort before text keys, so a
/// ladder like `100, 200, 1000` never comes out as `100, 1000, 200`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Int(i64),
    Text(String),
}

impl Key {
    /// Parse user input into a key: anything that reads as an integer becomes
    /// `Key::Int`, the rest stays text.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<i64>() {
            Ok(i) => Self::Int(i),
            Err(_) => Self::Text(trimmed.to_string()),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "INT",
            Self::Text(_) => "TEXT",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Int(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<u32> for Key {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

use crate::core::{GameRecord, Result};
use log::info;
use std::io::Read;
use std::ops::Index;
use std::path::Path;
use std::sync::Arc;

/// The immutable record collection for one dashboard session.
///
/// Cloning is cheap: all clones share the same record slice.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Arc<[GameRecord]>,
}

impl Dataset {
    pub fn new(records: Vec<GameRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Parse a JSON array of game records.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<GameRecord> = serde_json::from_str(json)?;
        Ok(Self::new(records))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let records: Vec<GameRecord> = serde_json::from_reader(reader)?;
        Ok(Self::new(records))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let records: Vec<GameRecord> = serde_json::from_slice(&bytes)?;
        info!("Loaded {} game records from {}", records.len(), path.display());
        Ok(Self::new(records))
    }

    pub async fn load_async(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let records: Vec<GameRecord> = serde_json::from_slice(&bytes)?;
        info!("Loaded {} game records from {}", records.len(), path.display());
        Ok(Self::new(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[GameRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&GameRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GameRecord> {
        self.records.iter()
    }

    /// Most recent publication year in the collection, if any record has one.
    pub fn max_year(&self) -> Option<i32> {
        self.records.iter().filter_map(|r| r.year_published).max()
    }
}

impl Index<usize> for Dataset {
    type Output = GameRecord;

    fn index(&self, index: usize) -> &GameRecord {
        &self.records[index]
    }
}

impl From<Vec<GameRecord>> for Dataset {
    fn from(records: Vec<GameRecord>) -> Self {
        Self::new(records)
    }
}

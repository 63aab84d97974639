//! JSON backup and restore of a whole record store.

use crate::error::{DataError, Result};
use crate::model::FinancialRecord;
use crate::store::RecordStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Snapshot of every record in a store, in ticker order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    /// When the snapshot was taken
    pub created_at: DateTime<Utc>,
    /// Crate version that wrote the snapshot
    pub version: String,
    /// Records in store order
    pub records: Vec<FinancialRecord>,
}

impl Backup {
    /// Snapshot a store.
    pub fn capture<S: RecordStore + ?Sized>(store: &S) -> Result<Self> {
        let mut records = Vec::new();
        for ticker in store.list_tickers()? {
            let record = store
                .get_record(&ticker)?
                .ok_or_else(|| DataError::UnknownTicker(ticker.clone()))?;
            records.push(record);
        }

        Ok(Self {
            created_at: Utc::now(),
            version: crate::VERSION.to_string(),
            records,
        })
    }

    /// Tickers contained in the snapshot.
    pub fn tickers(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.ticker.as_str()).collect()
    }

    /// Replace the contents of a store with this snapshot.
    ///
    /// Returns the number of restored records.
    pub fn restore_into<S: RecordStore + ?Sized>(&self, store: &mut S) -> Result<usize> {
        store.clear()?;
        for record in &self.records {
            store.put_record(&record.ticker, record)?;
        }

        info!(records = self.records.len(), "restored backup");
        Ok(self.records.len())
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the snapshot to a file.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read a snapshot from a file.
    pub fn read_from(path: &Path) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnnualStatement;
    use crate::store::{MemoryStore, SqliteStore};

    fn populated() -> MemoryStore {
        let mut store = MemoryStore::new();
        for ticker in ["TLKM", "BBCA"] {
            let record = FinancialRecord::new(ticker)
                .with_statement(2023, AnnualStatement::new(1.0, 2.0, 3.0, 4.0, 5.0));
            store.put_record(ticker, &record).unwrap();
        }
        store
    }

    #[test]
    fn test_capture_preserves_order() {
        let backup = Backup::capture(&populated()).unwrap();
        assert_eq!(backup.tickers(), vec!["TLKM", "BBCA"]);
        assert_eq!(backup.version, crate::VERSION);
    }

    #[test]
    fn test_restore_replaces_contents() {
        let backup = Backup::capture(&populated()).unwrap();

        let mut target = SqliteStore::in_memory().unwrap();
        target
            .put_record("ASII", &FinancialRecord::new("ASII"))
            .unwrap();

        let restored = backup.restore_into(&mut target).unwrap();
        assert_eq!(restored, 2);
        assert_eq!(target.list_tickers().unwrap(), vec!["TLKM", "BBCA"]);
        assert_eq!(
            target.get_record("BBCA").unwrap().unwrap().annual,
            backup.records[1].annual
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let backup = Backup::capture(&populated()).unwrap();
        let parsed = Backup::from_json(&backup.to_json().unwrap()).unwrap();
        assert_eq!(parsed, backup);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Backup::from_json("not json"),
            Err(DataError::Serialization(_))
        ));
    }
}

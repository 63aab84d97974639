//! In-memory record store.

use super::RecordStore;
use crate::error::Result;
use crate::model::FinancialRecord;
use std::collections::HashMap;

/// Record store backed by a map, useful for tests and one-shot runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    order: Vec<String>,
    records: HashMap<String, FinancialRecord>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn get_record(&self, ticker: &str) -> Result<Option<FinancialRecord>> {
        Ok(self.records.get(ticker).cloned())
    }

    fn put_record(&mut self, ticker: &str, record: &FinancialRecord) -> Result<()> {
        if self
            .records
            .insert(ticker.to_string(), record.clone())
            .is_none()
        {
            self.order.push(ticker.to_string());
        }
        Ok(())
    }

    fn list_tickers(&self) -> Result<Vec<String>> {
        Ok(self.order.clone())
    }

    fn delete_record(&mut self, ticker: &str) -> Result<bool> {
        let removed = self.records.remove(ticker).is_some();
        if removed {
            self.order.retain(|t| t != ticker);
        }
        Ok(removed)
    }

    fn contains(&self, ticker: &str) -> Result<bool> {
        Ok(self.records.contains_key(ticker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnnualStatement;

    #[test]
    fn test_put_get_delete() {
        let mut store = MemoryStore::new();
        let record = FinancialRecord::new("BBCA")
            .with_statement(2023, AnnualStatement::new(1.0, 2.0, 3.0, 4.0, 5.0));

        store.put_record("BBCA", &record).unwrap();
        assert_eq!(store.get_record("BBCA").unwrap(), Some(record));
        assert!(store.contains("BBCA").unwrap());

        assert!(store.delete_record("BBCA").unwrap());
        assert!(!store.delete_record("BBCA").unwrap());
        assert!(store.get_record("BBCA").unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut store = MemoryStore::new();
        for ticker in ["TLKM", "BBCA", "ASII"] {
            store
                .put_record(ticker, &FinancialRecord::new(ticker))
                .unwrap();
        }
        // Overwrite keeps original position
        store
            .put_record("TLKM", &FinancialRecord::new("TLKM"))
            .unwrap();

        assert_eq!(store.list_tickers().unwrap(), vec!["TLKM", "BBCA", "ASII"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_clear() {
        let mut store = MemoryStore::new();
        store.put_record("A", &FinancialRecord::new("A")).unwrap();
        store.put_record("B", &FinancialRecord::new("B")).unwrap();

        store.clear().unwrap();
        assert!(store.list_tickers().unwrap().is_empty());
    }
}

//! Record storage.
//!
//! The [`RecordStore`] trait is the only interface the rest of fairval uses
//! to read and persist [`FinancialRecord`]s. Records are stored whole and
//! keyed by normalized ticker; ticker listing preserves insertion order.

pub mod cached;
pub mod memory;
pub mod sqlite;

pub use cached::CachedStore;
pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, StoreStats};

use crate::error::Result;
use crate::model::FinancialRecord;

/// Storage backend for financial records.
pub trait RecordStore {
    /// Fetch the record of a ticker, `None` if it is not tracked.
    fn get_record(&self, ticker: &str) -> Result<Option<FinancialRecord>>;

    /// Insert or replace the record of a ticker.
    ///
    /// New tickers are appended to the end of [`list_tickers`](Self::list_tickers).
    fn put_record(&mut self, ticker: &str, record: &FinancialRecord) -> Result<()>;

    /// Tracked tickers in insertion order.
    fn list_tickers(&self) -> Result<Vec<String>>;

    /// Remove a ticker and its record. Returns `false` if it was not tracked.
    fn delete_record(&mut self, ticker: &str) -> Result<bool>;

    /// Whether a ticker is tracked.
    fn contains(&self, ticker: &str) -> Result<bool> {
        Ok(self.list_tickers()?.iter().any(|t| t == ticker))
    }

    /// Remove every record.
    fn clear(&mut self) -> Result<()> {
        for ticker in self.list_tickers()? {
            self.delete_record(&ticker)?;
        }
        Ok(())
    }
}

//! Read-through cache over another record store.
//!
//! The cache is owned by the wrapper, not a process-wide singleton, and every
//! write through the wrapper invalidates the affected ticker before it is
//! forwarded to the inner store.

use super::RecordStore;
use crate::error::Result;
use crate::model::FinancialRecord;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use tracing::trace;

/// Cache hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Reads answered from the cache
    pub hits: usize,
    /// Reads forwarded to the inner store
    pub misses: usize,
    /// Records currently cached
    pub entries: usize,
}

/// Record store wrapper that memoizes [`RecordStore::get_record`].
#[derive(Debug)]
pub struct CachedStore<S> {
    inner: S,
    cache: RefCell<HashMap<String, Option<FinancialRecord>>>,
    hits: Cell<usize>,
    misses: Cell<usize>,
}

impl<S: RecordStore> CachedStore<S> {
    /// Wrap a store.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// Drop the cached entry of a ticker.
    pub fn invalidate(&self, ticker: &str) {
        if self.cache.borrow_mut().remove(ticker).is_some() {
            trace!(ticker, "invalidated cached record");
        }
    }

    /// Drop every cached entry.
    pub fn invalidate_all(&self) {
        self.cache.borrow_mut().clear();
    }

    /// Cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.get(),
            misses: self.misses.get(),
            entries: self.cache.borrow().len(),
        }
    }

    /// Borrow the inner store.
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwrap the inner store, discarding the cache.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: RecordStore> RecordStore for CachedStore<S> {
    fn get_record(&self, ticker: &str) -> Result<Option<FinancialRecord>> {
        if let Some(cached) = self.cache.borrow().get(ticker) {
            self.hits.set(self.hits.get() + 1);
            return Ok(cached.clone());
        }

        self.misses.set(self.misses.get() + 1);
        let record = self.inner.get_record(ticker)?;
        self.cache
            .borrow_mut()
            .insert(ticker.to_string(), record.clone());
        Ok(record)
    }

    fn put_record(&mut self, ticker: &str, record: &FinancialRecord) -> Result<()> {
        self.invalidate(ticker);
        self.inner.put_record(ticker, record)
    }

    fn list_tickers(&self) -> Result<Vec<String>> {
        self.inner.list_tickers()
    }

    fn delete_record(&mut self, ticker: &str) -> Result<bool> {
        self.invalidate(ticker);
        self.inner.delete_record(ticker)
    }

    fn contains(&self, ticker: &str) -> Result<bool> {
        self.inner.contains(ticker)
    }

    fn clear(&mut self) -> Result<()> {
        self.invalidate_all();
        self.inner.clear()
    }
}

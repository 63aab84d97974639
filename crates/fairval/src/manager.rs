//! Write path for financial records.
//!
//! [`RecordManager`] is the only place that writes records. Each write merges
//! the incoming data into the stored snapshot, stamps `last_updated`,
//! recomputes the ratio cache from the merged snapshot and stores the result
//! once.

use crate::sample::sample_record;
use chrono::{NaiveDate, Utc};
use fairval_data::{
    AnnualSeries, AnnualStatement, CompanyInfo, DataError, FinancialRecord, FiscalYear,
    PriceObservation, PriceSeries, RatioResult, RecordStore, Result, csv_io,
    model::normalize_ticker,
};
use fairval_ratios::compute_ratios;
use fairval_valuation::{ValuationConfig, ValuationResult, compute_valuation_with_config};
use std::io::Read;
use tracing::{debug, info};

/// Fiscal years of the blank template given to a new ticker.
pub const TEMPLATE_YEARS: [FiscalYear; 3] = [2021, 2022, 2023];

/// Data to merge into a stored record.
///
/// Statements replace the stored statement of the same fiscal year and
/// prices replace the stored observation of the same date; everything else
/// is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordUpdate {
    /// Replacement company information
    pub info: Option<CompanyInfo>,
    /// Statements to insert or replace
    pub annual: AnnualSeries,
    /// Price observations to insert or replace
    pub prices: PriceSeries,
}

impl RecordUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace company information.
    pub fn with_info(mut self, info: CompanyInfo) -> Self {
        self.info = Some(info);
        self
    }

    /// Insert or replace a fiscal year.
    pub fn with_statement(mut self, year: FiscalYear, statement: AnnualStatement) -> Self {
        self.annual.insert(year, statement);
        self
    }

    /// Insert or replace a price observation.
    pub fn with_price(mut self, date: NaiveDate, observation: PriceObservation) -> Self {
        self.prices.insert(date, observation);
        self
    }

    /// Whether the update carries no data.
    pub fn is_empty(&self) -> bool {
        self.info.is_none() && self.annual.is_empty() && self.prices.is_empty()
    }

    fn merge_into(self, record: &mut FinancialRecord) {
        if let Some(info) = self.info {
            record.info = info;
        }
        record.annual.extend(self.annual);
        record.prices.extend(self.prices);
    }
}

/// Manages records in a [`RecordStore`].
#[derive(Debug)]
pub struct RecordManager<S> {
    store: S,
}

impl<S: RecordStore> RecordManager<S> {
    /// Create a manager over a store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consume the manager, returning the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Tracked tickers in insertion order.
    pub fn tickers(&self) -> Result<Vec<String>> {
        self.store.list_tickers()
    }

    /// Fetch a record, failing if the ticker is not tracked.
    pub fn get(&self, ticker: &str) -> Result<FinancialRecord> {
        let ticker = normalize_ticker(ticker)?;
        self.store
            .get_record(&ticker)?
            .ok_or(DataError::UnknownTicker(ticker))
    }

    /// Register a ticker with a blank three-year template.
    ///
    /// Returns `false` without writing if the ticker is already tracked.
    pub fn add_ticker(&mut self, ticker: &str, name: &str) -> Result<bool> {
        let ticker = normalize_ticker(ticker)?;
        if self.store.contains(&ticker)? {
            debug!(%ticker, "ticker already tracked");
            return Ok(false);
        }

        let info = CompanyInfo {
            name: name.to_string(),
            sector: String::new(),
            beta: Some(1.0),
            listing_date: Some(Utc::now().date_naive()),
        };
        let mut record = FinancialRecord::new(ticker.as_str()).with_info(info);
        for year in TEMPLATE_YEARS {
            record.annual.insert(year, AnnualStatement::default());
        }

        self.write(record)?;
        info!(%ticker, "added ticker");
        Ok(true)
    }

    /// Merge an update into a tracked record and store it.
    ///
    /// The ratio cache is computed once from the merged record. Returns the
    /// stored record.
    pub fn update_record(&mut self, ticker: &str, update: RecordUpdate) -> Result<FinancialRecord> {
        let mut record = self.get(ticker)?;
        update.merge_into(&mut record);
        let record = self.write(record)?;
        info!(ticker = %record.ticker, years = record.annual.len(), "updated record");
        Ok(record)
    }

    /// Remove a ticker. Returns `false` if it was not tracked.
    pub fn delete_ticker(&mut self, ticker: &str) -> Result<bool> {
        let ticker = normalize_ticker(ticker)?;
        let deleted = self.store.delete_record(&ticker)?;
        if deleted {
            info!(%ticker, "deleted ticker");
        }
        Ok(deleted)
    }

    /// Recompute and store the ratio cache of a ticker.
    pub fn refresh_ratios(&mut self, ticker: &str) -> Result<RatioResult> {
        let record = self.get(ticker)?;
        let record = self.write(record)?;
        Ok(record.ratios.unwrap_or_default())
    }

    /// Ratios of a ticker, from the cache when present.
    pub fn ratios(&self, ticker: &str) -> Result<RatioResult> {
        let record = self.get(ticker)?;
        Ok(record.ratios.clone().unwrap_or_else(|| compute_ratios(&record)))
    }

    /// Value a ticker.
    pub fn valuate(&self, ticker: &str, config: &ValuationConfig) -> Result<ValuationResult> {
        let record = self.get(ticker)?;
        Ok(compute_valuation_with_config(&record, config))
    }

    /// Merge annual statements from CSV into a tracked record.
    ///
    /// Returns the number of imported fiscal years.
    pub fn import_annual_csv<R: Read>(&mut self, ticker: &str, input: R) -> Result<usize> {
        let annual = csv_io::parse_annual_csv(input)?;
        let count = annual.len();
        self.update_record(
            ticker,
            RecordUpdate {
                annual,
                ..RecordUpdate::default()
            },
        )?;
        Ok(count)
    }

    /// Merge price observations from CSV into a tracked record.
    ///
    /// Returns the number of imported observations.
    pub fn import_prices_csv<R: Read>(&mut self, ticker: &str, input: R) -> Result<usize> {
        let prices = csv_io::parse_prices_csv(input)?;
        let count = prices.len();
        self.update_record(
            ticker,
            RecordUpdate {
                prices,
                ..RecordUpdate::default()
            },
        )?;
        Ok(count)
    }

    /// Store the bundled sample record, replacing any stored version.
    pub fn seed_sample_data(&mut self) -> Result<FinancialRecord> {
        let record = self.write(sample_record())?;
        info!(ticker = %record.ticker, "seeded sample data");
        Ok(record)
    }

    /// Stamp, compute ratios and store a record in one write.
    fn write(&mut self, mut record: FinancialRecord) -> Result<FinancialRecord> {
        record.ticker = normalize_ticker(&record.ticker)?;
        record.last_updated = Some(Utc::now());
        record.ratios = Some(compute_ratios(&record));

        self.store.put_record(&record.ticker, &record)?;
        debug!(ticker = %record.ticker, "stored record");
        Ok(record)
    }
}

//! Financial record model.
//!
//! A [`FinancialRecord`] holds everything tracked for one ticker: company
//! information, the annual statement series keyed by fiscal year, the price
//! series keyed by date and an optional cached [`RatioResult`].
//!
//! # Units
//!
//! Statement amounts are expressed in currency billions and share counts in
//! millions of shares. Dividing one by the other yields thousands of currency
//! units per share, so every per-share figure is scaled by
//! [`PER_SHARE_SCALE`]:
//!
//! ```
//! use fairval_data::{PER_SHARE_SCALE, per_share};
//!
//! // 40,000bn net profit over 123,456m shares
//! let eps = per_share(40_000.0, 123_456.0).unwrap();
//! assert!((eps - 40_000.0 * PER_SHARE_SCALE / 123_456.0).abs() < 1e-9);
//! ```

use crate::error::{DataError, Result};
use crate::ratio_table::RatioResult;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scale from (currency billions / millions of shares) to currency per share.
pub const PER_SHARE_SCALE: f64 = 1_000.0;

/// Fiscal year key of an annual statement.
pub type FiscalYear = i32;

/// Annual statements ordered by fiscal year.
pub type AnnualSeries = BTreeMap<FiscalYear, AnnualStatement>;

/// Price observations ordered by date.
pub type PriceSeries = BTreeMap<NaiveDate, PriceObservation>;

/// Convert a statement amount into a per-share figure.
///
/// Returns `None` when `shares` is not strictly positive or the result is
/// not finite.
pub fn per_share(amount: f64, shares: f64) -> Option<f64> {
    if shares > 0.0 {
        let value = amount * PER_SHARE_SCALE / shares;
        value.is_finite().then_some(value)
    } else {
        None
    }
}

/// One fiscal year of financial statement data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnualStatement {
    // Core fields
    /// Revenue
    #[serde(default)]
    pub revenue: f64,
    /// Net profit attributable to shareholders
    #[serde(default)]
    pub net_profit: f64,
    /// Total assets
    #[serde(default)]
    pub total_assets: f64,
    /// Shareholders equity (book value)
    #[serde(default)]
    pub equity: f64,
    /// Shares outstanding, in millions
    #[serde(default)]
    pub shares_outstanding: f64,

    // Income Statement
    /// Gross profit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gross_profit: Option<f64>,
    /// Operating income (EBIT)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_income: Option<f64>,
    /// Interest expense
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_expense: Option<f64>,

    // Balance Sheet
    /// Total liabilities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_liabilities: Option<f64>,
    /// Current assets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_assets: Option<f64>,
    /// Current liabilities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_liabilities: Option<f64>,
    /// Inventory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<f64>,
    /// Cash and equivalents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash: Option<f64>,

    /// Total dividends paid during the year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dividends: Option<f64>,
}

impl AnnualStatement {
    /// Create a statement from the five core fields.
    pub const fn new(
        revenue: f64,
        net_profit: f64,
        total_assets: f64,
        equity: f64,
        shares_outstanding: f64,
    ) -> Self {
        Self {
            revenue,
            net_profit,
            total_assets,
            equity,
            shares_outstanding,
            gross_profit: None,
            operating_income: None,
            interest_expense: None,
            total_liabilities: None,
            current_assets: None,
            current_liabilities: None,
            inventory: None,
            cash: None,
            dividends: None,
        }
    }

    /// Earnings per share in currency units.
    pub fn eps(&self) -> Option<f64> {
        per_share(self.net_profit, self.shares_outstanding)
    }

    /// Book value per share in currency units.
    pub fn bvps(&self) -> Option<f64> {
        per_share(self.equity, self.shares_outstanding)
    }

    /// Dividends per share in currency units.
    pub fn dividends_per_share(&self) -> Option<f64> {
        self.dividends
            .and_then(|dividends| per_share(dividends, self.shares_outstanding))
    }

    /// Whether every core field is zero (an unfilled template row).
    pub fn is_blank(&self) -> bool {
        self.revenue == 0.0
            && self.net_profit == 0.0
            && self.total_assets == 0.0
            && self.equity == 0.0
            && self.shares_outstanding == 0.0
    }
}

/// A single closing price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    /// Closing price in currency units per share
    pub close: f64,
    /// Traded volume
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
}

impl PriceObservation {
    /// Create a new price observation.
    pub const fn new(close: f64, volume: Option<u64>) -> Self {
        Self { close, volume }
    }
}

/// Descriptive company information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    /// Company name
    #[serde(default)]
    pub name: String,
    /// Sector label
    #[serde(default)]
    pub sector: String,
    /// Market beta
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,
    /// Listing date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_date: Option<NaiveDate>,
}

/// Everything tracked for one ticker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    /// Ticker symbol
    pub ticker: String,
    /// Company information
    #[serde(default)]
    pub info: CompanyInfo,
    /// Annual statements by fiscal year
    #[serde(default)]
    pub annual: AnnualSeries,
    /// Price observations by date
    #[serde(default)]
    pub prices: PriceSeries,
    /// Cached ratio computation derived from `annual` and `prices`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratios: Option<RatioResult>,
    /// When the record was last written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl FinancialRecord {
    /// Create an empty record for a ticker.
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            ..Self::default()
        }
    }

    /// Set company information.
    pub fn with_info(mut self, info: CompanyInfo) -> Self {
        self.info = info;
        self
    }

    /// Insert an annual statement.
    pub fn with_statement(mut self, year: FiscalYear, statement: AnnualStatement) -> Self {
        self.annual.insert(year, statement);
        self
    }

    /// Insert a price observation.
    pub fn with_price(mut self, date: NaiveDate, observation: PriceObservation) -> Self {
        self.prices.insert(date, observation);
        self
    }

    /// The most recent price observation.
    ///
    /// Prices are keyed by date in a `BTreeMap`, so the last entry is the
    /// maximum date regardless of insertion order.
    pub fn latest_price_observation(&self) -> Option<(NaiveDate, &PriceObservation)> {
        self.prices.last_key_value().map(|(date, obs)| (*date, obs))
    }

    /// Closing price of the most recent observation.
    pub fn latest_price(&self) -> Option<f64> {
        self.latest_price_observation().map(|(_, obs)| obs.close)
    }

    /// The statement for the most recent fiscal year.
    pub fn latest_statement(&self) -> Option<(FiscalYear, &AnnualStatement)> {
        self.annual.last_key_value().map(|(year, stmt)| (*year, stmt))
    }

    /// Whether any price data is present.
    pub fn has_prices(&self) -> bool {
        !self.prices.is_empty()
    }

    /// Fiscal years in ascending order.
    pub fn years(&self) -> impl Iterator<Item = FiscalYear> + '_ {
        self.annual.keys().copied()
    }
}

/// Normalize a ticker symbol to upper case.
///
/// Tickers must be non-empty and consist of ASCII letters, digits, `.` or
/// `-`.
pub fn normalize_ticker(ticker: &str) -> Result<String> {
    let ticker = ticker.trim();
    let valid = !ticker.is_empty()
        && ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');

    if valid {
        Ok(ticker.to_ascii_uppercase())
    } else {
        Err(DataError::InvalidTicker(ticker.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_eps_and_bvps_share_scale() {
        let stmt = AnnualStatement::new(150_000.0, 40_000.0, 1_200_000.0, 250_000.0, 123_456.0);

        let eps = stmt.eps().unwrap();
        let bvps = stmt.bvps().unwrap();

        assert_relative_eq!(eps, 40_000.0 * 1_000.0 / 123_456.0);
        assert_relative_eq!(bvps, 250_000.0 * 1_000.0 / 123_456.0);
        // Same divisor: the ratio is the ratio of the raw amounts
        assert_relative_eq!(eps / bvps, 40_000.0 / 250_000.0, epsilon = 1e-12);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-5.0)]
    fn test_per_share_requires_positive_shares(#[case] shares: f64) {
        assert_eq!(per_share(100.0, shares), None);

        let stmt = AnnualStatement::new(1.0, 1.0, 1.0, 1.0, shares);
        assert!(stmt.eps().is_none());
        assert!(stmt.bvps().is_none());
    }

    #[test]
    fn test_latest_price_picks_max_date() {
        let record = FinancialRecord::new("BBCA")
            .with_price(date(2023, 12, 29), PriceObservation::new(9550.0, None))
            .with_price(date(2023, 12, 28), PriceObservation::new(9500.0, None))
            .with_price(date(2023, 6, 1), PriceObservation::new(8800.0, Some(10)));

        let (when, obs) = record.latest_price_observation().unwrap();
        assert_eq!(when, date(2023, 12, 29));
        assert_eq!(obs.close, 9550.0);
        assert_eq!(record.latest_price(), Some(9550.0));
    }

    #[test]
    fn test_latest_statement() {
        let record = FinancialRecord::new("BBCA")
            .with_statement(2023, AnnualStatement::new(3.0, 3.0, 3.0, 3.0, 3.0))
            .with_statement(2021, AnnualStatement::new(1.0, 1.0, 1.0, 1.0, 1.0));

        let (year, stmt) = record.latest_statement().unwrap();
        assert_eq!(year, 2023);
        assert_eq!(stmt.revenue, 3.0);
        assert_eq!(record.years().collect::<Vec<_>>(), vec![2021, 2023]);
    }

    #[test]
    fn test_record_json_roundtrip_keys() {
        let record = FinancialRecord::new("BBCA")
            .with_statement(2023, AnnualStatement::new(1.0, 2.0, 3.0, 4.0, 5.0))
            .with_price(date(2023, 12, 29), PriceObservation::new(9550.0, Some(250)));

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"2023\""));
        assert!(json.contains("\"2023-12-29\""));

        let parsed: FinancialRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let stmt: AnnualStatement = serde_json::from_str(r#"{"revenue": 10.0}"#).unwrap();
        assert_eq!(stmt.revenue, 10.0);
        assert_eq!(stmt.shares_outstanding, 0.0);
        assert!(stmt.gross_profit.is_none());
    }

    #[rstest]
    #[case("bbca", "BBCA")]
    #[case("  tlkm ", "TLKM")]
    #[case("brk.b", "BRK.B")]
    fn test_normalize_ticker(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_ticker(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("AB CD")]
    #[case("X/Y")]
    fn test_normalize_ticker_rejects(#[case] input: &str) {
        assert!(normalize_ticker(input).is_err());
    }
}

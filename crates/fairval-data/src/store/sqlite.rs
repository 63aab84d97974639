//! SQLite record store.

use super::RecordStore;
use crate::error::Result;
use crate::model::{AnnualStatement, CompanyInfo, FinancialRecord, PriceObservation};
use crate::ratio_table::RatioResult;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use tracing::{debug, info};

/// SQLite-backed record store.
///
/// Statements and prices are kept in typed tables; the derived ratio cache
/// is stored as JSON next to them.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

/// Store statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of tracked tickers
    pub tickers: usize,
    /// Number of annual statements
    pub annual_statements: usize,
    /// Number of price observations
    pub price_observations: usize,
    /// Number of records with a cached ratio result
    pub cached_ratios: usize,
}

fn parse_date(idx: usize, value: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn statement_from_row(row: &Row<'_>) -> rusqlite::Result<(i32, AnnualStatement)> {
    Ok((
        row.get(0)?,
        AnnualStatement {
            revenue: row.get(1)?,
            net_profit: row.get(2)?,
            total_assets: row.get(3)?,
            equity: row.get(4)?,
            shares_outstanding: row.get(5)?,
            gross_profit: row.get(6)?,
            operating_income: row.get(7)?,
            interest_expense: row.get(8)?,
            total_liabilities: row.get(9)?,
            current_assets: row.get(10)?,
            current_liabilities: row.get(11)?,
            inventory: row.get(12)?,
            cash: row.get(13)?,
            dividends: row.get(14)?,
        },
    ))
}

impl SqliteStore {
    /// Open (or create) a store at the given path.
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "opened record store");
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema.
    fn initialize_schema(&self) -> Result<()> {
        // Tracked companies, ordered by insertion position
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS companies (
                ticker TEXT PRIMARY KEY,
                name TEXT NOT NULL DEFAULT '',
                sector TEXT NOT NULL DEFAULT '',
                beta REAL,
                listing_date TEXT,
                position INTEGER NOT NULL,
                last_updated TEXT
            )",
            [],
        )?;

        // Annual statements
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS annual_statements (
                ticker TEXT NOT NULL,
                fiscal_year INTEGER NOT NULL,

                revenue REAL NOT NULL,
                net_profit REAL NOT NULL,
                total_assets REAL NOT NULL,
                equity REAL NOT NULL,
                shares_outstanding REAL NOT NULL,

                gross_profit REAL,
                operating_income REAL,
                interest_expense REAL,
                total_liabilities REAL,
                current_assets REAL,
                current_liabilities REAL,
                inventory REAL,
                cash REAL,
                dividends REAL,

                PRIMARY KEY (ticker, fiscal_year)
            )",
            [],
        )?;

        // Price observations
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS prices (
                ticker TEXT NOT NULL,
                date TEXT NOT NULL,
                close REAL NOT NULL,
                volume INTEGER,
                PRIMARY KEY (ticker, date)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_prices_ticker_date ON prices(ticker, date)",
            [],
        )?;

        // Derived ratio cache
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS ratio_cache (
                ticker TEXT PRIMARY KEY,
                data TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Get store statistics.
    pub fn stats(&self) -> Result<StoreStats> {
        let count = |sql: &str| -> Result<usize> {
            let n: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
            Ok(usize::try_from(n).unwrap_or_default())
        };

        Ok(StoreStats {
            tickers: count("SELECT COUNT(*) FROM companies")?,
            annual_statements: count("SELECT COUNT(*) FROM annual_statements")?,
            price_observations: count("SELECT COUNT(*) FROM prices")?,
            cached_ratios: count("SELECT COUNT(*) FROM ratio_cache")?,
        })
    }

    fn read_company(&self, ticker: &str) -> Result<Option<(CompanyInfo, Option<DateTime<Utc>>)>> {
        let result = self
            .conn
            .query_row(
                "SELECT name, sector, beta, listing_date, last_updated
                 FROM companies WHERE ticker = ?1",
                params![ticker],
                |row| {
                    let listing_date = row
                        .get::<_, Option<String>>(3)?
                        .map(|s| parse_date(3, &s))
                        .transpose()?;
                    let last_updated = row
                        .get::<_, Option<String>>(4)?
                        .map(|s| parse_timestamp(4, &s))
                        .transpose()?;

                    Ok((
                        CompanyInfo {
                            name: row.get(0)?,
                            sector: row.get(1)?,
                            beta: row.get(2)?,
                            listing_date,
                        },
                        last_updated,
                    ))
                },
            )
            .optional()?;

        Ok(result)
    }
}

impl RecordStore for SqliteStore {
    fn get_record(&self, ticker: &str) -> Result<Option<FinancialRecord>> {
        let Some((info, last_updated)) = self.read_company(ticker)? else {
            return Ok(None);
        };

        let mut record = FinancialRecord::new(ticker).with_info(info);
        record.last_updated = last_updated;

        let mut stmt = self.conn.prepare(
            "SELECT fiscal_year, revenue, net_profit, total_assets, equity, shares_outstanding,
                    gross_profit, operating_income, interest_expense, total_liabilities,
                    current_assets, current_liabilities, inventory, cash, dividends
             FROM annual_statements
             WHERE ticker = ?1
             ORDER BY fiscal_year ASC",
        )?;
        for row in stmt.query_map(params![ticker], statement_from_row)? {
            let (year, statement) = row?;
            record.annual.insert(year, statement);
        }

        let mut stmt = self.conn.prepare(
            "SELECT date, close, volume FROM prices
             WHERE ticker = ?1
             ORDER BY date ASC",
        )?;
        let rows = stmt.query_map(params![ticker], |row| {
            let date = parse_date(0, &row.get::<_, String>(0)?)?;
            let volume = row
                .get::<_, Option<i64>>(2)?
                .and_then(|v| u64::try_from(v).ok());
            Ok((date, PriceObservation::new(row.get(1)?, volume)))
        })?;
        for row in rows {
            let (date, observation) = row?;
            record.prices.insert(date, observation);
        }

        let cached: Option<String> = self
            .conn
            .query_row(
                "SELECT data FROM ratio_cache WHERE ticker = ?1",
                params![ticker],
                |row| row.get(0),
            )
            .optional()?;
        record.ratios = cached
            .map(|data| serde_json::from_str::<RatioResult>(&data))
            .transpose()?;

        Ok(Some(record))
    }

    fn put_record(&mut self, ticker: &str, record: &FinancialRecord) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO companies (ticker, name, sector, beta, listing_date, last_updated, position)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6,
                     (SELECT COALESCE(MAX(position), 0) + 1 FROM companies))
             ON CONFLICT(ticker) DO UPDATE SET
                name = excluded.name,
                sector = excluded.sector,
                beta = excluded.beta,
                listing_date = excluded.listing_date,
                last_updated = excluded.last_updated",
            params![
                ticker,
                record.info.name,
                record.info.sector,
                record.info.beta,
                record.info.listing_date.map(|d| d.to_string()),
                record.last_updated.map(|t| t.to_rfc3339()),
            ],
        )?;

        tx.execute(
            "DELETE FROM annual_statements WHERE ticker = ?1",
            params![ticker],
        )?;
        for (year, s) in &record.annual {
            tx.execute(
                "INSERT INTO annual_statements (
                    ticker, fiscal_year, revenue, net_profit, total_assets, equity,
                    shares_outstanding, gross_profit, operating_income, interest_expense,
                    total_liabilities, current_assets, current_liabilities, inventory, cash,
                    dividends
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
                params![
                    ticker,
                    year,
                    s.revenue,
                    s.net_profit,
                    s.total_assets,
                    s.equity,
                    s.shares_outstanding,
                    s.gross_profit,
                    s.operating_income,
                    s.interest_expense,
                    s.total_liabilities,
                    s.current_assets,
                    s.current_liabilities,
                    s.inventory,
                    s.cash,
                    s.dividends,
                ],
            )?;
        }

        tx.execute("DELETE FROM prices WHERE ticker = ?1", params![ticker])?;
        for (date, obs) in &record.prices {
            tx.execute(
                "INSERT INTO prices (ticker, date, close, volume) VALUES (?1, ?2, ?3, ?4)",
                params![
                    ticker,
                    date.to_string(),
                    obs.close,
                    obs.volume.and_then(|v| i64::try_from(v).ok()),
                ],
            )?;
        }

        match &record.ratios {
            Some(ratios) => {
                tx.execute(
                    "INSERT OR REPLACE INTO ratio_cache (ticker, data) VALUES (?1, ?2)",
                    params![ticker, serde_json::to_string(ratios)?],
                )?;
            }
            None => {
                tx.execute("DELETE FROM ratio_cache WHERE ticker = ?1", params![ticker])?;
            }
        }

        tx.commit()?;

        info!(
            ticker,
            years = record.annual.len(),
            prices = record.prices.len(),
            "stored record"
        );
        Ok(())
    }

    fn list_tickers(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT ticker FROM companies ORDER BY position ASC")?;

        let tickers = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        Ok(tickers)
    }

    fn delete_record(&mut self, ticker: &str) -> Result<bool> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM companies WHERE ticker = ?1", params![ticker])?;
        tx.execute(
            "DELETE FROM annual_statements WHERE ticker = ?1",
            params![ticker],
        )?;
        tx.execute("DELETE FROM prices WHERE ticker = ?1", params![ticker])?;
        tx.execute("DELETE FROM ratio_cache WHERE ticker = ?1", params![ticker])?;
        tx.commit()?;

        if removed > 0 {
            info!(ticker, "deleted record");
        }
        Ok(removed > 0)
    }

    fn contains(&self, ticker: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM companies WHERE ticker = ?1",
            params![ticker],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratio_table::{RatioKind, RatioSeries};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_record() -> FinancialRecord {
        let mut full = AnnualStatement::new(150_000.0, 40_000.0, 1_200_000.0, 250_000.0, 123_456.0);
        full.total_liabilities = Some(950_000.0);
        full.cash = Some(80_000.0);

        FinancialRecord::new("BBCA")
            .with_info(CompanyInfo {
                name: "Bank Central Asia".to_string(),
                sector: "Banking".to_string(),
                beta: Some(1.1),
                listing_date: Some(date(2000, 5, 30)),
            })
            .with_statement(
                2022,
                AnnualStatement::new(135_000.0, 36_000.0, 1_100_000.0, 230_000.0, 123_456.0),
            )
            .with_statement(2023, full)
            .with_price(date(2023, 12, 28), PriceObservation::new(9500.0, Some(230_000_000)))
            .with_price(date(2023, 12, 29), PriceObservation::new(9550.0, None))
    }

    #[test]
    fn test_store_initialization() {
        let store = SqliteStore::in_memory();
        assert!(store.is_ok());
    }

    #[test]
    fn test_record_roundtrip() {
        let mut store = SqliteStore::in_memory().unwrap();
        let mut record = sample_record();
        record.last_updated = Some(Utc::now());

        store.put_record("BBCA", &record).unwrap();
        let loaded = store.get_record("BBCA").unwrap().unwrap();

        assert_eq!(loaded.info, record.info);
        assert_eq!(loaded.annual, record.annual);
        assert_eq!(loaded.prices, record.prices);
        assert!(loaded.ratios.is_none());
        assert_eq!(
            loaded.last_updated.map(|t| t.timestamp()),
            record.last_updated.map(|t| t.timestamp())
        );
    }

    #[test]
    fn test_missing_record() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.get_record("NOPE").unwrap().is_none());
        assert!(!store.contains("NOPE").unwrap());
    }

    #[test]
    fn test_ratio_cache_persisted_and_cleared() {
        let mut store = SqliteStore::in_memory().unwrap();
        let mut record = sample_record();

        let mut ratios = RatioResult::new();
        ratios.insert(
            RatioKind::Roe,
            RatioSeries::from_values([(2022, Some(15.7)), (2023, Some(16.0))]),
        );
        record.ratios = Some(ratios.clone());
        store.put_record("BBCA", &record).unwrap();

        let loaded = store.get_record("BBCA").unwrap().unwrap();
        assert_eq!(loaded.ratios, Some(ratios));

        record.ratios = None;
        store.put_record("BBCA", &record).unwrap();
        assert_eq!(store.stats().unwrap().cached_ratios, 0);
    }

    #[test]
    fn test_put_replaces_series() {
        let mut store = SqliteStore::in_memory().unwrap();
        let mut record = sample_record();
        store.put_record("BBCA", &record).unwrap();

        record.annual.remove(&2022);
        record.prices.clear();
        store.put_record("BBCA", &record).unwrap();

        let loaded = store.get_record("BBCA").unwrap().unwrap();
        assert_eq!(loaded.annual.len(), 1);
        assert!(loaded.prices.is_empty());
    }

    #[test]
    fn test_ticker_order_and_delete() {
        let mut store = SqliteStore::in_memory().unwrap();
        for ticker in ["TLKM", "BBCA", "ASII"] {
            store
                .put_record(ticker, &FinancialRecord::new(ticker))
                .unwrap();
        }
        store
            .put_record("TLKM", &FinancialRecord::new("TLKM"))
            .unwrap();

        assert_eq!(store.list_tickers().unwrap(), vec!["TLKM", "BBCA", "ASII"]);

        assert!(store.delete_record("BBCA").unwrap());
        assert!(!store.delete_record("BBCA").unwrap());
        assert_eq!(store.list_tickers().unwrap(), vec!["TLKM", "ASII"]);

        store
            .put_record("BBCA", &FinancialRecord::new("BBCA"))
            .unwrap();
        assert_eq!(store.list_tickers().unwrap(), vec!["TLKM", "ASII", "BBCA"]);
    }

    #[test]
    fn test_stats() {
        let mut store = SqliteStore::in_memory().unwrap();
        let stats = store.stats().unwrap();
        assert_eq!(stats.tickers, 0);
        assert_eq!(stats.annual_statements, 0);

        store.put_record("BBCA", &sample_record()).unwrap();
        let stats = store.stats().unwrap();
        assert_eq!(stats.tickers, 1);
        assert_eq!(stats.annual_statements, 2);
        assert_eq!(stats.price_observations, 2);
        assert_eq!(stats.cached_ratios, 0);
    }
}

//! CSV import and export of annual and price series.
//!
//! Annual files use the header `Year,Revenue,Net Profit,Total Assets,Equity,Shares`
//! and price files use `Date,Close,Volume`. Empty numeric cells read as zero
//! (annual) or as no volume (prices).

use crate::error::{DataError, Result};
use crate::model::{AnnualSeries, FinancialRecord, FiscalYear, PriceObservation, PriceSeries};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use tracing::debug;

/// One row of an annual CSV file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct AnnualRow {
    #[serde(rename = "Year")]
    year: FiscalYear,
    #[serde(rename = "Revenue", default)]
    revenue: Option<f64>,
    #[serde(rename = "Net Profit", default)]
    net_profit: Option<f64>,
    #[serde(rename = "Total Assets", default)]
    total_assets: Option<f64>,
    #[serde(rename = "Equity", default)]
    equity: Option<f64>,
    #[serde(rename = "Shares", default)]
    shares: Option<f64>,
}

/// One row of a price CSV file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PriceRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Volume", default)]
    volume: Option<u64>,
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input)
}

fn into_string(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| DataError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| DataError::Parse(e.to_string()))
}

/// Write the core annual fields as CSV, ascending by year.
pub fn write_annual_csv<W: Write>(output: W, annual: &AnnualSeries) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(output);
    if annual.is_empty() {
        wtr.write_record(["Year", "Revenue", "Net Profit", "Total Assets", "Equity", "Shares"])?;
    }
    for (year, s) in annual {
        wtr.serialize(AnnualRow {
            year: *year,
            revenue: Some(s.revenue),
            net_profit: Some(s.net_profit),
            total_assets: Some(s.total_assets),
            equity: Some(s.equity),
            shares: Some(s.shares_outstanding),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Export a record's annual series as a CSV string.
pub fn export_annual_csv(record: &FinancialRecord) -> Result<String> {
    let mut buf = Vec::new();
    write_annual_csv(&mut buf, &record.annual)?;
    String::from_utf8(buf).map_err(|e| DataError::Parse(e.to_string()))
}

/// Parse an annual CSV file.
pub fn parse_annual_csv<R: Read>(input: R) -> Result<AnnualSeries> {
    let mut annual = AnnualSeries::new();
    for row in reader(input).deserialize::<AnnualRow>() {
        let row = row?;
        let statement = annual.entry(row.year).or_default();
        statement.revenue = row.revenue.unwrap_or_default();
        statement.net_profit = row.net_profit.unwrap_or_default();
        statement.total_assets = row.total_assets.unwrap_or_default();
        statement.equity = row.equity.unwrap_or_default();
        statement.shares_outstanding = row.shares.unwrap_or_default();
    }
    Ok(annual)
}

/// Merge an annual CSV file into a record.
///
/// Core fields of every imported year are overwritten; optional fields
/// already present for that year are kept. Returns the number of years read.
pub fn import_annual_csv<R: Read>(record: &mut FinancialRecord, input: R) -> Result<usize> {
    let imported = parse_annual_csv(input)?;
    let count = imported.len();

    for (year, incoming) in imported {
        let statement = record.annual.entry(year).or_default();
        statement.revenue = incoming.revenue;
        statement.net_profit = incoming.net_profit;
        statement.total_assets = incoming.total_assets;
        statement.equity = incoming.equity;
        statement.shares_outstanding = incoming.shares_outstanding;
    }

    debug!(ticker = %record.ticker, years = count, "imported annual csv");
    Ok(count)
}

/// Export a price series as a CSV string, ascending by date.
pub fn export_prices_csv(prices: &PriceSeries) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    if prices.is_empty() {
        wtr.write_record(["Date", "Close", "Volume"])?;
    }
    for (date, obs) in prices {
        wtr.serialize(PriceRow {
            date: *date,
            close: obs.close,
            volume: obs.volume,
        })?;
    }
    into_string(wtr)
}

/// Parse a price CSV file.
pub fn parse_prices_csv<R: Read>(input: R) -> Result<PriceSeries> {
    let mut prices = PriceSeries::new();
    for row in reader(input).deserialize::<PriceRow>() {
        let row = row?;
        prices.insert(row.date, PriceObservation::new(row.close, row.volume));
    }
    Ok(prices)
}

/// Merge a price CSV file into a record. Returns the number of rows read.
pub fn import_prices_csv<R: Read>(record: &mut FinancialRecord, input: R) -> Result<usize> {
    let imported = parse_prices_csv(input)?;
    let count = imported.len();
    record.prices.extend(imported);

    debug!(ticker = %record.ticker, rows = count, "imported price csv");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnnualStatement;

    fn record() -> FinancialRecord {
        FinancialRecord::new("BBCA")
            .with_statement(
                2022,
                AnnualStatement::new(135_000.0, 36_000.0, 1_100_000.0, 230_000.0, 123_456.0),
            )
            .with_statement(
                2021,
                AnnualStatement::new(120_000.0, 31_000.0, 1_000_000.0, 200_000.0, 123_000.0),
            )
    }

    #[test]
    fn test_export_annual_ascending() {
        let csv = export_annual_csv(&record()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Year,Revenue,Net Profit,Total Assets,Equity,Shares");
        assert!(lines[1].starts_with("2021,120000"));
        assert!(lines[2].starts_with("2022,135000"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_export_empty_has_header() {
        let csv = export_annual_csv(&FinancialRecord::new("X")).unwrap();
        assert_eq!(
            csv.trim_end(),
            "Year,Revenue,Net Profit,Total Assets,Equity,Shares"
        );
    }

    #[test]
    fn test_annual_roundtrip() {
        let original = record();
        let csv = export_annual_csv(&original).unwrap();

        let parsed = parse_annual_csv(csv.as_bytes()).unwrap();
        assert_eq!(parsed, original.annual);
    }

    #[test]
    fn test_import_lenient_cells_and_merge() {
        let mut target = FinancialRecord::new("BBCA");
        let mut existing = AnnualStatement::new(1.0, 1.0, 1.0, 1.0, 1.0);
        existing.cash = Some(42.0);
        target.annual.insert(2023, existing);

        let input = "Year,Revenue,Net Profit,Total Assets,Equity,Shares\n\
                     2023, 150000 ,40000,1200000,250000,123456\n\
                     2020,110000,,950000,180000,122500\n";
        let count = import_annual_csv(&mut target, input.as_bytes()).unwrap();

        assert_eq!(count, 2);
        let y2023 = &target.annual[&2023];
        assert_eq!(y2023.revenue, 150_000.0);
        assert_eq!(y2023.cash, Some(42.0));
        assert_eq!(target.annual[&2020].net_profit, 0.0);
    }

    #[test]
    fn test_import_rejects_garbage() {
        let mut target = FinancialRecord::new("BBCA");
        let input = "Year,Revenue,Net Profit,Total Assets,Equity,Shares\nabc,1,2,3,4,5\n";
        assert!(import_annual_csv(&mut target, input.as_bytes()).is_err());
    }

    #[test]
    fn test_prices_roundtrip() {
        let input = "Date,Close,Volume\n2023-12-29,9550,250000000\n2023-12-28,9500,\n";
        let prices = parse_prices_csv(input.as_bytes()).unwrap();

        assert_eq!(prices.len(), 2);
        let (latest, obs) = prices.last_key_value().unwrap();
        assert_eq!(*latest, NaiveDate::from_ymd_opt(2023, 12, 29).unwrap());
        assert_eq!(obs.volume, Some(250_000_000));

        let csv = export_prices_csv(&prices).unwrap();
        assert_eq!(parse_prices_csv(csv.as_bytes()).unwrap(), prices);
    }
}

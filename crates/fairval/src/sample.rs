//! Bundled sample data.

use chrono::NaiveDate;
use fairval_data::{AnnualStatement, CompanyInfo, FinancialRecord, PriceObservation};

/// Ticker of the bundled sample record.
pub const SAMPLE_TICKER: &str = "BBCA";

/// (year, revenue, net profit, total assets, equity, shares)
const ANNUAL: [(i32, f64, f64, f64, f64, f64); 5] = [
    (2019, 100_000.0, 25_000.0, 900_000.0, 165_000.0, 122_000.0),
    (2020, 110_000.0, 28_000.0, 950_000.0, 180_000.0, 122_500.0),
    (2021, 120_000.0, 31_000.0, 1_000_000.0, 200_000.0, 123_000.0),
    (2022, 135_000.0, 36_000.0, 1_100_000.0, 230_000.0, 123_456.0),
    (2023, 150_000.0, 40_000.0, 1_200_000.0, 250_000.0, 123_456.0),
];

/// (year, month, day, close, volume)
const PRICES: [(i32, u32, u32, f64, u64); 2] = [
    (2023, 12, 28, 9_500.0, 230_000_000),
    (2023, 12, 29, 9_550.0, 250_000_000),
];

/// Five fiscal years and two closing prices of a large bank.
pub fn sample_record() -> FinancialRecord {
    let info = CompanyInfo {
        name: "Bank Central Asia".to_string(),
        sector: "Perbankan".to_string(),
        beta: Some(1.1),
        listing_date: NaiveDate::from_ymd_opt(2000, 5, 30),
    };

    let mut record = FinancialRecord::new(SAMPLE_TICKER).with_info(info);
    for (year, revenue, net_profit, total_assets, equity, shares) in ANNUAL {
        record.annual.insert(
            year,
            AnnualStatement::new(revenue, net_profit, total_assets, equity, shares),
        );
    }
    for (y, m, d, close, volume) in PRICES {
        if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
            record
                .prices
                .insert(date, PriceObservation::new(close, Some(volume)));
        }
    }

    record
}

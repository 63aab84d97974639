//! CSV and JSON export of ratio tables and valuation results.

use crate::summary::ScreenTable;
use fairval_data::{RatioResult, ratio_table::NOT_AVAILABLE};
use fairval_valuation::{SensitivityTable, ValuationResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV output was not valid UTF-8.
    #[error("Invalid UTF-8 in output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty" | "pretty-json" | "pretty_json" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Trait for types that can be exported.
pub trait Exporter {
    /// Export to a string in the specified format.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export to a file in the specified format.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn write_rows<T, I>(rows: I) -> Result<String, ExportError>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

fn to_json<T: Serialize + ?Sized>(value: &T, format: ExportFormat) -> Result<String, ExportError> {
    Ok(match format {
        ExportFormat::PrettyJson => serde_json::to_string_pretty(value)?,
        _ => serde_json::to_string(value)?,
    })
}

/// One ratio value for one period, flattened for CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioRow {
    /// Ticker symbol.
    pub ticker: String,

    /// Ratio name.
    pub ratio: String,

    /// Ratio category.
    pub category: String,

    /// Fiscal year, or `Avg` for the multi-year average.
    pub period: String,

    /// Raw value, empty when undefined.
    pub value: Option<f64>,

    /// Display value with unit suffix.
    pub formatted: String,
}

/// A ticker's ratio table prepared for export.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RatioExport<'a> {
    /// Ticker symbol.
    pub ticker: &'a str,

    /// Computed ratios.
    pub ratios: &'a RatioResult,
}

impl<'a> RatioExport<'a> {
    /// Create a new ratio export.
    pub const fn new(ticker: &'a str, ratios: &'a RatioResult) -> Self {
        Self { ticker, ratios }
    }

    /// Flatten into one row per ratio and year, each ratio followed by its
    /// average.
    pub fn to_rows(&self) -> Vec<RatioRow> {
        let years = self.ratios.years();
        let mut rows = Vec::new();

        for kind in self.ratios.kinds() {
            let row = |period: String, value: Option<f64>, formatted: String| RatioRow {
                ticker: self.ticker.to_string(),
                ratio: kind.name().to_string(),
                category: kind.category().name().to_string(),
                period,
                value,
                formatted,
            };

            for &year in &years {
                rows.push(row(
                    year.to_string(),
                    self.ratios.value(kind, year),
                    self.ratios.formatted(kind, year),
                ));
            }
            rows.push(row(
                "Avg".to_string(),
                self.ratios.average(kind),
                self.ratios.formatted_average(kind),
            ));
        }

        rows
    }
}

impl Exporter for RatioExport<'_> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_rows(self.to_rows()),
            _ => to_json(self, format),
        }
    }
}

/// One valuation method's outcome, flattened for CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationRow {
    /// Ticker symbol.
    pub ticker: String,

    /// Method name, or `Average` for the aggregate.
    pub method: String,

    /// Target price, empty when undefined.
    pub target_price: Option<f64>,

    /// Upside in percent, empty when undefined.
    pub upside: Option<f64>,

    /// Current market price.
    pub current_price: f64,

    /// Issues raised by the method, separated by `; `.
    pub issues: String,
}

/// Flatten a valuation into one row per method plus the aggregate row.
pub fn valuation_rows(result: &ValuationResult) -> Vec<ValuationRow> {
    let mut rows: Vec<ValuationRow> = result
        .estimates()
        .into_iter()
        .map(|estimate| ValuationRow {
            ticker: result.ticker.clone(),
            method: estimate.method.name().to_string(),
            target_price: estimate.target_price,
            upside: estimate.upside,
            current_price: estimate.current_price,
            issues: estimate
                .issues
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        })
        .collect();

    rows.push(ValuationRow {
        ticker: result.ticker.clone(),
        method: "Average".to_string(),
        target_price: Some(result.average_target_price),
        upside: Some(result.average_upside),
        current_price: result.current_price,
        issues: String::new(),
    });

    rows
}

impl Exporter for ValuationResult {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_rows(valuation_rows(self)),
            _ => to_json(self, format),
        }
    }
}

impl Exporter for SensitivityTable {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        if format != ExportFormat::Csv {
            return to_json(self, format);
        }

        let mut wtr = csv::Writer::from_writer(vec![]);
        let mut header = vec!["EPS Growth".to_string()];
        header.extend(self.per_multiples.iter().map(|per| format!("{per}x")));
        wtr.write_record(&header)?;

        for (row, growth) in self.eps_growth_rates.iter().enumerate() {
            let mut record = vec![format!("{:.0}%", growth * 100.0)];
            record.extend((0..self.per_multiples.len()).map(|col| {
                self.price(row, col)
                    .map_or_else(|| NOT_AVAILABLE.to_string(), |p| format!("{p:.0}"))
            }));
            wtr.write_record(&record)?;
        }

        let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8(bytes)?)
    }
}

impl Exporter for ScreenTable {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_rows(&self.rows),
            _ => to_json(&self.rows, format),
        }
    }
}

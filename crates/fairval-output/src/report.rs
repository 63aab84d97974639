//! Report generation for a single ticker.

use chrono::{DateTime, Utc};
use fairval_data::{FiscalYear, RatioResult};
use fairval_valuation::ValuationResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A timestamped analysis report for one ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Ticker being analyzed.
    pub ticker: String,

    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Fiscal year the valuation is based on.
    pub fiscal_year: Option<FiscalYear>,

    /// Report contents (JSON format).
    pub contents: serde_json::Value,
}

impl Report {
    /// Create a new report.
    pub fn new(
        ticker: String,
        fiscal_year: Option<FiscalYear>,
        contents: serde_json::Value,
    ) -> Self {
        Self {
            ticker,
            timestamp: Utc::now(),
            fiscal_year,
            contents,
        }
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON.
    pub fn write_to(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    ticker: Option<String>,
    fiscal_year: Option<FiscalYear>,
    ratios: Option<serde_json::Value>,
    valuation: Option<serde_json::Value>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ticker.
    pub fn ticker(mut self, ticker: impl Into<String>) -> Self {
        self.ticker = Some(ticker.into());
        self
    }

    /// Include a ratio table.
    pub fn ratios(mut self, ratios: &RatioResult) -> Result<Self, ReportError> {
        self.ratios = Some(serde_json::to_value(ratios)?);
        Ok(self)
    }

    /// Include a valuation. Also sets the ticker and fiscal year when they
    /// are not set yet.
    pub fn valuation(mut self, valuation: &ValuationResult) -> Result<Self, ReportError> {
        if self.ticker.is_none() {
            self.ticker = Some(valuation.ticker.clone());
        }
        self.fiscal_year = self.fiscal_year.or(valuation.fiscal_year);
        self.valuation = Some(serde_json::to_value(valuation)?);
        Ok(self)
    }

    /// Build the report.
    pub fn build(self) -> Report {
        let mut contents = serde_json::Map::new();
        if let Some(ratios) = self.ratios {
            contents.insert("ratios".to_string(), ratios);
        }
        if let Some(valuation) = self.valuation {
            contents.insert("valuation".to_string(), valuation);
        }

        Report::new(
            self.ticker.unwrap_or_default(),
            self.fiscal_year,
            serde_json::Value::Object(contents),
        )
    }
}

//! Calculation issues.
//!
//! Issues are not errors: a calculation that hits one recovers locally
//! (undefined value, default rate, no target) and records the issue next to
//! its result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A local recovery applied during a calculation.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum CalculationIssue {
    /// An input needed for a metric was missing or unusable
    #[error("Missing data: {field}")]
    MissingData {
        /// Name of the missing input
        field: String,
    },

    /// Not enough history to estimate growth, defaults were used
    #[error("Insufficient history: {years} year(s) available")]
    InsufficientHistory {
        /// Number of fiscal years available
        years: usize,
    },

    /// Discount rate does not exceed terminal growth
    #[error("Degenerate assumption: WACC {wacc} must exceed terminal growth {terminal_growth}")]
    DegenerateAssumption {
        /// Discount rate
        wacc: f64,
        /// Terminal growth rate
        terminal_growth: f64,
    },

    /// Market price is zero or negative, upside reported as 0
    #[error("Current price is not positive")]
    ZeroPrice,
}

impl CalculationIssue {
    /// Missing-data issue for a named input.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingData {
            field: field.into(),
        }
    }
}

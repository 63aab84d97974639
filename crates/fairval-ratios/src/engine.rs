//! Ratio engine
//!
//! Evaluates a set of [`Ratio`]s on every fiscal year of a record.

use crate::registry::all_ratios;
use crate::traits::{Ratio, RatioContext};
use fairval_data::{FinancialRecord, RatioResult, RatioSeries};
use tracing::debug;

/// Computes ratio tables for financial records.
#[derive(Debug)]
pub struct RatioEngine {
    ratios: Vec<Box<dyn Ratio>>,
}

impl Default for RatioEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RatioEngine {
    /// Engine evaluating every registered ratio.
    pub fn new() -> Self {
        Self::with_ratios(all_ratios())
    }

    /// Engine evaluating a custom ratio set.
    pub fn with_ratios(ratios: Vec<Box<dyn Ratio>>) -> Self {
        Self { ratios }
    }

    /// Ratios evaluated by this engine.
    pub fn ratios(&self) -> &[Box<dyn Ratio>] {
        &self.ratios
    }

    /// Compute every ratio for every fiscal year of `record`.
    ///
    /// Price-based ratios are left out entirely when the record has no price
    /// data. The record is not modified.
    pub fn compute(&self, record: &FinancialRecord) -> RatioResult {
        let mut result = RatioResult::new();
        if record.annual.is_empty() {
            return result;
        }

        let ctx = RatioContext {
            latest_price: record.latest_price(),
        };
        let has_prices = record.has_prices();

        for ratio in self
            .ratios
            .iter()
            .filter(|r| has_prices || !r.requires_price())
        {
            let series = RatioSeries::from_values(
                record
                    .annual
                    .iter()
                    .map(|(year, statement)| (*year, ratio.compute(statement, &ctx))),
            );
            result.insert(ratio.kind(), series);
        }

        debug!(
            ticker = %record.ticker,
            years = record.annual.len(),
            ratios = result.series.len(),
            "computed ratios"
        );
        result
    }
}

/// Compute every registered ratio for a record.
pub fn compute_ratios(record: &FinancialRecord) -> RatioResult {
    RatioEngine::new().compute(record)
}

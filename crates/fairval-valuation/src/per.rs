//! PER (price to earnings) estimator.
//!
//! target = current EPS × (1 + EPS growth) × fair PER, where the fair PER
//! averages a no-growth base multiple with a PEG-style multiple of
//! `growth × 100`.

use crate::estimate::{
    EstimateDetails, Estimator, ValuationEstimate, ValuationInput, ValuationMethod,
};
use fairval_ratios::CalculationIssue;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fair PER for an EPS growth rate: `(base_per + growth × 100) / 2`.
pub const fn fair_per(eps_growth: f64, base_per: f64) -> f64 {
    (base_per + eps_growth * 100.0) / 2.0
}

/// Inputs and intermediate values of a PER estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerDetails {
    /// EPS of the latest fiscal year
    pub current_eps: Option<f64>,
    /// EPS after one year of growth
    pub projected_eps: Option<f64>,
    /// Fair PER multiple
    pub fair_per: f64,
    /// EPS growth rate used
    pub eps_growth: f64,
}

/// PER multiple estimator.
#[derive(Debug, Clone)]
pub struct PerEstimator {
    base_per: f64,
}

impl Default for PerEstimator {
    fn default() -> Self {
        Self::new(15.0)
    }
}

impl PerEstimator {
    /// Create an estimator with a no-growth base PER.
    pub const fn new(base_per: f64) -> Self {
        Self { base_per }
    }
}

impl Estimator for PerEstimator {
    fn method(&self) -> ValuationMethod {
        ValuationMethod::Per
    }

    fn estimate(&self, input: &ValuationInput<'_>) -> ValuationEstimate {
        let eps_growth = input.growth.eps_growth;
        let fair = fair_per(eps_growth, self.base_per);
        let mut issues = Vec::new();

        let current_eps = input.statement.eps();
        if current_eps.is_none() {
            issues.push(CalculationIssue::missing("shares_outstanding"));
        }
        let projected_eps = current_eps.map(|eps| eps * (1.0 + eps_growth));
        let target = projected_eps.map(|eps| eps * fair);

        debug!(?current_eps, ?projected_eps, fair_per = fair, ?target, "PER estimate");

        ValuationEstimate::new(
            ValuationMethod::Per,
            target,
            input.current_price,
            EstimateDetails::Per(PerDetails {
                current_eps,
                projected_eps,
                fair_per: fair,
                eps_growth,
            }),
            issues,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fairval_data::AnnualStatement;
    use fairval_ratios::GrowthEstimator;
    use rstest::rstest;

    #[rstest]
    #[case(0.10, 12.5)]
    #[case(0.0, 7.5)]
    #[case(0.15, 15.0)]
    fn test_fair_per(#[case] growth: f64, #[case] expected: f64) {
        assert_relative_eq!(fair_per(growth, 15.0), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_estimate() {
        let statement = AnnualStatement::new(0.0, 1_000.0, 0.0, 5_000.0, 10.0);
        let growth = GrowthEstimator::default().estimate(&Default::default());
        let input = ValuationInput {
            fiscal_year: Some(2023),
            statement: &statement,
            current_price: 1_000.0,
            growth: &growth,
        };

        let estimate = PerEstimator::default().estimate(&input);
        let EstimateDetails::Per(details) = &estimate.details else {
            panic!("expected PER details");
        };

        // EPS 100_000, projected 110_000 at the default 10% growth, fair PER 12.5
        assert_relative_eq!(details.current_eps.unwrap(), 100_000.0);
        assert_relative_eq!(details.projected_eps.unwrap(), 110_000.0, epsilon = 1e-6);
        assert_relative_eq!(details.fair_per, 12.5);
        assert_eq!(estimate.target_price, Some(1_375_000.0));
        assert_eq!(estimate.upside, Some(137_400.0));
    }

    #[test]
    fn test_missing_shares() {
        let statement = AnnualStatement::new(0.0, 1_000.0, 0.0, 5_000.0, 0.0);
        let growth = GrowthEstimator::default().estimate(&Default::default());
        let input = ValuationInput {
            fiscal_year: Some(2023),
            statement: &statement,
            current_price: 1_000.0,
            growth: &growth,
        };

        let estimate = PerEstimator::default().estimate(&input);
        assert_eq!(estimate.target_price, None);
        assert_eq!(estimate.upside, None);
        assert_eq!(
            estimate.issues,
            vec![CalculationIssue::missing("shares_outstanding")]
        );
    }
}

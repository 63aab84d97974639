//! Growth estimation
//!
//! Growth rates are compound annual growth rates between the first and the
//! last fiscal year of a record. Intermediate years do not influence the
//! result; the span is the number of years minus one.
//!
//! When a rate cannot be estimated (fewer than two years, a non-positive
//! starting value, missing shares or a non-finite result) the configured
//! default is used for that rate and the reason is recorded as a
//! [`CalculationIssue`].

use crate::error::CalculationIssue;
use fairval_data::{AnnualSeries, AnnualStatement};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Configuration for growth estimation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    /// EPS growth used when it cannot be estimated (default: 0.10)
    pub default_eps_growth: f64,
    /// Equity growth used when it cannot be estimated (default: 0.08)
    pub default_equity_growth: f64,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            default_eps_growth: 0.10,
            default_equity_growth: 0.08,
        }
    }
}

/// Compound annual growth rate over `span` periods.
///
/// Returns `None` when `span` is zero, `first` is not positive or the
/// result is not finite.
pub fn cagr(first: f64, last: f64, span: usize) -> Option<f64> {
    if span == 0 || first.is_nan() || first <= 0.0 {
        return None;
    }
    let rate = (last / first).powf(1.0 / span as f64) - 1.0;
    rate.is_finite().then_some(rate)
}

/// Estimated growth rates of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthEstimate {
    /// Annual EPS growth
    pub eps_growth: f64,
    /// Annual equity growth
    pub equity_growth: f64,
    /// Blended free cash flow growth, the mean of EPS and equity growth
    pub fcf_growth: f64,
    /// Number of fiscal years available
    pub years: usize,
    /// Years between the first and last fiscal year used
    pub span: usize,
    /// Whether the EPS rate is the configured default
    pub eps_defaulted: bool,
    /// Whether the equity rate is the configured default
    pub equity_defaulted: bool,
    /// Recoveries applied during estimation
    pub issues: Vec<CalculationIssue>,
}

/// Estimates growth rates from an annual series.
#[derive(Debug, Clone, Default)]
pub struct GrowthEstimator {
    config: GrowthConfig,
}

impl GrowthEstimator {
    /// Create an estimator with custom defaults.
    pub const fn new(config: GrowthConfig) -> Self {
        Self { config }
    }

    /// Configured defaults.
    pub const fn config(&self) -> &GrowthConfig {
        &self.config
    }

    /// Estimate EPS, equity and blended FCF growth.
    pub fn estimate(&self, annual: &AnnualSeries) -> GrowthEstimate {
        let years = annual.len();
        let mut issues = Vec::new();

        let endpoints = annual
            .first_key_value()
            .zip(annual.last_key_value())
            .map(|((_, first), (_, last))| (first, last));

        let (eps_growth, equity_growth, span) = match endpoints {
            Some((first, last)) if years >= 2 => {
                let span = years - 1;
                let eps = self.eps_cagr(first, last, span, years, &mut issues);
                let equity = cagr(first.equity, last.equity, span);
                if equity.is_none() {
                    issues.push(CalculationIssue::InsufficientHistory { years });
                }
                (eps, equity, span)
            }
            _ => {
                issues.push(CalculationIssue::InsufficientHistory { years });
                (None, None, 0)
            }
        };

        if eps_growth.is_none() {
            warn!(
                years,
                default = self.config.default_eps_growth,
                "EPS growth unavailable, using default"
            );
        }
        if equity_growth.is_none() {
            warn!(
                years,
                default = self.config.default_equity_growth,
                "equity growth unavailable, using default"
            );
        }

        let eps = eps_growth.unwrap_or(self.config.default_eps_growth);
        let equity = equity_growth.unwrap_or(self.config.default_equity_growth);
        issues.dedup();

        GrowthEstimate {
            eps_growth: eps,
            equity_growth: equity,
            fcf_growth: (eps + equity) / 2.0,
            years,
            span,
            eps_defaulted: eps_growth.is_none(),
            equity_defaulted: equity_growth.is_none(),
            issues,
        }
    }

    fn eps_cagr(
        &self,
        first: &AnnualStatement,
        last: &AnnualStatement,
        span: usize,
        years: usize,
        issues: &mut Vec<CalculationIssue>,
    ) -> Option<f64> {
        match (first.eps(), last.eps()) {
            (Some(first_eps), Some(last_eps)) => {
                let rate = cagr(first_eps, last_eps, span);
                if rate.is_none() {
                    issues.push(CalculationIssue::InsufficientHistory { years });
                }
                rate
            }
            _ => {
                issues.push(CalculationIssue::missing("shares_outstanding"));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn series(rows: &[(i32, f64, f64, f64)]) -> AnnualSeries {
        rows.iter()
            .map(|&(year, net_profit, equity, shares)| {
                (
                    year,
                    AnnualStatement::new(0.0, net_profit, 0.0, equity, shares),
                )
            })
            .collect()
    }

    #[rstest]
    #[case(100.0, 121.0, 2, 0.10)]
    #[case(100.0, 100.0, 4, 0.0)]
    #[case(200.0, 100.0, 1, -0.5)]
    fn test_cagr(#[case] first: f64, #[case] last: f64, #[case] span: usize, #[case] expected: f64) {
        assert_relative_eq!(cagr(first, last, span).unwrap(), expected, epsilon = 1e-12);
    }

    #[rstest]
    #[case(0.0, 100.0, 2)]
    #[case(-10.0, 100.0, 2)]
    #[case(100.0, 121.0, 0)]
    #[case(100.0, -50.0, 2)]
    #[case(f64::NAN, 100.0, 2)]
    fn test_cagr_undefined(#[case] first: f64, #[case] last: f64, #[case] span: usize) {
        assert_eq!(cagr(first, last, span), None);
    }

    #[test]
    fn test_three_years_span_two() {
        let annual = series(&[
            (2021, 100.0, 1_000.0, 10.0),
            (2022, 500.0, 9_000.0, 10.0),
            (2023, 121.0, 1_210.0, 10.0),
        ]);
        let estimate = GrowthEstimator::default().estimate(&annual);

        assert_eq!(estimate.span, 2);
        assert_relative_eq!(estimate.eps_growth, 0.10, epsilon = 1e-12);
        assert_relative_eq!(estimate.equity_growth, 0.10, epsilon = 1e-12);
        assert_relative_eq!(estimate.fcf_growth, 0.10, epsilon = 1e-12);
        assert!(estimate.issues.is_empty());
    }

    #[test]
    fn test_intermediate_years_ignored() {
        let a = series(&[
            (2021, 100.0, 1_000.0, 10.0),
            (2022, 1.0, 1.0, 10.0),
            (2023, 144.0, 1_440.0, 10.0),
        ]);
        let b = series(&[
            (2021, 100.0, 1_000.0, 10.0),
            (2022, 900.0, 50.0, 10.0),
            (2023, 144.0, 1_440.0, 10.0),
        ]);

        let estimator = GrowthEstimator::default();
        assert_eq!(estimator.estimate(&a), estimator.estimate(&b));
    }

    #[rstest]
    #[case(&[])]
    #[case(&[(2023, 100.0, 1_000.0, 10.0)])]
    fn test_short_history_uses_defaults(#[case] rows: &[(i32, f64, f64, f64)]) {
        let estimate = GrowthEstimator::default().estimate(&series(rows));

        assert_relative_eq!(estimate.eps_growth, 0.10);
        assert_relative_eq!(estimate.equity_growth, 0.08);
        assert_relative_eq!(estimate.fcf_growth, 0.09);
        assert!(estimate.eps_defaulted && estimate.equity_defaulted);
        assert_eq!(
            estimate.issues,
            vec![CalculationIssue::InsufficientHistory { years: rows.len() }]
        );
    }

    #[test]
    fn test_negative_first_eps_falls_back() {
        let annual = series(&[(2022, -50.0, 1_000.0, 10.0), (2023, 100.0, 1_100.0, 10.0)]);
        let estimate = GrowthEstimator::default().estimate(&annual);

        assert!(estimate.eps_defaulted);
        assert!(!estimate.equity_defaulted);
        assert_relative_eq!(estimate.eps_growth, 0.10);
        assert_relative_eq!(estimate.equity_growth, 0.10, epsilon = 1e-12);
        assert_relative_eq!(estimate.fcf_growth, 0.10, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_shares_is_missing_data() {
        let annual = series(&[(2022, 100.0, 1_000.0, 0.0), (2023, 110.0, 1_100.0, 10.0)]);
        let estimate = GrowthEstimator::default().estimate(&annual);

        assert!(estimate.eps_defaulted);
        assert_eq!(
            estimate.issues,
            vec![CalculationIssue::missing("shares_outstanding")]
        );
    }

    #[test]
    fn test_custom_defaults() {
        let estimator = GrowthEstimator::new(GrowthConfig {
            default_eps_growth: 0.2,
            default_equity_growth: 0.1,
        });
        let estimate = estimator.estimate(&AnnualSeries::new());

        assert_relative_eq!(estimate.eps_growth, 0.2);
        assert_relative_eq!(estimate.fcf_growth, 0.15, epsilon = 1e-12);
    }

    #[test]
    fn test_config_partial_json() {
        let config: GrowthConfig = serde_json::from_str(r#"{"default_eps_growth": 0.12}"#).unwrap();
        assert_relative_eq!(config.default_eps_growth, 0.12);
        assert_relative_eq!(config.default_equity_growth, 0.08);
    }
}

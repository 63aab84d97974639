//! Discounted cash flow estimator.
//!
//! Free cash flow is approximated as a fixed share of net profit and grown
//! at the blended FCF growth rate over the projection horizon. The terminal
//! value uses the Gordon growth model:
//!
//! ```text
//! PV(flows)   = Σ_{i=1..n} FCF × (1+g)^i / (1+WACC)^i
//! TV          = FCF × (1+g)^n × (1+tg) / (WACC − tg)
//! EV          = PV(flows) + TV / (1+WACC)^n
//! target      = (EV − net debt) × 1000 / shares
//! ```
//!
//! The terminal value is undefined when WACC does not exceed terminal growth.

use crate::estimate::{
    EstimateDetails, Estimator, ValuationEstimate, ValuationInput, ValuationMethod, round_to,
};
use fairval_data::PER_SHARE_SCALE;
use fairval_ratios::CalculationIssue;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One projected year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DcfProjection {
    /// Years after the base year (1-based)
    pub period: u32,
    /// Projected free cash flow
    pub fcf: f64,
    /// `1 / (1 + WACC)^period`
    pub discount_factor: f64,
    /// Discounted free cash flow
    pub present_value: f64,
}

/// Discounted value of a projected cash flow stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountedValue {
    /// Per-year projections
    pub projections: Vec<DcfProjection>,
    /// Sum of discounted projected flows
    pub pv_flows: f64,
    /// Free cash flow of the last projected year
    pub terminal_fcf: f64,
    /// Terminal value at the horizon, `None` when WACC ≤ terminal growth
    pub terminal_value: Option<f64>,
    /// Terminal value discounted to today
    pub pv_terminal: Option<f64>,
    /// Enterprise value, `None` without a terminal value
    pub enterprise_value: Option<f64>,
}

/// Longest supported projection horizon in years.
pub const MAX_PROJECTION_YEARS: u32 = 100;

/// Discount `base_fcf` grown at `growth` for `years`, plus a terminal value.
///
/// `years` is capped at [`MAX_PROJECTION_YEARS`].
pub fn discount_cash_flows(
    base_fcf: f64,
    growth: f64,
    wacc: f64,
    terminal_growth: f64,
    years: u32,
) -> DiscountedValue {
    let years = years.min(MAX_PROJECTION_YEARS);
    let periods = i32::try_from(years).unwrap_or(i32::MAX);

    let projections: Vec<_> = (1..=years)
        .zip(1..=periods)
        .map(|(period, exp)| {
            let fcf = base_fcf * (1.0 + growth).powi(exp);
            let discount_factor = 1.0 / (1.0 + wacc).powi(exp);
            DcfProjection {
                period,
                fcf,
                discount_factor,
                present_value: fcf * discount_factor,
            }
        })
        .collect();

    let pv_flows = projections.iter().map(|p| p.present_value).sum::<f64>();
    let terminal_fcf = base_fcf * (1.0 + growth).powi(periods);

    let terminal_value = (wacc > terminal_growth)
        .then(|| terminal_fcf * (1.0 + terminal_growth) / (wacc - terminal_growth))
        .filter(|tv| tv.is_finite());
    let pv_terminal = terminal_value.map(|tv| tv / (1.0 + wacc).powi(periods));
    let enterprise_value = pv_terminal.map(|pv| pv_flows + pv);

    DiscountedValue {
        projections,
        pv_flows,
        terminal_fcf,
        terminal_value,
        pv_terminal,
        enterprise_value,
    }
}

/// Inputs and intermediate values of a DCF estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcfDetails {
    /// Base free cash flow, rounded
    pub fcf: f64,
    /// Blended FCF growth rate used
    pub fcf_growth: f64,
    /// Discount rate
    pub wacc: f64,
    /// Terminal growth rate
    pub terminal_growth: f64,
    /// Net debt subtracted from enterprise value
    pub net_debt: f64,
    /// Projection table and terminal components
    pub valuation: DiscountedValue,
    /// Enterprise value, rounded
    pub enterprise_value: Option<f64>,
    /// Equity value, rounded
    pub equity_value: Option<f64>,
}

/// DCF estimator.
#[derive(Debug, Clone)]
pub struct DcfEstimator {
    wacc: f64,
    terminal_growth: f64,
    projection_years: u32,
    fcf_conversion: f64,
    net_debt: f64,
}

impl Default for DcfEstimator {
    fn default() -> Self {
        Self {
            wacc: 0.11,
            terminal_growth: 0.03,
            projection_years: 5,
            fcf_conversion: 0.8,
            net_debt: 0.0,
        }
    }
}

impl DcfEstimator {
    /// Set the discount rate and terminal growth.
    pub const fn with_rates(mut self, wacc: f64, terminal_growth: f64) -> Self {
        self.wacc = wacc;
        self.terminal_growth = terminal_growth;
        self
    }

    /// Set the projection horizon in years.
    pub const fn with_horizon(mut self, projection_years: u32) -> Self {
        self.projection_years = projection_years;
        self
    }

    /// Set the share of net profit treated as free cash flow.
    pub const fn with_fcf_conversion(mut self, fcf_conversion: f64) -> Self {
        self.fcf_conversion = fcf_conversion;
        self
    }

    /// Set the net debt subtracted from enterprise value.
    pub const fn with_net_debt(mut self, net_debt: f64) -> Self {
        self.net_debt = net_debt;
        self
    }
}

impl Estimator for DcfEstimator {
    fn method(&self) -> ValuationMethod {
        ValuationMethod::Dcf
    }

    fn estimate(&self, input: &ValuationInput<'_>) -> ValuationEstimate {
        let statement = input.statement;
        let fcf_growth = input.growth.fcf_growth;
        let mut issues = Vec::new();

        let base_fcf = statement.net_profit * self.fcf_conversion;
        let valuation = discount_cash_flows(
            base_fcf,
            fcf_growth,
            self.wacc,
            self.terminal_growth,
            self.projection_years,
        );

        if valuation.terminal_value.is_none() {
            warn!(
                wacc = self.wacc,
                terminal_growth = self.terminal_growth,
                "WACC does not exceed terminal growth, no DCF target"
            );
            issues.push(CalculationIssue::DegenerateAssumption {
                wacc: self.wacc,
                terminal_growth: self.terminal_growth,
            });
        }

        let equity_value = valuation.enterprise_value.map(|ev| ev - self.net_debt);
        let shares = statement.shares_outstanding;
        if shares <= 0.0 {
            issues.push(CalculationIssue::missing("shares_outstanding"));
        }
        let target = equity_value
            .filter(|_| shares > 0.0)
            .map(|equity| equity * PER_SHARE_SCALE / shares);

        debug!(
            base_fcf,
            fcf_growth,
            enterprise_value = ?valuation.enterprise_value,
            ?target,
            "DCF estimate"
        );

        let details = DcfDetails {
            fcf: round_to(base_fcf, 0),
            fcf_growth,
            wacc: self.wacc,
            terminal_growth: self.terminal_growth,
            net_debt: self.net_debt,
            enterprise_value: valuation.enterprise_value.map(f64::round),
            equity_value: equity_value.map(f64::round),
            valuation,
        };

        ValuationEstimate::new(
            ValuationMethod::Dcf,
            target,
            input.current_price,
            EstimateDetails::Dcf(details),
            issues,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fairval_data::AnnualStatement;
    use fairval_ratios::{GrowthEstimate, GrowthEstimator};

    fn closed_form(base: f64, g: f64, wacc: f64, tg: f64, n: i32) -> f64 {
        let q = (1.0 + g) / (1.0 + wacc);
        let flows = base * q * (1.0 - q.powi(n)) / (1.0 - q);
        let terminal = base * (1.0 + g).powi(n) * (1.0 + tg) / (wacc - tg) / (1.0 + wacc).powi(n);
        flows + terminal
    }

    fn growth(fcf_growth: f64) -> GrowthEstimate {
        let mut growth = GrowthEstimator::default().estimate(&Default::default());
        growth.fcf_growth = fcf_growth;
        growth
    }

    #[test]
    fn test_matches_closed_form() {
        let value = discount_cash_flows(1_000.0, 0.10, 0.11, 0.03, 5);

        assert_eq!(value.projections.len(), 5);
        assert_relative_eq!(
            value.enterprise_value.unwrap(),
            closed_form(1_000.0, 0.10, 0.11, 0.03, 5),
            max_relative = 1e-12
        );
        assert_relative_eq!(value.terminal_fcf, 1_000.0 * 1.1_f64.powi(5), epsilon = 1e-9);
        assert_relative_eq!(value.projections[0].fcf, 1_100.0, epsilon = 1e-9);
        assert_relative_eq!(value.projections[0].discount_factor, 1.0 / 1.11);
    }

    #[test]
    fn test_degenerate_rates() {
        let value = discount_cash_flows(1_000.0, 0.10, 0.03, 0.03, 5);
        assert!(value.terminal_value.is_none());
        assert!(value.enterprise_value.is_none());
        assert_eq!(value.projections.len(), 5);

        let statement = AnnualStatement::new(0.0, 1_250.0, 0.0, 0.0, 10.0);
        let growth = growth(0.10);
        let input = ValuationInput {
            fiscal_year: Some(2023),
            statement: &statement,
            current_price: 100.0,
            growth: &growth,
        };
        let estimate = DcfEstimator::default().with_rates(0.02, 0.03).estimate(&input);

        assert_eq!(estimate.target_price, None);
        assert_eq!(estimate.upside, None);
        assert_eq!(
            estimate.issues,
            vec![CalculationIssue::DegenerateAssumption {
                wacc: 0.02,
                terminal_growth: 0.03
            }]
        );
    }

    #[test]
    fn test_estimate_target_per_share() {
        // Net profit 1250 at 80% conversion gives a base FCF of 1000
        let statement = AnnualStatement::new(0.0, 1_250.0, 0.0, 0.0, 10.0);
        let growth = growth(0.10);
        let input = ValuationInput {
            fiscal_year: Some(2023),
            statement: &statement,
            current_price: 100_000.0,
            growth: &growth,
        };

        let estimate = DcfEstimator::default().estimate(&input);
        let EstimateDetails::Dcf(details) = &estimate.details else {
            panic!("expected DCF details");
        };

        let ev = closed_form(1_000.0, 0.10, 0.11, 0.03, 5);
        assert_eq!(details.fcf, 1_000.0);
        assert_relative_eq!(details.enterprise_value.unwrap(), ev, epsilon = 0.5);
        assert_eq!(details.equity_value, details.enterprise_value);
        assert_relative_eq!(estimate.target_price.unwrap(), ev * 100.0, epsilon = 0.5);
        assert!(estimate.issues.is_empty());
    }

    #[test]
    fn test_net_debt_reduces_equity() {
        let statement = AnnualStatement::new(0.0, 1_250.0, 0.0, 0.0, 10.0);
        let growth = growth(0.10);
        let input = ValuationInput {
            fiscal_year: Some(2023),
            statement: &statement,
            current_price: 100_000.0,
            growth: &growth,
        };

        let plain = DcfEstimator::default().estimate(&input);
        let levered = DcfEstimator::default().with_net_debt(500.0).estimate(&input);

        let difference = plain.target_price.unwrap() - levered.target_price.unwrap();
        assert_relative_eq!(difference, 500.0 * 1_000.0 / 10.0, epsilon = 1.0);
    }

    #[test]
    fn test_missing_shares() {
        let statement = AnnualStatement::new(0.0, 1_250.0, 0.0, 0.0, 0.0);
        let growth = growth(0.10);
        let input = ValuationInput {
            fiscal_year: Some(2023),
            statement: &statement,
            current_price: 100.0,
            growth: &growth,
        };

        let estimate = DcfEstimator::default().estimate(&input);
        assert_eq!(estimate.target_price, None);
        assert_eq!(
            estimate.issues,
            vec![CalculationIssue::missing("shares_outstanding")]
        );
    }

    #[test]
    fn test_horizon_is_capped() {
        let value = discount_cash_flows(1_000.0, 0.05, 0.11, 0.03, u32::MAX);
        assert_eq!(value.projections.len(), MAX_PROJECTION_YEARS as usize);
        assert!(value.enterprise_value.is_some_and(f64::is_finite));
    }
}

//! PBV (price to book value) estimator.
//!
//! The fair PBV follows from ROE and the fair PER:
//! `fair_pbv = ROE × fair_per / (100 × (1 + equity growth))`, and the target
//! is the book value per share after one year of equity growth times that
//! multiple.

use crate::estimate::{
    EstimateDetails, Estimator, ValuationEstimate, ValuationInput, ValuationMethod,
};
use crate::per::fair_per;
use fairval_ratios::CalculationIssue;
use fairval_ratios::traits::{percent, safe_div};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Inputs and intermediate values of a PBV estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PbvDetails {
    /// Book value per share of the latest fiscal year
    pub current_bvps: Option<f64>,
    /// Book value per share after one year of growth
    pub projected_bvps: Option<f64>,
    /// Fair PBV multiple, `None` when equity growth is -100% or worse
    pub fair_pbv: Option<f64>,
    /// ROE in percent used for the fair PBV
    pub roe: f64,
    /// Whether `roe` is the configured default
    pub roe_defaulted: bool,
    /// Equity growth rate used
    pub equity_growth: f64,
}

/// PBV multiple estimator.
#[derive(Debug, Clone)]
pub struct PbvEstimator {
    base_per: f64,
    default_roe: f64,
}

impl Default for PbvEstimator {
    fn default() -> Self {
        Self::new(15.0, 15.0)
    }
}

impl PbvEstimator {
    /// Create an estimator from the base PER and the fallback ROE (percent).
    pub const fn new(base_per: f64, default_roe: f64) -> Self {
        Self {
            base_per,
            default_roe,
        }
    }
}

impl Estimator for PbvEstimator {
    fn method(&self) -> ValuationMethod {
        ValuationMethod::Pbv
    }

    fn estimate(&self, input: &ValuationInput<'_>) -> ValuationEstimate {
        let statement = input.statement;
        let equity_growth = input.growth.equity_growth;
        let mut issues = Vec::new();

        let latest_roe = percent(statement.net_profit, statement.equity);
        if latest_roe.is_none() {
            warn!(default = self.default_roe, "ROE undefined, using default");
            issues.push(CalculationIssue::missing("equity"));
        }
        let roe = latest_roe.unwrap_or(self.default_roe);

        let fair = fair_per(input.growth.eps_growth, self.base_per);
        let fair_pbv = safe_div(roe * fair, 100.0 * (1.0 + equity_growth));
        if fair_pbv.is_none() {
            warn!(equity_growth, "fair PBV undefined for this equity growth");
            if latest_roe.is_some() {
                issues.push(CalculationIssue::missing("equity"));
            }
        }

        let current_bvps = statement.bvps();
        if current_bvps.is_none() {
            issues.push(CalculationIssue::missing("shares_outstanding"));
        }
        let projected_bvps = current_bvps.map(|bvps| bvps * (1.0 + equity_growth));
        let target = projected_bvps.zip(fair_pbv).map(|(bvps, pbv)| bvps * pbv);

        debug!(?current_bvps, roe, ?fair_pbv, ?target, "PBV estimate");

        ValuationEstimate::new(
            ValuationMethod::Pbv,
            target,
            input.current_price,
            EstimateDetails::Pbv(PbvDetails {
                current_bvps,
                projected_bvps,
                fair_pbv,
                roe,
                roe_defaulted: latest_roe.is_none(),
                equity_growth,
            }),
            issues,
        )
    }
}

//! Valuation estimate types and the [`Estimator`] trait.

use crate::dcf::DcfDetails;
use crate::pbv::PbvDetails;
use crate::per::PerDetails;
use fairval_data::{AnnualStatement, FiscalYear};
use fairval_ratios::{CalculationIssue, GrowthEstimate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Valuation methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValuationMethod {
    /// Price to earnings multiple
    #[serde(rename = "PER")]
    Per,
    /// Price to book value multiple
    #[serde(rename = "PBV")]
    Pbv,
    /// Discounted cash flow
    #[serde(rename = "DCF")]
    Dcf,
}

impl ValuationMethod {
    /// All methods in report order.
    pub const ALL: [Self; 3] = [Self::Per, Self::Pbv, Self::Dcf];

    /// Short method name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Per => "PER",
            Self::Pbv => "PBV",
            Self::Dcf => "DCF",
        }
    }
}

impl fmt::Display for ValuationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Method-specific inputs and intermediate values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum EstimateDetails {
    /// PER estimate details
    #[serde(rename = "PER")]
    Per(PerDetails),
    /// PBV estimate details
    #[serde(rename = "PBV")]
    Pbv(PbvDetails),
    /// DCF estimate details
    #[serde(rename = "DCF")]
    Dcf(DcfDetails),
}

/// Result of one valuation method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationEstimate {
    /// Method that produced the estimate
    pub method: ValuationMethod,
    /// Target price rounded to whole currency units, `None` if undefined
    pub target_price: Option<f64>,
    /// Upside against the current price in percent, one decimal
    pub upside: Option<f64>,
    /// Current market price (0 when unknown)
    pub current_price: f64,
    /// Method inputs and intermediate values
    pub details: EstimateDetails,
    /// Recoveries applied while estimating
    pub issues: Vec<CalculationIssue>,
}

impl ValuationEstimate {
    /// Assemble an estimate from an unrounded target.
    ///
    /// The upside is computed from the unrounded target; a non-positive
    /// price reports an upside of 0 and records [`CalculationIssue::ZeroPrice`].
    pub fn new(
        method: ValuationMethod,
        raw_target: Option<f64>,
        current_price: f64,
        details: EstimateDetails,
        mut issues: Vec<CalculationIssue>,
    ) -> Self {
        let raw_target = raw_target.filter(|t| t.is_finite());
        let upside = raw_target.map(|target| {
            if current_price > 0.0 {
                round_to((target - current_price) / current_price * 100.0, 1)
            } else {
                issues.push(CalculationIssue::ZeroPrice);
                0.0
            }
        });

        Self {
            method,
            target_price: raw_target.map(f64::round),
            upside,
            current_price,
            details,
            issues,
        }
    }

    /// Whether the estimate has a usable target price.
    pub fn has_target(&self) -> bool {
        self.target_price.is_some_and(|t| t > 0.0)
    }
}

/// Inputs shared by every estimator.
#[derive(Debug, Clone, Copy)]
pub struct ValuationInput<'a> {
    /// Fiscal year of `statement`, `None` when the record has no statements
    pub fiscal_year: Option<FiscalYear>,
    /// Latest annual statement
    pub statement: &'a AnnualStatement,
    /// Current market price (0 when unknown)
    pub current_price: f64,
    /// Estimated growth rates
    pub growth: &'a GrowthEstimate,
}

/// A fair value estimation method.
pub trait Estimator {
    /// Which method this is.
    fn method(&self) -> ValuationMethod;

    /// Estimate a target price. Never fails; recoveries are recorded as
    /// issues on the estimate.
    fn estimate(&self, input: &ValuationInput<'_>) -> ValuationEstimate;
}

/// Round to a number of decimals.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

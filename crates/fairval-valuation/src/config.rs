//! Valuation assumptions.

use crate::dcf::MAX_PROJECTION_YEARS;
use crate::sensitivity::SensitivityConfig;
use fairval_ratios::GrowthConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors for invalid valuation assumptions.
#[derive(Debug, Error)]
pub enum ValuationError {
    /// An assumption is outside its valid range
    #[error("Invalid assumption {name}: {reason}")]
    InvalidAssumption {
        /// Assumption name
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Valuation configuration
///
/// Every field has a default, so a partial JSON document only overrides the
/// assumptions it names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    /// PER of a company without growth (default: 15)
    pub base_per: f64,
    /// Discount rate (default: 0.11)
    pub wacc: f64,
    /// Growth beyond the projection horizon (default: 0.03)
    pub terminal_growth: f64,
    /// Number of projected years (default: 5)
    pub projection_years: u32,
    /// Share of net profit treated as free cash flow (default: 0.8)
    pub fcf_conversion: f64,
    /// Net debt subtracted from enterprise value, in statement units (default: 0)
    pub net_debt: f64,
    /// ROE in percent used when the latest year has none (default: 15)
    pub default_roe: f64,
    /// Growth estimation defaults
    pub growth: GrowthConfig,
    /// Sensitivity grid
    pub sensitivity: SensitivityConfig,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            base_per: 15.0,
            wacc: 0.11,
            terminal_growth: 0.03,
            projection_years: 5,
            fcf_conversion: 0.8,
            net_debt: 0.0,
            default_roe: 15.0,
            growth: GrowthConfig::default(),
            sensitivity: SensitivityConfig::default(),
        }
    }
}

impl ValuationConfig {
    /// Check that the assumptions are usable.
    ///
    /// A WACC that does not exceed terminal growth is accepted here; the DCF
    /// estimate reports it as a degenerate assumption instead.
    pub fn validate(&self) -> Result<(), ValuationError> {
        let finite = [
            ("base_per", self.base_per),
            ("wacc", self.wacc),
            ("terminal_growth", self.terminal_growth),
            ("fcf_conversion", self.fcf_conversion),
            ("net_debt", self.net_debt),
            ("default_roe", self.default_roe),
            ("growth.default_eps_growth", self.growth.default_eps_growth),
            ("growth.default_equity_growth", self.growth.default_equity_growth),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ValuationError::InvalidAssumption {
                    name,
                    reason: format!("{value} is not a finite number"),
                });
            }
        }

        if self.wacc <= -1.0 {
            return Err(ValuationError::InvalidAssumption {
                name: "wacc",
                reason: format!("{} must be greater than -1", self.wacc),
            });
        }
        if self.projection_years == 0 || self.projection_years > MAX_PROJECTION_YEARS {
            return Err(ValuationError::InvalidAssumption {
                name: "projection_years",
                reason: format!(
                    "{} must be between 1 and {MAX_PROJECTION_YEARS}",
                    self.projection_years
                ),
            });
        }
        Ok(())
    }
}

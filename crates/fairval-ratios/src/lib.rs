#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fairval/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod growth;
pub mod leverage;
pub mod liquidity;
pub mod profitability;
pub mod registry;
pub mod traits;
pub mod valuation;

pub use engine::{RatioEngine, compute_ratios};
pub use error::CalculationIssue;
pub use growth::{GrowthConfig, GrowthEstimate, GrowthEstimator, cagr};
pub use registry::{
    RatioInfo, all_ratios, available_ratios, count_by_category, get_ratio_info, ratio_map,
    ratios_by_category,
};
pub use traits::{Ratio, RatioContext};

// Re-export the result types so callers need a single import
pub use fairval_data::{RatioCategory, RatioKind, RatioResult, RatioSeries, RatioUnit};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fairval/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod aggregate;
pub mod config;
pub mod dcf;
pub mod engine;
pub mod estimate;
pub mod pbv;
pub mod per;
pub mod sensitivity;

// Re-export main types
pub use aggregate::{average_target_price, average_upside};
pub use config::{ValuationConfig, ValuationError};
pub use dcf::{
    DcfDetails, DcfEstimator, DcfProjection, DiscountedValue, MAX_PROJECTION_YEARS,
    discount_cash_flows,
};
pub use engine::{
    ValuationEngine, ValuationResult, compute_valuation, compute_valuation_with_config,
};
pub use estimate::{EstimateDetails, Estimator, ValuationEstimate, ValuationInput, ValuationMethod};
pub use pbv::{PbvDetails, PbvEstimator};
pub use per::{PerDetails, PerEstimator, fair_per};
pub use sensitivity::{SensitivityConfig, SensitivityTable};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fairval/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod backup;
pub mod csv_io;
pub mod error;
pub mod model;
pub mod ratio_table;
pub mod store;

pub use error::{DataError, Result};
pub use model::{
    AnnualSeries, AnnualStatement, CompanyInfo, FinancialRecord, FiscalYear, PER_SHARE_SCALE,
    PriceObservation, PriceSeries, per_share,
};
pub use ratio_table::{RatioCategory, RatioKind, RatioResult, RatioSeries, RatioUnit};
pub use store::{CachedStore, MemoryStore, RecordStore, SqliteStore};

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

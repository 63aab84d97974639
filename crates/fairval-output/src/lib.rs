#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fairval/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;
pub mod summary;

pub use export::{
    ExportError, ExportFormat, Exporter, RatioExport, RatioRow, ValuationRow, valuation_rows,
};
pub use report::{Report, ReportBuilder, ReportError};
pub use summary::{
    RatioSummary, ScreenRow, ScreenTable, ValuationSummary, format_price, format_upside,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fairval/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod manager;
pub mod sample;

// Re-export main types from sub-crates
pub use fairval_data as data;
pub use fairval_output as output;
pub use fairval_ratios as ratios;
pub use fairval_valuation as valuation;

pub use manager::{RecordManager, RecordUpdate};
pub use sample::{SAMPLE_TICKER, sample_record};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

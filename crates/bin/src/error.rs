//! CLI error type.

use fairval::data::DataError;
use fairval::output::{ExportError, ReportError};
use fairval::valuation::ValuationError;
use thiserror::Error;

/// Errors surfaced by the command-line interface.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Store or data error
    #[error(transparent)]
    Data(#[from] DataError),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Report error
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Invalid valuation assumptions
    #[error(transparent)]
    Valuation(#[from] ValuationError),

    /// Config file could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Progress bar template error
    #[error("Progress template error: {0}")]
    Progress(#[from] indicatif::style::TemplateError),

    /// Ratio category name not recognized
    #[error("Unknown ratio category: {0}")]
    UnknownCategory(String),

    /// Nothing to do for the given arguments
    #[error("{0}")]
    Usage(String),
}

pub(crate) type Result<T> = std::result::Result<T, CliError>;

//! Leverage ratios

use crate::traits::{Ratio, RatioContext, percent, safe_div};
use fairval_data::{AnnualStatement, RatioKind};

/// Debt to equity: total liabilities over equity, as a multiple.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebtToEquity;

impl Ratio for DebtToEquity {
    fn kind(&self) -> RatioKind {
        RatioKind::Der
    }

    fn required_fields(&self) -> &'static [&'static str] {
        &["total_liabilities", "equity"]
    }

    fn compute(&self, statement: &AnnualStatement, _ctx: &RatioContext) -> Option<f64> {
        safe_div(statement.total_liabilities?, statement.equity)
    }
}

/// Total liabilities over total assets, in percent.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebtToAssets;

impl Ratio for DebtToAssets {
    fn kind(&self) -> RatioKind {
        RatioKind::DebtToAssets
    }

    fn required_fields(&self) -> &'static [&'static str] {
        &["total_liabilities", "total_assets"]
    }

    fn compute(&self, statement: &AnnualStatement, _ctx: &RatioContext) -> Option<f64> {
        percent(statement.total_liabilities?, statement.total_assets)
    }
}

/// Operating income over interest expense, as a multiple.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterestCoverage;

impl Ratio for InterestCoverage {
    fn kind(&self) -> RatioKind {
        RatioKind::InterestCoverage
    }

    fn required_fields(&self) -> &'static [&'static str] {
        &["operating_income", "interest_expense"]
    }

    fn compute(&self, statement: &AnnualStatement, _ctx: &RatioContext) -> Option<f64> {
        safe_div(statement.operating_income?, statement.interest_expense?)
    }
}

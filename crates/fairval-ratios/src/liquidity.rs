//! Liquidity ratios - short-term obligations against short-term resources.
//!
//! All three ratios share the current-liabilities denominator and are
//! undefined when it is missing or not positive.

use crate::traits::{Ratio, RatioContext, safe_div};
use fairval_data::{AnnualStatement, RatioKind};

/// Current assets over current liabilities.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentRatio;

impl Ratio for CurrentRatio {
    fn kind(&self) -> RatioKind {
        RatioKind::CurrentRatio
    }

    fn required_fields(&self) -> &'static [&'static str] {
        &["current_assets", "current_liabilities"]
    }

    fn compute(&self, statement: &AnnualStatement, _ctx: &RatioContext) -> Option<f64> {
        safe_div(statement.current_assets?, statement.current_liabilities?)
    }
}

/// Current assets less inventory over current liabilities.
///
/// Missing inventory counts as zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuickRatio;

impl Ratio for QuickRatio {
    fn kind(&self) -> RatioKind {
        RatioKind::QuickRatio
    }

    fn required_fields(&self) -> &'static [&'static str] {
        &["current_assets", "inventory", "current_liabilities"]
    }

    fn compute(&self, statement: &AnnualStatement, _ctx: &RatioContext) -> Option<f64> {
        let quick_assets = statement.current_assets? - statement.inventory.unwrap_or(0.0);
        safe_div(quick_assets, statement.current_liabilities?)
    }
}

/// Cash over current liabilities.
#[derive(Debug, Clone, Copy, Default)]
pub struct CashRatio;

impl Ratio for CashRatio {
    fn kind(&self) -> RatioKind {
        RatioKind::CashRatio
    }

    fn required_fields(&self) -> &'static [&'static str] {
        &["cash", "current_liabilities"]
    }

    fn compute(&self, statement: &AnnualStatement, _ctx: &RatioContext) -> Option<f64> {
        safe_div(statement.cash?, statement.current_liabilities?)
    }
}

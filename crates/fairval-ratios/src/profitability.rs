//! Profitability ratios - how much of revenue, assets and equity turns into
//! profit.

use crate::traits::{Ratio, RatioContext, percent};
use fairval_data::{AnnualStatement, RatioKind};

/// Return on equity: net profit over equity, in percent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReturnOnEquity;

impl Ratio for ReturnOnEquity {
    fn kind(&self) -> RatioKind {
        RatioKind::Roe
    }

    fn required_fields(&self) -> &'static [&'static str] {
        &["net_profit", "equity"]
    }

    fn compute(&self, statement: &AnnualStatement, _ctx: &RatioContext) -> Option<f64> {
        percent(statement.net_profit, statement.equity)
    }
}

/// Return on assets: net profit over total assets, in percent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReturnOnAssets;

impl Ratio for ReturnOnAssets {
    fn kind(&self) -> RatioKind {
        RatioKind::Roa
    }

    fn required_fields(&self) -> &'static [&'static str] {
        &["net_profit", "total_assets"]
    }

    fn compute(&self, statement: &AnnualStatement, _ctx: &RatioContext) -> Option<f64> {
        percent(statement.net_profit, statement.total_assets)
    }
}

/// Gross profit over revenue, in percent.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrossMargin;

impl Ratio for GrossMargin {
    fn kind(&self) -> RatioKind {
        RatioKind::GrossMargin
    }

    fn required_fields(&self) -> &'static [&'static str] {
        &["gross_profit", "revenue"]
    }

    fn compute(&self, statement: &AnnualStatement, _ctx: &RatioContext) -> Option<f64> {
        percent(statement.gross_profit?, statement.revenue)
    }
}

/// Net profit over revenue, in percent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetMargin;

impl Ratio for NetMargin {
    fn kind(&self) -> RatioKind {
        RatioKind::NetMargin
    }

    fn required_fields(&self) -> &'static [&'static str] {
        &["net_profit", "revenue"]
    }

    fn compute(&self, statement: &AnnualStatement, _ctx: &RatioContext) -> Option<f64> {
        percent(statement.net_profit, statement.revenue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn statement() -> AnnualStatement {
        AnnualStatement::new(150_000.0, 40_000.0, 1_200_000.0, 250_000.0, 123_456.0)
    }

    #[test]
    fn test_roe_roa_margin() {
        let ctx = RatioContext::default();
        let stmt = statement();

        assert_relative_eq!(ReturnOnEquity.compute(&stmt, &ctx).unwrap(), 16.0);
        assert_relative_eq!(
            ReturnOnAssets.compute(&stmt, &ctx).unwrap(),
            40_000.0 / 1_200_000.0 * 100.0
        );
        assert_relative_eq!(
            NetMargin.compute(&stmt, &ctx).unwrap(),
            40_000.0 / 150_000.0 * 100.0
        );
    }

    #[test]
    fn test_zero_equity_is_undefined() {
        let mut stmt = statement();
        stmt.equity = 0.0;
        assert_eq!(ReturnOnEquity.compute(&stmt, &RatioContext::default()), None);

        stmt.equity = -10.0;
        assert_eq!(ReturnOnEquity.compute(&stmt, &RatioContext::default()), None);
    }

    #[test]
    fn test_gross_margin_needs_gross_profit() {
        let mut stmt = statement();
        assert_eq!(GrossMargin.compute(&stmt, &RatioContext::default()), None);

        stmt.gross_profit = Some(75_000.0);
        assert_relative_eq!(
            GrossMargin.compute(&stmt, &RatioContext::default()).unwrap(),
            50.0
        );
    }
}

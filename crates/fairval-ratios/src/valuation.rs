//! Valuation ratios
//!
//! These compare the latest market price against each year's per-share
//! fundamentals. They are only reported for tickers with price data; EPS is
//! grouped with them for that reason even though it does not read the price.

use crate::traits::{Ratio, RatioContext, percent, safe_div};
use fairval_data::{AnnualStatement, RatioKind};

/// Earnings per share in currency units.
#[derive(Debug, Clone, Copy, Default)]
pub struct EarningsPerShare;

impl Ratio for EarningsPerShare {
    fn kind(&self) -> RatioKind {
        RatioKind::Eps
    }

    fn required_fields(&self) -> &'static [&'static str] {
        &["net_profit", "shares_outstanding"]
    }

    fn requires_price(&self) -> bool {
        true
    }

    fn compute(&self, statement: &AnnualStatement, _ctx: &RatioContext) -> Option<f64> {
        statement.eps()
    }
}

/// Latest price over earnings per share.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceToEarnings;

impl Ratio for PriceToEarnings {
    fn kind(&self) -> RatioKind {
        RatioKind::Per
    }

    fn required_fields(&self) -> &'static [&'static str] {
        &["net_profit", "shares_outstanding"]
    }

    fn requires_price(&self) -> bool {
        true
    }

    fn compute(&self, statement: &AnnualStatement, ctx: &RatioContext) -> Option<f64> {
        safe_div(ctx.positive_price()?, statement.eps()?)
    }
}

/// Latest price over book value per share.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceToBook;

impl Ratio for PriceToBook {
    fn kind(&self) -> RatioKind {
        RatioKind::Pbv
    }

    fn required_fields(&self) -> &'static [&'static str] {
        &["equity", "shares_outstanding"]
    }

    fn requires_price(&self) -> bool {
        true
    }

    fn compute(&self, statement: &AnnualStatement, ctx: &RatioContext) -> Option<f64> {
        safe_div(ctx.positive_price()?, statement.bvps()?)
    }
}

/// Dividends per share over the latest price, in percent.
#[derive(Debug, Clone, Copy, Default)]
pub struct DividendYield;

impl Ratio for DividendYield {
    fn kind(&self) -> RatioKind {
        RatioKind::DividendYield
    }

    fn required_fields(&self) -> &'static [&'static str] {
        &["dividends", "shares_outstanding"]
    }

    fn requires_price(&self) -> bool {
        true
    }

    fn compute(&self, statement: &AnnualStatement, ctx: &RatioContext) -> Option<f64> {
        percent(statement.dividends_per_share()?, ctx.positive_price()?)
    }
}

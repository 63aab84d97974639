//! The [`Ratio`] trait and shared arithmetic helpers.

use fairval_data::{AnnualStatement, RatioCategory, RatioKind};
use std::fmt::Debug;

/// Ticker-wide inputs shared by every fiscal year.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RatioContext {
    /// Close of the most recent price observation
    pub latest_price: Option<f64>,
}

impl RatioContext {
    /// Context with a known latest price.
    pub const fn with_price(latest_price: f64) -> Self {
        Self {
            latest_price: Some(latest_price),
        }
    }

    /// Latest price if it is strictly positive.
    pub fn positive_price(&self) -> Option<f64> {
        self.latest_price.filter(|p| p.is_finite() && *p > 0.0)
    }
}

/// A financial ratio evaluated on one fiscal year.
pub trait Ratio: Debug + Send + Sync {
    /// Which ratio this is.
    fn kind(&self) -> RatioKind;

    /// Display name.
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Category of the ratio.
    fn category(&self) -> RatioCategory {
        self.kind().category()
    }

    /// Statement fields the ratio reads.
    fn required_fields(&self) -> &'static [&'static str];

    /// Whether the ratio needs a market price.
    fn requires_price(&self) -> bool {
        false
    }

    /// Compute the ratio, `None` when it is undefined.
    fn compute(&self, statement: &AnnualStatement, ctx: &RatioContext) -> Option<f64>;
}

/// `numerator / denominator`, `None` unless the denominator is positive and
/// the quotient finite.
pub fn safe_div(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator > 0.0 {
        let value = numerator / denominator;
        value.is_finite().then_some(value)
    } else {
        None
    }
}

/// [`safe_div`] expressed as a percentage.
pub fn percent(numerator: f64, denominator: f64) -> Option<f64> {
    safe_div(numerator, denominator).map(|v| v * 100.0)
}

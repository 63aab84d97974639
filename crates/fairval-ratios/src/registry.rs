//! Ratio Registry
//!
//! Central registry of every implemented ratio. Allows lookup of ratio
//! metadata by name or category and instantiation of the full ratio set.

use crate::leverage::{DebtToAssets, DebtToEquity, InterestCoverage};
use crate::liquidity::{CashRatio, CurrentRatio, QuickRatio};
use crate::profitability::{GrossMargin, NetMargin, ReturnOnAssets, ReturnOnEquity};
use crate::traits::Ratio;
use crate::valuation::{DividendYield, EarningsPerShare, PriceToBook, PriceToEarnings};
use fairval_data::{RatioCategory, RatioKind, RatioUnit};
use std::collections::HashMap;

/// Ratio metadata
#[derive(Debug, Clone)]
pub struct RatioInfo {
    /// Ratio kind
    pub kind: RatioKind,
    /// Ratio name (unique identifier)
    pub name: &'static str,
    /// Ratio category
    pub category: RatioCategory,
    /// Display unit
    pub unit: RatioUnit,
    /// Brief description of what the ratio measures
    pub description: &'static str,
    /// Statement fields read by the ratio
    pub required_fields: &'static [&'static str],
    /// Whether price data is needed
    pub requires_price: bool,
}

/// Every ratio implementation, in display order.
pub fn all_ratios() -> Vec<Box<dyn Ratio>> {
    vec![
        // Profitability
        Box::new(ReturnOnEquity),
        Box::new(ReturnOnAssets),
        Box::new(GrossMargin),
        Box::new(NetMargin),
        // Leverage
        Box::new(DebtToEquity),
        Box::new(DebtToAssets),
        Box::new(InterestCoverage),
        // Liquidity
        Box::new(CurrentRatio),
        Box::new(QuickRatio),
        Box::new(CashRatio),
        // Valuation
        Box::new(EarningsPerShare),
        Box::new(PriceToEarnings),
        Box::new(PriceToBook),
        Box::new(DividendYield),
    ]
}

const fn description(kind: RatioKind) -> &'static str {
    match kind {
        RatioKind::Roe => "Return on equity - net profit over shareholders equity",
        RatioKind::Roa => "Return on assets - net profit over total assets",
        RatioKind::GrossMargin => "Gross profit over revenue",
        RatioKind::NetMargin => "Net profit over revenue",
        RatioKind::Der => "Total liabilities over shareholders equity",
        RatioKind::DebtToAssets => "Total liabilities over total assets",
        RatioKind::InterestCoverage => "Operating income over interest expense",
        RatioKind::CurrentRatio => "Current assets over current liabilities",
        RatioKind::QuickRatio => "Current assets less inventory over current liabilities",
        RatioKind::CashRatio => "Cash over current liabilities",
        RatioKind::Eps => "Net profit per share",
        RatioKind::Per => "Latest price over earnings per share",
        RatioKind::Pbv => "Latest price over book value per share",
        RatioKind::DividendYield => "Dividends per share over latest price",
    }
}

/// Get all available ratio info
pub fn available_ratios() -> Vec<RatioInfo> {
    all_ratios()
        .iter()
        .map(|ratio| RatioInfo {
            kind: ratio.kind(),
            name: ratio.name(),
            category: ratio.category(),
            unit: ratio.kind().unit(),
            description: description(ratio.kind()),
            required_fields: ratio.required_fields(),
            requires_price: ratio.requires_price(),
        })
        .collect()
}

/// Get ratios by category
pub fn ratios_by_category(category: RatioCategory) -> Vec<RatioInfo> {
    available_ratios()
        .into_iter()
        .filter(|r| r.category == category)
        .collect()
}

/// Get ratio info by name (case-insensitive)
pub fn get_ratio_info(name: &str) -> Option<RatioInfo> {
    available_ratios()
        .into_iter()
        .find(|r| r.name.eq_ignore_ascii_case(name.trim()))
}

/// Get a map of all ratios indexed by name
pub fn ratio_map() -> HashMap<&'static str, RatioInfo> {
    available_ratios()
        .into_iter()
        .map(|r| (r.name, r))
        .collect()
}

/// Count ratios by category
pub fn count_by_category() -> HashMap<RatioCategory, usize> {
    let mut counts = HashMap::new();
    for ratio in available_ratios() {
        *counts.entry(ratio.category).or_insert(0) += 1;
    }
    counts
}

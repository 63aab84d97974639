//! Ratio result table.
//!
//! Ratios are stored as raw numbers; `None` marks a value that is undefined
//! for that year (a missing or non-positive denominator). Formatting into
//! strings such as `"16.0%"` or `"N/A"` happens only through
//! [`RatioResult::formatted`] and [`RatioResult::formatted_average`].

use crate::model::FiscalYear;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Placeholder shown for undefined values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Ratio categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RatioCategory {
    /// Profitability ratios (ROE, ROA, margins)
    Profitability,
    /// Leverage ratios (DER, debt to assets, interest coverage)
    Leverage,
    /// Liquidity ratios (current, quick, cash)
    Liquidity,
    /// Valuation ratios (EPS, PER, PBV, dividend yield)
    Valuation,
}

impl RatioCategory {
    /// All categories in display order.
    pub const fn all() -> [Self; 4] {
        [
            Self::Profitability,
            Self::Leverage,
            Self::Liquidity,
            Self::Valuation,
        ]
    }

    /// Lower-case category name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Profitability => "profitability",
            Self::Leverage => "leverage",
            Self::Liquidity => "liquidity",
            Self::Valuation => "valuation",
        }
    }

    /// Parse a category name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for RatioCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a ratio value is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatioUnit {
    /// Percentage, suffixed `%`
    Percent,
    /// Multiple, suffixed `x`
    Multiple,
    /// Currency per share, no suffix
    Currency,
}

impl RatioUnit {
    /// Display suffix for this unit.
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::Percent => "%",
            Self::Multiple => "x",
            Self::Currency => "",
        }
    }
}

/// Every ratio tracked per fiscal year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RatioKind {
    /// Return on equity
    #[serde(rename = "ROE")]
    Roe,
    /// Return on assets
    #[serde(rename = "ROA")]
    Roa,
    /// Gross margin
    #[serde(rename = "GrossMargin")]
    GrossMargin,
    /// Net margin
    #[serde(rename = "NetMargin")]
    NetMargin,
    /// Debt (total liabilities) to equity
    #[serde(rename = "DER")]
    Der,
    /// Total liabilities to total assets
    #[serde(rename = "DebtToAssets")]
    DebtToAssets,
    /// Operating income over interest expense
    #[serde(rename = "InterestCoverage")]
    InterestCoverage,
    /// Current assets over current liabilities
    #[serde(rename = "CurrentRatio")]
    CurrentRatio,
    /// Current assets less inventory over current liabilities
    #[serde(rename = "QuickRatio")]
    QuickRatio,
    /// Cash over current liabilities
    #[serde(rename = "CashRatio")]
    CashRatio,
    /// Earnings per share
    #[serde(rename = "EPS")]
    Eps,
    /// Price to earnings
    #[serde(rename = "PER")]
    Per,
    /// Price to book value
    #[serde(rename = "PBV")]
    Pbv,
    /// Dividend yield
    #[serde(rename = "DividendYield")]
    DividendYield,
}

impl RatioKind {
    /// All ratio kinds.
    pub const ALL: [Self; 14] = [
        Self::Roe,
        Self::Roa,
        Self::GrossMargin,
        Self::NetMargin,
        Self::Der,
        Self::DebtToAssets,
        Self::InterestCoverage,
        Self::CurrentRatio,
        Self::QuickRatio,
        Self::CashRatio,
        Self::Eps,
        Self::Per,
        Self::Pbv,
        Self::DividendYield,
    ];

    /// Display name, matching the serialized form.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Roe => "ROE",
            Self::Roa => "ROA",
            Self::GrossMargin => "GrossMargin",
            Self::NetMargin => "NetMargin",
            Self::Der => "DER",
            Self::DebtToAssets => "DebtToAssets",
            Self::InterestCoverage => "InterestCoverage",
            Self::CurrentRatio => "CurrentRatio",
            Self::QuickRatio => "QuickRatio",
            Self::CashRatio => "CashRatio",
            Self::Eps => "EPS",
            Self::Per => "PER",
            Self::Pbv => "PBV",
            Self::DividendYield => "DividendYield",
        }
    }

    /// Parse a ratio name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Unit the ratio is expressed in.
    pub const fn unit(&self) -> RatioUnit {
        match self {
            Self::Roe
            | Self::Roa
            | Self::GrossMargin
            | Self::NetMargin
            | Self::DebtToAssets
            | Self::DividendYield => RatioUnit::Percent,
            Self::Der
            | Self::InterestCoverage
            | Self::CurrentRatio
            | Self::QuickRatio
            | Self::CashRatio
            | Self::Per
            | Self::Pbv => RatioUnit::Multiple,
            Self::Eps => RatioUnit::Currency,
        }
    }

    /// Category the ratio belongs to.
    pub const fn category(&self) -> RatioCategory {
        match self {
            Self::Roe | Self::Roa | Self::GrossMargin | Self::NetMargin => {
                RatioCategory::Profitability
            }
            Self::Der | Self::DebtToAssets | Self::InterestCoverage => RatioCategory::Leverage,
            Self::CurrentRatio | Self::QuickRatio | Self::CashRatio => RatioCategory::Liquidity,
            Self::Eps | Self::Per | Self::Pbv | Self::DividendYield => RatioCategory::Valuation,
        }
    }

    /// Format a value of this ratio for display.
    pub fn format_value(&self, value: Option<f64>) -> String {
        match value {
            Some(v) if v.is_finite() => match self.unit() {
                RatioUnit::Currency => format!("{:.0}", v),
                unit => format!("{:.1}{}", v, unit.suffix()),
            },
            _ => NOT_AVAILABLE.to_string(),
        }
    }

    /// Format a multi-year average of this ratio for display.
    pub fn format_average(&self, value: Option<f64>) -> String {
        match value {
            Some(v) if v.is_finite() => format!("{:.1}{}", v, self.unit().suffix()),
            _ => NOT_AVAILABLE.to_string(),
        }
    }
}

impl fmt::Display for RatioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mean of the defined, finite values; `None` if there are none.
pub fn mean_defined<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    (count > 0).then(|| sum / count as f64)
}

/// Yearly values of one ratio plus their average.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioSeries {
    /// Value per fiscal year, `None` when undefined
    pub values: BTreeMap<FiscalYear, Option<f64>>,
    /// Mean of the defined yearly values
    pub average: Option<f64>,
}

impl RatioSeries {
    /// Build a series from yearly values, computing the average.
    ///
    /// Non-finite values are stored as `None`.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = (FiscalYear, Option<f64>)>,
    {
        let values: BTreeMap<_, _> = values
            .into_iter()
            .map(|(year, value)| (year, value.filter(|v| v.is_finite())))
            .collect();
        let average = mean_defined(values.values().copied());

        Self { values, average }
    }

    /// Value for a fiscal year.
    pub fn get(&self, year: FiscalYear) -> Option<f64> {
        self.values.get(&year).copied().flatten()
    }

    /// Number of years with a defined value.
    pub fn defined_count(&self) -> usize {
        self.values.values().filter(|v| v.is_some()).count()
    }
}

/// Ratios for every fiscal year of a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioResult {
    /// Series per ratio kind
    pub series: BTreeMap<RatioKind, RatioSeries>,
}

impl RatioResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the series of a ratio.
    pub fn insert(&mut self, kind: RatioKind, series: RatioSeries) {
        self.series.insert(kind, series);
    }

    /// Series of a ratio.
    pub fn get(&self, kind: RatioKind) -> Option<&RatioSeries> {
        self.series.get(&kind)
    }

    /// Value of a ratio for a fiscal year.
    pub fn value(&self, kind: RatioKind, year: FiscalYear) -> Option<f64> {
        self.get(kind).and_then(|series| series.get(year))
    }

    /// Multi-year average of a ratio.
    pub fn average(&self, kind: RatioKind) -> Option<f64> {
        self.get(kind).and_then(|series| series.average)
    }

    /// Display string of a ratio for a fiscal year, `"N/A"` if undefined.
    pub fn formatted(&self, kind: RatioKind, year: FiscalYear) -> String {
        kind.format_value(self.value(kind, year))
    }

    /// Display string of a ratio's average, `"N/A"` if undefined.
    pub fn formatted_average(&self, kind: RatioKind) -> String {
        kind.format_average(self.average(kind))
    }

    /// Ratio kinds present in the result.
    pub fn kinds(&self) -> impl Iterator<Item = RatioKind> + '_ {
        self.series.keys().copied()
    }

    /// Every fiscal year appearing in any series, ascending.
    pub fn years(&self) -> Vec<FiscalYear> {
        self.series
            .values()
            .flat_map(|series| series.values.keys().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Whether no ratios were computed.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

//! Human-readable summaries of ratio tables, valuations and screens.

use fairval_data::{RatioCategory, RatioResult, ratio_table::NOT_AVAILABLE};
use fairval_valuation::{EstimateDetails, ValuationResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format a target price in whole currency units.
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) if p.is_finite() => format!("{p:.0}"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Format an upside with an explicit sign and one decimal.
pub fn format_upside(upside: Option<f64>) -> String {
    match upside {
        Some(u) if u.is_finite() => format!("{u:+.1}%"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn format_rate(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Ratio table of one ticker, fiscal years as columns plus an average.
#[derive(Debug, Clone, Copy)]
pub struct RatioSummary<'a> {
    /// Ticker symbol.
    pub ticker: &'a str,

    /// Computed ratios.
    pub ratios: &'a RatioResult,
}

impl<'a> RatioSummary<'a> {
    /// Create a new ratio summary.
    pub const fn new(ticker: &'a str, ratios: &'a RatioResult) -> Self {
        Self { ticker, ratios }
    }

    /// Generate an ASCII table, one block per ratio category.
    pub fn to_ascii_table(&self) -> String {
        let years = self.ratios.years();
        let mut output = String::new();

        output.push_str(&format!("\nFinancial Ratios: {}\n", self.ticker));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        if self.ratios.is_empty() {
            output.push_str("\nNo ratios available.\n");
            return output;
        }

        for category in RatioCategory::all() {
            let kinds: Vec<_> = self
                .ratios
                .kinds()
                .filter(|k| k.category() == category)
                .collect();
            if kinds.is_empty() {
                continue;
            }

            output.push_str(&format!("\n{}:\n", capitalize(category.name())));
            output.push_str(&format!("{:<18}", "  Ratio"));
            for year in &years {
                output.push_str(&format!("{:>10}", year));
            }
            output.push_str(&format!("{:>10}\n", "Avg"));
            output.push_str(&"-".repeat(80));
            output.push('\n');

            for kind in kinds {
                output.push_str(&format!("  {:<16}", kind.name()));
                for &year in &years {
                    output.push_str(&format!("{:>10}", self.ratios.formatted(kind, year)));
                }
                output.push_str(&format!("{:>10}\n", self.ratios.formatted_average(kind)));
            }
        }

        output
    }

    /// Generate a Markdown table.
    pub fn to_markdown(&self) -> String {
        let years = self.ratios.years();
        let mut output = String::new();

        output.push_str(&format!("# Financial Ratios: {}\n\n", self.ticker));

        if self.ratios.is_empty() {
            output.push_str("_No ratios available._\n");
            return output;
        }

        output.push_str("| Ratio | Category |");
        for year in &years {
            output.push_str(&format!(" {year} |"));
        }
        output.push_str(" Avg |\n");
        output.push_str("|-------|----------|");
        for _ in &years {
            output.push_str("------|");
        }
        output.push_str("-----|\n");

        for kind in self.ratios.kinds() {
            output.push_str(&format!("| {} | {} |", kind.name(), kind.category().name()));
            for &year in &years {
                output.push_str(&format!(" {} |", self.ratios.formatted(kind, year)));
            }
            output.push_str(&format!(" {} |\n", self.ratios.formatted_average(kind)));
        }

        output
    }
}

impl fmt::Display for RatioSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ascii_table())
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Key inputs of an estimate, in one line.
fn key_inputs(details: &EstimateDetails) -> String {
    match details {
        EstimateDetails::Per(per) => format!(
            "EPS {} -> {}, fair PER {:.1}x",
            format_price(per.current_eps),
            format_price(per.projected_eps),
            per.fair_per
        ),
        EstimateDetails::Pbv(pbv) => format!(
            "BVPS {} -> {}, ROE {:.1}%{}, fair PBV {}",
            format_price(pbv.current_bvps),
            format_price(pbv.projected_bvps),
            pbv.roe,
            if pbv.roe_defaulted { " (default)" } else { "" },
            pbv.fair_pbv
                .map_or_else(|| NOT_AVAILABLE.to_string(), |m| format!("{m:.2}x"))
        ),
        EstimateDetails::Dcf(dcf) => format!(
            "FCF {:.0}, WACC {}, TG {}, EV {}",
            dcf.fcf,
            format_rate(dcf.wacc),
            format_rate(dcf.terminal_growth),
            format_price(dcf.enterprise_value)
        ),
    }
}

/// Full valuation summary of one ticker.
#[derive(Debug, Clone, Copy)]
pub struct ValuationSummary<'a> {
    /// Valuation to summarize.
    pub result: &'a ValuationResult,
}

impl<'a> ValuationSummary<'a> {
    /// Create a new valuation summary.
    pub const fn new(result: &'a ValuationResult) -> Self {
        Self { result }
    }

    fn title(&self) -> String {
        match self.result.fiscal_year {
            Some(year) => format!("{} (FY{year})", self.result.ticker),
            None => self.result.ticker.clone(),
        }
    }

    /// Generate an ASCII summary.
    pub fn to_ascii_table(&self) -> String {
        let result = self.result;
        let growth = &result.growth;
        let mut output = String::new();

        output.push_str(&format!("\nValuation Summary: {}\n", self.title()));
        output.push_str(&format!(
            "Current Price: {}\n",
            format_price(Some(result.current_price))
        ));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        output.push_str("\nGrowth Assumptions:\n");
        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "  EPS Growth:               {}{}\n",
            format_rate(growth.eps_growth),
            if growth.eps_defaulted { " (default)" } else { "" }
        ));
        output.push_str(&format!(
            "  Equity Growth:            {}{}\n",
            format_rate(growth.equity_growth),
            if growth.equity_defaulted { " (default)" } else { "" }
        ));
        output.push_str(&format!(
            "  FCF Growth:               {}\n",
            format_rate(growth.fcf_growth)
        ));

        output.push_str("\nEstimates:\n");
        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "  {:<8} {:>12} {:>10}  {}\n",
            "Method", "Target", "Upside", "Key Inputs"
        ));
        for estimate in result.estimates() {
            output.push_str(&format!(
                "  {:<8} {:>12} {:>10}  {}\n",
                estimate.method.name(),
                format_price(estimate.target_price),
                format_upside(estimate.upside),
                key_inputs(&estimate.details)
            ));
        }
        output.push_str(&format!(
            "  {:<8} {:>12} {:>10}\n",
            "Average",
            format_price(Some(result.average_target_price)),
            format_upside(Some(result.average_upside))
        ));

        let sensitivity = &result.sensitivity;
        if !sensitivity.is_empty() {
            output.push_str("\nSensitivity (target by EPS growth and PER):\n");
            output.push_str(&"-".repeat(80));
            output.push('\n');
            output.push_str(&format!("  {:<10}", "Growth"));
            for per in &sensitivity.per_multiples {
                output.push_str(&format!("{:>10}", format!("{per}x")));
            }
            output.push('\n');
            for (row, growth) in sensitivity.eps_growth_rates.iter().enumerate() {
                output.push_str(&format!("  {:<10}", format_rate(*growth)));
                for col in 0..sensitivity.per_multiples.len() {
                    output.push_str(&format!("{:>10}", format_price(sensitivity.price(row, col))));
                }
                output.push('\n');
            }
        }

        let issues: Vec<_> = result.issues().collect();
        if !issues.is_empty() {
            output.push_str("\nIssues:\n");
            output.push_str(&"-".repeat(80));
            output.push('\n');
            for issue in issues {
                output.push_str(&format!("  - {issue}\n"));
            }
        }

        output
    }

    /// Generate a Markdown summary.
    pub fn to_markdown(&self) -> String {
        let result = self.result;
        let growth = &result.growth;
        let mut output = String::new();

        output.push_str(&format!("# Valuation Summary: {}\n\n", self.title()));
        output.push_str(&format!(
            "**Current Price:** {}\n\n",
            format_price(Some(result.current_price))
        ));

        output.push_str("## Growth Assumptions\n\n");
        output.push_str(&format!("- **EPS Growth:** {}\n", format_rate(growth.eps_growth)));
        output.push_str(&format!(
            "- **Equity Growth:** {}\n",
            format_rate(growth.equity_growth)
        ));
        output.push_str(&format!("- **FCF Growth:** {}\n\n", format_rate(growth.fcf_growth)));

        output.push_str("## Estimates\n\n");
        output.push_str("| Method | Target | Upside | Key Inputs |\n");
        output.push_str("|--------|--------|--------|------------|\n");
        for estimate in result.estimates() {
            output.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                estimate.method.name(),
                format_price(estimate.target_price),
                format_upside(estimate.upside),
                key_inputs(&estimate.details)
            ));
        }
        output.push_str(&format!(
            "| **Average** | **{}** | **{}** | |\n",
            format_price(Some(result.average_target_price)),
            format_upside(Some(result.average_upside))
        ));

        let sensitivity = &result.sensitivity;
        if !sensitivity.is_empty() {
            output.push_str("\n## Sensitivity\n\n| Growth |");
            for per in &sensitivity.per_multiples {
                output.push_str(&format!(" {per}x |"));
            }
            output.push_str("\n|--------|");
            for _ in &sensitivity.per_multiples {
                output.push_str("-----|");
            }
            output.push('\n');
            for (row, growth) in sensitivity.eps_growth_rates.iter().enumerate() {
                output.push_str(&format!("| {} |", format_rate(*growth)));
                for col in 0..sensitivity.per_multiples.len() {
                    output.push_str(&format!(" {} |", format_price(sensitivity.price(row, col))));
                }
                output.push('\n');
            }
        }

        output
    }
}

impl fmt::Display for ValuationSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ascii_table())
    }
}

/// One line of a screen across tickers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenRow {
    /// Ticker symbol.
    pub ticker: String,

    /// Current market price.
    pub current_price: f64,

    /// PER target price.
    pub per_target: Option<f64>,

    /// PBV target price.
    pub pbv_target: Option<f64>,

    /// DCF target price.
    pub dcf_target: Option<f64>,

    /// Average target price.
    pub average_target_price: f64,

    /// Average upside in percent.
    pub average_upside: f64,
}

impl From<&ValuationResult> for ScreenRow {
    fn from(result: &ValuationResult) -> Self {
        Self {
            ticker: result.ticker.clone(),
            current_price: result.current_price,
            per_target: result.per.target_price,
            pbv_target: result.pbv.target_price,
            dcf_target: result.dcf.target_price,
            average_target_price: result.average_target_price,
            average_upside: result.average_upside,
        }
    }
}

/// Valuations of many tickers, one row each.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenTable {
    /// Screen rows.
    pub rows: Vec<ScreenRow>,
}

impl ScreenTable {
    /// Create an empty screen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a valuation.
    pub fn push(&mut self, result: &ValuationResult) {
        self.rows.push(ScreenRow::from(result));
    }

    /// Sort by average upside, highest first.
    pub fn sort_by_upside(&mut self) {
        self.rows
            .sort_by(|a, b| b.average_upside.total_cmp(&a.average_upside));
    }

    /// Keep rows whose average upside is at least `min_upside` percent.
    pub fn retain_min_upside(&mut self, min_upside: f64) {
        self.rows.retain(|row| row.average_upside >= min_upside);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the screen has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Generate an ASCII table.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str("\nValuation Screen\n");
        output.push_str(&"=".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "{:<8} {:>10} {:>10} {:>10} {:>10} {:>12} {:>10}\n",
            "Ticker", "Price", "PER", "PBV", "DCF", "Avg Target", "Upside"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<8} {:>10} {:>10} {:>10} {:>10} {:>12} {:>10}\n",
                row.ticker,
                format_price(Some(row.current_price)),
                format_price(row.per_target),
                format_price(row.pbv_target),
                format_price(row.dcf_target),
                format_price(Some(row.average_target_price)),
                format_upside(Some(row.average_upside))
            ));
        }

        output
    }

    /// Generate a Markdown table.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("# Valuation Screen\n\n");
        output.push_str("| Ticker | Price | PER | PBV | DCF | Avg Target | Upside |\n");
        output.push_str("|--------|-------|-----|-----|-----|------------|--------|\n");

        for row in &self.rows {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} |\n",
                row.ticker,
                format_price(Some(row.current_price)),
                format_price(row.per_target),
                format_price(row.pbv_target),
                format_price(row.dcf_target),
                format_price(Some(row.average_target_price)),
                format_upside(Some(row.average_upside))
            ));
        }

        output
    }
}

impl fmt::Display for ScreenTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ascii_table())
    }
}

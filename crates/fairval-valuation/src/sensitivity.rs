//! Sensitivity of the PER target to EPS growth and the PER multiple.

use serde::{Deserialize, Serialize};

/// Sensitivity grid configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensitivityConfig {
    /// EPS growth rates, one row each (default: 8% to 16% in 2% steps)
    pub eps_growth_rates: Vec<f64>,
    /// PER multiples, one column each (default: 14x to 18x)
    pub per_multiples: Vec<f64>,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            eps_growth_rates: vec![0.08, 0.10, 0.12, 0.14, 0.16],
            per_multiples: vec![14.0, 15.0, 16.0, 17.0, 18.0],
        }
    }
}

/// Projected prices over a grid of EPS growth rates and PER multiples.
///
/// `prices[row][col]` is `projected_eps × (1 + eps_growth_rates[row]) ×
/// per_multiples[col]`, rounded to whole units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensitivityTable {
    /// Projected EPS the grid is based on
    pub projected_eps: Option<f64>,
    /// Row labels
    pub eps_growth_rates: Vec<f64>,
    /// Column labels
    pub per_multiples: Vec<f64>,
    /// Grid of prices, empty when `projected_eps` is undefined
    pub prices: Vec<Vec<f64>>,
}

impl SensitivityTable {
    /// Build the grid from the PER estimate's projected EPS.
    pub fn build(projected_eps: Option<f64>, config: &SensitivityConfig) -> Self {
        let prices = projected_eps
            .map(|eps| {
                config
                    .eps_growth_rates
                    .iter()
                    .map(|g| {
                        config
                            .per_multiples
                            .iter()
                            .map(|per| (eps * (1.0 + g) * per).round())
                            .collect()
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            projected_eps,
            eps_growth_rates: config.eps_growth_rates.clone(),
            per_multiples: config.per_multiples.clone(),
            prices,
        }
    }

    /// Price for a growth row and PER column.
    pub fn price(&self, row: usize, col: usize) -> Option<f64> {
        self.prices.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Whether the grid has no prices.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

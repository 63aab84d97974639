//! Valuation engine
//!
//! Runs growth estimation, the three estimators, the aggregator and the
//! sensitivity grid for one record.

use crate::aggregate::aggregate;
use crate::config::ValuationConfig;
use crate::dcf::DcfEstimator;
use crate::estimate::{EstimateDetails, Estimator, ValuationEstimate, ValuationInput};
use crate::pbv::PbvEstimator;
use crate::per::PerEstimator;
use crate::sensitivity::SensitivityTable;
use fairval_data::{AnnualStatement, FinancialRecord, FiscalYear};
use fairval_ratios::{CalculationIssue, GrowthEstimate, GrowthEstimator};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

/// Complete valuation of one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    /// Ticker symbol
    pub ticker: String,
    /// Fiscal year the estimates are based on
    pub fiscal_year: Option<FiscalYear>,
    /// Current market price (0 when unknown)
    pub current_price: f64,
    /// Growth rates used by the estimators
    pub growth: GrowthEstimate,
    /// PER estimate
    pub per: ValuationEstimate,
    /// PBV estimate
    pub pbv: ValuationEstimate,
    /// DCF estimate
    pub dcf: ValuationEstimate,
    /// Mean of the positive target prices, rounded (0 if none)
    pub average_target_price: f64,
    /// Mean of the defined upsides, one decimal (0 if none)
    pub average_upside: f64,
    /// Projected prices over EPS growth and PER multiples
    pub sensitivity: SensitivityTable,
}

impl ValuationResult {
    /// The three estimates in report order.
    pub const fn estimates(&self) -> [&ValuationEstimate; 3] {
        [&self.per, &self.pbv, &self.dcf]
    }

    /// Every issue raised during growth estimation and by the estimators.
    pub fn issues(&self) -> impl Iterator<Item = &CalculationIssue> {
        self.growth
            .issues
            .iter()
            .chain(self.estimates().into_iter().flat_map(|e| e.issues.iter()))
    }
}

/// Runs the full valuation pipeline with one configuration.
#[derive(Debug, Clone, Default)]
pub struct ValuationEngine {
    config: ValuationConfig,
}

impl ValuationEngine {
    /// Create an engine.
    pub const fn new(config: ValuationConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub const fn config(&self) -> &ValuationConfig {
        &self.config
    }

    /// Value a record from its latest fiscal year and latest price.
    ///
    /// A record without price data is valued against a price of 0, so every
    /// defined upside is reported as 0.
    pub fn valuate(&self, record: &FinancialRecord) -> ValuationResult {
        let _span = info_span!("valuate", ticker = %record.ticker).entered();
        let config = &self.config;

        let growth = GrowthEstimator::new(config.growth.clone()).estimate(&record.annual);
        let empty = AnnualStatement::default();
        let (fiscal_year, statement) = record
            .latest_statement()
            .map_or((None, &empty), |(year, stmt)| (Some(year), stmt));
        let current_price = record.latest_price().unwrap_or(0.0);

        let input = ValuationInput {
            fiscal_year,
            statement,
            current_price,
            growth: &growth,
        };

        let per = PerEstimator::new(config.base_per).estimate(&input);
        let pbv = PbvEstimator::new(config.base_per, config.default_roe).estimate(&input);
        let dcf = DcfEstimator::default()
            .with_rates(config.wacc, config.terminal_growth)
            .with_horizon(config.projection_years)
            .with_fcf_conversion(config.fcf_conversion)
            .with_net_debt(config.net_debt)
            .estimate(&input);

        let (average_target_price, average_upside) = aggregate([&per, &pbv, &dcf]);

        let projected_eps = match &per.details {
            EstimateDetails::Per(details) => details.projected_eps,
            _ => None,
        };
        let sensitivity = SensitivityTable::build(projected_eps, &config.sensitivity);

        debug!(
            ?fiscal_year,
            current_price, average_target_price, average_upside, "valuation complete"
        );

        ValuationResult {
            ticker: record.ticker.clone(),
            fiscal_year,
            current_price,
            growth,
            per,
            pbv,
            dcf,
            average_target_price,
            average_upside,
            sensitivity,
        }
    }
}

/// Value a record with the default assumptions.
pub fn compute_valuation(record: &FinancialRecord) -> ValuationResult {
    ValuationEngine::default().valuate(record)
}

/// Value a record with custom assumptions.
pub fn compute_valuation_with_config(
    record: &FinancialRecord,
    config: &ValuationConfig,
) -> ValuationResult {
    ValuationEngine::new(config.clone()).valuate(record)
}

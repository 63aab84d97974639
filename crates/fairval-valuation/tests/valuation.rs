//! End-to-end valuation tests on a three-year bank record.

use approx::assert_relative_eq;
use fairval_data::{AnnualStatement, FinancialRecord, PriceObservation};
use fairval_valuation::{
    EstimateDetails, SensitivityConfig, ValuationConfig, compute_valuation,
    compute_valuation_with_config, discount_cash_flows, fair_per,
};

fn bbca() -> FinancialRecord {
    FinancialRecord::new("BBCA")
        .with_statement(
            2021,
            AnnualStatement::new(120_000.0, 31_000.0, 1_000_000.0, 200_000.0, 123_000.0),
        )
        .with_statement(
            2022,
            AnnualStatement::new(135_000.0, 36_000.0, 1_100_000.0, 230_000.0, 123_456.0),
        )
        .with_statement(
            2023,
            AnnualStatement::new(150_000.0, 40_000.0, 1_200_000.0, 250_000.0, 123_456.0),
        )
        .with_price(
            "2023-12-29".parse().unwrap(),
            PriceObservation::new(9550.0, Some(250_000_000)),
        )
        .with_price(
            "2023-12-28".parse().unwrap(),
            PriceObservation::new(9500.0, Some(230_000_000)),
        )
}

#[test]
fn test_per_estimate() {
    let result = compute_valuation(&bbca());
    let EstimateDetails::Per(per) = &result.per.details else {
        panic!("expected PER details");
    };

    let first_eps = 31_000.0_f64 * 1_000.0 / 123_000.0;
    let last_eps = 40_000.0_f64 * 1_000.0 / 123_456.0;
    let eps_growth = (last_eps / first_eps).powf(0.5) - 1.0;

    let current_eps = per.current_eps.unwrap();
    assert_relative_eq!(current_eps, 324.0, epsilon = 0.01);
    assert_relative_eq!(per.eps_growth, eps_growth, epsilon = 1e-12);
    assert_relative_eq!(per.fair_per, fair_per(eps_growth, 15.0), epsilon = 1e-9);

    let target = current_eps * (1.0 + per.eps_growth) * per.fair_per;
    assert_eq!(result.per.target_price, Some(target.round()));
    assert_eq!(result.current_price, 9550.0);
    assert_eq!(result.per.current_price, 9550.0);

    let upside = ((target - 9550.0) / 9550.0 * 100.0 * 10.0).round() / 10.0;
    assert_eq!(result.per.upside, Some(upside));
}

#[test]
fn test_pbv_uses_latest_roe() {
    let result = compute_valuation(&bbca());
    let EstimateDetails::Pbv(pbv) = &result.pbv.details else {
        panic!("expected PBV details");
    };

    assert_relative_eq!(pbv.roe, 16.0, epsilon = 1e-9);
    assert!(!pbv.roe_defaulted);
    let expected = 16.0 * fair_per(result.growth.eps_growth, 15.0)
        / (100.0 * (1.0 + result.growth.equity_growth));
    assert_relative_eq!(pbv.fair_pbv.unwrap(), expected, epsilon = 1e-9);
}

#[test]
fn test_dcf_matches_direct_discounting() {
    let result = compute_valuation(&bbca());
    let EstimateDetails::Dcf(dcf) = &result.dcf.details else {
        panic!("expected DCF details");
    };

    let base_fcf = 40_000.0 * 0.8;
    let value = discount_cash_flows(base_fcf, result.growth.fcf_growth, 0.11, 0.03, 5);
    let ev = value.enterprise_value.unwrap();

    assert_eq!(dcf.fcf, 32_000.0);
    assert_eq!(dcf.valuation.projections.len(), 5);
    assert_eq!(dcf.enterprise_value, Some(ev.round()));
    assert_eq!(
        result.dcf.target_price,
        Some((ev * 1_000.0 / 123_456.0).round())
    );
}

#[test]
fn test_averages() {
    let result = compute_valuation(&bbca());

    let targets: Vec<f64> = result
        .estimates()
        .iter()
        .filter_map(|e| e.target_price)
        .filter(|t| *t > 0.0)
        .collect();
    let mean = targets.iter().sum::<f64>() / targets.len() as f64;
    assert_eq!(result.average_target_price, mean.round());

    let upsides: Vec<f64> = result.estimates().iter().filter_map(|e| e.upside).collect();
    let mean = upsides.iter().sum::<f64>() / upsides.len() as f64;
    assert_relative_eq!(result.average_upside, (mean * 10.0).round() / 10.0);
}

#[test]
fn test_sensitivity_from_projected_eps() {
    let config = ValuationConfig {
        sensitivity: SensitivityConfig {
            eps_growth_rates: vec![0.10],
            per_multiples: vec![15.0, 16.0],
        },
        ..ValuationConfig::default()
    };
    let result = compute_valuation_with_config(&bbca(), &config);
    let EstimateDetails::Per(per) = &result.per.details else {
        panic!("expected PER details");
    };

    let projected = per.projected_eps.unwrap();
    assert_eq!(result.sensitivity.projected_eps, Some(projected));
    assert_eq!(
        result.sensitivity.prices,
        vec![vec![
            (projected * 1.1 * 15.0).round(),
            (projected * 1.1 * 16.0).round()
        ]]
    );
}

#[test]
fn test_result_serializes() {
    let result = compute_valuation(&bbca());
    let json = serde_json::to_string(&result).unwrap();

    assert!(json.contains("\"method\":\"PER\""));
    assert!(json.contains("\"average_target_price\""));
    let parsed: fairval_valuation::ValuationResult = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.per.target_price, result.per.target_price);
}

#[test]
fn test_wiped_out_equity_round_trips() {
    let record = FinancialRecord::new("WIPE")
        .with_statement(2022, AnnualStatement::new(0.0, 100.0, 0.0, 1_000.0, 10.0))
        .with_statement(2023, AnnualStatement::new(0.0, 100.0, 0.0, 0.0, 10.0))
        .with_price("2023-12-29".parse().unwrap(), PriceObservation::new(100.0, None));
    let result = compute_valuation(&record);
    let EstimateDetails::Pbv(pbv) = &result.pbv.details else {
        panic!("expected PBV details");
    };

    assert_eq!(result.growth.equity_growth, -1.0);
    assert_eq!(pbv.fair_pbv, None);
    assert_eq!(result.pbv.target_price, None);

    let json = serde_json::to_string(&result).unwrap();
    let parsed: fairval_valuation::ValuationResult = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, result);
}

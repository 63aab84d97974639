//! End-to-end ratio table tests.

use approx::assert_relative_eq;
use fairval_data::{AnnualStatement, FinancialRecord, PriceObservation, RatioKind};
use fairval_ratios::{GrowthEstimator, compute_ratios};

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
            "2023-12-28".parse().unwrap(),
            PriceObservation::new(9500.0, Some(230_000_000)),
        )
        .with_price(
            "2023-12-29".parse().unwrap(),
            PriceObservation::new(9550.0, Some(250_000_000)),
        )
}

#[test]
fn test_bbca_table() {
    let ratios = compute_ratios(&bbca());

    assert_eq!(ratios.formatted(RatioKind::Roe, 2023), "16.0%");
    assert_eq!(ratios.formatted(RatioKind::Roe, 2021), "15.5%");
    assert_relative_eq!(ratios.value(RatioKind::Eps, 2023).unwrap(), 324.0, epsilon = 0.01);
    assert_eq!(ratios.formatted(RatioKind::Eps, 2023), "324");
    assert_eq!(ratios.formatted(RatioKind::Per, 2023), "29.5x");
    assert_eq!(ratios.years(), vec![2021, 2022, 2023]);

    let roe_avg = (15.5 + 36_000.0 / 230_000.0 * 100.0 + 16.0) / 3.0;
    assert_relative_eq!(ratios.average(RatioKind::Roe).unwrap(), roe_avg, epsilon = 1e-9);
}

#[test]
fn test_table_never_contains_non_finite_values() {
    let mut record = bbca();
    record.annual.insert(2020, AnnualStatement::new(0.0, 5.0, 0.0, 0.0, 0.0));
    record.annual.insert(2019, AnnualStatement::default());

    let ratios = compute_ratios(&record);
    for kind in ratios.kinds() {
        let series = ratios.get(kind).unwrap();
        for value in series.values.values().flatten() {
            assert!(value.is_finite(), "{kind} produced {value}");
        }
        if let Some(average) = series.average {
            assert!(average.is_finite());
        }
    }

    assert_eq!(ratios.formatted(RatioKind::Roe, 2020), "N/A");
    assert_eq!(ratios.formatted(RatioKind::Per, 2019), "N/A");
}

#[test]
fn test_growth_uses_endpoints() {
    let estimate = GrowthEstimator::default().estimate(&bbca().annual);

    let first_eps: f64 = 31_000.0 * 1_000.0 / 123_000.0;
    let last_eps = 40_000.0 * 1_000.0 / 123_456.0;
    assert_eq!(estimate.span, 2);
    assert_relative_eq!(
        estimate.eps_growth,
        (last_eps / first_eps).powf(0.5) - 1.0,
        epsilon = 1e-12
    );
    assert_relative_eq!(
        estimate.equity_growth,
        (250_000.0_f64 / 200_000.0).powf(0.5) - 1.0,
        epsilon = 1e-12
    );
}

#[test]
fn test_input_record_unchanged() {
    let record = bbca();
    let before = record.clone();
    let first = compute_ratios(&record);
    let second = compute_ratios(&record);

    assert_eq!(record, before);
    assert_eq!(first, second);
}

//! Aggregation of the per-method estimates.
//!
//! Target prices and upsides are filtered independently: an estimate with a
//! non-positive target can still contribute its upside.

use crate::estimate::{ValuationEstimate, round_to};
use fairval_data::ratio_table::mean_defined;

/// Mean of the positive target prices, rounded; 0 when there are none.
pub fn average_target_price<I>(targets: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    mean_defined(targets.into_iter().map(|t| t.filter(|t| *t > 0.0)))
        .map_or(0.0, f64::round)
}

/// Mean of the defined finite upsides, one decimal; 0 when there are none.
pub fn average_upside<I>(upsides: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    mean_defined(upsides).map_or(0.0, |mean| round_to(mean, 1))
}

/// Averages over a set of estimates.
pub fn aggregate<'a, I>(estimates: I) -> (f64, f64)
where
    I: IntoIterator<Item = &'a ValuationEstimate> + Clone,
{
    (
        average_target_price(estimates.clone().into_iter().map(|e| e.target_price)),
        average_upside(estimates.into_iter().map(|e| e.upside)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[Some(0.0), Some(100.0), Some(200.0)], 150.0)]
    #[case(&[Some(-50.0), None, Some(101.0)], 101.0)]
    #[case(&[None, None, None], 0.0)]
    #[case(&[Some(0.0), Some(-1.0), None], 0.0)]
    #[case(&[Some(100.0), Some(101.0)], 101.0)]
    fn test_average_target_price(#[case] targets: &[Option<f64>], #[case] expected: f64) {
        assert_eq!(average_target_price(targets.iter().copied()), expected);
    }

    #[rstest]
    #[case(&[Some(10.0), None, Some(-4.0)], 3.0)]
    #[case(&[Some(f64::NAN), Some(12.34)], 12.3)]
    #[case(&[None], 0.0)]
    #[case(&[Some(0.0), Some(0.0), Some(30.0)], 10.0)]
    fn test_average_upside(#[case] upsides: &[Option<f64>], #[case] expected: f64) {
        assert_eq!(average_upside(upsides.iter().copied()), expected);
    }
}

//! Cross-sectional order statistics.

use ndarray::ArrayView1;

use crate::MathError;

/// Quantile with linear interpolation between closest ranks.
///
/// For sorted data `x` of length `n`, the quantile at `q` sits at position
/// `q * (n - 1)`; fractional positions interpolate between neighbours.
///
/// # Errors
/// Returns `MathError::EmptyData` on empty input, `MathError::InvalidQuantile`
/// if `q` is outside `[0, 1]`, and `MathError::NumericalInstability` if any
/// value is NaN.
pub fn quantile(data: ArrayView1<'_, f64>, q: f64) -> Result<f64, MathError> {
    let sorted = sorted_values(data)?;
    quantile_sorted(&sorted, q)
}

/// Several quantiles of the same data, sorting only once.
///
/// # Errors
/// Same as [`quantile`].
pub fn quantiles(data: ArrayView1<'_, f64>, qs: &[f64]) -> Result<Vec<f64>, MathError> {
    let sorted = sorted_values(data)?;
    qs.iter().map(|&q| quantile_sorted(&sorted, q)).collect()
}

fn sorted_values(data: ArrayView1<'_, f64>) -> Result<Vec<f64>, MathError> {
    if data.is_empty() {
        return Err(MathError::EmptyData);
    }
    if data.iter().any(|x| x.is_nan()) {
        return Err(MathError::NumericalInstability("NaN in quantile input".to_string()));
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(sorted)
}

fn quantile_sorted(sorted: &[f64], q: f64) -> Result<f64, MathError> {
    if !(0.0..=1.0).contains(&q) {
        return Err(MathError::InvalidQuantile(q));
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::{Array1, array};
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(array![3.0, 1.0, 2.0], 2.0)]
    #[case(array![4.0, 1.0, 3.0, 2.0], 2.5)]
    #[case(array![7.0], 7.0)]
    fn midpoint_averages_middle_values(#[case] data: Array1<f64>, #[case] expected: f64) {
        assert_relative_eq!(quantile(data.view(), 0.5).unwrap(), expected, epsilon = 1e-12);
    }

    #[rstest]
    #[case(0.3, 2.2)]
    #[case(0.7, 3.8)]
    #[case(0.0, 1.0)]
    #[case(1.0, 5.0)]
    fn linear_interpolation(#[case] q: f64, #[case] expected: f64) {
        let data = array![5.0, 1.0, 4.0, 2.0, 3.0];
        assert_relative_eq!(quantile(data.view(), q).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn quantiles_share_one_sort() {
        let data = array![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0];
        let qs = quantiles(data.view(), &[0.3, 0.7]).unwrap();
        assert_relative_eq!(qs[0], 37.0, epsilon = 1e-12);
        assert_relative_eq!(qs[1], 73.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_input_is_an_error() {
        let empty: Array1<f64> = array![];
        assert!(matches!(quantile(empty.view(), 0.5), Err(MathError::EmptyData)));
    }

    #[test]
    fn invalid_quantile_is_an_error() {
        let data = array![1.0, 2.0];
        assert!(matches!(quantile(data.view(), 1.5), Err(MathError::InvalidQuantile(_))));
    }

    #[test]
    fn nan_is_rejected() {
        let data = array![1.0, f64::NAN];
        assert!(quantile(data.view(), 0.5).is_err());
    }
}

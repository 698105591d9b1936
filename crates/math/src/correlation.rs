//! Pearson correlation.

use ndarray::{Array1, ArrayView1};

use crate::MathError;

/// Pearson correlation coefficient.
///
/// Returns `Ok(None)` with fewer than two observations or when either side has
/// zero variance.
///
/// # Errors
/// Returns `MathError::DimensionMismatch` if the lengths differ.
pub fn pearson(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> Result<Option<f64>, MathError> {
    if x.len() != y.len() {
        return Err(MathError::DimensionMismatch { expected: x.len(), actual: y.len() });
    }
    if x.len() < 2 {
        return Ok(None);
    }

    let (Some(mx), Some(my)) = (x.mean(), y.mean()) else {
        return Ok(None);
    };
    let dx = &x - mx;
    let dy = &y - my;
    let sxy = (&dx * &dy).sum();
    let sxx = dx.mapv(|v| v * v).sum();
    let syy = dy.mapv(|v| v * v).sum();

    let denom = (sxx * syy).sqrt();
    Ok((denom > 0.0).then(|| sxy / denom))
}

/// Keep only positions where both series are present.
#[must_use]
pub fn pairwise_complete(x: &[Option<f64>], y: &[Option<f64>]) -> (Array1<f64>, Array1<f64>) {
    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| match (a, b) {
            (Some(a), Some(b)) if a.is_finite() && b.is_finite() => Some((*a, *b)),
            _ => None,
        })
        .unzip();
    (Array1::from_vec(xs), Array1::from_vec(ys))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;

    use super::*;

    #[test]
    fn identical_series_correlate_perfectly() {
        let x = array![0.01, -0.02, 0.03, 0.005];
        assert_relative_eq!(pearson(x.view(), x.view()).unwrap().unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn scaling_does_not_change_correlation() {
        let x = array![0.01, -0.02, 0.03, 0.005];
        let y = &x * 100.0;
        assert_relative_eq!(pearson(x.view(), y.view()).unwrap().unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn negated_series_correlate_negatively() {
        let x = array![1.0, 2.0, 3.0];
        let y = array![3.0, 2.0, 1.0];
        assert_relative_eq!(pearson(x.view(), y.view()).unwrap().unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn known_value() {
        let x = array![1.0, 2.0, 3.0, 4.0];
        let y = array![1.0, 3.0, 2.0, 4.0];
        assert_relative_eq!(pearson(x.view(), y.view()).unwrap().unwrap(), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn constant_series_has_no_correlation() {
        let x = array![1.0, 1.0, 1.0];
        let y = array![1.0, 2.0, 3.0];
        assert_eq!(pearson(x.view(), y.view()).unwrap(), None);
    }

    #[test]
    fn too_few_observations() {
        let x = array![1.0];
        assert_eq!(pearson(x.view(), x.view()).unwrap(), None);
    }

    #[test]
    fn pairwise_complete_drops_gaps() {
        let x = [Some(1.0), None, Some(3.0), Some(4.0)];
        let y = [Some(2.0), Some(5.0), None, Some(8.0)];
        let (a, b) = pairwise_complete(&x, &y);
        assert_eq!(a, array![1.0, 4.0]);
        assert_eq!(b, array![2.0, 8.0]);
    }
}

//! Value-weighted averaging.

/// Running value-weighted mean.
///
/// Pairs with a non-finite value or weight are skipped, so a missing weight
/// never turns the whole average into NaN.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightedMean {
    weighted_sum: f64,
    total_weight: f64,
}

impl WeightedMean {
    /// Create an empty accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self { weighted_sum: 0.0, total_weight: 0.0 }
    }

    /// Add one value with its weight.
    pub fn push(&mut self, value: f64, weight: f64) {
        if value.is_finite() && weight.is_finite() {
            self.weighted_sum += value * weight;
            self.total_weight += weight;
        }
    }

    /// The weighted mean, or `None` when the total weight is zero.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        (self.total_weight != 0.0).then(|| self.weighted_sum / self.total_weight)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn mean_of(pairs: &[(f64, f64)]) -> Option<f64> {
        let mut acc = WeightedMean::new();
        for &(value, weight) in pairs {
            acc.push(value, weight);
        }
        acc.value()
    }

    #[test]
    fn weighted_by_market_value() {
        // 1% on 2m, 2% on 1m, 5% on 2m
        let mean = mean_of(&[(0.01, 2.0), (0.02, 1.0), (0.05, 2.0)]).unwrap();
        assert_relative_eq!(mean, 0.028, epsilon = 1e-12);
    }

    #[test]
    fn zero_total_weight_is_missing() {
        assert_eq!(mean_of(&[(0.01, 0.0), (0.02, 0.0)]), None);
    }

    #[test]
    fn empty_is_missing() {
        assert_eq!(WeightedMean::new().value(), None);
    }

    #[test]
    fn non_finite_pairs_are_skipped() {
        let mean = mean_of(&[(0.10, 1.0), (0.50, f64::NAN), (f64::NAN, 3.0)]).unwrap();
        assert_relative_eq!(mean, 0.10, epsilon = 1e-12);
    }
}

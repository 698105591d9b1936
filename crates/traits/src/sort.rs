//! Characteristic sort trait definitions.

use famafrench_primitives::BreakpointSet;

use crate::ConfigError;

/// A one-dimensional characteristic sort (size or book-to-market).
///
/// A sort names the quantiles that define its breakpoints and classifies a
/// characteristic value against a computed [`BreakpointSet`].
pub trait Sort {
    /// Bucket produced by this sort.
    type Bucket;

    /// Configuration type for this sort.
    type Config: Default + Clone;

    /// Create a new sort with the given configuration.
    fn with_config(config: Self::Config) -> Self
    where
        Self: Sized;

    /// Returns the configuration.
    fn config(&self) -> &Self::Config;

    /// Returns the name of the sorted characteristic.
    fn name(&self) -> &str;

    /// Quantiles of the reference universe used as breakpoints.
    fn quantiles(&self) -> Vec<f64>;

    /// Check the configuration.
    ///
    /// # Errors
    /// Returns `ConfigError` if a quantile is outside (0, 1) or quantiles are
    /// not strictly increasing.
    fn validate(&self) -> Result<(), ConfigError> {
        let quantiles = self.quantiles();
        if let Some(q) = quantiles.iter().find(|&&q| !(q > 0.0 && q < 1.0)) {
            return Err(ConfigError::invalid(
                self.name(),
                format!("breakpoint quantile {q} must be in (0, 1)"),
            ));
        }
        if quantiles.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::invalid(
                self.name(),
                "breakpoint quantiles must be strictly increasing",
            ));
        }
        Ok(())
    }

    /// Classify a value against the breakpoints of its rebalance month.
    fn classify(&self, value: f64, breakpoints: &BreakpointSet) -> Self::Bucket;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default)]
    struct Fixed(Vec<f64>);

    impl Sort for Fixed {
        type Bucket = bool;
        type Config = Vec<f64>;

        fn with_config(config: Self::Config) -> Self {
            Self(config)
        }

        fn config(&self) -> &Self::Config {
            &self.0
        }

        fn name(&self) -> &str {
            "fixed"
        }

        fn quantiles(&self) -> Vec<f64> {
            self.0.clone()
        }

        fn classify(&self, value: f64, breakpoints: &BreakpointSet) -> bool {
            value <= breakpoints.size_median
        }
    }

    #[test]
    fn validate_accepts_increasing_interior_quantiles() {
        assert!(Fixed::with_config(vec![0.3, 0.7]).validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range() {
        assert!(Fixed::with_config(vec![0.0]).validate().is_err());
        assert!(Fixed::with_config(vec![1.0]).validate().is_err());
        assert!(Fixed::with_config(vec![f64::NAN]).validate().is_err());
    }

    #[test]
    fn validate_rejects_unordered() {
        assert!(Fixed::with_config(vec![0.7, 0.3]).validate().is_err());
    }
}

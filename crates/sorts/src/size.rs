//! Size sort implementation.

use famafrench_primitives::{BreakpointSet, SizeBucket};
use famafrench_traits::Sort;
use serde::{Deserialize, Serialize};

/// Configuration for the size sort.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeConfig {
    /// Quantile of reference-universe market value splitting small from big.
    pub breakpoint: f64,
}

impl Default for SizeConfig {
    fn default() -> Self {
        Self { breakpoint: 0.5 }
    }
}

/// Size sort.
///
/// Securities at or below the median market value of the reference universe
/// are small, the rest are big.
#[derive(Debug, Clone)]
pub struct SizeSort {
    config: SizeConfig,
}

impl SizeSort {
    /// Create a new size sort with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SizeConfig::default())
    }
}

impl Default for SizeSort {
    fn default() -> Self {
        Self::new()
    }
}

impl Sort for SizeSort {
    type Bucket = SizeBucket;
    type Config = SizeConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn name(&self) -> &str {
        "size"
    }

    fn quantiles(&self) -> Vec<f64> {
        vec![self.config.breakpoint]
    }

    fn classify(&self, market_value: f64, breakpoints: &BreakpointSet) -> SizeBucket {
        if market_value <= breakpoints.size_median { SizeBucket::Small } else { SizeBucket::Big }
    }
}

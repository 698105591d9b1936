//! Book-to-market sort implementation.

use famafrench_primitives::{BreakpointSet, ValueBucket};
use famafrench_traits::Sort;
use serde::{Deserialize, Serialize};

/// Configuration for the book-to-market sort.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueConfig {
    /// Quantile separating low from medium.
    pub lower: f64,
    /// Quantile separating medium from high.
    pub upper: f64,
}

impl Default for ValueConfig {
    fn default() -> Self {
        Self { lower: 0.3, upper: 0.7 }
    }
}

/// Book-to-market sort.
///
/// Growth (low), neutral (medium), and value (high) terciles with 30/70
/// breakpoints from the reference universe.
#[derive(Debug, Clone)]
pub struct ValueSort {
    config: ValueConfig,
}

impl ValueSort {
    /// Create a new book-to-market sort with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ValueConfig::default())
    }
}

impl Default for ValueSort {
    fn default() -> Self {
        Self::new()
    }
}

impl Sort for ValueSort {
    type Bucket = ValueBucket;
    type Config = ValueConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn name(&self) -> &str {
        "book_to_market"
    }

    fn quantiles(&self) -> Vec<f64> {
        vec![self.config.lower, self.config.upper]
    }

    fn classify(&self, book_to_market: f64, breakpoints: &BreakpointSet) -> ValueBucket {
        if book_to_market <= breakpoints.bm_p30 {
            ValueBucket::Low
        } else if book_to_market <= breakpoints.bm_p70 {
            ValueBucket::Medium
        } else {
            ValueBucket::High
        }
    }
}

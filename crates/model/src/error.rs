//! Error types for factor construction.

use famafrench_math::MathError;
use famafrench_traits::ConfigError;

/// Errors that can occur while building factors.
///
/// Data-quality problems never surface here; they become missing values or
/// excluded records.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Invalid stage configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Math error.
    #[error("math error: {0}")]
    Math(#[from] MathError),
}

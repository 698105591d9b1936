//! Pipeline stage trait definitions.

use std::fmt;

/// The position of a stage in the factor construction pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StageKind {
    /// Accounting cleaning and book equity.
    Accounting,
    /// Security filtering and firm-level aggregation.
    Security,
    /// Lagged and prior-December market values.
    Alignment,
    /// Accounting to security join at rebalance.
    Merge,
    /// Breakpoints and bucket assignment.
    Breakpoints,
    /// Value-weighted portfolio returns.
    Portfolio,
    /// Correlation against a reference series.
    Validation,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accounting => write!(f, "accounting"),
            Self::Security => write!(f, "security"),
            Self::Alignment => write!(f, "alignment"),
            Self::Merge => write!(f, "merge"),
            Self::Breakpoints => write!(f, "breakpoints"),
            Self::Portfolio => write!(f, "portfolio"),
            Self::Validation => write!(f, "validation"),
        }
    }
}

/// One step of the pipeline: a pure function from borrowed input records to a
/// freshly built output record set.
///
/// Implementations never mutate their input and hold no state besides their
/// configuration, so running a stage twice on the same input yields the same
/// output.
pub trait Stage {
    /// Configuration type for this stage.
    type Config: Default + Clone;

    /// Borrowed input record set(s).
    type Input<'a>;

    /// Output record set.
    type Output;

    /// Error raised for invalid configuration.
    type Error: std::error::Error;

    /// Create a new stage with the given configuration.
    fn with_config(config: Self::Config) -> Self
    where
        Self: Sized;

    /// Returns the configuration.
    fn config(&self) -> &Self::Config;

    /// Returns which stage this is.
    fn kind(&self) -> StageKind;

    /// Transform the input into a new output record set.
    ///
    /// # Errors
    /// Returns an error only for invalid configuration; data-quality problems
    /// are represented as missing values or exclusions.
    fn run(&self, input: Self::Input<'_>) -> Result<Self::Output, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_kind_display() {
        assert_eq!(StageKind::Accounting.to_string(), "accounting");
        assert_eq!(StageKind::Breakpoints.to_string(), "breakpoints");
        assert_eq!(StageKind::Validation.to_string(), "validation");
    }
}

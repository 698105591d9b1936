#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/famafrench/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod accounting;
pub use accounting::AccountingPreprocessor;

mod security;
pub use security::{SecurityConfig, SecurityPanel, SecurityPreprocessor};

mod align;
pub use align::{AlignConfig, AlignedPanel, LagPolicy, TemporalAligner};

mod merge;
pub use merge::{AccountingSecurityMerger, MAX_REPORTING_LAG_MONTHS, MergeConfig};

mod breakpoints;
pub use breakpoints::{BreakpointConfig, BreakpointEngine, BucketPanel};

mod portfolio;
pub use portfolio::{FactorPanel, PortfolioAggregator, PortfolioConfig};

mod validation;
pub use validation::{ComparisonRow, ValidationConfig, ValidationReport, ValidationReporter};

mod pipeline;
pub use pipeline::{FactorPipeline, PipelineConfig, PipelineInputs, PipelineOutput};

mod error;
pub use error::ModelError;

/// Re-export commonly used types.
pub mod prelude {
    pub use famafrench_traits::{Stage, StageKind};

    pub use super::{FactorPipeline, ModelError, PipelineConfig, PipelineInputs, PipelineOutput};
}

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/famafrench/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod quantile;
pub use quantile::{quantile, quantiles};

mod weights;
pub use weights::WeightedMean;

mod correlation;
pub use correlation::{pairwise_complete, pearson};

mod error;
pub use error::MathError;

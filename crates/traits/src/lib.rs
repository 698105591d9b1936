#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/famafrench/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod stage;
pub use stage::{Stage, StageKind};

mod sort;
pub use sort::Sort;

mod error;
pub use error::ConfigError;

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/famafrench/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod parse;

mod read;
pub use read::{
    accounting_from_frame, read_accounting, read_csv, read_reference, read_securities,
    reference_from_frame, securities_from_frame,
};

mod export;
pub use export::{comparison_to_frame, counts_to_frame, factors_to_frame, write_csv};

mod error;
pub use error::DataError;

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/famafrench/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod ids;
pub use ids::{CompanyKey, FirmId, SecurityId};

mod calendar;
pub use calendar::{YearMonth, month_end};

mod accounting;
pub use accounting::{AccountingRecord, RawAccountingRecord};

mod security;
pub use security::{Exchange, FirmMonthRecord, MonthlyObservation, RawSecurityRecord, SecurityRecord};

mod bucket;
pub use bucket::{Assignment, BucketPair, SizeBucket, ValueBucket};

mod rebalance;
pub use rebalance::{BreakpointSet, BucketAssignment, RebalanceRecord, RebalanceSnapshot};

mod factor;
pub use factor::{BucketReturns, FirmCounts, MonthlyFactorRecord, ReferenceFactorRecord};

/// Re-export common date type.
pub type Date = chrono::NaiveDate;

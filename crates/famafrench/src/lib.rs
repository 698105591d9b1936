//! # famafrench
//!
//! Replication of the Fama-French (1993) size (SMB) and value (HML) factors
//! from security-month and annual accounting records.
//!
//! This crate re-exports the pipeline crates behind feature flags.
//!
//! ## Features
//!
//! - `full` (default): Enables all components
//! - `cli`: The `replicate` binary
//! - `primitives`: Record and identifier types
//! - `traits`: `Stage` and `Sort` abstractions
//! - `math`: Quantiles, weighted means, correlation
//! - `sorts`: Size and book-to-market sorts
//! - `model`: The staged factor pipeline
//! - `data`: CSV ingestion and export
//!
//! ## Example
//!
//! ```rust,ignore
//! use famafrench::data::{read_accounting, read_securities};
//! use famafrench::model::{FactorPipeline, PipelineConfig, PipelineInputs};
//!
//! let accounting = read_accounting("comp.csv")?;
//! let securities = read_securities("crsp_m.csv")?;
//! let output = FactorPipeline::with_config(PipelineConfig::default())?.run(PipelineInputs {
//!     accounting: &accounting,
//!     securities: &securities,
//!     reference: &[],
//! })?;
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(feature = "primitives")]
#[doc(inline)]
pub use famafrench_primitives as primitives;
#[cfg(feature = "traits")]
#[doc(inline)]
pub use famafrench_traits as traits;
#[cfg(feature = "math")]
#[doc(inline)]
pub use famafrench_math as math;
#[cfg(feature = "sorts")]
#[doc(inline)]
pub use famafrench_sorts as sorts;
#[cfg(feature = "model")]
#[doc(inline)]
pub use famafrench_model as model;
#[cfg(feature = "data")]
#[doc(inline)]
pub use famafrench_data as data;

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/edgar-trends/edgar-trends/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Table transformations: pivot, merge, ratio derivation, and trend-series
//! conversion.

/// Inner join of quarterly and annual tables.
pub mod merge;
/// Pivot flattened facts into fact-by-period tables.
pub mod pivot;
/// Ordered financial-ratio definitions and the engine applying them.
pub mod ratios;
/// Conversion of a finished table into persisted trend series.
pub mod trends;

pub use merge::merge_historical;
pub use pivot::{Dedup, annual_table, pivot_facts, quarterly_table};
pub use ratios::{RatioDefinition, SkippedRatio, apply_ratio_definitions, apply_ratios, standard_ratios};
pub use trends::financial_trends;

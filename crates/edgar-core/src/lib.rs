#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/edgar-trends/edgar-trends/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and traits for SEC EDGAR financial-trends processing.
//!
//! This crate provides the foundational pieces shared by the rest of the
//! workspace:
//!
//! - [`Ticker`](types::Ticker) - SEC-normalized ticker symbol
//! - [`Fact`](types::Fact) - one flattened XBRL disclosure
//! - [`FactTable`](types::FactTable) - fact-by-period table
//! - [`FilingReference`](types::FilingReference) - filing metadata
//! - [`DocumentStore`](store::DocumentStore) - persistence abstraction

/// Error types for EDGAR operations.
pub mod error;
/// Filing form types and reporting period categories.
pub mod forms;
/// Document-store trait for persisted company data.
pub mod store;
/// Core data types (Ticker, Fact, FactTable, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use error::{EdgarError, Result};
pub use forms::{FormType, PeriodType};
pub use store::DocumentStore;
pub use types::{
    CompanyDetails, CompanyFinancials, Fact, FactLabels, FactTable, FilingReference, FilingReport,
    Ticker, TrendPoint,
};

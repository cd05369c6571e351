#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/edgar-trends/edgar-trends/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! SEC EDGAR financial-trends pipeline.
//!
//! This crate ties the workspace together: it re-exports core types, the
//! EDGAR client, the table transformations and the store implementations,
//! and provides [`EdgarPipeline`] for running the full
//! fetch-derive-persist flow for one company.
//!
//! # Example
//!
//! ```rust,ignore
//! use edgar_trends::{EdgarPipeline, EdgarClient, SqliteStore, Ticker};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> edgar_trends::Result<()> {
//!     let client = EdgarClient::new("MyApp/1.0 (contact@example.com)");
//!     let store = Arc::new(SqliteStore::new("edgar.db")?);
//!     let pipeline = EdgarPipeline::new(client, store);
//!
//!     let ticker = Ticker::new("AAPL");
//!     pipeline.save_company_details(&ticker).await?;
//!     pipeline.save_financial_trends(&ticker).await?;
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use edgar_core::*;

// EDGAR API client
pub use edgar_client::EdgarClient;

// Table transformations
pub use edgar_pipeline::{
    Dedup, RatioDefinition, SkippedRatio, apply_ratios, financial_trends, merge_historical,
    standard_ratios,
};

// Narrative-section extraction
pub use edgar_reports::extract_report;

// Store implementations
pub use edgar_store::MemoryStore;
#[cfg(feature = "store-sqlite")]
pub use edgar_store::SqliteStore;

mod pipeline;
pub use pipeline::EdgarPipeline;

//! Error types for EDGAR operations.
//!
//! This module defines [`EdgarError`] which covers all error cases that can
//! occur when resolving tickers, fetching filings, transforming fact tables,
//! or persisting documents.

use thiserror::Error;

/// Errors that can occur during EDGAR data operations.
#[derive(Error, Debug)]
pub enum EdgarError {
    /// Network-related errors (connection failures, HTTP status errors).
    #[error("Network error: {0}")]
    Network(String),

    /// Error parsing data returned by the SEC.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error interacting with the document store.
    #[error("Store error: {0}")]
    Store(String),

    /// The ticker could not be resolved to a CIK.
    ///
    /// This is fatal for the invocation; there is no retry.
    #[error("Ticker not found in SEC company directory: {0}")]
    TickerNotFound(String),

    /// A requested document or filing does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias using [`EdgarError`].
pub type Result<T> = std::result::Result<T, EdgarError>;

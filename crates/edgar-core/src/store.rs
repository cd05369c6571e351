//! Document-store trait for persisted company data.
//!
//! This module defines the [`DocumentStore`] trait that gives the pipeline a
//! unified interface over its three document collections (companies,
//! financial trends, company reports) and the filing-blob store.

use async_trait::async_trait;

use crate::{
    error::Result,
    types::{CompanyDetails, CompanyFinancials, FilingReport, Ticker},
};

/// Trait for persisting pipeline output documents.
///
/// Implementations hold an explicit connection for the duration of the store
/// object; nothing is opened ambiently. Each method maps to one collection:
///
/// - companies: inserted once per ticker, duplicates skipped with a notice
/// - financial trends: upserted, later writes replace earlier ones wholesale
/// - company reports: upserted by file name
/// - report files: raw filing blobs, duplicates skipped
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a company document.
    ///
    /// Returns `Ok(false)` if a document for the ticker already exists; the
    /// existing document is left untouched.
    async fn put_company(&self, company: &CompanyDetails) -> Result<bool>;

    /// Retrieves a company document by ticker.
    async fn get_company(&self, ticker: &Ticker) -> Result<Option<CompanyDetails>>;

    /// Upserts the financial-trends document for a ticker.
    ///
    /// A later write replaces any earlier document wholesale.
    async fn upsert_financial_trends(&self, trends: &CompanyFinancials) -> Result<()>;

    /// Retrieves the financial-trends document for a ticker.
    async fn get_financial_trends(&self, ticker: &Ticker) -> Result<Option<CompanyFinancials>>;

    /// Upserts the extracted sections of one filing, keyed by file name.
    async fn put_report_sections(&self, report: &FilingReport) -> Result<()>;

    /// Retrieves extracted filing sections by file name.
    async fn get_report_sections(&self, file_name: &str) -> Result<Option<FilingReport>>;

    /// Stores a raw filing document blob.
    ///
    /// Returns `Ok(false)` if a blob with this file name already exists.
    async fn put_report_pdf(&self, file_name: &str, content: &[u8]) -> Result<bool>;

    /// Retrieves a raw filing document blob by file name.
    async fn get_report_pdf(&self, file_name: &str) -> Result<Option<Vec<u8>>>;
}

//! In-memory store implementation.

use async_trait::async_trait;
use edgar_core::{CompanyDetails, CompanyFinancials, DocumentStore, FilingReport, Result, Ticker};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

/// Simple in-memory document store for testing and development.
///
/// Documents are stored in `RwLock`-protected `HashMap`s and are lost when
/// the store is dropped. Documents are cloned on get/put operations.
#[derive(Debug, Default)]
pub struct MemoryStore {
    companies: RwLock<HashMap<String, CompanyDetails>>,
    trends: RwLock<HashMap<String, CompanyFinancials>>,
    reports: RwLock<HashMap<String, FilingReport>>,
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    #[instrument(skip(self, company), fields(ticker = %company.ticker))]
    async fn put_company(&self, company: &CompanyDetails) -> Result<bool> {
        // Key on the lowercase form regardless of how the document was
        // built, so lookups and duplicate detection agree.
        let key = company.ticker.to_lowercase();
        let mut companies = self.companies.write().await;
        if companies.contains_key(&key) {
            info!("Company already stored, skipping");
            return Ok(false);
        }
        companies.insert(key, company.clone());
        debug!("Stored company document");
        Ok(true)
    }

    #[instrument(skip(self), fields(ticker = %ticker))]
    async fn get_company(&self, ticker: &Ticker) -> Result<Option<CompanyDetails>> {
        let companies = self.companies.read().await;
        Ok(companies.get(&ticker.storage_key()).cloned())
    }

    #[instrument(skip(self, trends), fields(ticker = %trends.ticker))]
    async fn upsert_financial_trends(&self, trends: &CompanyFinancials) -> Result<()> {
        let mut store = self.trends.write().await;
        store.insert(trends.ticker.clone(), trends.clone());
        debug!("Upserted financial trends");
        Ok(())
    }

    #[instrument(skip(self), fields(ticker = %ticker))]
    async fn get_financial_trends(&self, ticker: &Ticker) -> Result<Option<CompanyFinancials>> {
        let store = self.trends.read().await;
        Ok(store.get(&ticker.storage_key()).cloned())
    }

    #[instrument(skip(self, report), fields(file_name = %report.file_name))]
    async fn put_report_sections(&self, report: &FilingReport) -> Result<()> {
        let mut reports = self.reports.write().await;
        reports.insert(report.file_name.clone(), report.clone());
        debug!("Upserted report sections");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_report_sections(&self, file_name: &str) -> Result<Option<FilingReport>> {
        let reports = self.reports.read().await;
        Ok(reports.get(file_name).cloned())
    }

    #[instrument(skip(self, content), fields(bytes = content.len()))]
    async fn put_report_pdf(&self, file_name: &str, content: &[u8]) -> Result<bool> {
        let mut blobs = self.blobs.write().await;
        if blobs.contains_key(file_name) {
            info!("Report file already stored, skipping");
            return Ok(false);
        }
        blobs.insert(file_name.to_string(), content.to_vec());
        debug!("Stored report file");
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn get_report_pdf(&self, file_name: &str) -> Result<Option<Vec<u8>>> {
        let blobs = self.blobs.read().await;
        Ok(blobs.get(file_name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company(ticker: &str, name: &str) -> CompanyDetails {
        CompanyDetails {
            ticker: ticker.to_string(),
            name: name.to_string(),
            sic: Some("3571".to_string()),
            sic_description: Some("Electronic Computers".to_string()),
        }
    }

    #[tokio::test]
    async fn test_company_inserted_once() {
        let store = MemoryStore::new();
        let ticker = Ticker::new("AAPL");

        assert!(store.put_company(&company("aapl", "Apple Inc.")).await.unwrap());
        // Second insert is skipped and leaves the original intact.
        assert!(!store.put_company(&company("aapl", "Renamed Corp")).await.unwrap());

        let stored = store.get_company(&ticker).await.unwrap().unwrap();
        assert_eq!(stored.name, "Apple Inc.");
    }

    #[tokio::test]
    async fn test_company_key_case_insensitive() {
        let store = MemoryStore::new();

        // A document built with an uppercase ticker still keys on the
        // lowercase form used by lookups.
        assert!(store.put_company(&company("AAPL", "Apple Inc.")).await.unwrap());
        assert!(!store.put_company(&company("aapl", "Duplicate")).await.unwrap());

        let stored = store.get_company(&Ticker::new("AAPL")).await.unwrap();
        assert_eq!(stored.unwrap().name, "Apple Inc.");
    }

    #[tokio::test]
    async fn test_trends_upsert_replaces_wholesale() {
        let store = MemoryStore::new();
        let ticker = Ticker::new("AAPL");

        let mut first = CompanyFinancials {
            ticker: "aapl".to_string(),
            ..CompanyFinancials::default()
        };
        first.financials.insert("Assets".to_string(), Vec::new());
        store.upsert_financial_trends(&first).await.unwrap();

        let second = CompanyFinancials {
            ticker: "aapl".to_string(),
            ..CompanyFinancials::default()
        };
        store.upsert_financial_trends(&second).await.unwrap();

        let stored = store.get_financial_trends(&ticker).await.unwrap().unwrap();
        assert!(stored.financials.is_empty());
    }

    #[tokio::test]
    async fn test_report_blob_immutable() {
        let store = MemoryStore::new();

        assert!(store.put_report_pdf("aapl_10-K_report.pdf", b"one").await.unwrap());
        assert!(!store.put_report_pdf("aapl_10-K_report.pdf", b"two").await.unwrap());

        let stored = store.get_report_pdf("aapl_10-K_report.pdf").await.unwrap();
        assert_eq!(stored.as_deref(), Some(b"one".as_slice()));
    }

    #[tokio::test]
    async fn test_missing_documents_read_as_none() {
        let store = MemoryStore::new();
        let ticker = Ticker::new("MSFT");

        assert!(store.get_company(&ticker).await.unwrap().is_none());
        assert!(store.get_financial_trends(&ticker).await.unwrap().is_none());
        assert!(store.get_report_sections("missing.pdf").await.unwrap().is_none());
        assert!(store.get_report_pdf("missing.pdf").await.unwrap().is_none());
    }
}

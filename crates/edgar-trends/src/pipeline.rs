//! Orchestrator running the fetch-derive-persist flow for one company.

use std::sync::Arc;

use edgar_client::EdgarClient;
use edgar_core::{DocumentStore, FactTable, FormType, PeriodType, Result, Ticker};
use edgar_pipeline::{
    annual_table, apply_ratios, financial_trends, merge_historical, quarterly_table,
};
use edgar_reports::extract_report;
use tracing::{info, instrument, warn};

/// Runs the EDGAR pipeline for individual companies.
///
/// Holds one API client and one document store for its lifetime. Every
/// method is a sequential flow over those two; nothing is fetched
/// concurrently and nothing is cached between invocations, so two calls
/// for the same ticker fetch the same upstream documents twice.
pub struct EdgarPipeline {
    client: EdgarClient,
    store: Arc<dyn DocumentStore>,
}

impl std::fmt::Debug for EdgarPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgarPipeline")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl EdgarPipeline {
    /// Create a pipeline over a client and a document store.
    #[must_use]
    pub fn new(client: EdgarClient, store: Arc<dyn DocumentStore>) -> Self {
        Self { client, store }
    }

    /// Assemble the merged quarterly/annual fact table for a company.
    ///
    /// Facts and filing history are each fetched once and reused for both
    /// period categories. The result keeps only facts disclosed in both
    /// series, with annual values winning on shared period labels.
    #[instrument(skip(self), fields(ticker = %ticker))]
    pub async fn historical_data(&self, ticker: &Ticker) -> Result<FactTable> {
        let (facts, labels) = self.client.company_facts(ticker).await?;
        let history = self.client.filing_history(ticker).await?;

        let quarterly_filings =
            edgar_client::filter_filings(&history, PeriodType::Quarterly.form_type());
        let annual_filings =
            edgar_client::filter_filings(&history, PeriodType::Annual.form_type());

        let quarterly = quarterly_table(&facts, &labels, &quarterly_filings);
        let annual = annual_table(&facts, &labels, &annual_filings);

        let merged = merge_historical(&quarterly, &annual);
        info!(
            facts = merged.fact_count(),
            periods = merged.periods().len(),
            "Assembled historical fact table"
        );
        Ok(merged)
    }

    /// Assemble the full company table: historical facts plus derived ratios.
    #[instrument(skip(self), fields(ticker = %ticker))]
    pub async fn company_table(&self, ticker: &Ticker) -> Result<FactTable> {
        let mut table = self.historical_data(ticker).await?;
        let skipped = apply_ratios(&mut table);
        if !skipped.is_empty() {
            warn!(skipped = skipped.len(), "Some ratios could not be derived");
        }
        Ok(table)
    }

    /// Fetch and persist the company's metadata document.
    ///
    /// Returns `Ok(false)` when a document for the ticker already exists;
    /// the stored document is left untouched.
    #[instrument(skip(self), fields(ticker = %ticker))]
    pub async fn save_company_details(&self, ticker: &Ticker) -> Result<bool> {
        let details = self.client.company_details(ticker).await?;
        self.store.put_company(&details).await
    }

    /// Build and persist the company's financial-trends document.
    ///
    /// A later run replaces the stored document wholesale.
    #[instrument(skip(self), fields(ticker = %ticker))]
    pub async fn save_financial_trends(&self, ticker: &Ticker) -> Result<()> {
        let table = self.company_table(ticker).await?;
        let trends = financial_trends(ticker, &table);
        self.store.upsert_financial_trends(&trends).await?;
        info!(series = trends.financials.len(), "Saved financial trends");
        Ok(())
    }

    /// Extract narrative sections from filing page text and persist them.
    ///
    /// The document is keyed by file name; re-running replaces it.
    #[instrument(skip(self, pages), fields(ticker = %ticker, pages = pages.len()))]
    pub async fn save_report_sections(
        &self,
        ticker: &Ticker,
        file_name: &str,
        pages: &[String],
    ) -> Result<()> {
        let report = extract_report(ticker, file_name, pages)?;
        self.store.put_report_sections(&report).await?;
        info!(sections = report.sections.len(), "Saved report sections");
        Ok(())
    }

    /// Persist a raw filing document under the conventional file name.
    ///
    /// Returns `Ok(false)` when a blob under that name already exists.
    #[instrument(skip(self, content), fields(ticker = %ticker, bytes = content.len()))]
    pub async fn save_report_pdf(
        &self,
        ticker: &Ticker,
        form: FormType,
        content: &[u8],
    ) -> Result<bool> {
        let file_name = report_file_name(ticker, form);
        self.store.put_report_pdf(&file_name, content).await
    }

    /// Return the archive URL of the company's latest filing of a form type.
    #[instrument(skip(self), fields(ticker = %ticker))]
    pub async fn latest_filing_url(
        &self,
        ticker: &Ticker,
        form: FormType,
    ) -> Result<Option<String>> {
        self.client.latest_filing_url(ticker, form).await
    }
}

/// Conventional blob file name for a stored filing document.
fn report_file_name(ticker: &Ticker, form: FormType) -> String {
    format!("{}_{}_report.pdf", ticker.storage_key(), form.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgar_store::MemoryStore;

    fn pipeline_with_store() -> (EdgarPipeline, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let client = EdgarClient::new("edgar-trends-tests/0.1 (dev@example.com)");
        (EdgarPipeline::new(client, store.clone()), store)
    }

    #[test]
    fn test_report_file_name_convention() {
        assert_eq!(
            report_file_name(&Ticker::new("AAPL"), FormType::TenK),
            "aapl_10-K_report.pdf"
        );
        assert_eq!(
            report_file_name(&Ticker::new("brk.b"), FormType::TenQ),
            "brk-b_10-Q_report.pdf"
        );
    }

    #[tokio::test]
    async fn test_save_report_pdf_skips_duplicates() {
        let (pipeline, store) = pipeline_with_store();
        let ticker = Ticker::new("AAPL");

        assert!(pipeline
            .save_report_pdf(&ticker, FormType::TenK, b"pdf-bytes")
            .await
            .unwrap());
        assert!(!pipeline
            .save_report_pdf(&ticker, FormType::TenK, b"other-bytes")
            .await
            .unwrap());

        let stored = store.get_report_pdf("aapl_10-K_report.pdf").await.unwrap();
        assert_eq!(stored.as_deref(), Some(b"pdf-bytes".as_slice()));
    }

    #[tokio::test]
    async fn test_save_report_sections_persists_extraction() {
        let (pipeline, store) = pipeline_with_store();
        let ticker = Ticker::new("ACME");
        let pages = vec![
            "Table of Contents\nItem 1. Business 3\n".to_string(),
            "ITEM 1. BUSINESS We sell widgets.".to_string(),
        ];

        pipeline
            .save_report_sections(&ticker, "acme_10-K_report.pdf", &pages)
            .await
            .unwrap();

        let report = store
            .get_report_sections("acme_10-K_report.pdf")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(report.ticker, "acme");
        assert!(report.sections["Business"].contains("widgets."));
    }
}

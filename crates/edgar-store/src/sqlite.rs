//! SQLite-based store implementation.

use async_trait::async_trait;
use chrono::Utc;
use edgar_core::{
    CompanyDetails, CompanyFinancials, DocumentStore, EdgarError, FilingReport, Result, Ticker,
};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

/// SQLite-backed document store for pipeline output.
///
/// Documents are serialized to JSON in per-collection tables; raw filing
/// documents go into a BLOB table. The connection is opened once when the
/// store is created and held for its lifetime.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SQLite store at the given path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or schema creation fails.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| EdgarError::Store(e.to_string()))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Create an in-memory SQLite store.
    ///
    /// Useful for testing; data is lost when the store is dropped.
    ///
    /// # Errors
    /// Returns an error if schema creation fails.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| EdgarError::Store(e.to_string()))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema.
    fn initialize_schema(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| EdgarError::Store(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS companies (
                ticker TEXT PRIMARY KEY,
                data_json TEXT NOT NULL,
                saved_at TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| EdgarError::Store(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS financial_trends (
                ticker TEXT PRIMARY KEY,
                data_json TEXT NOT NULL,
                saved_at TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| EdgarError::Store(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS company_reports (
                file_name TEXT PRIMARY KEY,
                ticker TEXT NOT NULL,
                data_json TEXT NOT NULL,
                saved_at TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| EdgarError::Store(e.to_string()))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_company_reports_ticker
             ON company_reports(ticker)",
            [],
        )
        .map_err(|e| EdgarError::Store(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS report_files (
                file_name TEXT PRIMARY KEY,
                content BLOB NOT NULL,
                saved_at TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| EdgarError::Store(e.to_string()))?;

        debug!("SQLite store schema initialized");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    #[instrument(skip(self, company), fields(ticker = %company.ticker))]
    async fn put_company(&self, company: &CompanyDetails) -> Result<bool> {
        let saved_at = Utc::now().to_rfc3339();
        let data_json =
            serde_json::to_string(company).map_err(|e| EdgarError::Parse(e.to_string()))?;

        let conn = self
            .conn
            .lock()
            .map_err(|e| EdgarError::Store(e.to_string()))?;

        // INSERT OR IGNORE leaves an existing document untouched; zero
        // changed rows means the ticker was already present. The key is
        // lowercased so lookups and duplicate detection agree.
        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO companies (ticker, data_json, saved_at)
                 VALUES (?1, ?2, ?3)",
                params![company.ticker.to_lowercase(), data_json, saved_at],
            )
            .map_err(|e| EdgarError::Store(e.to_string()))?;

        if inserted == 0 {
            info!("Company already stored, skipping");
            return Ok(false);
        }
        debug!("Stored company document");
        Ok(true)
    }

    #[instrument(skip(self), fields(ticker = %ticker))]
    async fn get_company(&self, ticker: &Ticker) -> Result<Option<CompanyDetails>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| EdgarError::Store(e.to_string()))?;

        let result = conn
            .query_row(
                "SELECT data_json FROM companies WHERE ticker = ?1",
                params![ticker.storage_key()],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|e| EdgarError::Store(e.to_string()))?;

        match result {
            Some(json) => {
                let company: CompanyDetails =
                    serde_json::from_str(&json).map_err(|e| EdgarError::Parse(e.to_string()))?;
                Ok(Some(company))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, trends), fields(ticker = %trends.ticker, series = trends.financials.len()))]
    async fn upsert_financial_trends(&self, trends: &CompanyFinancials) -> Result<()> {
        let saved_at = Utc::now().to_rfc3339();
        let data_json =
            serde_json::to_string(trends).map_err(|e| EdgarError::Parse(e.to_string()))?;

        let conn = self
            .conn
            .lock()
            .map_err(|e| EdgarError::Store(e.to_string()))?;

        conn.execute(
            "INSERT OR REPLACE INTO financial_trends (ticker, data_json, saved_at)
             VALUES (?1, ?2, ?3)",
            params![trends.ticker, data_json, saved_at],
        )
        .map_err(|e| EdgarError::Store(e.to_string()))?;

        debug!("Upserted financial trends");
        Ok(())
    }

    #[instrument(skip(self), fields(ticker = %ticker))]
    async fn get_financial_trends(&self, ticker: &Ticker) -> Result<Option<CompanyFinancials>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| EdgarError::Store(e.to_string()))?;

        let result = conn
            .query_row(
                "SELECT data_json FROM financial_trends WHERE ticker = ?1",
                params![ticker.storage_key()],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|e| EdgarError::Store(e.to_string()))?;

        match result {
            Some(json) => {
                let trends: CompanyFinancials =
                    serde_json::from_str(&json).map_err(|e| EdgarError::Parse(e.to_string()))?;
                Ok(Some(trends))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, report), fields(file_name = %report.file_name, sections = report.sections.len()))]
    async fn put_report_sections(&self, report: &FilingReport) -> Result<()> {
        let saved_at = Utc::now().to_rfc3339();
        let data_json =
            serde_json::to_string(report).map_err(|e| EdgarError::Parse(e.to_string()))?;

        let conn = self
            .conn
            .lock()
            .map_err(|e| EdgarError::Store(e.to_string()))?;

        conn.execute(
            "INSERT OR REPLACE INTO company_reports (file_name, ticker, data_json, saved_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![report.file_name, report.ticker, data_json, saved_at],
        )
        .map_err(|e| EdgarError::Store(e.to_string()))?;

        debug!("Upserted report sections");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_report_sections(&self, file_name: &str) -> Result<Option<FilingReport>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| EdgarError::Store(e.to_string()))?;

        let result = conn
            .query_row(
                "SELECT data_json FROM company_reports WHERE file_name = ?1",
                params![file_name],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|e| EdgarError::Store(e.to_string()))?;

        match result {
            Some(json) => {
                let report: FilingReport =
                    serde_json::from_str(&json).map_err(|e| EdgarError::Parse(e.to_string()))?;
                Ok(Some(report))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, content), fields(bytes = content.len()))]
    async fn put_report_pdf(&self, file_name: &str, content: &[u8]) -> Result<bool> {
        let saved_at = Utc::now().to_rfc3339();

        let conn = self
            .conn
            .lock()
            .map_err(|e| EdgarError::Store(e.to_string()))?;

        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO report_files (file_name, content, saved_at)
                 VALUES (?1, ?2, ?3)",
                params![file_name, content, saved_at],
            )
            .map_err(|e| EdgarError::Store(e.to_string()))?;

        if inserted == 0 {
            info!("Report file already stored, skipping");
            return Ok(false);
        }
        debug!("Stored report file");
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn get_report_pdf(&self, file_name: &str) -> Result<Option<Vec<u8>>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| EdgarError::Store(e.to_string()))?;

        let result = conn
            .query_row(
                "SELECT content FROM report_files WHERE file_name = ?1",
                params![file_name],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()
            .map_err(|e| EdgarError::Store(e.to_string()))?;

        Ok(result)
    }
}

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/edgar-trends/edgar-trends/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! SEC EDGAR client: CIK resolution, flattened company facts, and filing
//! metadata.
//!
//! # Example
//!
//! ```no_run
//! use edgar_client::EdgarClient;
//! use edgar_core::{PeriodType, Ticker};
//!
//! #[tokio::main]
//! async fn main() -> edgar_core::Result<()> {
//!     let client = EdgarClient::new("MyApp/1.0 (contact@example.com)");
//!
//!     let ticker = Ticker::new("AAPL");
//!     let (facts, labels) = client.company_facts(&ticker).await?;
//!     println!("{} disclosed values, {} labels", facts.len(), labels.len());
//!
//!     let filings = client.filtered_filings(&ticker, PeriodType::Annual).await?;
//!     println!("{} annual filings", filings.len());
//!
//!     Ok(())
//! }
//! ```

use chrono::NaiveDate;
use edgar_core::{
    CompanyDetails, EdgarError, Fact, FactLabels, FilingReference, FormType, PeriodType, Result,
    Ticker,
};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::debug;

/// SEC EDGAR API base URL
const EDGAR_BASE_URL: &str = "https://data.sec.gov";

/// SEC Archives base URL for filing documents
const EDGAR_ARCHIVES_URL: &str = "https://www.sec.gov/Archives/edgar/data";

/// SEC company tickers URL
const COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// XBRL taxonomy the pipeline reads facts from
const US_GAAP: &str = "us-gaap";

/// Default rate limit: 10 requests per second (SEC requirement)
const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(100);

/// Rate limiter to ensure we don't exceed SEC's rate limits
#[derive(Debug)]
struct RateLimiter {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Instant::now() - min_interval,
            min_interval,
        }
    }

    async fn wait(&mut self) {
        let elapsed = self.last_request.elapsed();
        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }
        self.last_request = Instant::now();
    }
}

/// SEC EDGAR client.
///
/// Fetches company facts and filing metadata from the EDGAR API.
/// Implements rate limiting per SEC requirements (max 10 requests/second).
/// All calls are sequential blocking awaits; nothing is fetched concurrently.
#[derive(Debug)]
pub struct EdgarClient {
    client: reqwest::Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
}

impl EdgarClient {
    /// Create a new EDGAR client with the specified user agent.
    ///
    /// The SEC requires identifying user agent headers. Format should be:
    /// "AppName/Version (contact@email.com)"
    ///
    /// # Panics
    /// Panics if the underlying HTTP client cannot be constructed, which only
    /// happens with an invalid user agent string.
    #[must_use]
    pub fn new(user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self::with_client(client)
    }

    /// Create a new EDGAR client with a custom pre-configured HTTP client.
    ///
    /// The client must already carry the SEC-required user agent.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(DEFAULT_RATE_LIMIT))),
        }
    }

    /// Look up a company's CIK number from its ticker symbol.
    ///
    /// The ticker is matched exactly against the SEC company-ticker
    /// directory (the [`Ticker`] type already applies the directory's
    /// normalization). Fails with [`EdgarError::TickerNotFound`] when no
    /// entry matches.
    ///
    /// # Returns
    /// The company's CIK number as a zero-padded 10-digit string.
    pub async fn get_cik(&self, ticker: &Ticker) -> Result<String> {
        if ticker.as_str().is_empty() {
            return Err(EdgarError::InvalidParameter("Empty ticker".to_string()));
        }

        self.rate_limiter.lock().await.wait().await;

        debug!("Fetching company tickers from SEC");
        let response = self
            .client
            .get(COMPANY_TICKERS_URL)
            .send()
            .await
            .map_err(|e| EdgarError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EdgarError::Network(format!(
                "Failed to fetch company tickers: HTTP {}",
                response.status()
            )));
        }

        let data: HashMap<String, CompanyTickerInfo> = response
            .json()
            .await
            .map_err(|e| EdgarError::Parse(format!("Failed to parse company tickers: {}", e)))?;

        for company in data.values() {
            if company.ticker == ticker.as_str() {
                // CIK is zero-padded to 10 digits in all EDGAR URLs
                let cik = format!("{:0>10}", company.cik_str);
                debug!("Found CIK {} for ticker {}", cik, ticker);
                return Ok(cik);
            }
        }

        Err(EdgarError::TickerNotFound(ticker.to_string()))
    }

    /// Fetch and flatten a company's XBRL facts.
    ///
    /// Every (fact, unit, reporting-period item) triple of the `us-gaap`
    /// taxonomy becomes one [`Fact`]. Duplicate rows sharing
    /// (name, period end, value) are dropped, keeping the first occurrence.
    ///
    /// Returns the flattened facts plus the fact-key → human-readable label
    /// mapping used later to rename pivoted rows.
    pub async fn company_facts(&self, ticker: &Ticker) -> Result<(Vec<Fact>, FactLabels)> {
        let cik = self.get_cik(ticker).await?;
        let response = self.fetch_company_facts(&cik).await?;
        Ok(flatten_facts(&response))
    }

    /// Fetch the company's recent filing history.
    ///
    /// Entries whose report date is empty or unparsable are skipped; they
    /// could never match a fact's reporting period downstream.
    pub async fn filing_history(&self, ticker: &Ticker) -> Result<Vec<FilingReference>> {
        let cik = self.get_cik(ticker).await?;
        let submissions = self.fetch_submissions(&cik).await?;
        Ok(filings_from_submissions(&submissions))
    }

    /// Fetch the filing history filtered to one reporting period category.
    ///
    /// Zero matches is not an error; downstream joins simply come up empty.
    pub async fn filtered_filings(
        &self,
        ticker: &Ticker,
        period_type: PeriodType,
    ) -> Result<Vec<FilingReference>> {
        let history = self.filing_history(ticker).await?;
        Ok(filter_filings(&history, period_type.form_type()))
    }

    /// Fetch company metadata (name, SIC code and description).
    pub async fn company_details(&self, ticker: &Ticker) -> Result<CompanyDetails> {
        let cik = self.get_cik(ticker).await?;
        let submissions = self.fetch_submissions(&cik).await?;

        Ok(CompanyDetails {
            ticker: ticker.storage_key(),
            name: submissions.name.clone(),
            sic: submissions.sic.clone(),
            sic_description: submissions.sic_description.clone(),
        })
    }

    /// Return the archive URL of the company's latest filing of a form type.
    ///
    /// Walks the recent filing list in submission order and returns the URL
    /// of the first filing whose form matches exactly, or `None` if the
    /// company has no filing of that form.
    pub async fn latest_filing_url(
        &self,
        ticker: &Ticker,
        form: FormType,
    ) -> Result<Option<String>> {
        let cik = self.get_cik(ticker).await?;
        let submissions = self.fetch_submissions(&cik).await?;
        let recent = &submissions.filings.recent;

        for ((form_str, accn), primary_doc) in recent
            .form
            .iter()
            .zip(recent.accession_number.iter())
            .zip(recent.primary_document.iter())
        {
            if form_str == form.as_str() {
                return Ok(Some(archive_url(&cik, accn, primary_doc)));
            }
        }

        Ok(None)
    }

    /// Fetch the raw company facts document for a CIK.
    async fn fetch_company_facts(&self, cik: &str) -> Result<CompanyFactsResponse> {
        self.rate_limiter.lock().await.wait().await;

        let url = format!("{}/api/xbrl/companyfacts/CIK{}.json", EDGAR_BASE_URL, cik);

        debug!("Fetching company facts from {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| EdgarError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EdgarError::Network(format!(
                "Failed to fetch company facts for CIK {}: HTTP {}",
                cik,
                response.status()
            )));
        }

        let facts: CompanyFactsResponse = response
            .json()
            .await
            .map_err(|e| EdgarError::Parse(format!("Failed to parse company facts: {}", e)))?;

        Ok(facts)
    }

    /// Fetch company submissions/filings metadata for a CIK.
    async fn fetch_submissions(&self, cik: &str) -> Result<CompanySubmissions> {
        self.rate_limiter.lock().await.wait().await;

        let url = format!("{}/submissions/CIK{}.json", EDGAR_BASE_URL, cik);

        debug!("Fetching company submissions from {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| EdgarError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EdgarError::Network(format!(
                "Failed to fetch company submissions for CIK {}: HTTP {}",
                cik,
                response.status()
            )));
        }

        let submissions: CompanySubmissions = response
            .json()
            .await
            .map_err(|e| EdgarError::Parse(format!("Failed to parse submissions: {}", e)))?;

        Ok(submissions)
    }
}

/// Filter a filing history down to one exact form type.
#[must_use]
pub fn filter_filings(history: &[FilingReference], form: FormType) -> Vec<FilingReference> {
    history
        .iter()
        .filter(|f| f.form_type == form.as_str())
        .cloned()
        .collect()
}

/// Flatten a company facts response into rows plus the label mapping.
fn flatten_facts(response: &CompanyFactsResponse) -> (Vec<Fact>, FactLabels) {
    let mut facts = Vec::new();
    let mut labels = FactLabels::new();
    let mut seen: HashSet<(String, NaiveDate, u64)> = HashSet::new();

    let Some(taxonomy) = response.facts.get(US_GAAP) else {
        return (facts, labels);
    };

    for (fact_key, tag_facts) in taxonomy {
        labels.insert(
            fact_key.clone(),
            tag_facts.label.clone().unwrap_or_else(|| fact_key.clone()),
        );

        let Some(units) = &tag_facts.units else {
            continue;
        };

        for (unit, values) in units {
            for value in values {
                let Ok(period_end) = NaiveDate::parse_from_str(&value.end, "%Y-%m-%d") else {
                    continue;
                };

                // Drop duplicate (fact, period end, value) rows; first wins.
                if !seen.insert((fact_key.clone(), period_end, value.val.to_bits())) {
                    continue;
                }

                facts.push(Fact::new(
                    fact_key.clone(),
                    period_end,
                    value.val,
                    value.accn.clone().unwrap_or_default(),
                    unit.clone(),
                ));
            }
        }
    }

    debug!(
        "Flattened {} facts across {} concepts",
        facts.len(),
        labels.len()
    );
    (facts, labels)
}

/// Convert a submissions response into typed filing references.
fn filings_from_submissions(submissions: &CompanySubmissions) -> Vec<FilingReference> {
    let recent = &submissions.filings.recent;
    let mut filings = Vec::new();

    for (((form, accn), report_date), primary_doc) in recent
        .form
        .iter()
        .zip(recent.accession_number.iter())
        .zip(recent.report_date.iter())
        .zip(recent.primary_document.iter())
    {
        let Ok(report_date) = NaiveDate::parse_from_str(report_date, "%Y-%m-%d") else {
            continue;
        };

        filings.push(FilingReference {
            report_date,
            accession_number: accn.clone(),
            form_type: form.clone(),
            primary_document: primary_doc.clone(),
        });
    }

    filings
}

/// Build the archive URL for one filing's primary document.
fn archive_url(cik: &str, accession_number: &str, primary_document: &str) -> String {
    format!(
        "{}/{}/{}/{}",
        EDGAR_ARCHIVES_URL,
        cik,
        accession_number.replace('-', ""),
        primary_document
    )
}

// =============================================================================
// SEC API Response Types
// =============================================================================

/// Company ticker information from SEC JSON.
#[derive(Debug, Deserialize)]
struct CompanyTickerInfo {
    /// CIK as a number (SEC returns this as an integer)
    cik_str: u64,
    /// Ticker symbol
    ticker: String,
    /// Company name
    #[allow(dead_code)]
    title: String,
}

/// Response from the SEC EDGAR Company Facts API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompanyFactsResponse {
    /// CIK number
    #[allow(dead_code)]
    cik: u64,
    /// Entity name
    #[allow(dead_code)]
    entity_name: String,
    /// Facts organized by taxonomy and tag
    facts: HashMap<String, HashMap<String, TagFacts>>,
}

/// Facts for a specific XBRL tag.
#[derive(Debug, Deserialize)]
struct TagFacts {
    /// Human-readable label
    label: Option<String>,
    /// Description
    #[allow(dead_code)]
    description: Option<String>,
    /// Units (USD, shares, etc.) containing the actual fact values
    units: Option<HashMap<String, Vec<FactValue>>>,
}

/// A single fact value with metadata.
#[derive(Debug, Clone, Deserialize)]
struct FactValue {
    /// End date of the period
    end: String,
    /// Value
    val: f64,
    /// Accession number
    #[serde(default)]
    accn: Option<String>,
    /// Start date of the period
    #[serde(default)]
    #[allow(dead_code)]
    start: Option<String>,
    /// Form type
    #[serde(default)]
    #[allow(dead_code)]
    form: Option<String>,
    /// Filed date
    #[serde(default)]
    #[allow(dead_code)]
    filed: Option<String>,
}

/// Company submissions/filings metadata.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompanySubmissions {
    /// Company name
    name: String,
    /// SIC code
    #[serde(default)]
    sic: Option<String>,
    /// SIC description
    #[serde(default)]
    sic_description: Option<String>,
    /// Filing lists
    filings: Filings,
}

/// Filing lists within a submissions response.
#[derive(Debug, Deserialize)]
struct Filings {
    /// Most recent filings as parallel arrays.
    recent: RecentFilings,
}

/// Recent filings: EDGAR returns parallel arrays, one entry per filing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecentFilings {
    form: Vec<String>,
    accession_number: Vec<String>,
    report_date: Vec<String>,
    primary_document: Vec<String>,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn facts_fixture() -> CompanyFactsResponse {
        serde_json::from_str(
            r#"{
                "cik": 320193,
                "entityName": "Apple Inc.",
                "facts": {
                    "us-gaap": {
                        "Assets": {
                            "label": "Assets",
                            "description": "Total assets",
                            "units": {
                                "USD": [
                                    {"end": "2023-09-30", "val": 352583000000.0, "accn": "0000320193-23-000106"},
                                    {"end": "2023-09-30", "val": 352583000000.0, "accn": "0000320193-24-000010"},
                                    {"end": "2022-09-24", "val": 352755000000.0, "accn": "0000320193-22-000108"}
                                ]
                            }
                        },
                        "NetIncomeLoss": {
                            "label": "Net Income (Loss) Attributable to Parent",
                            "units": {
                                "USD": [
                                    {"start": "2022-09-25", "end": "2023-09-30", "val": 96995000000.0, "accn": "0000320193-23-000106", "form": "10-K"}
                                ]
                            }
                        }
                    },
                    "dei": {
                        "EntityCommonStockSharesOutstanding": {
                            "label": "Entity Common Stock, Shares Outstanding",
                            "units": {
                                "shares": [
                                    {"end": "2023-10-20", "val": 15552752000.0, "accn": "0000320193-23-000106"}
                                ]
                            }
                        }
                    }
                }
            }"#,
        )
        .unwrap()
    }

    fn submissions_fixture() -> CompanySubmissions {
        serde_json::from_str(
            r#"{
                "name": "Apple Inc.",
                "sic": "3571",
                "sicDescription": "Electronic Computers",
                "filings": {
                    "recent": {
                        "form": ["10-Q", "10-K", "8-K", "10-Q", "DEF 14A"],
                        "accessionNumber": [
                            "0000320193-24-000069",
                            "0000320193-23-000106",
                            "0000320193-23-000099",
                            "0000320193-23-000077",
                            "0001308179-23-000019"
                        ],
                        "reportDate": [
                            "2024-03-30",
                            "2023-09-30",
                            "",
                            "2023-07-01",
                            "2023-02-28"
                        ],
                        "primaryDocument": [
                            "aapl-20240330.htm",
                            "aapl-20230930.htm",
                            "aapl-8k.htm",
                            "aapl-20230701.htm",
                            "proxy2023.htm"
                        ]
                    }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_flatten_drops_duplicate_triples() {
        let (facts, _) = flatten_facts(&facts_fixture());

        // The two Assets values for 2023-09-30 share (fact, end, val); only
        // the first survives, carrying the first accession number.
        let assets_2023: Vec<&Fact> = facts
            .iter()
            .filter(|f| f.name == "Assets" && f.period_end.to_string() == "2023-09-30")
            .collect();
        assert_eq!(assets_2023.len(), 1);
        assert_eq!(assets_2023[0].accession_number, "0000320193-23-000106");
        assert_eq!(facts.len(), 3);
    }

    #[test]
    fn test_flatten_reads_us_gaap_only() {
        let (facts, labels) = flatten_facts(&facts_fixture());
        assert!(facts.iter().all(|f| f.name != "EntityCommonStockSharesOutstanding"));
        assert!(!labels.contains_key("EntityCommonStockSharesOutstanding"));
    }

    #[test]
    fn test_flatten_builds_label_mapping() {
        let (_, labels) = flatten_facts(&facts_fixture());
        assert_eq!(
            labels.get("NetIncomeLoss").map(String::as_str),
            Some("Net Income (Loss) Attributable to Parent")
        );
        assert_eq!(labels.get("Assets").map(String::as_str), Some("Assets"));
    }

    #[test]
    fn test_filings_skip_empty_report_dates() {
        let filings = filings_from_submissions(&submissions_fixture());
        // The 8-K with an empty reportDate is dropped.
        assert_eq!(filings.len(), 4);
        assert!(filings.iter().all(|f| f.form_type != "8-K"));
    }

    #[test]
    fn test_filter_filings_exact_form_match() {
        let filings = filings_from_submissions(&submissions_fixture());

        let annual = filter_filings(&filings, FormType::TenK);
        assert_eq!(annual.len(), 1);
        assert_eq!(annual[0].accession_number, "0000320193-23-000106");

        let quarterly = filter_filings(&filings, FormType::TenQ);
        assert_eq!(quarterly.len(), 2);

        let proxy = filter_filings(&filings, FormType::Def14A);
        assert_eq!(proxy.len(), 1);
    }

    #[test]
    fn test_filter_filings_empty_category() {
        let filings: Vec<FilingReference> = Vec::new();
        assert!(filter_filings(&filings, FormType::TenK).is_empty());
    }

    #[test]
    fn test_archive_url_strips_accession_dashes() {
        let url = archive_url("0000320193", "0000320193-23-000106", "aapl-20230930.htm");
        assert_eq!(
            url,
            "https://www.sec.gov/Archives/edgar/data/0000320193/000032019323000106/aapl-20230930.htm"
        );
    }

    #[test]
    fn test_cik_padding() {
        let cik = format!("{:0>10}", 320193u64);
        assert_eq!(cik, "0000320193");
        assert_eq!(cik.len(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_spaces_requests() {
        let mut limiter = RateLimiter::new(Duration::from_millis(100));
        let start = Instant::now();

        // First wait passes immediately; the second must be spaced out.
        limiter.wait().await;
        limiter.wait().await;

        assert!(start.elapsed() >= Duration::from_millis(100));
    }
}

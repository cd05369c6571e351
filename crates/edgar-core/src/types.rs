//! Core data types for EDGAR financial-trends processing.
//!
//! This module defines the fundamental data structures:
//!
//! - [`Ticker`] - SEC-normalized ticker symbol
//! - [`Fact`] - one flattened XBRL disclosure
//! - [`FilingReference`] - metadata for a single filing submission
//! - [`FactTable`] - fact-by-period table with string-sorted columns
//! - [`TrendPoint`] / [`CompanyFinancials`] - persisted time series
//! - [`CompanyDetails`] - company metadata document
//! - [`FilingReport`] - extracted narrative sections of a filing

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

/// Mapping from internal XBRL fact key to its human-readable label.
pub type FactLabels = HashMap<String, String>;

/// A ticker symbol, normalized the way the SEC company directory expects.
///
/// Tickers are uppercased and periods are replaced with hyphens on creation
/// (e.g. `brk.b` becomes `BRK-B`), so lookups against the directory are an
/// exact string match.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticker(String);

impl Ticker {
    /// Creates a new ticker, uppercasing and replacing periods with hyphens.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().to_uppercase().replace('.', "-"))
    }

    /// Returns the normalized ticker as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the lowercase form used as a document-store key.
    #[must_use]
    pub fn storage_key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Ticker {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Ticker {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Ticker {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// One flattened XBRL disclosure: a single value for a fact in one period.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    /// XBRL concept key (e.g. "Assets").
    pub name: String,
    /// End date of the reporting period.
    pub period_end: NaiveDate,
    /// Disclosed numeric value.
    pub value: f64,
    /// Accession number of the filing that disclosed this value.
    pub accession_number: String,
    /// Unit of measure (e.g. "USD", "shares").
    pub unit: String,
}

impl Fact {
    /// Creates a new fact.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        period_end: NaiveDate,
        value: f64,
        accession_number: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            period_end,
            value,
            accession_number: accession_number.into(),
            unit: unit.into(),
        }
    }
}

/// Metadata for one filing submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilingReference {
    /// Report date of the filing.
    pub report_date: NaiveDate,
    /// Accession number uniquely identifying the submission.
    pub accession_number: String,
    /// Exact form type string (e.g. "10-K").
    pub form_type: String,
    /// Primary document file name within the filing archive.
    pub primary_document: String,
}

/// A table of facts by reporting period.
///
/// Rows are keyed by unique fact name; columns are period *labels* kept in
/// strictly ascending lexicographic string order. The ordering is a property
/// of the key type, not of a sort pass, so it survives every transformation.
/// Cells may be absent; an absent cell is not the same as a stored NaN.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FactTable {
    rows: BTreeMap<String, BTreeMap<String, f64>>,
}

impl FactTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of fact rows.
    #[must_use]
    pub fn fact_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if a fact row exists under this exact name.
    #[must_use]
    pub fn contains_fact(&self, name: &str) -> bool {
        self.rows.contains_key(name)
    }

    /// Iterates over fact names in ascending order.
    pub fn fact_names(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Returns all period labels, ascending in lexicographic string order.
    #[must_use]
    pub fn periods(&self) -> Vec<String> {
        let mut all: BTreeSet<&str> = BTreeSet::new();
        for row in self.rows.values() {
            all.extend(row.keys().map(String::as_str));
        }
        all.into_iter().map(str::to_string).collect()
    }

    /// Returns the cell for a fact and period, if present.
    #[must_use]
    pub fn get(&self, fact: &str, period: &str) -> Option<f64> {
        self.rows.get(fact).and_then(|row| row.get(period)).copied()
    }

    /// Sets a cell, replacing any existing value (last-seen-wins).
    pub fn insert(&mut self, fact: impl Into<String>, period: impl Into<String>, value: f64) {
        self.rows
            .entry(fact.into())
            .or_default()
            .insert(period.into(), value);
    }

    /// Sets a cell only if no value exists yet (first-seen-wins).
    pub fn insert_if_absent(
        &mut self,
        fact: impl Into<String>,
        period: impl Into<String>,
        value: f64,
    ) {
        self.rows
            .entry(fact.into())
            .or_default()
            .entry(period.into())
            .or_insert(value);
    }

    /// Inserts an entire fact row, replacing any existing row of that name.
    pub fn insert_row(&mut self, fact: impl Into<String>, row: BTreeMap<String, f64>) {
        self.rows.insert(fact.into(), row);
    }

    /// Returns a fact row, if present.
    #[must_use]
    pub fn row(&self, fact: &str) -> Option<&BTreeMap<String, f64>> {
        self.rows.get(fact)
    }

    /// Iterates over (fact name, row) pairs in ascending fact-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, f64>)> {
        self.rows.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Renames fact rows according to a key → label mapping.
    ///
    /// Facts without a mapping keep their name. If two keys map to the same
    /// label, the later (in key order) row wins.
    pub fn rename_facts(&mut self, labels: &FactLabels) {
        let renames: Vec<(String, String)> = self
            .rows
            .keys()
            .filter_map(|k| labels.get(k).map(|label| (k.clone(), label.clone())))
            .collect();
        for (from, to) in renames {
            if from == to {
                continue;
            }
            if let Some(row) = self.rows.remove(&from) {
                self.rows.insert(to, row);
            }
        }
    }
}

/// One point in a persisted financial time series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Period label as a string.
    pub date: String,
    /// Numeric value for that period.
    pub value: f64,
}

/// Persisted financial-trends document for one company.
///
/// Shape: `{ticker, financials: {<fact_or_ratio_name>: [{date, value}, ...]}}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyFinancials {
    /// Lowercase ticker key.
    pub ticker: String,
    /// Fact or ratio name → ordered time series.
    pub financials: BTreeMap<String, Vec<TrendPoint>>,
}

/// Persisted company metadata document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyDetails {
    /// Lowercase ticker key.
    pub ticker: String,
    /// Company name as registered with the SEC.
    pub name: String,
    /// Standard Industrial Classification code.
    pub sic: Option<String>,
    /// Human-readable SIC description.
    pub sic_description: Option<String>,
}

/// Persisted narrative sections extracted from one filing document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilingReport {
    /// Ticker the filing belongs to.
    pub ticker: String,
    /// File name of the source document.
    pub file_name: String,
    /// Section heading → extracted text.
    pub sections: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_normalization() {
        assert_eq!(Ticker::new("aapl").as_str(), "AAPL");
        assert_eq!(Ticker::new("brk.b").as_str(), "BRK-B");
        assert_eq!(Ticker::new("BF.B").as_str(), "BF-B");
        assert_eq!(Ticker::new("GOOG").storage_key(), "goog");
    }

    #[test]
    fn test_fact_table_no_duplicate_rows() {
        let mut table = FactTable::new();
        table.insert("Assets", "2023-12-31", 1.0);
        table.insert("Assets", "2023-12-31", 2.0);
        assert_eq!(table.fact_count(), 1);
        assert_eq!(table.get("Assets", "2023-12-31"), Some(2.0));
    }

    #[test]
    fn test_fact_table_first_seen_wins() {
        let mut table = FactTable::new();
        table.insert_if_absent("Assets", "2023-12-31", 1.0);
        table.insert_if_absent("Assets", "2023-12-31", 2.0);
        assert_eq!(table.get("Assets", "2023-12-31"), Some(1.0));
    }

    #[test]
    fn test_periods_sorted_as_strings_not_dates() {
        let mut table = FactTable::new();
        // Mixed-length labels: string order differs from calendar order.
        table.insert("Assets", "2023-9-30", 1.0);
        table.insert("Assets", "2023-12-31", 2.0);
        table.insert("Revenue", "2023-10-01", 3.0);
        assert_eq!(
            table.periods(),
            vec!["2023-10-01", "2023-12-31", "2023-9-30"]
        );
    }

    #[test]
    fn test_rename_facts() {
        let mut table = FactTable::new();
        table.insert("NetIncomeLoss", "2023-12-31", 5.0);
        table.insert("Assets", "2023-12-31", 9.0);

        let mut labels = FactLabels::new();
        labels.insert(
            "NetIncomeLoss".to_string(),
            "Net Income (Loss) Attributable to Parent".to_string(),
        );
        table.rename_facts(&labels);

        assert!(!table.contains_fact("NetIncomeLoss"));
        assert_eq!(
            table.get("Net Income (Loss) Attributable to Parent", "2023-12-31"),
            Some(5.0)
        );
        // Unmapped facts keep their name.
        assert!(table.contains_fact("Assets"));
    }

    #[test]
    fn test_financials_document_shape() {
        let mut doc = CompanyFinancials {
            ticker: "aapl".to_string(),
            ..CompanyFinancials::default()
        };
        doc.financials.insert(
            "Assets".to_string(),
            vec![TrendPoint {
                date: "2023-12-31".to_string(),
                value: 100.0,
            }],
        );

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "ticker": "aapl",
                "financials": {
                    "Assets": [{"date": "2023-12-31", "value": 100.0}]
                }
            })
        );
    }

    #[test]
    fn test_absent_cells() {
        let mut table = FactTable::new();
        table.insert("Assets", "2023-12-31", 1.0);
        assert_eq!(table.get("Assets", "2022-12-31"), None);
        assert_eq!(table.get("Liabilities", "2023-12-31"), None);
    }
}

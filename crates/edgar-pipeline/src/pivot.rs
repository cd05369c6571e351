//! Pivot flattened facts into fact-by-period tables.
//!
//! A pivot retains only rows that pass both filters - the accession number
//! must belong to the requested filings AND the period end must match a
//! known filing report date - then reshapes into rows = facts, columns =
//! period labels.

use chrono::NaiveDate;
use edgar_core::{Fact, FactLabels, FactTable, FilingReference};
use std::collections::HashSet;
use tracing::debug;

/// Deduplication policy for values sharing a (fact, period) cell.
///
/// Duplicates sharing (fact, period, value) were already dropped globally
/// when the facts were flattened; this policy decides between remaining
/// duplicates that disclose *different* values for the same cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dedup {
    /// Keep the first value seen for a cell.
    KeepFirst,
    /// Keep the last value seen for a cell.
    KeepLast,
}

/// Pivot facts into a fact-by-period table.
///
/// Only facts whose accession number is in `filings` and whose period end
/// matches one of the filings' report dates survive (both conditions
/// applied). An empty filing list therefore produces an empty table.
#[must_use]
pub fn pivot_facts(facts: &[Fact], filings: &[FilingReference], dedup: Dedup) -> FactTable {
    let accessions: HashSet<&str> = filings
        .iter()
        .map(|f| f.accession_number.as_str())
        .collect();
    let report_dates: HashSet<NaiveDate> = filings.iter().map(|f| f.report_date).collect();

    let mut table = FactTable::new();
    for fact in facts {
        if !accessions.contains(fact.accession_number.as_str()) {
            continue;
        }
        if !report_dates.contains(&fact.period_end) {
            continue;
        }

        let period = fact.period_end.to_string();
        match dedup {
            Dedup::KeepFirst => table.insert_if_absent(&fact.name, period, fact.value),
            Dedup::KeepLast => table.insert(&fact.name, period, fact.value),
        }
    }

    debug!(
        facts = table.fact_count(),
        periods = table.periods().len(),
        "Pivoted fact table"
    );
    table
}

/// Build the annual (10-K) table: pivot keeping the first-seen duplicate,
/// then rename rows to their human-readable labels.
#[must_use]
pub fn annual_table(facts: &[Fact], labels: &FactLabels, filings: &[FilingReference]) -> FactTable {
    let mut table = pivot_facts(facts, filings, Dedup::KeepFirst);
    table.rename_facts(labels);
    table
}

/// Build the quarterly (10-Q) table: pivot keeping the last-seen duplicate,
/// then rename rows to their human-readable labels.
#[must_use]
pub fn quarterly_table(
    facts: &[Fact],
    labels: &FactLabels,
    filings: &[FilingReference],
) -> FactTable {
    let mut table = pivot_facts(facts, filings, Dedup::KeepLast);
    table.rename_facts(labels);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn filing(report_date: &str, accn: &str, form: &str) -> FilingReference {
        FilingReference {
            report_date: date(report_date),
            accession_number: accn.to_string(),
            form_type: form.to_string(),
            primary_document: String::new(),
        }
    }

    #[test]
    fn test_double_filter() {
        let facts = vec![
            Fact::new("Assets", date("2023-12-31"), 100.0, "accn-1", "USD"),
            // Accession matches but period is not a report date.
            Fact::new("Assets", date("2023-06-30"), 90.0, "accn-1", "USD"),
            // Period matches but accession is not in the filter set.
            Fact::new("Assets", date("2023-12-31"), 80.0, "accn-9", "USD"),
        ];
        let filings = vec![filing("2023-12-31", "accn-1", "10-K")];

        let table = pivot_facts(&facts, &filings, Dedup::KeepFirst);
        assert_eq!(table.fact_count(), 1);
        assert_eq!(table.get("Assets", "2023-12-31"), Some(100.0));
        assert_eq!(table.periods(), vec!["2023-12-31"]);
    }

    #[test]
    fn test_dedup_policies() {
        let facts = vec![
            Fact::new("Assets", date("2023-12-31"), 100.0, "accn-1", "USD"),
            Fact::new("Assets", date("2023-12-31"), 120.0, "accn-2", "USD"),
        ];
        let filings = vec![
            filing("2023-12-31", "accn-1", "10-Q"),
            filing("2023-12-31", "accn-2", "10-Q"),
        ];

        let first = pivot_facts(&facts, &filings, Dedup::KeepFirst);
        assert_eq!(first.get("Assets", "2023-12-31"), Some(100.0));

        let last = pivot_facts(&facts, &filings, Dedup::KeepLast);
        assert_eq!(last.get("Assets", "2023-12-31"), Some(120.0));
    }

    #[test]
    fn test_empty_filings_produce_empty_table() {
        let facts = vec![Fact::new("Assets", date("2023-12-31"), 100.0, "accn-1", "USD")];
        let table = pivot_facts(&facts, &[], Dedup::KeepLast);
        assert!(table.is_empty());
    }

    #[test]
    fn test_pivot_is_idempotent() {
        let facts = vec![
            Fact::new("Assets", date("2023-12-31"), 100.0, "accn-1", "USD"),
            Fact::new("Revenues", date("2023-12-31"), 40.0, "accn-1", "USD"),
        ];
        let filings = vec![filing("2023-12-31", "accn-1", "10-K")];

        let once = pivot_facts(&facts, &filings, Dedup::KeepFirst);

        // Rebuild facts from the pivoted cells and pivot again; the result
        // is identical, so a second pivot pass is a no-op.
        let mut rebuilt = Vec::new();
        for (name, row) in once.iter() {
            for (period, value) in row {
                rebuilt.push(Fact::new(name, period.parse().unwrap(), *value, "accn-1", "USD"));
            }
        }
        let twice = pivot_facts(&rebuilt, &filings, Dedup::KeepFirst);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_label_rename_applied() {
        let facts = vec![Fact::new(
            "NetIncomeLoss",
            date("2023-12-31"),
            5.0,
            "accn-1",
            "USD",
        )];
        let filings = vec![filing("2023-12-31", "accn-1", "10-K")];
        let mut labels = FactLabels::new();
        labels.insert(
            "NetIncomeLoss".to_string(),
            "Net Income (Loss) Attributable to Parent".to_string(),
        );

        let table = annual_table(&facts, &labels, &filings);
        assert!(table.contains_fact("Net Income (Loss) Attributable to Parent"));
        assert!(!table.contains_fact("NetIncomeLoss"));
    }
}

//! Inner join of quarterly and annual tables into one history.

use edgar_core::FactTable;
use tracing::debug;

/// Merge quarterly and annual pivoted tables into one series per fact.
///
/// The join is inner on fact name: facts present in only one series are
/// silently dropped. Period columns end up sorted lexicographically
/// ascending as strings, not calendar order - downstream consumers rely on
/// exactly this ordering, including its date-format sensitivity. Where both
/// series carry a value for the same period label, the annual value wins.
#[must_use]
pub fn merge_historical(quarterly: &FactTable, annual: &FactTable) -> FactTable {
    let mut merged = FactTable::new();

    for (fact, q_row) in quarterly.iter() {
        let Some(a_row) = annual.row(fact) else {
            continue;
        };

        let mut row = q_row.clone();
        row.extend(a_row.iter().map(|(k, v)| (k.clone(), *v)));
        merged.insert_row(fact, row);
    }

    debug!(
        facts = merged.fact_count(),
        periods = merged.periods().len(),
        "Merged quarterly and annual tables"
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_join_drops_exclusive_facts() {
        let mut quarterly = FactTable::new();
        quarterly.insert("Assets", "2023-06-30", 10.0);
        quarterly.insert("QuarterlyOnly", "2023-06-30", 1.0);

        let mut annual = FactTable::new();
        annual.insert("Assets", "2023-12-31", 12.0);
        annual.insert("AnnualOnly", "2023-12-31", 2.0);

        let merged = merge_historical(&quarterly, &annual);
        assert_eq!(merged.fact_count(), 1);
        assert_eq!(merged.get("Assets", "2023-06-30"), Some(10.0));
        assert_eq!(merged.get("Assets", "2023-12-31"), Some(12.0));
        assert!(!merged.contains_fact("QuarterlyOnly"));
        assert!(!merged.contains_fact("AnnualOnly"));
    }

    #[test]
    fn test_disjoint_tables_merge_empty() {
        let mut quarterly = FactTable::new();
        quarterly.insert("Revenues", "2023-06-30", 1.0);

        let mut annual = FactTable::new();
        annual.insert("Assets", "2023-12-31", 2.0);

        let merged = merge_historical(&quarterly, &annual);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_columns_sorted_as_strings_after_merge() {
        let mut quarterly = FactTable::new();
        quarterly.insert("Assets", "2023-9-30", 1.0);

        let mut annual = FactTable::new();
        annual.insert("Assets", "2023-12-31", 2.0);
        annual.insert("Assets", "2023-10-01", 3.0);

        let merged = merge_historical(&quarterly, &annual);
        // Lexicographic string order: "2023-9-30" sorts after the longer
        // ISO-padded labels, confirming the sort is not calendar-aware.
        assert_eq!(
            merged.periods(),
            vec!["2023-10-01", "2023-12-31", "2023-9-30"]
        );
    }

    #[test]
    fn test_annual_value_wins_on_shared_period() {
        let mut quarterly = FactTable::new();
        quarterly.insert("Assets", "2023-12-31", 10.0);

        let mut annual = FactTable::new();
        annual.insert("Assets", "2023-12-31", 12.0);

        let merged = merge_historical(&quarterly, &annual);
        assert_eq!(merged.get("Assets", "2023-12-31"), Some(12.0));
    }

    #[test]
    fn test_empty_quarterly_empties_the_join() {
        let quarterly = FactTable::new();
        let mut annual = FactTable::new();
        annual.insert("Assets", "2023-12-31", 2.0);

        assert!(merge_historical(&quarterly, &annual).is_empty());
    }
}

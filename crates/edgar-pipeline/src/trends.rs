//! Conversion of a finished table into persisted trend series.

use edgar_core::{CompanyFinancials, FactTable, Ticker, TrendPoint};
use tracing::debug;

/// Convert a fact table into the per-fact trend document for a company.
///
/// Each fact row becomes a series of `{date, value}` points in the table's
/// lexicographic period order. Non-finite cells (NaN from guarded division,
/// infinities) are dropped because the persisted JSON cannot carry them;
/// a row whose every cell is non-finite is omitted entirely.
#[must_use]
pub fn financial_trends(ticker: &Ticker, table: &FactTable) -> CompanyFinancials {
    let mut financials = CompanyFinancials {
        ticker: ticker.storage_key(),
        ..CompanyFinancials::default()
    };

    for (fact, row) in table.iter() {
        let series: Vec<TrendPoint> = row
            .iter()
            .filter(|(_, value)| value.is_finite())
            .map(|(period, value)| TrendPoint {
                date: period.clone(),
                value: *value,
            })
            .collect();

        if !series.is_empty() {
            financials.financials.insert(fact.to_string(), series);
        }
    }

    debug!(
        ticker = %financials.ticker,
        series = financials.financials.len(),
        "Built trend series"
    );
    financials
}

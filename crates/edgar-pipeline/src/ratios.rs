//! Ordered financial-ratio definitions and the engine applying them.
//!
//! The engine is a sequential pass over a fixed, ordered list of
//! definitions. Each definition that can run appends its output as a new
//! fact row, and later definitions read the accumulated table - so a ratio
//! depending on another derived ratio (Days Sales outstanding on
//! Receivables Turnover Ratio) works only because its dependency is declared
//! earlier. A definition with any required fact missing is skipped with a
//! diagnostic naming the missing inputs; the pass continues.

use edgar_core::FactTable;
use std::collections::BTreeMap;
use tracing::warn;

/// Primary revenue fact; many filers stopped tagging it after 2018.
pub const REVENUE_PRIMARY: &str = "Revenue, Net (Deprecated 2018-01-31)";
/// Alternate revenue fact used when the primary is absent for a period.
pub const REVENUE_FALLBACK: &str = "Revenue from Contract with Customer, Excluding Assessed Tax";
/// Derived revenue row combining primary and fallback per period.
pub const EFFECTIVE_REVENUE: &str = "Effective Revenue";
/// Gross profit label.
pub const GROSS_PROFIT: &str = "Gross Profit";
/// Operating income label.
pub const OPERATING_INCOME: &str = "Operating Income (Loss)";
/// Net income label.
pub const NET_INCOME: &str = "Net Income (Loss) Attributable to Parent";
/// Total assets label.
pub const ASSETS: &str = "Assets";
/// Stockholders' equity label.
pub const STOCKHOLDERS_EQUITY: &str = "Stockholders' Equity Attributable to Parent";
/// Current assets label.
pub const CURRENT_ASSETS: &str = "Assets, Current";
/// Current liabilities label.
pub const CURRENT_LIABILITIES: &str = "Liabilities, Current";
/// Total liabilities label.
pub const LIABILITIES: &str = "Liabilities";
/// Inventory label.
pub const INVENTORY: &str = "Inventory, Net";
/// Cash and equivalents label.
pub const CASH: &str = "Cash and Cash Equivalents, at Carrying Value";
/// Interest expense label.
pub const INTEREST_EXPENSE: &str = "Interest Expense";
/// Cost of goods sold label.
pub const COST_OF_GOODS_SOLD: &str = "Cost of Goods and Services Sold";
/// Accounts receivable label.
pub const ACCOUNTS_RECEIVABLE: &str =
    "Accounts Receivable, after Allowance for Credit Loss, Current";
/// Accounts payable label.
pub const ACCOUNTS_PAYABLE: &str = "Accounts Payable, Current";
/// Operating cash flow label.
pub const OPERATING_CASH_FLOW: &str =
    "Net Cash Provided by (Used in) Operating Activities, Continuing Operations";
/// Capital expenditure payments label.
pub const CAPEX_PAYMENTS: &str = "Payments to Acquire Property, Plant, and Equipment";

/// Receivables Turnover Ratio row name (a derived dependency).
const RECEIVABLES_TURNOVER: &str = "Receivables Turnover Ratio";
/// Inventory Turnover Ratio row name (a derived dependency).
const INVENTORY_TURNOVER: &str = "Inventory Turnover Ratio";

/// A named, guarded derivation producing one new fact row.
///
/// `compute` is pure and applied independently per period; it reads the
/// accumulating table (so earlier ratio outputs are visible) and returns
/// `None` for periods where an operand is absent.
#[derive(Clone, Copy, Debug)]
pub struct RatioDefinition {
    /// Row name the computed series is stored under.
    pub name: &'static str,
    /// Fact rows that must exist for the definition to run at all.
    pub required: &'static [&'static str],
    /// Per-period computation over the accumulated table.
    pub compute: fn(&FactTable, &str) -> Option<f64>,
}

/// A ratio that could not be computed, with the fact rows it was missing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedRatio {
    /// Name of the skipped ratio.
    pub name: &'static str,
    /// Required fact rows absent from the table.
    pub missing: Vec<&'static str>,
}

/// Divide, mapping a zero denominator to NaN instead of ±inf.
///
/// NaN is the undefined-cell marker; it propagates through later
/// arithmetic and is dropped when trend series are built.
fn div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        f64::NAN
    } else {
        numerator / denominator
    }
}

/// The fixed, ordered ratio list.
///
/// Declaration order is semantic: Days Sales outstanding and Days Inventory
/// outstanding read the turnover rows computed just before them.
#[must_use]
pub fn standard_ratios() -> Vec<RatioDefinition> {
    vec![
        RatioDefinition {
            name: EFFECTIVE_REVENUE,
            required: &[REVENUE_FALLBACK],
            compute: |t, p| {
                t.get(REVENUE_PRIMARY, p)
                    .or_else(|| t.get(REVENUE_FALLBACK, p))
            },
        },
        RatioDefinition {
            name: "Gross Margin Ratio",
            required: &[GROSS_PROFIT, EFFECTIVE_REVENUE],
            compute: |t, p| Some(div(t.get(GROSS_PROFIT, p)?, t.get(EFFECTIVE_REVENUE, p)?)),
        },
        RatioDefinition {
            name: "Operating Margin Ratio",
            required: &[OPERATING_INCOME, EFFECTIVE_REVENUE],
            compute: |t, p| Some(div(t.get(OPERATING_INCOME, p)?, t.get(EFFECTIVE_REVENUE, p)?)),
        },
        RatioDefinition {
            name: "Net Profit Margin Ratio",
            required: &[NET_INCOME, EFFECTIVE_REVENUE],
            compute: |t, p| Some(div(t.get(NET_INCOME, p)?, t.get(EFFECTIVE_REVENUE, p)?)),
        },
        RatioDefinition {
            name: "Return on Assets Ratio",
            required: &[NET_INCOME, ASSETS],
            compute: |t, p| Some(div(t.get(NET_INCOME, p)?, t.get(ASSETS, p)?)),
        },
        RatioDefinition {
            name: "Return on Equity Ratio",
            required: &[NET_INCOME, STOCKHOLDERS_EQUITY],
            compute: |t, p| Some(div(t.get(NET_INCOME, p)?, t.get(STOCKHOLDERS_EQUITY, p)?)),
        },
        RatioDefinition {
            name: "Current Ratio",
            required: &[CURRENT_ASSETS, CURRENT_LIABILITIES],
            compute: |t, p| Some(div(t.get(CURRENT_ASSETS, p)?, t.get(CURRENT_LIABILITIES, p)?)),
        },
        // As-built formula: CA − (Inventory / CL), not (CA − Inventory) / CL.
        // Kept verbatim; downstream consumers depend on the as-built values.
        RatioDefinition {
            name: "Quick Ratio",
            required: &[CURRENT_ASSETS, INVENTORY, CURRENT_LIABILITIES],
            compute: |t, p| {
                let ca = t.get(CURRENT_ASSETS, p)?;
                let inv = t.get(INVENTORY, p)?;
                let cl = t.get(CURRENT_LIABILITIES, p)?;
                Some(ca - div(inv, cl))
            },
        },
        // As-built denominator is total Liabilities even though current
        // liabilities gate the definition; the Liabilities row is looked up
        // dynamically and its absence yields absent cells.
        RatioDefinition {
            name: "Cash Ratio",
            required: &[CASH, CURRENT_LIABILITIES],
            compute: |t, p| Some(div(t.get(CASH, p)?, t.get(LIABILITIES, p)?)),
        },
        RatioDefinition {
            name: "Debt to Equity (D/E) Ratio",
            required: &[LIABILITIES, STOCKHOLDERS_EQUITY],
            compute: |t, p| Some(div(t.get(LIABILITIES, p)?, t.get(STOCKHOLDERS_EQUITY, p)?)),
        },
        RatioDefinition {
            name: "Debt to Assets Ratio",
            required: &[LIABILITIES, ASSETS],
            compute: |t, p| Some(div(t.get(LIABILITIES, p)?, t.get(ASSETS, p)?)),
        },
        RatioDefinition {
            name: "Interest Coverage Ratio",
            required: &[OPERATING_INCOME, INTEREST_EXPENSE],
            compute: |t, p| Some(div(t.get(OPERATING_INCOME, p)?, t.get(INTEREST_EXPENSE, p)?)),
        },
        RatioDefinition {
            name: "Equity Ratio",
            required: &[STOCKHOLDERS_EQUITY, ASSETS],
            compute: |t, p| Some(div(t.get(STOCKHOLDERS_EQUITY, p)?, t.get(ASSETS, p)?)),
        },
        RatioDefinition {
            name: "Asset Turnover Ratio",
            required: &[EFFECTIVE_REVENUE, ASSETS],
            compute: |t, p| Some(div(t.get(EFFECTIVE_REVENUE, p)?, t.get(ASSETS, p)?)),
        },
        RatioDefinition {
            name: INVENTORY_TURNOVER,
            required: &[COST_OF_GOODS_SOLD, INVENTORY],
            compute: |t, p| Some(div(t.get(COST_OF_GOODS_SOLD, p)?, t.get(INVENTORY, p)?)),
        },
        RatioDefinition {
            name: RECEIVABLES_TURNOVER,
            required: &[EFFECTIVE_REVENUE, ACCOUNTS_RECEIVABLE],
            compute: |t, p| {
                Some(div(
                    t.get(EFFECTIVE_REVENUE, p)?,
                    t.get(ACCOUNTS_RECEIVABLE, p)?,
                ))
            },
        },
        RatioDefinition {
            name: "Days Sales outstanding",
            required: &[RECEIVABLES_TURNOVER],
            compute: |t, p| Some(div(365.0, t.get(RECEIVABLES_TURNOVER, p)?)),
        },
        RatioDefinition {
            name: "Days Inventory outstanding",
            required: &[INVENTORY_TURNOVER],
            compute: |t, p| Some(div(365.0, t.get(INVENTORY_TURNOVER, p)?)),
        },
        RatioDefinition {
            name: "Payables Turnover Ratio",
            required: &[COST_OF_GOODS_SOLD, ACCOUNTS_PAYABLE],
            compute: |t, p| Some(div(t.get(COST_OF_GOODS_SOLD, p)?, t.get(ACCOUNTS_PAYABLE, p)?)),
        },
        RatioDefinition {
            name: "Operating Cash Flow Ratio",
            required: &[OPERATING_CASH_FLOW, LIABILITIES],
            compute: |t, p| Some(div(t.get(OPERATING_CASH_FLOW, p)?, t.get(LIABILITIES, p)?)),
        },
        RatioDefinition {
            name: "Capital Expenditure Coverage Ratio",
            required: &[OPERATING_CASH_FLOW, CAPEX_PAYMENTS],
            compute: |t, p| Some(div(t.get(OPERATING_CASH_FLOW, p)?, t.get(CAPEX_PAYMENTS, p)?)),
        },
    ]
}

/// Apply the standard ratio list to a table.
///
/// Returns the ratios that were skipped, each with the fact rows it was
/// missing. Skips are also logged as warnings.
pub fn apply_ratios(table: &mut FactTable) -> Vec<SkippedRatio> {
    apply_ratio_definitions(table, &standard_ratios())
}

/// Apply an ordered list of ratio definitions to a table.
///
/// Definitions run in declaration order over the accumulating table. A
/// definition whose required rows are all present computes a cell for every
/// period where its operands exist; other periods stay absent. A skipped
/// definition leaves any pre-existing row of the same name untouched.
pub fn apply_ratio_definitions(
    table: &mut FactTable,
    definitions: &[RatioDefinition],
) -> Vec<SkippedRatio> {
    let periods = table.periods();
    let mut skipped = Vec::new();

    for def in definitions {
        let missing: Vec<&'static str> = def
            .required
            .iter()
            .copied()
            .filter(|fact| !table.contains_fact(fact))
            .collect();

        if !missing.is_empty() {
            warn!(
                ratio = def.name,
                missing = ?missing,
                "Skipping ratio: required facts absent"
            );
            skipped.push(SkippedRatio {
                name: def.name,
                missing,
            });
            continue;
        }

        let mut row = BTreeMap::new();
        for period in &periods {
            if let Some(value) = (def.compute)(table, period) {
                row.insert(period.clone(), value);
            }
        }
        table.insert_row(def.name, row);
    }

    skipped
}

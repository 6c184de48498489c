//! Revenue, cost and profit figures over the sales ledger.
//!
//! Independent of reconciliation: a ledger without `Total` or `Sales Date`
//! columns still audits fine, it just gets no revenue figures here.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::SalesRecord;

// ---------------------------------------------------------------------------
// Cost rules
// ---------------------------------------------------------------------------

/// One row of the unit-cost table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CostRule {
    /// Case-insensitive substring looked for in the item name.
    pub pattern: String,
    /// Cost of one sold unit.
    pub unit_cost: f64,
}

impl CostRule {
    pub fn new(pattern: impl Into<String>, unit_cost: f64) -> Self {
        Self {
            pattern: pattern.into(),
            unit_cost,
        }
    }
}

/// Ordered unit-cost table, first match wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostRules {
    rules: Vec<CostRule>,
}

impl CostRules {
    pub fn new(rules: Vec<CostRule>) -> Self {
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Index of the rule that prices this item, if any.
    pub fn rule_for(&self, item_name: &str) -> Option<usize> {
        let item = item_name.to_uppercase();
        self.rules
            .iter()
            .position(|r| item.contains(&r.pattern.to_uppercase()))
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenue {
    /// `YYYY-MM`.
    pub month: String,
    pub revenue: f64,
    pub lines: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleCost {
    pub pattern: String,
    pub unit_cost: f64,
    pub quantity: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSummary {
    pub estimated_cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross_profit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_pct: Option<f64>,
    /// Lines no rule priced; they add nothing to the cost.
    pub uncosted_lines: usize,
    pub by_rule: Vec<RuleCost>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinanceSummary {
    pub sales_lines: usize,
    /// `None` when the ledger has no total column.
    pub total_revenue: Option<f64>,
    /// `None` when there is no total column or no date parsed.
    pub monthly_revenue: Option<Vec<MonthlyRevenue>>,
    /// Lines left out of the timeline for an unreadable date.
    pub undated_lines: usize,
    /// `None` when no cost rules are configured.
    pub costs: Option<CostSummary>,
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Build the financial summary for a sales ledger.
///
/// `has_total_column` says whether the ledger carries a total column at all;
/// with it, an empty ledger still reports a revenue of 0.
pub fn summarize(
    records: &[SalesRecord],
    has_total_column: bool,
    cost_rules: &CostRules,
    date_formats: &[String],
) -> FinanceSummary {
    let total_revenue =
        has_total_column.then(|| records.iter().filter_map(|r| r.total_amount).sum::<f64>());

    let (monthly_revenue, undated_lines) = if has_total_column {
        monthly_timeline(records, date_formats)
    } else {
        (None, 0)
    };

    let costs = (!cost_rules.is_empty()).then(|| cost_summary(records, cost_rules, total_revenue));

    FinanceSummary {
        sales_lines: records.len(),
        total_revenue,
        monthly_revenue,
        undated_lines,
        costs,
    }
}

fn monthly_timeline(
    records: &[SalesRecord],
    date_formats: &[String],
) -> (Option<Vec<MonthlyRevenue>>, usize) {
    let mut months: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    let mut undated = 0;

    for record in records {
        let date = record
            .sales_date
            .as_deref()
            .and_then(|d| parse_sales_date(d, date_formats));
        let Some(date) = date else {
            undated += 1;
            continue;
        };
        let entry = months.entry(date.format("%Y-%m").to_string()).or_insert((0.0, 0));
        entry.0 += record.total_amount.unwrap_or(0.0);
        entry.1 += 1;
    }

    if undated > 0 {
        debug!(undated, "sales lines without a readable date left off the timeline");
    }
    if months.is_empty() {
        return (None, undated);
    }

    let timeline = months
        .into_iter()
        .map(|(month, (revenue, lines))| MonthlyRevenue { month, revenue, lines })
        .collect();
    (Some(timeline), undated)
}

fn cost_summary(records: &[SalesRecord], rules: &CostRules, revenue: Option<f64>) -> CostSummary {
    let mut by_rule: Vec<RuleCost> = rules
        .rules
        .iter()
        .map(|r| RuleCost {
            pattern: r.pattern.clone(),
            unit_cost: r.unit_cost,
            quantity: 0.0,
            cost: 0.0,
        })
        .collect();
    let mut uncosted_lines = 0;

    for record in records {
        match rules.rule_for(&record.item_name) {
            Some(i) => {
                by_rule[i].quantity += record.sales_qty;
                by_rule[i].cost += record.sales_qty * rules.rules[i].unit_cost;
            }
            None => uncosted_lines += 1,
        }
    }

    let estimated_cost: f64 = by_rule.iter().map(|r| r.cost).sum();
    let gross_profit = revenue.map(|rev| rev - estimated_cost);
    let margin_pct = match (revenue, gross_profit) {
        (Some(rev), Some(profit)) if rev != 0.0 => Some(profit / rev * 100.0),
        _ => None,
    };

    CostSummary {
        estimated_cost,
        gross_profit,
        margin_pct,
        uncosted_lines,
        by_rule,
    }
}

const MIN_DATE_SERIAL: f64 = 10_000.0;
/// 9999-12-31 in the 1900 date system, plus one.
const MAX_DATE_SERIAL: f64 = 2_958_466.0;

/// Read a sales date, trying each configured chrono format in order, then
/// ISO timestamps and spreadsheet serial day numbers (1900 date system).
///
/// Serials below 10000 (before 1927-05-18) are refused so a bare year or a
/// stray count never reads as a date.
pub fn parse_sales_date(text: &str, formats: &[String]) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for fmt in formats {
        if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
            return Some(d);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }

    let serial: f64 = text.parse().ok()?;
    if !(MIN_DATE_SERIAL..MAX_DATE_SERIAL).contains(&serial) {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?
        .checked_add_signed(Duration::days(serial.trunc() as i64))
}

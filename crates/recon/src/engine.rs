use tracing::{debug, info, warn};

use crate::aggregate::{aggregate_production, aggregate_sales};
use crate::config::{AuditConfig, ProductionColumns, SalesColumns};
use crate::error::ReconError;
use crate::finance::{summarize, FinanceSummary};
use crate::model::{
    cell, AuditInput, ProductionRecord, ReconMeta, ReconResult, SalesRecord, Side, Table,
};
use crate::numeric::{coerce_amount, coerce_number};
use crate::pages::PageRules;
use crate::reconcile::{join_groups, partition};
use crate::summary::compute_summary;

/// Run the audit per config over two loaded tables.
///
/// Fails only when a table lacks a required column; everything row-level is
/// absorbed (see [`crate::numeric`]).
pub fn run(config: &AuditConfig, input: &AuditInput) -> Result<ReconResult, ReconError> {
    let sales = load_sales(&input.sales, &config.sales.columns)?;
    let production = load_production(&input.production, &config.production.columns)?;

    let result = reconcile(&sales, &production, &config.page_rules());

    let s = &result.summary;
    info!(
        billed_jobs = s.billed_jobs,
        mismatches = s.mismatches,
        orphans = s.orphans,
        "audit '{}' complete",
        config.name
    );
    Ok(result)
}

/// Reconcile sales lines against production log lines.
///
/// Pure: the same two inputs always give the same result, rows ordered by
/// ascending job id.
pub fn reconcile(
    sales: &[SalesRecord],
    production: &[ProductionRecord],
    rules: &PageRules,
) -> ReconResult {
    let sales_agg = aggregate_sales(sales, rules);
    let production_agg = aggregate_production(production);

    let comparison = join_groups(&sales_agg.groups, &production_agg.groups);
    let (_, mismatches) = partition(&comparison);

    let summary = compute_summary(
        &comparison,
        sales_agg.groups.len(),
        production_agg.orphans.len(),
        sales_agg.unkeyed,
    );

    ReconResult {
        meta: ReconMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            page_rules: rules.rules().iter().map(|r| r.marker.clone()).collect(),
        },
        summary,
        comparison,
        mismatches,
        orphans: production_agg.orphans,
    }
}

/// Financial summary of the sales table per config.
pub fn run_finance(config: &AuditConfig, sales: &Table) -> Result<FinanceSummary, ReconError> {
    let records = load_sales(sales, &config.sales.columns)?;
    let has_total_column = sales.column_index(&config.sales.columns.total_amount).is_some();
    if !has_total_column {
        warn!(
            column = %config.sales.columns.total_amount,
            "sales data has no total column; revenue figures disabled"
        );
    }
    Ok(summarize(&records, has_total_column, &config.cost_rules(), &config.dates.formats))
}

fn require(table: &Table, side: Side, column: &str) -> Result<usize, ReconError> {
    table.column_index(column).ok_or_else(|| ReconError::MissingColumn {
        side,
        column: column.to_string(),
    })
}

/// Map the sales table onto records.
///
/// `Total` and `Sales Date` are optional: without them the records carry
/// `None` and only the financial summary notices.
pub fn load_sales(table: &Table, columns: &SalesColumns) -> Result<Vec<SalesRecord>, ReconError> {
    let invoice_idx = require(table, Side::Sales, &columns.invoice_ref)?;
    let customer_idx = require(table, Side::Sales, &columns.customer_name)?;
    let item_idx = require(table, Side::Sales, &columns.item_name)?;
    let qty_idx = require(table, Side::Sales, &columns.sales_qty)?;
    let total_idx = table.column_index(&columns.total_amount);
    let date_idx = table.column_index(&columns.sales_date);

    if total_idx.is_none() {
        debug!(column = %columns.total_amount, "sales data has no total column");
    }

    let records = table
        .rows
        .iter()
        .map(|row| SalesRecord {
            invoice_ref: cell(row, Some(invoice_idx)).trim().to_string(),
            customer_name: cell(row, Some(customer_idx)).trim().to_string(),
            item_name: cell(row, Some(item_idx)).to_string(),
            sales_qty: coerce_number(cell(row, Some(qty_idx))),
            total_amount: total_idx.map(|i| coerce_amount(cell(row, Some(i)))),
            sales_date: date_idx.map(|i| cell(row, Some(i)).to_string()),
        })
        .collect();
    Ok(records)
}

/// Map the printer log table onto records.
pub fn load_production(
    table: &Table,
    columns: &ProductionColumns,
) -> Result<Vec<ProductionRecord>, ReconError> {
    let job_idx = require(table, Side::Production, &columns.job_name)?;
    let owner_idx = require(table, Side::Production, &columns.owner)?;
    let pages_idx = require(table, Side::Production, &columns.printed_pages)?;

    let records = table
        .rows
        .iter()
        .map(|row| ProductionRecord {
            job_name: cell(row, Some(job_idx)).trim().to_string(),
            owner: cell(row, Some(owner_idx)).trim().to_string(),
            printed_pages: coerce_number(cell(row, Some(pages_idx))),
        })
        .collect();
    Ok(records)
}

//! Exportable audit report: the mismatch and orphan sets laid out as named
//! tabular sections. No computation happens here.

use serde::Serialize;

use crate::model::{ComparisonRow, OrphanProductionRecord, ReconResult};

/// Section holding one row per mismatched job.
pub const DISCREPANCIES_SECTION: &str = "Discrepancies";
/// Section holding one row per production line without a job id.
pub const ANONYMOUS_SECTION: &str = "Anonymous";

pub const DISCREPANCY_COLUMNS: [&str; 5] =
    ["Invoice No.", "Customer Name", "Expected Pages", "Printed Pages", "Diff"];
pub const ANONYMOUS_COLUMNS: [&str; 3] = ["Job Name", "Owner", "Printed Pages"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportCell {
    Text(String),
    Number(f64),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSection {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<ReportCell>>,
}

impl ReportSection {
    fn new(name: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditReport {
    pub sections: Vec<ReportSection>,
}

impl AuditReport {
    pub fn section(&self, name: &str) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.name == name)
    }
}

/// Lay out the mismatch and orphan sets for export.
///
/// Returns `None` when there are no mismatches: nothing worth exporting.
pub fn build_report(result: &ReconResult) -> Option<AuditReport> {
    if result.mismatches.is_empty() {
        return None;
    }

    let mut discrepancies = ReportSection::new(DISCREPANCIES_SECTION, &DISCREPANCY_COLUMNS);
    discrepancies.rows = result.mismatches.iter().map(discrepancy_row).collect();

    let mut anonymous = ReportSection::new(ANONYMOUS_SECTION, &ANONYMOUS_COLUMNS);
    anonymous.rows = result.orphans.iter().map(orphan_row).collect();

    Some(AuditReport {
        sections: vec![discrepancies, anonymous],
    })
}

fn text(value: Option<&str>) -> ReportCell {
    match value {
        Some(s) => ReportCell::Text(s.to_string()),
        None => ReportCell::Empty,
    }
}

fn discrepancy_row(row: &ComparisonRow) -> Vec<ReportCell> {
    vec![
        text(row.invoice_ref.as_deref()),
        text(row.customer_name.as_deref()),
        ReportCell::Number(row.expected_pages),
        ReportCell::Number(row.printed_pages),
        ReportCell::Number(row.diff),
    ]
}

fn orphan_row(orphan: &OrphanProductionRecord) -> Vec<ReportCell> {
    vec![
        ReportCell::Text(orphan.job_name.clone()),
        ReportCell::Text(orphan.owner.clone()),
        ReportCell::Number(orphan.printed_pages),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::reconcile;
    use crate::model::{ProductionRecord, SalesRecord};
    use crate::pages::PageRules;

    fn sale(invoice: &str, qty: f64) -> SalesRecord {
        SalesRecord {
            invoice_ref: invoice.into(),
            customer_name: format!("cust-{invoice}"),
            item_name: "Card".into(),
            sales_qty: qty,
            total_amount: None,
            sales_date: None,
        }
    }

    fn printed(job: &str, pages: f64) -> ProductionRecord {
        ProductionRecord {
            job_name: job.into(),
            owner: "ops".into(),
            printed_pages: pages,
        }
    }

    #[test]
    fn no_report_without_mismatches() {
        let result = reconcile(
            &[sale("DR1", 5.0)],
            &[printed("DR1", 5.0), printed("Unlabeled", 2.0)],
            &PageRules::default(),
        );
        assert!(build_report(&result).is_none());
    }

    #[test]
    fn two_named_sections() {
        let result = reconcile(
            &[sale("DR1", 20.0), sale("DR2", 5.0)],
            &[
                printed("DR1", 15.0),
                printed("DR2", 5.0),
                printed("DR3", 4.0),
                printed("Unlabeled", 2.0),
            ],
            &PageRules::default(),
        );
        let report = build_report(&result).unwrap();
        assert_eq!(report.sections.len(), 2);

        let d = report.section(DISCREPANCIES_SECTION).unwrap();
        assert_eq!(d.columns, DISCREPANCY_COLUMNS);
        assert_eq!(d.rows.len(), 2);
        assert_eq!(
            d.rows[0],
            vec![
                ReportCell::Text("DR1".into()),
                ReportCell::Text("cust-DR1".into()),
                ReportCell::Number(20.0),
                ReportCell::Number(15.0),
                ReportCell::Number(-5.0),
            ]
        );
        // production-only job: no invoice to show
        assert_eq!(d.rows[1][0], ReportCell::Empty);
        assert_eq!(d.rows[1][4], ReportCell::Number(4.0));

        let a = report.section(ANONYMOUS_SECTION).unwrap();
        assert_eq!(a.columns, ANONYMOUS_COLUMNS);
        assert_eq!(
            a.rows,
            vec![vec![
                ReportCell::Text("Unlabeled".into()),
                ReportCell::Text("ops".into()),
                ReportCell::Number(2.0),
            ]]
        );
    }
}

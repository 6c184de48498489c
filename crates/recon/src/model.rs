use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::extract::extract_job_id;
use crate::pages::PageRules;

/// Canonical job / DR number shared by an invoice and its print job.
///
/// Held as the digit run with leading zeros removed, so numbers of any
/// length compare exactly and `DR007` equals `DR7`. Ordering is numeric:
/// shorter runs first, then digit by digit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    /// Build from an ASCII digit run.
    pub(crate) fn from_digits(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            Self("0".to_string())
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for JobId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl Ord for JobId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for JobId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// JSON number when it fits in `u64`, string otherwise.
impl Serialize for JobId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.parse::<u64>() {
            Ok(n) => serializer.serialize_u64(n),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// An in-memory table as produced by the ingestion layer.
///
/// Row order is the source file's order and is significant: it decides which
/// invoice reference and customer name represent a sales group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Position of a header, ignoring surrounding whitespace.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.headers.iter().position(|h| h.trim() == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Cell text for an optional column; short rows read as empty.
pub(crate) fn cell(row: &[String], idx: Option<usize>) -> &str {
    idx.and_then(|i| row.get(i)).map(String::as_str).unwrap_or("")
}

/// The two tables one reconciliation run consumes.
#[derive(Debug, Clone, Default)]
pub struct AuditInput {
    pub sales: Table,
    pub production: Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Sales,
    Production,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sales => write!(f, "sales"),
            Self::Production => write!(f, "production"),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One line of the POS sales ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    /// Raw invoice text, kept verbatim for display (e.g. "DR0070").
    pub invoice_ref: String,
    pub customer_name: String,
    pub item_name: String,
    pub sales_qty: f64,
    /// `None` when the ledger has no total column.
    pub total_amount: Option<f64>,
    /// Raw date text; only the financial summary reads it.
    pub sales_date: Option<String>,
}

impl SalesRecord {
    pub fn job_id(&self) -> Option<JobId> {
        extract_job_id(&self.invoice_ref)
    }

    pub fn expected_pages(&self, rules: &PageRules) -> f64 {
        rules.expected_pages(self.sales_qty, &self.item_name)
    }
}

/// One line of the printer's production log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionRecord {
    pub job_name: String,
    pub owner: String,
    pub printed_pages: f64,
}

impl ProductionRecord {
    pub fn job_id(&self) -> Option<JobId> {
        extract_job_id(&self.job_name)
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Sales lines sharing one job id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesGroup {
    pub job_id: JobId,
    /// First invoice reference seen for this job in input order.
    pub invoice_ref: String,
    /// First customer name seen for this job in input order.
    pub customer_name: String,
    pub total_expected_pages: f64,
    pub record_count: usize,
}

/// Production log lines sharing one job id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionGroup {
    pub job_id: JobId,
    pub total_printed_pages: f64,
    pub record_count: usize,
}

/// A production log line with no extractable job id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrphanProductionRecord {
    pub job_name: String,
    pub owner: String,
    pub printed_pages: f64,
}

impl From<&ProductionRecord> for OrphanProductionRecord {
    fn from(record: &ProductionRecord) -> Self {
        Self {
            job_name: record.job_name.clone(),
            owner: record.owner.clone(),
            printed_pages: record.printed_pages,
        }
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Both,
    SalesOnly,
    ProductionOnly,
}

impl std::fmt::Display for Presence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Both => write!(f, "both"),
            Self::SalesOnly => write!(f, "sales_only"),
            Self::ProductionOnly => write!(f, "production_only"),
        }
    }
}

/// One job id from the outer join of both aggregated sides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub job_id: JobId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    pub expected_pages: f64,
    pub printed_pages: f64,
    /// `printed_pages - expected_pages`.
    pub diff: f64,
    pub presence: Presence,
}

impl ComparisonRow {
    pub fn is_mismatch(&self) -> bool {
        self.diff != 0.0
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    /// Distinct job ids on the sales side.
    pub billed_jobs: usize,
    pub mismatches: usize,
    pub orphans: usize,
    pub total_jobs: usize,
    pub matched: usize,
    pub sales_only: usize,
    pub production_only: usize,
    /// Sales lines dropped from the comparison for lacking a job id.
    pub unkeyed_sales: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub comparison: Vec<ComparisonRow>,
    pub mismatches: Vec<ComparisonRow>,
    pub orphans: Vec<OrphanProductionRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconMeta {
    pub engine_version: String,
    /// Markers of the page rules in effect, in priority order.
    pub page_rules: Vec<String>,
}

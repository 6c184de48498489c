use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::model::{
    JobId, OrphanProductionRecord, ProductionGroup, ProductionRecord, SalesGroup, SalesRecord,
};
use crate::pages::PageRules;

/// Sales side grouped by job id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesAggregation {
    /// Ascending by job id.
    pub groups: Vec<SalesGroup>,
    /// Lines whose invoice reference holds no job id.
    pub unkeyed: usize,
}

/// Production side grouped by job id, with unlabelled jobs split off.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductionAggregation {
    /// Ascending by job id.
    pub groups: Vec<ProductionGroup>,
    /// Input order.
    pub orphans: Vec<OrphanProductionRecord>,
}

/// Group sales lines by job id and sum their expected pages.
///
/// The first line seen for a job supplies the group's invoice reference and
/// customer name, so input order matters for those fields but not for the
/// page total.
pub fn aggregate_sales(records: &[SalesRecord], rules: &PageRules) -> SalesAggregation {
    let mut groups: BTreeMap<JobId, SalesGroup> = BTreeMap::new();
    let mut unkeyed = 0;

    for record in records {
        let Some(job_id) = record.job_id() else {
            unkeyed += 1;
            continue;
        };
        let entry = groups.entry(job_id.clone()).or_insert_with(|| SalesGroup {
            job_id,
            invoice_ref: record.invoice_ref.clone(),
            customer_name: record.customer_name.clone(),
            total_expected_pages: 0.0,
            record_count: 0,
        });
        entry.total_expected_pages += record.expected_pages(rules);
        entry.record_count += 1;
    }

    if unkeyed > 0 {
        warn!(unkeyed, "sales lines without a job id left out of the comparison");
    }
    debug!(lines = records.len(), groups = groups.len(), "sales aggregated");

    SalesAggregation {
        groups: groups.into_values().collect(),
        unkeyed,
    }
}

/// Group production log lines by job id and sum printed pages. Lines without
/// a job id become orphans.
pub fn aggregate_production(records: &[ProductionRecord]) -> ProductionAggregation {
    let mut groups: BTreeMap<JobId, ProductionGroup> = BTreeMap::new();
    let mut orphans = Vec::new();

    for record in records {
        let Some(job_id) = record.job_id() else {
            orphans.push(OrphanProductionRecord::from(record));
            continue;
        };
        let entry = groups.entry(job_id.clone()).or_insert_with(|| ProductionGroup {
            job_id,
            total_printed_pages: 0.0,
            record_count: 0,
        });
        entry.total_printed_pages += record.printed_pages;
        entry.record_count += 1;
    }

    if !orphans.is_empty() {
        warn!(orphans = orphans.len(), "production lines without a job id reported as anonymous");
    }
    debug!(lines = records.len(), groups = groups.len(), "production aggregated");

    ProductionAggregation {
        groups: groups.into_values().collect(),
        orphans,
    }
}

use std::collections::BTreeMap;

use crate::model::{ComparisonRow, JobId, Presence, ProductionGroup, SalesGroup};

/// Full outer join of both aggregated sides on job id.
///
/// Every job id from either side appears exactly once, ascending. A side that
/// never saw the job contributes 0 pages.
pub fn join_groups(sales: &[SalesGroup], production: &[ProductionGroup]) -> Vec<ComparisonRow> {
    let sales_map: BTreeMap<JobId, &SalesGroup> =
        sales.iter().map(|g| (g.job_id.clone(), g)).collect();
    let production_map: BTreeMap<JobId, &ProductionGroup> =
        production.iter().map(|g| (g.job_id.clone(), g)).collect();

    let mut rows = Vec::with_capacity(sales_map.len().max(production_map.len()));

    for (job_id, sales_group) in &sales_map {
        let production_group = production_map.get(job_id);
        let printed_pages = production_group.map(|g| g.total_printed_pages).unwrap_or(0.0);
        rows.push(ComparisonRow {
            job_id: job_id.clone(),
            invoice_ref: Some(sales_group.invoice_ref.clone()),
            customer_name: Some(sales_group.customer_name.clone()),
            expected_pages: sales_group.total_expected_pages,
            printed_pages,
            diff: printed_pages - sales_group.total_expected_pages,
            presence: if production_group.is_some() {
                Presence::Both
            } else {
                Presence::SalesOnly
            },
        });
    }

    for (job_id, production_group) in &production_map {
        if !sales_map.contains_key(job_id) {
            rows.push(ComparisonRow {
                job_id: job_id.clone(),
                invoice_ref: None,
                customer_name: None,
                expected_pages: 0.0,
                printed_pages: production_group.total_printed_pages,
                diff: production_group.total_printed_pages,
                presence: Presence::ProductionOnly,
            });
        }
    }

    rows.sort_by(|a, b| a.job_id.cmp(&b.job_id));
    rows
}

/// Split joined rows into (matches, mismatches), keeping order.
pub fn partition(rows: &[ComparisonRow]) -> (Vec<ComparisonRow>, Vec<ComparisonRow>) {
    let (mismatches, matches): (Vec<_>, Vec<_>) =
        rows.iter().cloned().partition(ComparisonRow::is_mismatch);
    (matches, mismatches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales(job_id: u64, pages: f64) -> SalesGroup {
        SalesGroup {
            job_id: JobId::from(job_id),
            invoice_ref: format!("DR{job_id}"),
            customer_name: format!("cust{job_id}"),
            total_expected_pages: pages,
            record_count: 1,
        }
    }

    fn production(job_id: u64, pages: f64) -> ProductionGroup {
        ProductionGroup {
            job_id: JobId::from(job_id),
            total_printed_pages: pages,
            record_count: 1,
        }
    }

    #[test]
    fn matched_job_has_zero_diff() {
        let rows = join_groups(&[sales(100, 5.0)], &[production(100, 5.0)]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].diff, 0.0);
        assert_eq!(rows[0].presence, Presence::Both);
        assert!(!rows[0].is_mismatch());
    }

    #[test]
    fn underprinted_job_is_negative_mismatch() {
        let rows = join_groups(&[sales(7, 20.0)], &[production(7, 15.0)]);
        assert_eq!(rows[0].diff, -5.0);
        assert!(rows[0].is_mismatch());
    }

    #[test]
    fn one_sided_jobs_zero_filled() {
        let rows = join_groups(&[sales(1, 4.0)], &[production(2, 9.0)]);
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].job_id, JobId::from(1));
        assert_eq!(rows[0].printed_pages, 0.0);
        assert_eq!(rows[0].diff, -4.0);
        assert_eq!(rows[0].presence, Presence::SalesOnly);

        assert_eq!(rows[1].job_id, JobId::from(2));
        assert_eq!(rows[1].expected_pages, 0.0);
        assert_eq!(rows[1].diff, 9.0);
        assert_eq!(rows[1].invoice_ref, None);
        assert_eq!(rows[1].presence, Presence::ProductionOnly);
    }

    #[test]
    fn every_job_id_once_and_sorted() {
        let rows = join_groups(
            &[sales(30, 1.0), sales(10, 1.0), sales(20, 1.0)],
            &[production(20, 1.0), production(40, 1.0), production(10, 2.0)],
        );
        let ids: Vec<String> = rows.iter().map(|r| r.job_id.to_string()).collect();
        assert_eq!(ids, vec!["10", "20", "30", "40"]);
    }

    #[test]
    fn long_ids_sort_after_short_ones() {
        let long = ProductionGroup {
            job_id: crate::extract::extract_job_id("Job_DR_20260118123045123456789").unwrap(),
            total_printed_pages: 3.0,
            record_count: 1,
        };
        let rows = join_groups(&[sales(99_999, 1.0)], &[long, production(5, 1.0)]);
        let ids: Vec<String> = rows.iter().map(|r| r.job_id.to_string()).collect();
        assert_eq!(ids, vec!["5", "99999", "20260118123045123456789"]);
    }

    #[test]
    fn partition_by_diff() {
        let rows = join_groups(
            &[sales(1, 5.0), sales(2, 20.0), sales(3, 0.0)],
            &[production(1, 5.0), production(2, 15.0)],
        );
        let (matches, mismatches) = partition(&rows);
        // job 3 sold zero pages and printed none: not a discrepancy
        let matched: Vec<String> = matches.iter().map(|r| r.job_id.to_string()).collect();
        assert_eq!(matched, vec!["1", "3"]);
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].job_id, JobId::from(2));
        assert_eq!(mismatches[0].diff, -5.0);
    }
}

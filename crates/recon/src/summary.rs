use crate::model::{ComparisonRow, Presence, ReconSummary};

/// Compute summary counts from the joined comparison rows.
pub fn compute_summary(
    comparison: &[ComparisonRow],
    billed_jobs: usize,
    orphans: usize,
    unkeyed_sales: usize,
) -> ReconSummary {
    let mut matched = 0;
    let mut mismatches = 0;
    let mut sales_only = 0;
    let mut production_only = 0;

    for row in comparison {
        if row.is_mismatch() {
            mismatches += 1;
        } else {
            matched += 1;
        }

        match row.presence {
            Presence::Both => {}
            Presence::SalesOnly => sales_only += 1,
            Presence::ProductionOnly => production_only += 1,
        }
    }

    ReconSummary {
        billed_jobs,
        mismatches,
        orphans,
        total_jobs: comparison.len(),
        matched,
        sales_only,
        production_only,
        unkeyed_sales,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::JobId;

    fn row(job_id: u64, expected: f64, printed: f64, presence: Presence) -> ComparisonRow {
        ComparisonRow {
            job_id: JobId::from(job_id),
            invoice_ref: None,
            customer_name: None,
            expected_pages: expected,
            printed_pages: printed,
            diff: printed - expected,
            presence,
        }
    }

    #[test]
    fn summary_counts() {
        let rows = vec![
            row(1, 5.0, 5.0, Presence::Both),
            row(2, 20.0, 15.0, Presence::Both),
            row(3, 4.0, 0.0, Presence::SalesOnly),
            row(4, 0.0, 9.0, Presence::ProductionOnly),
        ];
        let summary = compute_summary(&rows, 3, 2, 1);
        assert_eq!(summary.billed_jobs, 3);
        assert_eq!(summary.total_jobs, 4);
        assert_eq!(summary.matched, 1);
        assert_eq!(summary.mismatches, 3);
        assert_eq!(summary.sales_only, 1);
        assert_eq!(summary.production_only, 1);
        assert_eq!(summary.orphans, 2);
        assert_eq!(summary.unkeyed_sales, 1);
    }
}

use std::path::PathBuf;

use printaudit_recon::engine::{load_production, load_sales, run_finance};
use printaudit_recon::model::Presence;
use printaudit_recon::report::{ANONYMOUS_SECTION, DISCREPANCIES_SECTION};
use printaudit_recon::{build_report, run, AuditConfig, AuditInput, ComparisonRow, JobId, Table};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_table(name: &str) -> Table {
    let path = fixtures_dir().join(name);
    let mut reader = csv::Reader::from_path(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    let headers = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    Table::new(headers, rows)
}

fn ids(rows: &[ComparisonRow]) -> Vec<JobId> {
    rows.iter().map(|r| r.job_id.clone()).collect()
}

fn job_ids(ns: &[u64]) -> Vec<JobId> {
    ns.iter().copied().map(JobId::from).collect()
}

fn load_and_run(
    config: &AuditConfig,
    sales: &str,
    production: &str,
) -> printaudit_recon::ReconResult {
    let input = AuditInput {
        sales: load_table(sales),
        production: load_table(production),
    };
    run(config, &input).unwrap()
}

// -------------------------------------------------------------------------
// Reconciliation
// -------------------------------------------------------------------------

#[test]
fn fixture_summary_counts() {
    let result = load_and_run(&AuditConfig::default(), "sales.csv", "production.csv");
    let s = &result.summary;

    assert_eq!(s.billed_jobs, 4);
    assert_eq!(s.total_jobs, 5);
    assert_eq!(s.matched, 2);
    assert_eq!(s.mismatches, 3);
    assert_eq!(s.orphans, 2);
    assert_eq!(s.sales_only, 0);
    assert_eq!(s.production_only, 1);
    assert_eq!(s.unkeyed_sales, 1);
}

#[test]
fn fixture_comparison_rows() {
    let result = load_and_run(&AuditConfig::default(), "sales.csv", "production.csv");

    assert_eq!(ids(&result.comparison), job_ids(&[7, 15322, 15323, 15330, 15331]));

    // DR007 and DR7 are the same job; invoice text keeps its zeros
    let job7 = &result.comparison[0];
    assert_eq!(job7.invoice_ref.as_deref(), Some("DR007"));
    assert_eq!(job7.expected_pages, 80.0);
    assert_eq!(job7.printed_pages, 80.0);

    // 100 double-sided menus + "1,000" table cards, first customer name wins
    let job15322 = &result.comparison[1];
    assert_eq!(job15322.customer_name.as_deref(), Some("Harbor Cafe"));
    assert_eq!(job15322.expected_pages, 1200.0);
    assert_eq!(job15322.printed_pages, 1200.0);
    assert!(!job15322.is_mismatch());

    let job15323 = &result.comparison[2];
    assert_eq!(job15323.diff, -20.0);

    // unreadable quantity counts as zero pages sold
    let job15330 = &result.comparison[3];
    assert_eq!(job15330.expected_pages, 0.0);
    assert_eq!(job15330.diff, 12.0);

    let job15331 = &result.comparison[4];
    assert_eq!(job15331.presence, Presence::ProductionOnly);
    assert_eq!(job15331.expected_pages, 0.0);
    assert_eq!(job15331.diff, 30.0);
}

#[test]
fn fixture_mismatches_and_orphans() {
    let result = load_and_run(&AuditConfig::default(), "sales.csv", "production.csv");

    assert_eq!(ids(&result.mismatches), job_ids(&[15323, 15330, 15331]));
    assert!(result.mismatches.iter().all(|r| r.diff != 0.0));

    let orphan_names: Vec<&str> = result.orphans.iter().map(|o| o.job_name.as_str()).collect();
    assert_eq!(orphan_names, vec!["Test Page", "Untitled"]);
    assert_eq!(result.orphans[1].printed_pages, 15.0);
}

#[test]
fn raw_quantity_mode() {
    let config = AuditConfig::from_toml("page_rules = []").unwrap();
    let result = load_and_run(&config, "sales.csv", "production.csv");

    // without the double-sided rule the menus and invitations look overprinted
    assert_eq!(ids(&result.mismatches), job_ids(&[7, 15322, 15323, 15330, 15331]));
    assert_eq!(result.mismatches[0].diff, 40.0);
    assert_eq!(result.mismatches[1].diff, 100.0);
    assert!(result.meta.page_rules.is_empty());
}

#[test]
fn renamed_columns_from_config() {
    let toml = std::fs::read_to_string(fixtures_dir().join("renamed.audit.toml")).unwrap();
    let config = AuditConfig::from_toml(&toml).unwrap();
    let result = load_and_run(&config, "sales-renamed.csv", "production-renamed.csv");

    assert_eq!(result.summary.billed_jobs, 1);
    assert_eq!(result.comparison[0].job_id, JobId::from(500));
    assert_eq!(result.comparison[0].expected_pages, 20.0);
    assert!(result.mismatches.is_empty());
}

#[test]
fn stock_config_rejects_renamed_files() {
    let input = AuditInput {
        sales: load_table("sales-renamed.csv"),
        production: load_table("production-renamed.csv"),
    };
    let err = run(&AuditConfig::default(), &input).unwrap_err();
    assert!(err.to_string().contains("missing column 'Invoice No.'"));
}

#[test]
fn rerun_is_byte_identical() {
    let a = load_and_run(&AuditConfig::default(), "sales.csv", "production.csv");
    let b = load_and_run(&AuditConfig::default(), "sales.csv", "production.csv");
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn records_keep_input_order() {
    let config = AuditConfig::default();
    let sales = load_sales(&load_table("sales.csv"), &config.sales.columns).unwrap();
    assert_eq!(sales[0].customer_name, "Harbor Cafe");
    assert_eq!(sales[1].sales_qty, 1000.0);
    let production =
        load_production(&load_table("production.csv"), &config.production.columns).unwrap();
    assert_eq!(production.len(), 8);
    assert_eq!(production[1].printed_pages, 1000.0);
}

// -------------------------------------------------------------------------
// Report
// -------------------------------------------------------------------------

#[test]
fn fixture_report_sections() {
    let result = load_and_run(&AuditConfig::default(), "sales.csv", "production.csv");
    let report = build_report(&result).expect("mismatches produce a report");

    let names: Vec<&str> = report.sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec![DISCREPANCIES_SECTION, ANONYMOUS_SECTION]);
    assert_eq!(report.sections[0].rows.len(), 3);
    assert_eq!(report.sections[1].rows.len(), 2);
}

// -------------------------------------------------------------------------
// Finance
// -------------------------------------------------------------------------

#[test]
fn fixture_finance_summary() {
    let toml = r#"
[[cost_rules]]
pattern = "2 SIDES"
unit_cost = 1.5

[[cost_rules]]
pattern = "flyer"
unit_cost = 0.2
"#;
    let config = AuditConfig::from_toml(toml).unwrap();
    let summary = run_finance(&config, &load_table("sales.csv")).unwrap();

    assert_eq!(summary.sales_lines, 6);
    assert_eq!(summary.total_revenue, Some(2372.5));

    let months = summary.monthly_revenue.unwrap();
    assert_eq!(months.len(), 2);
    assert_eq!(months[0].month, "2026-01");
    assert_eq!(months[0].revenue, 2270.0);
    assert_eq!(months[1].month, "2026-02");
    assert_eq!(months[1].revenue, 102.5);

    let costs = summary.costs.unwrap();
    // 100 menus + 40 invitations at 1.5, 500 flyers at 0.2
    assert_eq!(costs.by_rule[0].quantity, 140.0);
    assert_eq!(costs.estimated_cost, 310.0);
    assert_eq!(costs.uncosted_lines, 3);
    assert_eq!(costs.gross_profit, Some(2062.5));
}

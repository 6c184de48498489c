//! `printaudit audit` and `printaudit validate`.

use std::path::PathBuf;

use printaudit_recon::{build_report, AuditInput, ComparisonRow, ReconResult};
use tracing::debug;

use crate::exit_codes::{EXIT_MISMATCH, EXIT_OUTPUT};
use crate::{load_config, write_output, CliError};

pub struct AuditArgs {
    pub sales: PathBuf,
    pub production: PathBuf,
    pub config: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub sales_sheet: Option<String>,
    pub production_sheet: Option<String>,
    pub quiet: bool,
}

pub fn cmd_audit(args: AuditArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;

    let input = AuditInput {
        sales: printaudit_io::load_table(&args.sales, args.sales_sheet.as_deref())?,
        production: printaudit_io::load_table(&args.production, args.production_sheet.as_deref())?,
    };
    debug!(
        sales_rows = input.sales.len(),
        production_rows = input.production.len(),
        "inputs loaded"
    );

    let result = printaudit_recon::run(&config, &input)?;

    // Output
    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| CliError::new(EXIT_OUTPUT, format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = args.output {
        write_output(path, &json_str)?;
        if !args.quiet {
            eprintln!("wrote {}", path.display());
        }
    }

    if args.json {
        println!("{json_str}");
    }

    if let Some(ref path) = args.report {
        match build_report(&result) {
            Some(report) => {
                printaudit_io::xlsx::write_report(&report, path)?;
                if !args.quiet {
                    eprintln!("wrote {}", path.display());
                }
            }
            None => {
                if !args.quiet {
                    eprintln!("no mismatches; report {} not written", path.display());
                }
            }
        }
    }

    if !args.quiet {
        print_summary(&config.name, &result);
    }

    if result.summary.mismatches > 0 {
        return Err(CliError::new(
            EXIT_MISMATCH,
            format!("{} job(s) printed differently than billed", result.summary.mismatches),
        ));
    }
    Ok(())
}

/// Human summary to stderr
fn print_summary(name: &str, result: &ReconResult) {
    let s = &result.summary;
    eprintln!(
        "audit '{}': {} billed job(s), {} mismatch(es), {} anonymous print job(s)",
        name, s.billed_jobs, s.mismatches, s.orphans,
    );
    if s.unkeyed_sales > 0 {
        eprintln!("{} sales line(s) without a job number were skipped", s.unkeyed_sales);
    }

    for row in &result.mismatches {
        eprintln!("  {}", mismatch_line(row));
    }
}

fn mismatch_line(row: &ComparisonRow) -> String {
    let diff = if row.diff > 0.0 {
        format!("+{}", pages(row.diff))
    } else {
        pages(row.diff)
    };
    format!(
        "job {:<8} {:<12} {:<24} expected {:>8}  printed {:>8}  diff {:>8}",
        row.job_id.to_string(),
        row.invoice_ref.as_deref().unwrap_or("-"),
        row.customer_name.as_deref().unwrap_or("(not billed)"),
        pages(row.expected_pages),
        pages(row.printed_pages),
        diff,
    )
}

/// Page counts are whole in practice; print them without a trailing `.0`.
fn pages(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(Some(&config_path))?;
    eprintln!(
        "valid: audit '{}' with {} page rule(s), {} cost rule(s)",
        config.name,
        config.page_rules.len(),
        config.cost_rules.len(),
    );
    Ok(())
}

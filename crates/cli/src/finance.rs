//! `printaudit finance`: revenue by month and estimated margin.

use std::path::PathBuf;

use printaudit_recon::engine::run_finance;
use printaudit_recon::finance::FinanceSummary;

use crate::exit_codes::EXIT_OUTPUT;
use crate::{load_config, CliError};

pub fn cmd_finance(
    sales: PathBuf,
    config: Option<PathBuf>,
    json: bool,
    sheet: Option<String>,
    quiet: bool,
) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;
    let table = printaudit_io::load_table(&sales, sheet.as_deref())?;
    let summary = run_finance(&config, &table)?;

    if json {
        let json_str = serde_json::to_string_pretty(&summary)
            .map_err(|e| CliError::new(EXIT_OUTPUT, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else if !quiet {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &FinanceSummary) {
    eprintln!("{} sales line(s)", summary.sales_lines);

    let Some(revenue) = summary.total_revenue else {
        eprintln!("no totals column; revenue not computed");
        return;
    };
    eprintln!("revenue: {:.2}", revenue);

    if let Some(ref months) = summary.monthly_revenue {
        for m in months {
            eprintln!("  {}  {:>12.2}  ({} line(s))", m.month, m.revenue, m.lines);
        }
        if summary.undated_lines > 0 {
            eprintln!("  {} line(s) without a readable date", summary.undated_lines);
        }
    }

    if let Some(ref costs) = summary.costs {
        eprintln!("estimated cost: {:.2}", costs.estimated_cost);
        if let Some(profit) = costs.gross_profit {
            eprintln!("gross profit: {:.2}", profit);
        }
        if let Some(margin) = costs.margin_pct {
            eprintln!("margin: {:.1}%", margin);
        }
        if costs.uncosted_lines > 0 {
            eprintln!("{} line(s) matched no cost rule", costs.uncosted_lines);
        }
    }
}

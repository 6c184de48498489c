// printaudit CLI - reconcile the POS sales ledger against the print production log

mod audit;
mod exit_codes;
mod finance;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use printaudit_io::IoError;
use printaudit_recon::{AuditConfig, ReconError};
use tracing::Level;
use tracing_subscriber::fmt::time::ChronoLocal;

use exit_codes::{EXIT_INPUT, EXIT_INVALID_CONFIG, EXIT_OUTPUT, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "printaudit")]
#[command(about = "Audit print-shop billing: sales ledger vs. production log")]
#[command(version)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug)
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only print errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile billed pages against printed pages (exit 0 = clean, exit 1 = mismatches)
    #[command(after_help = "\
Exit code 1 means at least one job's printed pages differ from its billed pages.

Examples:
  printaudit audit sales.xlsx production.csv
  printaudit audit sales.csv production.csv --report audit.xlsx
  printaudit audit sales.csv production.csv --json | jq .summary
  printaudit audit sales.csv log.tsv --config shop.audit.toml --output result.json
  printaudit audit pos.xlsx log.xlsx --sales-sheet Invoices --production-sheet Jobs")]
    Audit {
        /// Sales ledger (.csv, .tsv, .txt, .xlsx, .xlsm, .xls, .xlsb, .ods)
        sales: PathBuf,

        /// Production log (same formats as the sales ledger)
        production: PathBuf,

        /// TOML config (column names, page rules)
        #[arg(long, short = 'c', env = "PRINTAUDIT_CONFIG")]
        config: Option<PathBuf>,

        /// Write the discrepancy report as XLSX (only when mismatches exist)
        #[arg(long, short = 'r')]
        report: Option<PathBuf>,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Worksheet to read from a workbook sales ledger (default: first sheet)
        #[arg(long)]
        sales_sheet: Option<String>,

        /// Worksheet to read from a workbook production log (default: first sheet)
        #[arg(long)]
        production_sheet: Option<String>,
    },

    /// Revenue by month and estimated cost/margin from the sales ledger
    #[command(after_help = "\
Examples:
  printaudit finance sales.xlsx
  printaudit finance sales.csv --config shop.audit.toml --json")]
    Finance {
        /// Sales ledger
        sales: PathBuf,

        /// TOML config (column names, cost rules, date formats)
        #[arg(long, short = 'c', env = "PRINTAUDIT_CONFIG")]
        config: Option<PathBuf>,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,

        /// Worksheet to read from a workbook ledger (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,
    },

    /// Validate a config file without running
    #[command(after_help = "\
Examples:
  printaudit validate shop.audit.toml")]
    Validate {
        /// Path to the .audit.toml config file
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Audit {
            sales,
            production,
            config,
            report,
            json,
            output,
            sales_sheet,
            production_sheet,
        } => audit::cmd_audit(audit::AuditArgs {
            sales,
            production,
            config,
            report,
            json,
            output,
            sales_sheet,
            production_sheet,
            quiet: cli.quiet,
        }),
        Commands::Finance {
            sales,
            config,
            json,
            sheet,
        } => finance::cmd_finance(sales, config, json, sheet, cli.quiet),
        Commands::Validate { config } => audit::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// Logs go to stderr so `--json` stdout stays a single JSON value.
fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::WARN,
        (false, 1) => Level::INFO,
        (false, _) => Level::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .with_max_level(level)
        .init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<IoError> for CliError {
    fn from(err: IoError) -> Self {
        match err {
            IoError::UnsupportedFormat { .. } => Self::new(EXIT_USAGE, err.to_string()),
            IoError::Export { .. } => Self::new(EXIT_OUTPUT, err.to_string()),
            IoError::MissingSheet { .. } => Self::new(EXIT_INPUT, err.to_string())
                .with_hint("use --sales-sheet / --production-sheet / --sheet to pick a worksheet"),
            _ => Self::new(EXIT_INPUT, err.to_string()),
        }
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        match err {
            ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => {
                Self::new(EXIT_INVALID_CONFIG, err.to_string())
            }
            ReconError::MissingColumn { .. } => Self::new(EXIT_INPUT, err.to_string())
                .with_hint("map renamed columns in a config file passed with --config"),
        }
    }
}

/// Load the config file, or the stock config when none is given.
pub(crate) fn load_config(path: Option<&Path>) -> Result<AuditConfig, CliError> {
    let Some(path) = path else {
        return Ok(AuditConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|e| {
        CliError::new(EXIT_INPUT, format!("cannot read config {}: {e}", path.display()))
    })?;
    Ok(AuditConfig::from_toml(&text)?)
}

/// Write `text` to `path`, mapping failures to the output exit code.
pub(crate) fn write_output(path: &Path, text: &str) -> Result<(), CliError> {
    std::fs::write(path, text).map_err(|e| {
        CliError::new(EXIT_OUTPUT, format!("cannot write {}: {e}", path.display()))
    })
}

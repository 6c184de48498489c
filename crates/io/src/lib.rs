// File I/O: ledger import (CSV, Excel) and audit report export (XLSX)

pub mod csv;
pub mod error;
pub mod xlsx;

use std::path::Path;

pub use error::IoError;
use printaudit_recon::Table;

/// Load a ledger or log file as a table, picking the reader by extension.
///
/// `sheet` selects a worksheet in workbook files and is ignored for CSV.
pub fn load_table(path: &Path, sheet: Option<&str>) -> Result<Table, IoError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" | "txt" => csv::import(path),
        "tsv" => csv::import_tsv(path),
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => xlsx::import(path, sheet),
        _ => Err(IoError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

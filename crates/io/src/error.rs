use std::path::PathBuf;

use thiserror::Error;

/// File-level failures. Any of these stops the run before the engine sees
/// the data.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: malformed CSV: {message}", .path.display())]
    Csv { path: PathBuf, message: String },
    #[error("{}: file is empty", .path.display())]
    Empty { path: PathBuf },
    #[error("cannot open workbook {}: {message}", .path.display())]
    Workbook { path: PathBuf, message: String },
    #[error("{}: workbook contains no sheets", .path.display())]
    EmptyWorkbook { path: PathBuf },
    #[error("{}: no sheet named '{sheet}'", .path.display())]
    MissingSheet { path: PathBuf, sheet: String },
    #[error(
        "{}: unsupported file type (expected .csv, .tsv, .txt, .xlsx, .xlsm, .xls, .xlsb or .ods)",
        .path.display()
    )]
    UnsupportedFormat { path: PathBuf },
    #[error("cannot write report {}: {message}", .path.display())]
    Export { path: PathBuf, message: String },
}

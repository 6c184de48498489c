//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: nightly audit jobs branch on them.
//!
//! | Code | Meaning                                                      |
//! |------|--------------------------------------------------------------|
//! | 0    | Success; for `audit`, every billed job matched production    |
//! | 1    | `audit` found at least one mismatched job                    |
//! | 2    | Usage error (bad arguments, unsupported file type)           |
//! | 3    | Config file failed to parse or validate                      |
//! | 4    | Input error (unreadable file, missing required column)       |
//! | 5    | Output error (cannot write JSON or the XLSX report)          |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant below
//! 2. Document what triggers it
//! 3. Update the table above

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Audit completed and found mismatched jobs.
/// Like `diff(1)`, exit 1 means "ledgers differ."
pub const EXIT_MISMATCH: u8 = 1;

/// Usage error - bad arguments, unsupported input extension.
pub const EXIT_USAGE: u8 = 2;

/// Config file could not be parsed or failed validation.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// Input file unreadable, malformed, or missing a required column.
pub const EXIT_INPUT: u8 = 4;

/// JSON output or XLSX report could not be written.
pub const EXIT_OUTPUT: u8 = 5;

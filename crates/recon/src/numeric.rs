//! Lenient number parsing for ledger and log cells.
//!
//! Every numeric cell the engine reads goes through [`coerce_number`]. A cell
//! that cannot be read as a non-negative number contributes 0; it never fails
//! the run.

/// Parse a quantity, page count or amount cell.
///
/// Whitespace is trimmed and `,` thousands separators are removed, so
/// `"1,250"` reads as 1250. Empty, non-numeric, non-finite and negative
/// input all coerce to `0.0`.
pub fn coerce_number(text: &str) -> f64 {
    parse_number(text).filter(|n| *n >= 0.0).unwrap_or(0.0)
}

/// Currency amounts keep their sign (refund lines are negative); anything
/// unreadable still counts as `0.0`.
pub fn coerce_amount(text: &str) -> f64 {
    parse_number(text).unwrap_or(0.0)
}

/// Strict counterpart: `None` for anything that is not a finite number.
/// Signed values are kept.
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

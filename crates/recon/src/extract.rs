use std::sync::OnceLock;

use regex::Regex;

use crate::model::JobId;

fn digit_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+").expect("digit-run pattern is valid"))
}

/// Extract the job id from a free-text field: the first maximal run of
/// decimal digits, read as a number.
///
/// Works the same for POS invoice numbers ("DR15322") and production job
/// names ("Job_DR_15322"). Leading zeros carry no meaning ("DR007" → 7).
/// Runs of any length are kept exactly. Returns `None` only when the text
/// has no digits.
pub fn extract_job_id(text: &str) -> Option<JobId> {
    let run = digit_run().find(text)?.as_str();
    Some(JobId::from_digits(run))
}

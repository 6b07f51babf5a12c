use rostermatch_core::Table;

use crate::error::ReconError;
use crate::matcher::{build_index, match_indexed, membership};
use crate::model::{MatchOptions, MatchResult, NormalizedTable};
use crate::normalize::normalize;
use crate::summary::compute_summary;

/// Normalize both tables, match them per `options`, and summarize.
pub fn run(subject: Table, reference: Table, options: &MatchOptions) -> Result<MatchResult, ReconError> {
    let subject = normalize(subject);
    let reference = normalize(reference);
    run_normalized(&subject, &reference, options)
}

/// Match already-normalized tables.
pub fn run_normalized(
    subject: &NormalizedTable,
    reference: &NormalizedTable,
    options: &MatchOptions,
) -> Result<MatchResult, ReconError> {
    let index = build_index(reference, options.null_keys);
    log::debug!(
        "indexed {} reference row(s) under {} distinct key(s)",
        reference.len(),
        index.len()
    );

    let flags = membership(subject, &index, options.null_keys);
    let table = match_indexed(subject, reference, &index, options)?;

    let summary = compute_summary(subject, reference, options, &flags, table.len());
    log::info!(
        "{}: {} of {} subject row(s) matched {} reference row(s); {} output row(s)",
        summary.mode,
        summary.matched_rows,
        summary.subject_rows,
        summary.reference_rows,
        summary.output_rows,
    );
    if summary.incomplete_subject_keys > 0 || summary.incomplete_reference_keys > 0 {
        log::warn!(
            "incomplete keys: {} subject row(s), {} reference row(s)",
            summary.incomplete_subject_keys,
            summary.incomplete_reference_keys,
        );
    }

    Ok(MatchResult { table, summary })
}

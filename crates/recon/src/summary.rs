use crate::model::{MatchOptions, MatchSummary, NormalizedTable};

/// Count what a match run saw and produced.
///
/// `flags` holds one membership flag per subject row.
pub fn compute_summary(
    subject: &NormalizedTable,
    reference: &NormalizedTable,
    options: &MatchOptions,
    flags: &[bool],
    output_rows: usize,
) -> MatchSummary {
    MatchSummary {
        mode: options.mode.as_str().to_string(),
        subject_rows: subject.len(),
        reference_rows: reference.len(),
        matched_rows: flags.iter().filter(|f| **f).count(),
        output_rows,
        incomplete_subject_keys: subject.keys.iter().filter(|k| !k.is_complete()).count(),
        incomplete_reference_keys: reference.keys.iter().filter(|k| !k.is_complete()).count(),
    }
}

use std::collections::{HashMap, HashSet};

use rostermatch_core::{Cell, Row, Table};

use crate::error::ReconError;
use crate::model::{MatchKey, MatchMode, MatchOptions, NormalizedTable, NullKeyPolicy, KEY_COLUMNS};

/// Reference rows grouped by key, each group in reference order.
pub type KeyIndex<'a> = HashMap<&'a MatchKey, Vec<usize>>;

/// Index the reference table once so each subject lookup is O(1).
///
/// Under [`NullKeyPolicy::NeverMatch`] incomplete keys are left out, so they
/// can never be found.
pub fn build_index<'a>(reference: &'a NormalizedTable, policy: NullKeyPolicy) -> KeyIndex<'a> {
    let mut index: KeyIndex<'a> = HashMap::new();
    for (row, key) in reference.keys.iter().enumerate() {
        if policy == NullKeyPolicy::NeverMatch && !key.is_complete() {
            continue;
        }
        index.entry(key).or_default().push(row);
    }
    index
}

/// Reference rows whose key equals `key`.
pub fn lookup<'i>(index: &'i KeyIndex<'_>, key: &MatchKey, policy: NullKeyPolicy) -> &'i [usize] {
    if policy == NullKeyPolicy::NeverMatch && !key.is_complete() {
        return &[];
    }
    index.get(key).map(Vec::as_slice).unwrap_or(&[])
}

/// One flag per subject row: true iff some reference row has an equal key.
pub fn membership(subject: &NormalizedTable, index: &KeyIndex<'_>, policy: NullKeyPolicy) -> Vec<bool> {
    subject
        .keys
        .iter()
        .map(|k| !lookup(index, k, policy).is_empty())
        .collect()
}

/// Match `subject` against `reference` and build the output table.
pub fn match_tables(
    subject: &NormalizedTable,
    reference: &NormalizedTable,
    options: &MatchOptions,
) -> Result<Table, ReconError> {
    let index = build_index(reference, options.null_keys);
    match_indexed(subject, reference, &index, options)
}

/// [`match_tables`] against an index already built over `reference`.
pub fn match_indexed(
    subject: &NormalizedTable,
    reference: &NormalizedTable,
    index: &KeyIndex<'_>,
    options: &MatchOptions,
) -> Result<Table, ReconError> {
    match &options.mode {
        MatchMode::InnerJoin => inner_join(subject, reference, index, options.null_keys),
        MatchMode::Flag { column } => flag_rows(subject, index, options.null_keys, column),
    }
}

// ---------------------------------------------------------------------------
// Flag mode
// ---------------------------------------------------------------------------

/// Every subject row with its original columns, plus a boolean `column`.
///
/// An existing column of the same name is overwritten in place.
pub fn flag_rows(
    subject: &NormalizedTable,
    index: &KeyIndex<'_>,
    policy: NullKeyPolicy,
    column: &str,
) -> Result<Table, ReconError> {
    let flags = membership(subject, index, policy);
    let mut table = subject.source.clone();
    table.set_column(column, flags.into_iter().map(Cell::Bool).collect())?;
    Ok(table)
}

// ---------------------------------------------------------------------------
// Inner join
// ---------------------------------------------------------------------------

/// One row per matching (subject, reference) pair.
///
/// Columns are the three key columns, then the subject's carried columns,
/// then the reference's. Carried names present on both sides get `_x`
/// (subject) and `_y` (reference) suffixes.
pub fn inner_join(
    subject: &NormalizedTable,
    reference: &NormalizedTable,
    index: &KeyIndex<'_>,
    policy: NullKeyPolicy,
) -> Result<Table, ReconError> {
    let left = carried_indices(subject);
    let right = carried_indices(reference);

    let shared: HashSet<&str> = {
        let left_names: HashSet<&str> = left.iter().map(|(n, _)| *n).collect();
        right.iter().map(|(n, _)| *n).filter(|n| left_names.contains(n)).collect()
    };
    let output_name = |name: &str, suffix: &str| {
        if shared.contains(name) {
            format!("{name}{suffix}")
        } else {
            name.to_string()
        }
    };

    let columns: Vec<String> = KEY_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(left.iter().map(|(n, _)| output_name(*n, "_x")))
        .chain(right.iter().map(|(n, _)| output_name(*n, "_y")))
        .collect();
    let mut table = Table::new(columns)?;

    for (si, key) in subject.keys.iter().enumerate() {
        for &ri in lookup(index, key, policy) {
            let mut row: Row = Vec::with_capacity(table.width());
            row.extend(key.cells());
            push_cells(&mut row, &subject.source, si, &left);
            push_cells(&mut row, &reference.source, ri, &right);
            table.push_row(row)?;
        }
    }

    Ok(table)
}

fn carried_indices(table: &NormalizedTable) -> Vec<(&str, usize)> {
    table
        .carried_columns()
        .into_iter()
        .filter_map(|name| table.source.column_index(name).map(|ci| (name, ci)))
        .collect()
}

fn push_cells(row: &mut Row, table: &Table, index: usize, columns: &[(&str, usize)]) {
    let cells = table.row(index).map(Vec::as_slice).unwrap_or(&[]);
    row.extend(columns.iter().map(|(_, ci)| cells.get(*ci).cloned().unwrap_or_default()));
}

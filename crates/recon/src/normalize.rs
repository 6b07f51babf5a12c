//! Field normalization: derive one [`MatchKey`] per row.
//!
//! Column selection is driven by ordered candidate lists. The first candidate
//! present in the table wins, so the priority order is the list order.

use rostermatch_core::Table;

use crate::dob::standardize_dob;
use crate::model::{MatchKey, NormalizedTable};
use crate::names::{first_token, suffix_aware_last_name};

/// Date-of-birth columns, highest priority first.
pub const DOB_COLUMNS: &[&str] = &["birthdate", "date of birth", "dob"];

/// Combined "First Last" columns.
pub const FULL_NAME_COLUMNS: &[&str] = &["name", "full name", "student name"];

pub const FIRST_NAME_COLUMNS: &[&str] = &["firstname", "first name", "first_name"];

pub const LAST_NAME_COLUMNS: &[&str] = &["lastname", "last name", "last_name"];

/// First candidate present in `table`, if any.
pub fn first_present(table: &Table, candidates: &[&'static str]) -> Option<&'static str> {
    candidates.iter().copied().find(|c| table.has_column(c))
}

/// The column holding dates of birth.
pub fn find_dob_field(table: &Table) -> Option<&'static str> {
    first_present(table, DOB_COLUMNS)
}

/// Which source columns feed each key component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeySources {
    pub full_name: Option<&'static str>,
    pub first_name: Option<&'static str>,
    pub last_name: Option<&'static str>,
    pub dob: Option<&'static str>,
}

impl KeySources {
    pub fn detect(table: &Table) -> Self {
        Self {
            full_name: first_present(table, FULL_NAME_COLUMNS),
            first_name: first_present(table, FIRST_NAME_COLUMNS),
            last_name: first_present(table, LAST_NAME_COLUMNS),
            dob: find_dob_field(table),
        }
    }

    /// Columns that feed the keys, deduplicated.
    fn consumed(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for col in [self.full_name, self.first_name, self.last_name, self.dob].into_iter().flatten() {
            if !out.iter().any(|c| c == col) {
                out.push(col.to_string());
            }
        }
        out
    }

    fn has_any_name(&self) -> bool {
        self.full_name.is_some() || self.first_name.is_some() || self.last_name.is_some()
    }
}

/// Compute match keys for every row of `table`.
///
/// The combined name column is split first; separate first/last name columns
/// then override their part, including with a blank. Unparseable dates and
/// blank names yield `None` components. The source table is kept as-is.
pub fn normalize(table: Table) -> NormalizedTable {
    let sources = KeySources::detect(&table);

    if !sources.has_any_name() {
        log::warn!("no name column found; all name keys will be empty");
    }
    if sources.dob.is_none() {
        log::warn!(
            "no date of birth column found (looked for {}); all dob keys will be empty",
            DOB_COLUMNS.join(", ")
        );
    }

    let keys: Vec<MatchKey> = (0..table.len()).map(|row| row_key(&table, row, &sources)).collect();

    let unparsed_dobs = match sources.dob {
        Some(col) => (0..table.len())
            .filter(|&row| table.get(row, col).is_some_and(|c| !c.is_empty()) && keys[row].dob.is_none())
            .count(),
        None => 0,
    };
    if unparsed_dobs > 0 {
        log::warn!("{unparsed_dobs} date(s) of birth could not be parsed");
    }

    NormalizedTable { consumed: sources.consumed(), source: table, keys }
}

fn row_key(table: &Table, row: usize, sources: &KeySources) -> MatchKey {
    let text = |col: Option<&str>| col.map(|c| table.text(row, c).unwrap_or(""));

    let mut first_name = None;
    let mut last_name = None;

    if let Some(full) = text(sources.full_name) {
        first_name = first_token(full);
        last_name = suffix_aware_last_name(full);
    }
    if let Some(last) = text(sources.last_name) {
        last_name = suffix_aware_last_name(last);
    }
    if let Some(first) = text(sources.first_name) {
        first_name = first_token(first);
    }

    let dob = text(sources.dob).and_then(standardize_dob);

    MatchKey { last_name, first_name, dob }
}

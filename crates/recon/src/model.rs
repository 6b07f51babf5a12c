use rostermatch_core::{Cell, Table, TableError};
use serde::{Deserialize, Serialize};

/// Derived column names, in output order.
pub const FIRST_NAME: &str = "first_name";
pub const LAST_NAME: &str = "last_name";
pub const DOB: &str = "dob";
pub const KEY_COLUMNS: [&str; 3] = [FIRST_NAME, LAST_NAME, DOB];

pub const DEFAULT_FLAG_COLUMN: &str = "is_in_reference";

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Identity of a student for matching purposes.
///
/// Two rows are the same student iff their keys are equal field by field
/// (exact, case-sensitive). A `None` component never matches under the
/// default [`NullKeyPolicy`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MatchKey {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    /// Canonical `YYYY-MM-DD`.
    pub dob: Option<String>,
}

impl MatchKey {
    pub fn new(first_name: &str, last_name: &str, dob: &str) -> Self {
        Self {
            last_name: Some(last_name.to_string()),
            first_name: Some(first_name.to_string()),
            dob: Some(dob.to_string()),
        }
    }

    /// All three components present.
    pub fn is_complete(&self) -> bool {
        self.last_name.is_some() && self.first_name.is_some() && self.dob.is_some()
    }

    /// Key cells in [`KEY_COLUMNS`] order.
    pub fn cells(&self) -> [Cell; 3] {
        [
            Cell::from(self.first_name.clone()),
            Cell::from(self.last_name.clone()),
            Cell::from(self.dob.clone()),
        ]
    }
}

/// What to do with keys that have a missing component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NullKeyPolicy {
    /// A missing name or date can't confirm identity: never matches.
    #[default]
    NeverMatch,
    /// Missing components compare equal to each other.
    MatchNulls,
}

// ---------------------------------------------------------------------------
// Normalized input
// ---------------------------------------------------------------------------

/// A loaded table plus one [`MatchKey`] per row.
///
/// The source table is kept untouched so flag mode can echo it back.
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    pub source: Table,
    pub keys: Vec<MatchKey>,
    /// Source columns that fed the keys (name, first/last name, date of birth).
    pub consumed: Vec<String>,
}

impl NormalizedTable {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Source columns that are neither key inputs nor derived key names.
    pub fn carried_columns(&self) -> Vec<&str> {
        self.source
            .columns()
            .iter()
            .map(String::as_str)
            .filter(|c| !self.consumed.iter().any(|k| k.as_str() == *c) && !KEY_COLUMNS.contains(c))
            .collect()
    }

    /// Rows with the key inputs replaced by `first_name`, `last_name`, `dob`.
    pub fn to_table(&self) -> Result<Table, TableError> {
        let mut table = self.source.clone();
        for col in self.consumed.iter().map(String::as_str).chain(KEY_COLUMNS) {
            table.drop_column(col);
        }
        let firsts = self.keys.iter().map(|k| Cell::from(k.first_name.clone())).collect();
        let lasts = self.keys.iter().map(|k| Cell::from(k.last_name.clone())).collect();
        let dobs = self.keys.iter().map(|k| Cell::from(k.dob.clone())).collect();
        table.add_column(FIRST_NAME, firsts)?;
        table.add_column(LAST_NAME, lasts)?;
        table.add_column(DOB, dobs)?;
        Ok(table)
    }
}

// ---------------------------------------------------------------------------
// Modes + results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchMode {
    /// One output row per (subject, reference) pair with equal keys.
    InnerJoin,
    /// Every subject row, plus a boolean column named `column`.
    Flag { column: String },
}

impl MatchMode {
    pub fn flag() -> Self {
        Self::Flag { column: DEFAULT_FLAG_COLUMN.to_string() }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InnerJoin => "inner_join",
            Self::Flag { .. } => "flag",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOptions {
    pub mode: MatchMode,
    pub null_keys: NullKeyPolicy,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            mode: MatchMode::flag(),
            null_keys: NullKeyPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub mode: String,
    pub subject_rows: usize,
    pub reference_rows: usize,
    /// Subject rows with at least one equal reference key.
    pub matched_rows: usize,
    pub output_rows: usize,
    /// Subject rows whose key is missing a component.
    pub incomplete_subject_keys: usize,
    /// Reference rows whose key is missing a component.
    pub incomplete_reference_keys: usize,
}

#[derive(Debug, Clone)]
pub struct MatchResult {
    pub table: Table,
    pub summary: MatchSummary,
}

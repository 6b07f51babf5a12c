use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A single table value.
///
/// `Empty` stands for a blank or missing field. It never compares equal to
/// anything during matching; that policy lives in the matcher, not here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Bool(bool),
}

impl Cell {
    /// Build a cell from a raw CSV field. Zero-length fields are `Empty`.
    pub fn from_raw(raw: &str) -> Self {
        if raw.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(raw.to_string())
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::from_raw(s)
    }
}

impl From<Option<String>> for Cell {
    fn from(v: Option<String>) -> Self {
        v.map(Cell::Text).unwrap_or(Cell::Empty)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Bool(true) => f.write_str("True"),
            Cell::Bool(false) => f.write_str("False"),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// Two columns share a name.
    DuplicateColumn(String),
    /// A row or column vector has the wrong length.
    Width { expected: usize, found: usize },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateColumn(name) => write!(f, "duplicate column '{name}'"),
            Self::Width { expected, found } => {
                write!(f, "expected {expected} value(s), found {found}")
            }
        }
    }
}

impl std::error::Error for TableError {}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

pub type Row = Vec<Cell>;

/// Ordered rows sharing one set of uniquely named columns.
///
/// Every row holds exactly `columns().len()` cells, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Result<Self, TableError> {
        let mut seen = HashSet::new();
        for c in &columns {
            if !seen.insert(c.as_str()) {
                return Err(TableError::DuplicateColumn(c.clone()));
            }
        }
        Ok(Self { columns, rows: Vec::new() })
    }

    /// Build a table from string literals. Mostly useful in tests.
    pub fn from_rows<C, R>(columns: &[C], rows: &[R]) -> Result<Self, TableError>
    where
        C: AsRef<str>,
        R: AsRef<[&'static str]>,
    {
        let mut table = Table::new(columns.iter().map(|c| c.as_ref().to_string()).collect())?;
        for r in rows {
            table.push_row(r.as_ref().iter().map(|v| Cell::from_raw(v)).collect())?;
        }
        Ok(table)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at (`row`, `column`), or `None` when either is out of range.
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let ci = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(ci))
    }

    /// Text value at (`row`, `column`); `None` for blanks, booleans and misses.
    pub fn text(&self, row: usize, column: &str) -> Option<&str> {
        self.get(row, column).and_then(Cell::as_text)
    }

    pub fn push_row(&mut self, row: Row) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::Width {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Append a column. `values` must hold one cell per existing row.
    pub fn add_column(&mut self, name: impl Into<String>, values: Vec<Cell>) -> Result<(), TableError> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(TableError::DuplicateColumn(name));
        }
        if values.len() != self.rows.len() {
            return Err(TableError::Width {
                expected: self.rows.len(),
                found: values.len(),
            });
        }
        self.columns.push(name);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }

    /// Overwrite a column in place, or append it when absent.
    pub fn set_column(&mut self, name: impl Into<String>, values: Vec<Cell>) -> Result<(), TableError> {
        let name = name.into();
        let Some(ci) = self.column_index(&name) else {
            return self.add_column(name, values);
        };
        if values.len() != self.rows.len() {
            return Err(TableError::Width {
                expected: self.rows.len(),
                found: values.len(),
            });
        }
        for (row, value) in self.rows.iter_mut().zip(values) {
            row[ci] = value;
        }
        Ok(())
    }

    /// Remove a column, returning its cells. `None` if the column is absent.
    pub fn drop_column(&mut self, name: &str) -> Option<Vec<Cell>> {
        let ci = self.column_index(name)?;
        self.columns.remove(ci);
        Some(self.rows.iter_mut().map(|r| r.remove(ci)).collect())
    }
}

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Trim and lower-case header names, then make them unique.
///
/// Repeats get a `.N` suffix in order of appearance: `name, Name, NAME`
/// becomes `name, name.1, name.2`.
pub fn lowercase_columns<I, S>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for h in headers {
        let base = h.as_ref().trim().to_lowercase();
        let mut name = base.clone();
        let mut n = 1;
        while seen.contains(&name) {
            name = format!("{base}.{n}");
            n += 1;
        }
        seen.insert(name.clone());
        out.push(name);
    }

    out
}

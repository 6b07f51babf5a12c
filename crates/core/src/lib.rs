//! `rostermatch-core`: shared tabular data model.
//!
//! A [`Table`] is what the loader produces and what the matcher consumes:
//! ordered rows keyed by unique, lower-cased column names.

pub mod table;

pub use table::{lowercase_columns, Cell, Row, Table, TableError};

use std::fmt;

use rostermatch_core::TableError;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty path, bad flag column, etc.).
    ConfigValidation(String),
    /// Building the output table failed (column collision, width).
    Table(TableError),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Table(err) => write!(f, "cannot build result table: {err}"),
        }
    }
}

impl std::error::Error for ReconError {}

impl From<TableError> for ReconError {
    fn from(err: TableError) -> Self {
        Self::Table(err)
    }
}

use std::fmt;
use std::path::PathBuf;

/// Why a file could not be turned into a table.
///
/// Every variant carries the offending path so the message stands on its own
/// when it reaches the user.
#[derive(Debug)]
pub enum LoadError {
    /// File does not exist.
    NotFound { path: PathBuf },
    /// File exists but could not be read (permissions, IO).
    Io { path: PathBuf, message: String },
    /// Bytes are not valid in the detected encoding.
    Decode { path: PathBuf, encoding: &'static str },
    /// No line satisfies the header keyword rules.
    HeaderNotFound { path: PathBuf },
    /// Rows after the header could not be parsed.
    Parse { path: PathBuf, message: String },
    /// Output could not be written.
    Write { path: PathBuf, message: String },
}

impl LoadError {
    pub(crate) fn from_io(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path: path.to_path_buf() }
        } else {
            Self::Io { path: path.to_path_buf(), message: err.to_string() }
        }
    }

    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotFound { path }
            | Self::Io { path, .. }
            | Self::Decode { path, .. }
            | Self::HeaderNotFound { path }
            | Self::Parse { path, .. }
            | Self::Write { path, .. } => path,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "file not found: {}", path.display()),
            Self::Io { path, message } => write!(f, "cannot read {}: {message}", path.display()),
            Self::Decode { path, encoding } => {
                write!(f, "{}: content is not valid {encoding}", path.display())
            }
            Self::HeaderNotFound { path } => {
                write!(f, "header line not found in {} based on keywords", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "error reading CSV {}: {message}", path.display())
            }
            Self::Write { path, message } => {
                write!(f, "cannot write {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for LoadError {}

//! `rostermatch-io`: turns messy CSV exports into [`Table`]s and back.
//!
//! Detection runs as a chain of independent steps, each a plain function:
//! [`encoding::detect_encoding`], then [`header::find_header_start`] and
//! [`delimiter::detect_delimiter`]. [`loader::load_table`] composes them.
//!
//! [`Table`]: rostermatch_core::Table

pub mod delimiter;
pub mod encoding;
pub mod error;
pub mod header;
pub mod lines;
pub mod loader;
pub mod writer;

pub use delimiter::DetectOptions;
pub use error::LoadError;
pub use loader::{detect_format, load_table, load_table_with, DetectedFormat};
pub use writer::{write_table, write_table_to};

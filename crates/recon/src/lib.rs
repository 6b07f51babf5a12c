//! `rostermatch-recon`: Student roster normalization and matching.
//!
//! Pure engine crate: receives loaded tables, returns matched tables and a
//! summary. No CLI or file IO.

pub mod config;
pub mod dob;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod names;
pub mod normalize;
pub mod summary;

pub use config::MatchConfig;
pub use engine::{run, run_normalized};
pub use error::ReconError;
pub use matcher::match_tables;
pub use model::{MatchKey, MatchMode, MatchOptions, MatchResult, MatchSummary, NormalizedTable, NullKeyPolicy};
pub use normalize::normalize;

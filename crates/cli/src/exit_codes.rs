//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain    | Description                                 |
//! |---------|-----------|---------------------------------------------|
//! | 0       | Universal | Success (including "no matches")            |
//! | 1       | Universal | General error (unspecified)                 |
//! | 2       | Universal | CLI usage error (bad args)                  |
//! | 3-9     | load      | Input table could not be loaded or written  |
//! | 10-19   | config    | Job file problems                           |
//! | 20-29   | match     | Matching failed after both tables loaded    |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use rostermatch_io::LoadError;
use rostermatch_recon::ReconError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, invalid option values.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Load (3-9)
// =============================================================================

/// Input file does not exist.
pub const EXIT_LOAD_NOT_FOUND: u8 = 3;

/// Input file exists but could not be read or decoded.
pub const EXIT_LOAD_READ: u8 = 4;

/// No line matched the header keyword rules.
pub const EXIT_LOAD_HEADER: u8 = 5;

/// Rows after the header could not be parsed.
pub const EXIT_LOAD_PARSE: u8 = 6;

/// Output file could not be written.
pub const EXIT_WRITE: u8 = 7;

// =============================================================================
// Config (10-19)
// =============================================================================

/// Job file could not be read or is not valid TOML for a job.
pub const EXIT_CONFIG_PARSE: u8 = 10;

/// Job file parsed but failed validation.
pub const EXIT_CONFIG_INVALID: u8 = 11;

// =============================================================================
// Match (20-29)
// =============================================================================

/// Result table could not be assembled (e.g. column name collision).
pub const EXIT_MATCH_RUNTIME: u8 = 20;

/// Map a load error to its exit code.
pub fn load_exit_code(err: &LoadError) -> u8 {
    match err {
        LoadError::NotFound { .. } => EXIT_LOAD_NOT_FOUND,
        LoadError::Io { .. } | LoadError::Decode { .. } => EXIT_LOAD_READ,
        LoadError::HeaderNotFound { .. } => EXIT_LOAD_HEADER,
        LoadError::Parse { .. } => EXIT_LOAD_PARSE,
        LoadError::Write { .. } => EXIT_WRITE,
    }
}

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) => EXIT_CONFIG_PARSE,
        ReconError::ConfigValidation(_) => EXIT_CONFIG_INVALID,
        ReconError::Table(_) => EXIT_MATCH_RUNTIME,
    }
}

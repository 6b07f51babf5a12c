use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ReconError;
use crate::model::{MatchMode, MatchOptions, NullKeyPolicy, DEFAULT_FLAG_COLUMN, KEY_COLUMNS};

/// Output file written by flag mode when the job does not name one.
pub const DEFAULT_FLAG_OUTPUT: &str = "updated_students.csv";
/// Output file written by join mode when the job does not name one.
pub const DEFAULT_JOIN_OUTPUT: &str = "matched_students.csv";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// A matching job read from TOML.
///
/// Relative paths are resolved against the directory holding the job file,
/// see [`MatchConfig::resolve`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mode: ModeKind,
    /// Table whose rows are flagged or joined.
    pub subject: String,
    pub reference: String,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub flag_column: Option<String>,
    #[serde(default)]
    pub null_keys: NullKeyPolicy,
    #[serde(default)]
    pub detection: DetectionConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    #[default]
    Flag,
    InnerJoin,
}

impl std::fmt::Display for ModeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag => write!(f, "flag"),
            Self::InnerJoin => write!(f, "inner_join"),
        }
    }
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Tuning for delimiter detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetectionConfig {
    /// Bytes handed to the structural sniffer.
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    /// Lines scanned by the character-frequency fallback.
    #[serde(default = "default_fallback_lines")]
    pub fallback_lines: usize,
}

fn default_sample_size() -> usize {
    1024
}

fn default_fallback_lines() -> usize {
    10
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            sample_size: default_sample_size(),
            fallback_lines: default_fallback_lines(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MatchConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: MatchConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.subject.trim().is_empty() {
            return Err(ReconError::ConfigValidation("subject path is empty".into()));
        }
        if self.reference.trim().is_empty() {
            return Err(ReconError::ConfigValidation("reference path is empty".into()));
        }
        if matches!(&self.output, Some(o) if o.trim().is_empty()) {
            return Err(ReconError::ConfigValidation("output path is empty".into()));
        }

        if self.detection.sample_size == 0 {
            return Err(ReconError::ConfigValidation(
                "detection.sample_size must be greater than 0".into(),
            ));
        }
        if self.detection.fallback_lines == 0 {
            return Err(ReconError::ConfigValidation(
                "detection.fallback_lines must be greater than 0".into(),
            ));
        }

        if let Some(column) = &self.flag_column {
            if self.mode != ModeKind::Flag {
                return Err(ReconError::ConfigValidation(format!(
                    "flag_column is only used in flag mode, not {}",
                    self.mode
                )));
            }
            validate_flag_column(column)?;
        }

        Ok(())
    }

    /// Display name for logs: `name`, or the subject path.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.subject)
    }

    pub fn to_options(&self) -> MatchOptions {
        let mode = match self.mode {
            ModeKind::InnerJoin => MatchMode::InnerJoin,
            ModeKind::Flag => MatchMode::Flag {
                column: self
                    .flag_column
                    .clone()
                    .unwrap_or_else(|| DEFAULT_FLAG_COLUMN.to_string()),
            },
        };
        MatchOptions { mode, null_keys: self.null_keys }
    }

    /// Output path as written in the job, or the mode's default file name.
    pub fn output_or_default(&self) -> &str {
        match (&self.output, self.mode) {
            (Some(o), _) => o.as_str(),
            (None, ModeKind::Flag) => DEFAULT_FLAG_OUTPUT,
            (None, ModeKind::InnerJoin) => DEFAULT_JOIN_OUTPUT,
        }
    }

    /// Resolve subject, reference and output against `base_dir`.
    ///
    /// Absolute paths are kept.
    pub fn resolve(&self, base_dir: &Path) -> ResolvedPaths {
        ResolvedPaths {
            subject: resolve_path(base_dir, &self.subject),
            reference: resolve_path(base_dir, &self.reference),
            output: resolve_path(base_dir, self.output_or_default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub subject: PathBuf,
    pub reference: PathBuf,
    pub output: PathBuf,
}

fn resolve_path(base_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

/// A flag column must be non-blank and must not shadow a derived key column.
pub fn validate_flag_column(column: &str) -> Result<(), ReconError> {
    if column.trim().is_empty() {
        return Err(ReconError::ConfigValidation("flag_column is empty".into()));
    }
    if KEY_COLUMNS.contains(&column) {
        return Err(ReconError::ConfigValidation(format!(
            "flag_column '{column}' collides with a key column"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

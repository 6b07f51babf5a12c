//! `rmatch flag|join|run|validate`: load two rosters, match, write.

use std::path::{Path, PathBuf};

use rostermatch_core::Table;
use rostermatch_io::{load_table_with, write_table, DetectOptions};
use rostermatch_recon::config::{validate_flag_column, MatchConfig};
use rostermatch_recon::{MatchMode, MatchOptions, MatchSummary, NullKeyPolicy};
use serde::Serialize;

use crate::exit_codes::EXIT_CONFIG_PARSE;
use crate::{CliError, DetectArgs};

/// Machine-readable report printed by `--json`.
#[derive(Debug, Serialize)]
struct RunReport<'a> {
    summary: &'a MatchSummary,
    /// `None` when nothing was written.
    output: Option<String>,
}

fn null_policy(match_nulls: bool) -> NullKeyPolicy {
    if match_nulls {
        NullKeyPolicy::MatchNulls
    } else {
        NullKeyPolicy::NeverMatch
    }
}

pub fn cmd_flag(
    subject: PathBuf,
    reference: PathBuf,
    output: PathBuf,
    flag_column: String,
    match_nulls: bool,
    json: bool,
    detect: DetectArgs,
) -> Result<(), CliError> {
    validate_flag_column(&flag_column).map_err(|e| CliError::args(e.to_string()))?;
    let options = MatchOptions {
        mode: MatchMode::Flag { column: flag_column },
        null_keys: null_policy(match_nulls),
    };
    let detect = detect.over(DetectOptions::default())?;
    execute(&subject, &reference, &output, &options, &detect, json)
}

pub fn cmd_join(
    subject: PathBuf,
    reference: PathBuf,
    output: PathBuf,
    match_nulls: bool,
    json: bool,
    detect: DetectArgs,
) -> Result<(), CliError> {
    let options = MatchOptions {
        mode: MatchMode::InnerJoin,
        null_keys: null_policy(match_nulls),
    };
    let detect = detect.over(DetectOptions::default())?;
    execute(&subject, &reference, &output, &options, &detect, json)
}

fn read_config(config_path: &Path) -> Result<MatchConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path).map_err(|e| CliError {
        code: EXIT_CONFIG_PARSE,
        message: format!("cannot read config {}: {e}", config_path.display()),
        hint: None,
    })?;
    MatchConfig::from_toml(&config_str).map_err(CliError::recon)
}

pub fn cmd_run(
    config_path: PathBuf,
    output: Option<PathBuf>,
    json: bool,
    detect: DetectArgs,
) -> Result<(), CliError> {
    let config = read_config(&config_path)?;

    // Job paths are relative to the job file, not the working directory.
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let paths = config.resolve(base_dir);
    let output = output.unwrap_or(paths.output);

    let base = DetectOptions {
        sample_size: config.detection.sample_size,
        fallback_lines: config.detection.fallback_lines,
    };
    let detect = detect.over(base)?;

    log::info!("running job '{}' ({})", config.display_name(), config.mode);
    execute(&paths.subject, &paths.reference, &output, &config.to_options(), &detect, json)
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = read_config(&config_path)?;
    eprintln!(
        "valid: {} job '{}' ({} vs {}) -> {}",
        config.mode,
        config.display_name(),
        config.subject,
        config.reference,
        config.output_or_default(),
    );
    Ok(())
}

/// Load an input table; a failure aborts the whole comparison.
pub(crate) fn load(path: &Path, detect: &DetectOptions) -> Result<Table, CliError> {
    load_table_with(path, detect).map_err(CliError::load)
}

fn execute(
    subject: &Path,
    reference: &Path,
    output: &Path,
    options: &MatchOptions,
    detect: &DetectOptions,
    json: bool,
) -> Result<(), CliError> {
    let subject_table = load(subject, detect)?;
    let reference_table = load(reference, detect)?;

    let result = rostermatch_recon::run(subject_table, reference_table, options).map_err(CliError::recon)?;
    let s = &result.summary;

    let written = if result.table.is_empty() {
        eprintln!("no matches found; {} not written", output.display());
        None
    } else {
        write_table(&result.table, output).map_err(CliError::load)?;
        eprintln!("wrote {} row(s) to {}", result.table.len(), output.display());
        Some(output.display().to_string())
    };

    if json {
        let report = RunReport { summary: s, output: written };
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    eprintln!(
        "{}: {} of {} subject row(s) found among {} reference row(s)",
        s.mode, s.matched_rows, s.subject_rows, s.reference_rows,
    );
    if s.incomplete_subject_keys > 0 && options.null_keys == NullKeyPolicy::NeverMatch {
        eprintln!(
            "note: {} subject row(s) lack a name or date of birth and cannot match",
            s.incomplete_subject_keys
        );
    }

    Ok(())
}

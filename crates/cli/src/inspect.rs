//! `rmatch detect` and `rmatch normalize`: look at one file the way the matcher does.

use std::path::PathBuf;

use rostermatch_io::{detect_format, write_table, write_table_to, DetectOptions};
use rostermatch_recon::normalize;
use serde::Serialize;

use crate::roster::load;
use crate::{CliError, DetectArgs};

#[derive(Debug, Serialize)]
struct DetectReport {
    file: String,
    encoding: &'static str,
    delimiter: Option<String>,
    header_row: Option<usize>,
}

/// Printable form of a delimiter byte; tab is shown escaped.
fn delimiter_label(d: u8) -> String {
    match d {
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}

pub fn cmd_detect(file: PathBuf, json: bool, detect: DetectArgs) -> Result<(), CliError> {
    let opts = detect.over(DetectOptions::default())?;
    let format = detect_format(&file, &opts).map_err(CliError::load)?;

    let report = DetectReport {
        file: file.display().to_string(),
        encoding: format.encoding_label(),
        delimiter: format.delimiter.map(delimiter_label),
        header_row: format.header_row,
    };

    if json {
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
        return Ok(());
    }

    println!("file:      {}", report.file);
    println!("encoding:  {}", report.encoding);
    match &report.delimiter {
        Some(d) => println!("delimiter: {d}"),
        None => println!("delimiter: undetermined (comma will be used)"),
    }
    match report.header_row {
        Some(n) => println!("header:    line {n}"),
        None => println!("header:    not found"),
    }
    Ok(())
}

pub fn cmd_normalize(file: PathBuf, output: Option<PathBuf>, detect: DetectArgs) -> Result<(), CliError> {
    let opts = detect.over(DetectOptions::default())?;
    let table = load(&file, &opts)?;
    let normalized = normalize(table).to_table().map_err(|e| CliError::general(e.to_string()))?;

    match output {
        Some(path) => {
            write_table(&normalized, &path).map_err(CliError::load)?;
            eprintln!("wrote {} row(s) to {}", normalized.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            write_table_to(&normalized, stdout.lock())
                .map_err(|e| CliError::write(format!("cannot write to stdout: {e}")))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_is_escaped() {
        assert_eq!(delimiter_label(b'\t'), "\\t");
        assert_eq!(delimiter_label(b';'), ";");
    }
}

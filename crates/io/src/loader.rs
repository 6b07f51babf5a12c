// Table loading: detect, skip to the header, parse, lower-case columns.

use std::path::Path;

use encoding_rs::Encoding;
use rostermatch_core::{lowercase_columns, Cell, Table};

use crate::delimiter::{detect_delimiter, DetectOptions};
use crate::encoding::{decode_strict, detect_encoding};
use crate::error::LoadError;
use crate::header::find_header_start;
use crate::lines::lines_inclusive;

/// Result of running the detection chain over one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedFormat {
    pub encoding: &'static Encoding,
    /// `None` when neither the sniffer nor the frequency fallback decided.
    pub delimiter: Option<u8>,
    /// Zero-based line index of the header row, if one was found.
    pub header_row: Option<usize>,
}

impl DetectedFormat {
    pub fn encoding_label(&self) -> &'static str {
        self.encoding.name()
    }

    /// Detected delimiter, or comma when none was determined.
    pub fn delimiter_or_default(&self) -> u8 {
        self.delimiter.unwrap_or(b',')
    }
}

/// Run encoding, header and delimiter detection.
///
/// Only an unreadable or undecodable file is an error here; a missing header
/// or delimiter is reported through the `Option` fields.
pub fn detect_format(path: &Path, opts: &DetectOptions) -> Result<DetectedFormat, LoadError> {
    let encoding = detect_encoding(path).map_err(|e| {
        log::error!("{e}");
        e
    })?;
    let header_row = find_header_start(path, encoding)?;
    let delimiter = detect_delimiter(path, encoding, opts);

    Ok(DetectedFormat { encoding, delimiter, header_row })
}

/// Load a roster file with default detection settings.
pub fn load_table(path: &Path) -> Result<Table, LoadError> {
    load_table_with(path, &DetectOptions::default())
}

/// Load a roster file into a [`Table`] with lower-cased column names.
///
/// Any `Err` means the file cannot be processed; no partial table is returned.
pub fn load_table_with(path: &Path, opts: &DetectOptions) -> Result<Table, LoadError> {
    let format = detect_format(path, opts)?;

    let Some(header_row) = format.header_row else {
        return Err(LoadError::HeaderNotFound { path: path.to_path_buf() });
    };

    let table = read_table(path, &format, header_row).map_err(|e| {
        log::error!("{e}");
        e
    })?;

    log::info!(
        "{}: loaded {} row(s), {} column(s) [{}, delimiter {:?}, header line {}]",
        path.display(),
        table.len(),
        table.width(),
        format.encoding_label(),
        format.delimiter_or_default() as char,
        header_row,
    );
    Ok(table)
}

fn read_table(path: &Path, format: &DetectedFormat, header_row: usize) -> Result<Table, LoadError> {
    let bytes = std::fs::read(path).map_err(|e| LoadError::from_io(path, e))?;
    let text = decode_strict(&bytes, format.encoding).ok_or_else(|| LoadError::Decode {
        path: path.to_path_buf(),
        encoding: format.encoding_label(),
    })?;

    parse_table(&text, format.delimiter_or_default(), header_row).map_err(|message| {
        LoadError::Parse { path: path.to_path_buf(), message }
    })
}

/// Parse decoded text into a table, skipping `skip_lines` lines before the header.
///
/// Blank fields become [`Cell::Empty`]; short rows are padded; rows with
/// more fields than the header are rejected; blank lines are ignored.
pub fn parse_table(text: &str, delimiter: u8, skip_lines: usize) -> Result<Table, String> {
    let offset: usize = lines_inclusive(text).take(skip_lines).map(str::len).sum();
    let body = &text[offset..];

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let raw_headers = reader.headers().map_err(|e| e.to_string())?.clone();
    let named = raw_headers.iter().enumerate().map(|(i, h)| {
        if h.trim().is_empty() {
            format!("unnamed: {i}")
        } else {
            h.to_string()
        }
    });
    let columns = lowercase_columns(named);
    let width = columns.len();

    let mut table = Table::new(columns).map_err(|e| e.to_string())?;

    for result in reader.records() {
        let record = result.map_err(|e| e.to_string())?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        if record.len() > width {
            let line = record.position().map(|p| p.line() as usize + skip_lines).unwrap_or(0);
            return Err(format!(
                "expected {width} fields in line {line}, saw {}",
                record.len()
            ));
        }
        let mut row: Vec<Cell> = record.iter().map(Cell::from_raw).collect();
        row.resize(width, Cell::Empty);
        table.push_row(row).map_err(|e| e.to_string())?;
    }

    Ok(table)
}

// Field delimiter detection: sniff first, count characters second.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use encoding_rs::Encoding;

use crate::encoding::decode_prefix;
use crate::lines::{line_spans, lines};

pub const DEFAULT_SAMPLE_SIZE: usize = 1024;
pub const DEFAULT_FALLBACK_LINES: usize = 10;

/// Delimiters the sniffer will consider, in tie-break order.
const SNIFF_CANDIDATES: &[u8] = &[b',', b'\t', b';', b'|'];

/// Delimiters the frequency fallback will consider, in tie-break order.
const FALLBACK_CANDIDATES: &[char] = &[',', '\t', ';'];

/// Tunables for delimiter detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectOptions {
    /// Bytes read from the top of the file for sniffing.
    pub sample_size: usize,
    /// Lines read by the frequency fallback.
    pub fallback_lines: usize,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            fallback_lines: DEFAULT_FALLBACK_LINES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SniffError {
    Io(String),
    /// Sample is not valid in the given encoding.
    Decode(&'static str),
    /// Fewer than two non-blank complete lines in the sample.
    TooFewLines(usize),
    /// No candidate splits the lines into a consistent number of fields.
    NoConsistentDelimiter,
}

impl fmt::Display for SniffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "cannot read sample: {msg}"),
            Self::Decode(encoding) => write!(f, "sample is not valid {encoding}"),
            Self::TooFewLines(n) => write!(f, "sample has {n} usable line(s), need at least 2"),
            Self::NoConsistentDelimiter => write!(f, "could not determine delimiter"),
        }
    }
}

impl std::error::Error for SniffError {}

/// Detect the field delimiter of a file.
///
/// Sniffs the first `sample_size` bytes decoded with `encoding`; on any
/// failure, falls back to [`most_common_delimiter`]. `None` means no
/// delimiter could be determined. Never fails.
pub fn detect_delimiter(path: &Path, encoding: &'static Encoding, opts: &DetectOptions) -> Option<u8> {
    match sniff_path(path, encoding, opts.sample_size) {
        Ok(delim) => {
            log::debug!("{}: sniffed delimiter {:?}", path.display(), delim as char);
            Some(delim)
        }
        Err(e) => {
            log::warn!(
                "{}: sniffer failed: {e}. Falling back to frequency analysis.",
                path.display()
            );
            most_common_delimiter(path, opts.fallback_lines)
        }
    }
}

fn sniff_path(path: &Path, encoding: &'static Encoding, sample_size: usize) -> Result<u8, SniffError> {
    let file = File::open(path).map_err(|e| SniffError::Io(e.to_string()))?;

    // One byte past the sample tells us whether the last line was cut.
    let mut buf = Vec::with_capacity(sample_size + 1);
    file.take(sample_size as u64 + 1)
        .read_to_end(&mut buf)
        .map_err(|e| SniffError::Io(e.to_string()))?;
    let truncated = buf.len() > sample_size;
    buf.truncate(sample_size);

    let sample = decode_prefix(&buf, encoding).ok_or(SniffError::Decode(encoding.name()))?;
    let sample = if truncated { complete_lines(&sample) } else { sample.as_str() };
    sniff_delimiter(sample)
}

/// Everything up to and including the last line terminator.
fn complete_lines(sample: &str) -> &str {
    match sample.rfind(|c: char| c == '\n' || c == '\r') {
        Some(end) => &sample[..=end],
        None => "",
    }
}

/// Pick the delimiter that splits the sample into the most consistent table.
///
/// For each candidate, count fields per non-blank line (quotes honoured). The
/// most common count must exceed one and be shared by at least two lines.
/// Score is `lines sharing the count * count`; the first candidate wins ties.
pub fn sniff_delimiter(sample: &str) -> Result<u8, SniffError> {
    let rows: Vec<&str> = lines(sample).filter(|l| !l.trim().is_empty()).collect();
    if rows.len() < 2 {
        return Err(SniffError::TooFewLines(rows.len()));
    }

    let mut best: Option<(u8, usize)> = None;

    for &delim in SNIFF_CANDIDATES {
        let counts: Vec<usize> = rows.iter().map(|line| field_count(line, delim)).collect();
        let Some((fields, lines_sharing)) = modal_count(&counts) else {
            continue;
        };
        if fields <= 1 || lines_sharing < 2 {
            continue;
        }
        let score = fields * lines_sharing;
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((delim, score));
        }
    }

    best.map(|(d, _)| d).ok_or(SniffError::NoConsistentDelimiter)
}

fn field_count(line: &str, delim: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delim)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(|r| r.ok())
        .map(|r| r.len())
        .unwrap_or(1)
}

/// Most frequent value and its frequency. Ties go to the larger value.
fn modal_count(counts: &[usize]) -> Option<(usize, usize)> {
    let mut freq: HashMap<usize, usize> = HashMap::new();
    for &c in counts {
        *freq.entry(c).or_insert(0) += 1;
    }
    freq.into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)))
}

/// Frequency fallback: count every character in the first `num_lines` lines
/// and return the most frequent of `,`, tab and `;`.
///
/// Always decodes as UTF-8, whatever the file's detected encoding: counting
/// ASCII separators does not need the true encoding. A read or decode error
/// is logged and yields `None`, as does a sample with none of the candidates.
pub fn most_common_delimiter(path: &Path, num_lines: usize) -> Option<u8> {
    match char_counts(path, num_lines) {
        Ok(counts) => pick_candidate(&counts),
        Err(e) => {
            log::error!("{}: delimiter frequency analysis failed: {e}", path.display());
            None
        }
    }
}

fn char_counts(path: &Path, num_lines: usize) -> Result<HashMap<char, usize>, String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    let mut counts: HashMap<char, usize> = HashMap::new();

    for (line_no, span) in line_spans(&bytes).take(num_lines).enumerate() {
        let line = std::str::from_utf8(&bytes[span])
            .map_err(|e| format!("line {}: invalid utf-8: {e}", line_no + 1))?;
        for ch in line.chars() {
            *counts.entry(ch).or_insert(0) += 1;
        }
    }

    Ok(counts)
}

fn pick_candidate(counts: &HashMap<char, usize>) -> Option<u8> {
    let mut best: Option<(char, usize)> = None;
    for &c in FALLBACK_CANDIDATES {
        let n = counts.get(&c).copied().unwrap_or(0);
        if n > 0 && best.map_or(true, |(_, b)| n > b) {
            best = Some((c, n));
        }
    }
    best.map(|(c, _)| c as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::UTF_8;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn sniff_comma() {
        let sample = "Name,DOB,Grade\nAnn Lee,2005-01-01,7\nBob Ray,2006-02-02,6\n";
        assert_eq!(sniff_delimiter(sample), Ok(b','));
    }

    #[test]
    fn sniff_semicolon_with_commas_in_values() {
        let sample = "Name;Address;DOB\n\"Lee, Ann\";\"1 Main St, Apt 4\";2005-01-01\nBob;\"2 Elm\";2006-02-02\n";
        assert_eq!(sniff_delimiter(sample), Ok(b';'));
    }

    #[test]
    fn sniff_tab_after_title_rows() {
        let sample = "District roster\nExported 2024\n\nName\tDOB\tGrade\nAnn\t2005-01-01\t7\nBob\t2006-02-02\t6\n";
        assert_eq!(sniff_delimiter(sample), Ok(b'\t'));
    }

    #[test]
    fn sniff_pipe() {
        let sample = "name|dob\nAnn|2005-01-01\nBob|2006-02-02\n";
        assert_eq!(sniff_delimiter(sample), Ok(b'|'));
    }

    #[test]
    fn sniff_bare_cr_lines() {
        let sample = "Lincoln Middle\r\rName;DOB;Grade\rAnn Lee;2005-01-01;7\rBob Ray;2006-02-02;6\r";
        assert_eq!(sniff_delimiter(sample), Ok(b';'));
    }

    #[test]
    fn sniff_needs_two_lines() {
        assert_eq!(sniff_delimiter("name,dob\n"), Err(SniffError::TooFewLines(1)));
        assert_eq!(sniff_delimiter("\n\n"), Err(SniffError::TooFewLines(0)));
    }

    #[test]
    fn sniff_rejects_ragged_lines() {
        let sample = "a,b\nc,d,e\nf\ng,h,i,j\n";
        assert_eq!(sniff_delimiter(sample), Err(SniffError::NoConsistentDelimiter));
    }

    #[test]
    fn truncated_sample_drops_partial_line() {
        assert_eq!(complete_lines("a,b\nc,d\ne,"), "a,b\nc,d\n");
        assert_eq!(complete_lines("no newline"), "");
        assert_eq!(complete_lines("a,b\rc,d\re,"), "a,b\rc,d\r");
    }

    #[test]
    fn modal_prefers_frequency_then_size() {
        assert_eq!(modal_count(&[3, 3, 1]), Some((3, 2)));
        assert_eq!(modal_count(&[1, 4]), Some((4, 1)));
        assert_eq!(modal_count(&[]), None);
    }

    #[test]
    fn fallback_counts_commas_over_semicolons() {
        // Ten lines with distinct comma counts (50 total) and two stray
        // semicolons: nothing for the sniffer to lock onto.
        let comma_counts = [0usize, 1, 2, 3, 4, 5, 6, 7, 8, 14];
        let mut content = String::new();
        for (i, n) in comma_counts.iter().enumerate() {
            content.push_str(&format!("row{i}"));
            content.push_str(&",x".repeat(*n));
            if i == 2 || i == 5 {
                content.push_str(";y");
            }
            content.push('\n');
        }
        assert_eq!(content.matches(',').count(), 50);
        assert_eq!(content.matches(';').count(), 2);

        let dir = tempdir().unwrap();
        let path = dir.path().join("messy.csv");
        fs::write(&path, &content).unwrap();

        assert!(sniff_delimiter(&content).is_err());
        assert_eq!(most_common_delimiter(&path, 10), Some(b','));
        assert_eq!(detect_delimiter(&path, UTF_8, &DetectOptions::default()), Some(b','));
    }

    #[test]
    fn fallback_only_reads_requested_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("late.csv");
        fs::write(&path, "title\nsubtitle\na;b;c\nd,e,f,g,h,i,j\n").unwrap();
        assert_eq!(most_common_delimiter(&path, 3), Some(b';'));
        assert_eq!(most_common_delimiter(&path, 4), Some(b','));
    }

    #[test]
    fn fallback_counts_bare_cr_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mac.csv");
        fs::write(&path, "title\rsubtitle\ra;b;c\rd,e,f,g,h,i,j\r").unwrap();
        assert_eq!(most_common_delimiter(&path, 3), Some(b';'));
        assert_eq!(most_common_delimiter(&path, 4), Some(b','));
    }

    #[test]
    fn fallback_finds_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plain.txt");
        fs::write(&path, "just some words\nand more words\n").unwrap();
        assert_eq!(most_common_delimiter(&path, 10), None);
    }

    #[test]
    fn fallback_ignores_detected_encoding_and_fails_on_non_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin.csv");
        fs::write(&path, b"Jos\xe9,N\xfa\xf1ez\n").unwrap();
        assert_eq!(most_common_delimiter(&path, 10), None);
    }

    #[test]
    fn fallback_missing_file() {
        let dir = tempdir().unwrap();
        assert_eq!(most_common_delimiter(&dir.path().join("gone.csv"), 10), None);
    }

    #[test]
    fn sniff_reads_only_the_sample() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big.csv");
        let mut content = String::from("name;dob\n");
        for i in 0..200 {
            content.push_str(&format!("student {i};2005-01-01\n"));
        }
        fs::write(&path, &content).unwrap();
        let opts = DetectOptions { sample_size: 64, fallback_lines: 10 };
        assert_eq!(detect_delimiter(&path, UTF_8, &opts), Some(b';'));
    }
}

// Line splitting shared by header location, sniffing and parsing

use std::ops::Range;

/// Byte ranges of the lines in `bytes`, terminators included.
///
/// `\r\n`, `\n` and a lone `\r` each end a line, so classic Mac exports
/// split the same way the `csv` reader splits them.
pub fn line_spans(bytes: &[u8]) -> impl Iterator<Item = Range<usize>> + '_ {
    let mut start = 0;
    std::iter::from_fn(move || {
        if start >= bytes.len() {
            return None;
        }
        let mut end = start;
        while end < bytes.len() {
            match bytes[end] {
                b'\n' => {
                    end += 1;
                    break;
                }
                b'\r' => {
                    end += 1;
                    if bytes.get(end) == Some(&b'\n') {
                        end += 1;
                    }
                    break;
                }
                _ => end += 1,
            }
        }
        let span = start..end;
        start = end;
        Some(span)
    })
}

/// Lines of `text` with their terminators.
pub fn lines_inclusive(text: &str) -> impl Iterator<Item = &str> + '_ {
    // Terminators are ASCII, so every span boundary is a char boundary.
    line_spans(text.as_bytes()).map(move |span| &text[span])
}

/// Lines of `text` without their terminators.
pub fn lines(text: &str) -> impl Iterator<Item = &str> + '_ {
    lines_inclusive(text).map(strip_terminator)
}

pub fn strip_terminator(line: &str) -> &str {
    line.trim_end_matches(|c: char| c == '\r' || c == '\n')
}

// Header row location by keyword rules

use std::path::Path;

use encoding_rs::Encoding;

use crate::encoding::decode_strict;
use crate::error::LoadError;
use crate::lines::lines;

/// Zero-based index of the first line that looks like a roster header.
///
/// `Ok(None)` when no line qualifies. `Err` when the file is missing,
/// unreadable, or not valid in `encoding`. All three are logged.
pub fn find_header_start(path: &Path, encoding: &'static Encoding) -> Result<Option<usize>, LoadError> {
    let bytes = std::fs::read(path).map_err(|e| {
        let err = LoadError::from_io(path, e);
        log::error!("{err}");
        err
    })?;

    let Some(text) = decode_strict(&bytes, encoding) else {
        let err = LoadError::Decode { path: path.to_path_buf(), encoding: encoding.name() };
        log::error!("error finding header: {err}");
        return Err(err);
    };

    let found = find_header_line(&text);
    match found {
        Some(i) => log::debug!("{}: header at line {i}", path.display()),
        None => log::error!("header line not found in {} based on keywords", path.display()),
    }
    Ok(found)
}

/// Scan decoded text top to bottom for the first header line.
///
/// Lines end at `\r\n`, `\n` or a lone `\r`.
pub fn find_header_line(text: &str) -> Option<usize> {
    lines(text).position(is_header_line)
}

/// Header rule, case-insensitive.
///
/// Name: contains `name`, or both `firstname` and `lastname`.
/// DOB: contains `dob`, `date of birth` or `birthdate`.
/// Both must hold.
pub fn is_header_line(line: &str) -> bool {
    let lower = line.to_lowercase();

    let has_name = lower.contains("name");
    let has_split_name = lower.contains("firstname") && lower.contains("lastname");
    let name_condition = has_name || has_split_name;

    let dob_condition = ["dob", "date of birth", "birthdate"]
        .iter()
        .any(|kw| lower.contains(kw));

    name_condition && dob_condition
}

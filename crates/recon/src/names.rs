//! Name splitting with generational-suffix handling.

/// Generational suffixes kept attached to a surname. Compared lower-cased.
pub const NAME_SUFFIXES: &[&str] = &["jr", "sr", "ii", "iii", "iv", "v", "vi", "vii", "viii", "ix", "x"];

pub fn is_suffix(token: &str) -> bool {
    let lower = token.to_lowercase();
    NAME_SUFFIXES.contains(&lower.as_str())
}

/// First whitespace-delimited token. `None` for blank input.
pub fn first_token(value: &str) -> Option<String> {
    value.split_whitespace().next().map(str::to_string)
}

/// Surname from a full name or last-name field.
///
/// The final token, unless it is a generational suffix and something precedes
/// it, in which case the final two tokens joined by one space ("Smith Jr").
/// `None` for blank input.
pub fn suffix_aware_last_name(value: &str) -> Option<String> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    let last = *parts.last()?;
    if parts.len() >= 2 && is_suffix(last) {
        Some(format!("{} {}", parts[parts.len() - 2], last))
    } else {
        Some(last.to_string())
    }
}

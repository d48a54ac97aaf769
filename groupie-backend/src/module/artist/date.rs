///! `DD-MM-YYYY` date helpers
use super::error::DateParseError;

/// Extract the year from a `DD-MM-YYYY` date string.
///
/// Only the shape is checked: exactly three `-`-separated fields, the third an
/// integer. Day and month are not validated.
pub fn extract_year(date: &str) -> Result<i32, DateParseError> {
    let parts: Vec<&str> = date.split('-').collect();
    if parts.len() != 3 {
        return Err(DateParseError::Format(date.to_string()));
    }

    parts[2].parse::<i32>().map_err(|source| DateParseError::Year {
        date: date.to_string(),
        source,
    })
}

/// True if `s` is made of ASCII digits only
pub fn is_numeric(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_digit())
}

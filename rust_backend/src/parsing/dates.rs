//! Canonical representation of flight dates.
//!
//! Flight dates reach us as text, integers (`20231015`) or floats
//! (`20231015.0`) depending on how the CSV column was inferred. Both sides of
//! every date comparison go through [`canonical_date`].

use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y%m%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Canonical string for a date value.
///
/// Recognised dates become `YYYY-MM-DD`; integral floats drop their `.0`;
/// everything else is returned trimmed. Blank input yields `None`.
pub fn canonical_date(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let text = strip_integral_fraction(trimmed);

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Some(datetime.date().format("%Y-%m-%d").to_string());
        }
    }

    Some(text.to_string())
}

/// `"20231015.0"` -> `"20231015"`, anything else unchanged.
fn strip_integral_fraction(text: &str) -> &str {
    match text.split_once('.') {
        Some((whole, fraction))
            if !whole.is_empty()
                && whole.chars().all(|c| c.is_ascii_digit())
                && !fraction.is_empty()
                && fraction.chars().all(|c| c == '0') =>
        {
            whole
        }
        _ => text,
    }
}

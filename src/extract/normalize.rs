use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::core::{XValue, parse_iso_date};

/// Year assigned to `Mon D` tokens, which carry no year of their own.
pub const ASSUMED_YEAR: i32 = 2025;

/// Month-name prefixes in calendar order; index + 1 is the month number.
pub static MONTH_NAMES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid iso date regex"));

static BARE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}$").expect("valid year regex"));

static MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]{3})[A-Za-z]*\.?\s+(\d{1,2})$").expect("valid month-day regex")
});

#[must_use]
pub fn is_iso_date(token: &str) -> bool {
    ISO_DATE.is_match(token)
}

#[must_use]
pub fn month_number(name: &str) -> Option<u32> {
    let prefix = name.get(..3)?.to_ascii_lowercase();
    MONTH_NAMES
        .iter()
        .position(|month| *month == prefix)
        .and_then(|index| u32::try_from(index + 1).ok())
}

/// Rewrites `Sep 03` as `2025-09-03` using [`ASSUMED_YEAR`].
#[must_use]
pub fn month_day_to_iso(token: &str) -> Option<String> {
    let caps = MONTH_DAY.captures(token.trim())?;
    let month = month_number(caps.get(1)?.as_str())?;
    let day = caps.get(2)?.as_str().parse::<u32>().ok()?;
    let date = NaiveDate::from_ymd_opt(ASSUMED_YEAR, month, day)?;
    Some(date.format("%Y-%m-%d").to_string())
}

/// Normalizes an x-axis cell: ISO dates stay verbatim, bare years become
/// numbers, `Mon D` becomes an ISO date, anything else is kept as written.
#[must_use]
pub fn normalize_x(raw: &str) -> XValue {
    let token = raw.trim();
    if is_iso_date(token) {
        return XValue::Text(token.to_owned());
    }
    if BARE_YEAR.is_match(token) {
        if let Ok(year) = token.parse::<u16>() {
            return XValue::Number(f64::from(year));
        }
    }
    if let Some(iso) = month_day_to_iso(token) {
        return XValue::Text(iso);
    }
    XValue::Text(token.to_owned())
}

/// True when `token` is an ISO date naming a real calendar day.
#[must_use]
pub fn is_valid_iso_date(token: &str) -> bool {
    is_iso_date(token) && parse_iso_date(token).is_some()
}

#[cfg(test)]
mod tests {
    use super::{month_day_to_iso, month_number, normalize_x};
    use crate::core::XValue;

    #[test]
    fn month_lookup_is_case_insensitive() {
        assert_eq!(month_number("SEP"), Some(9));
        assert_eq!(month_number("september"), Some(9));
        assert_eq!(month_number("Se"), None);
    }

    #[test]
    fn impossible_month_days_are_left_alone() {
        assert_eq!(month_day_to_iso("Feb 31"), None);
        assert_eq!(normalize_x("Feb 31"), XValue::Text("Feb 31".to_owned()));
    }
}

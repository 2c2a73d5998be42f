use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ChartError, ChartResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

/// Parses a numeric token as written in prose (`1,234.5`, `22.`, `-3`).
///
/// Grouping commas are dropped and the token is read as an exact decimal
/// first; tokens too long for `Decimal` fall back to `f64` parsing.
pub fn parse_numeric_token(token: &str, field_name: &str) -> ChartResult<f64> {
    let cleaned: String = token.chars().filter(|ch| *ch != ',').collect();
    let cleaned = cleaned.trim().trim_end_matches('.');
    if cleaned.is_empty() {
        return Err(ChartError::InvalidData(format!(
            "{field_name} is not a number: `{token}`"
        )));
    }

    let value = match Decimal::from_str(cleaned) {
        Ok(decimal) => decimal_to_f64(decimal, field_name)?,
        Err(_) => cleaned.parse::<f64>().map_err(|err| {
            ChartError::InvalidData(format!("{field_name} is not a number: `{token}` ({err})"))
        })?,
    };
    if !value.is_finite() {
        return Err(ChartError::InvalidData(format!(
            "{field_name} must be finite: `{token}`"
        )));
    }
    Ok(value)
}

/// Parses a strict `YYYY-MM-DD` token.
#[must_use]
pub fn parse_iso_date(token: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(token, "%Y-%m-%d").ok()
}

#[must_use]
pub fn date_to_unix_seconds(date: NaiveDate) -> f64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp() as f64
}

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::{DataPoint, XValue, parse_numeric_token};
use crate::error::ChartResult;

use super::StrategyOutput;
use super::normalize::normalize_x;

static DATE_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(\d{4}-\d{2}-\d{2}|(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+\d{1,2})\b\s*(?:[:=,]|\s[-–]\s)?\s*(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)",
    )
    .expect("valid date-value regex")
});

static YEAR_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b((?:19|20)\d{2})\b(?:\s*[:=]\s*|\s+[-–]\s+|\s+)(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)",
    )
    .expect("valid year-value regex")
});

/// Collects `date value` and `year value` pairs anywhere in the text.
///
/// Date pairs come first, then year pairs, each in order of appearance.
/// A year that belongs to a date is never read as a year pair.
pub(super) fn try_extract(text: &str) -> ChartResult<Option<StrategyOutput>> {
    let mut output = StrategyOutput::default();
    let mut date_spans: Vec<Range<usize>> = Vec::new();

    for caps in DATE_VALUE.captures_iter(text) {
        let (Some(whole), Some(date), Some(value)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        date_spans.push(whole.range());
        // "Sep 03, 2024" is a date with its year, not a date with a value.
        if looks_like_year(value.as_str()) {
            continue;
        }
        let label = date.as_str();
        let y = parse_numeric_token(value.as_str(), "inline value")?;
        output.points.push(DataPoint::new(normalize_x(label), y, label)?);
    }

    for caps in YEAR_VALUE.captures_iter(text) {
        let (Some(whole), Some(year), Some(value)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        if date_spans
            .iter()
            .any(|span| span.start < whole.end() && whole.start() < span.end)
        {
            continue;
        }
        // "2019 2020" is a list of years, not a year with a value.
        if looks_like_year(value.as_str()) {
            continue;
        }
        let label = year.as_str();
        let y = parse_numeric_token(value.as_str(), "inline value")?;
        let x = match normalize_x(label) {
            XValue::Number(year) => XValue::Number(year),
            other => other,
        };
        output.points.push(DataPoint::new(x, y, label)?);
    }

    Ok((!output.points.is_empty()).then_some(output))
}

fn looks_like_year(token: &str) -> bool {
    token.len() == 4
        && token
            .parse::<u16>()
            .is_ok_and(|year| (1900..=2100).contains(&year))
}

#[cfg(test)]
mod tests {
    use super::try_extract;
    use crate::core::XValue;

    #[test]
    fn dates_followed_by_values_are_collected() {
        let text = "Visits on Sep 03: 41 and on 2025-09-05: 1,250 in total.";
        let output = try_extract(text).expect("no error").expect("points");
        assert_eq!(output.points.len(), 2);
        assert_eq!(output.points[0].x, XValue::Text("2025-09-03".to_owned()));
        assert_eq!(output.points[0].y, 41.0);
        assert_eq!(output.points[1].y, 1250.0);
    }

    #[test]
    fn years_with_grouped_values_become_numeric_x() {
        let text = "Revenue was 2022: 12,400 and 2023: 15,100.";
        let output = try_extract(text).expect("no error").expect("points");
        assert_eq!(output.points.len(), 2);
        assert_eq!(output.points[0].x, XValue::Number(2022.0));
        assert_eq!(output.points[1].y, 15100.0);
    }

    #[test]
    fn years_inside_dates_are_not_values() {
        assert!(try_extract("On Sep 03, 2024: 120 visitors").expect("ok").is_none());

        let output = try_extract("On Sep 03, 2024: 120 visitors, and 2023: 90 overall")
            .expect("no error")
            .expect("points");
        assert_eq!(output.points.len(), 1);
        assert_eq!(output.points[0].x, XValue::Number(2023.0));
        assert_eq!(output.points[0].y, 90.0);
    }

    #[test]
    fn year_lists_are_ignored() {
        assert!(try_extract("between 2019 2020 things changed").expect("ok").is_none());
    }
}

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "Data Visualization";
pub const DEFAULT_X_AXIS_TITLE: &str = "Category";
pub const DEFAULT_Y_AXIS_TITLE: &str = "Value";

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s{0,3}#{1,6}\s+(.+?)[\s#]*$").expect("valid heading regex")
});

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*\n]+)\*\*").expect("valid bold regex"));

static TITLE_SENTENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b([A-Z][^.!?\n|]*?\b(?:Trend|Data|Chart|Analysis|Measurement)s?\b[^.!?\n|:]*)",
    )
    .expect("valid title sentence regex")
});

static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)").expect("valid parenthesis regex"));

/// Literal x-axis cues, checked case-sensitively in order.
static X_AXIS_CUES: [&str; 3] = ["Date", "Year", "Time"];

/// Lowercase y-axis cues and the axis title each one maps to.
static Y_AXIS_CUES: [(&str, &str); 4] = [
    ("temperature", "Temperature (°C)"),
    ("salinity", "Salinity (PSU)"),
    ("count", "Count"),
    ("activation", "Activation"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartLabels {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
}

/// Infers chart and axis titles from the text and any table headers.
#[must_use]
pub fn extract_labels(text: &str, headers: &[String]) -> ChartLabels {
    let (x_axis_title, y_axis_title) = match headers {
        [x_header, y_header, ..] => (
            header_title(x_header).unwrap_or_else(|| DEFAULT_X_AXIS_TITLE.to_owned()),
            header_title(y_header).unwrap_or_else(|| DEFAULT_Y_AXIS_TITLE.to_owned()),
        ),
        _ => (x_axis_from_text(text), y_axis_from_text(text)),
    };

    ChartLabels {
        title: title_from_text(text),
        x_axis_title,
        y_axis_title,
    }
}

fn title_from_text(text: &str) -> String {
    [&*HEADING, &*BOLD, &*TITLE_SENTENCE]
        .into_iter()
        .find_map(|pattern| {
            pattern
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|title| title.as_str().trim().trim_matches('*').trim().to_owned())
                .filter(|title| !title.is_empty())
        })
        .unwrap_or_else(|| DEFAULT_TITLE.to_owned())
}

fn header_title(header: &str) -> Option<String> {
    let stripped = PARENTHESIZED.replace_all(header, "");
    let stripped = stripped.trim();
    (!stripped.is_empty()).then(|| stripped.to_owned())
}

fn x_axis_from_text(text: &str) -> String {
    X_AXIS_CUES
        .iter()
        .find(|cue| text.contains(*cue))
        .map_or_else(|| DEFAULT_X_AXIS_TITLE.to_owned(), |cue| (*cue).to_owned())
}

fn y_axis_from_text(text: &str) -> String {
    let lower = text.to_lowercase();
    Y_AXIS_CUES
        .iter()
        .find(|(cue, _)| lower.contains(cue))
        .map_or_else(|| DEFAULT_Y_AXIS_TITLE.to_owned(), |(_, title)| (*title).to_owned())
}

#[cfg(test)]
mod tests {
    use super::extract_labels;

    #[test]
    fn heading_beats_bold_and_sentences() {
        let labels = extract_labels("Some Data here.\n**Bold**\n## Weekly Sales ##\n", &[]);
        assert_eq!(labels.title, "Weekly Sales");
    }

    #[test]
    fn capitalized_sentence_is_used_without_markup() {
        let labels = extract_labels("the numbers: Harbor Temperature Measurements. More", &[]);
        assert_eq!(labels.title, "Harbor Temperature Measurements");
        assert_eq!(labels.y_axis_title, "Temperature (°C)");
    }

    #[test]
    fn headers_lose_parenthesized_units() {
        let headers = vec!["Depth (m)".to_owned(), "Salinity (PSU)".to_owned()];
        let labels = extract_labels("", &headers);
        assert_eq!(labels.x_axis_title, "Depth");
        assert_eq!(labels.y_axis_title, "Salinity");
        assert_eq!(labels.title, "Data Visualization");
    }
}

use tracing::trace;

use crate::core::ChartType;

/// Keyword rules checked in order against the lowercased text.
static KEYWORD_RULES: [(&[&str], ChartType); 7] = [
    (&["line chart", "trend"], ChartType::Line),
    (&["bar chart", "column"], ChartType::Bar),
    (&["pie chart", "distribution"], ChartType::Pie),
    (&["scatter"], ChartType::Scatter),
    (&["over time", "daily"], ChartType::Line),
    (&["temperature", "salinity"], ChartType::Line),
    (&["count", "total", "annual"], ChartType::Bar),
];

static TEMPORAL_HEADER_WORDS: [&str; 3] = ["date", "time", "day"];

/// Which rule decided a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationCue {
    Keyword(&'static str),
    TemporalHeader,
    Default,
}

/// Infers the chart type from prose keywords, then from the x-column header.
///
/// Total and deterministic: falls back to [`ChartType::Line`].
#[must_use]
pub fn determine_chart_type(text: &str, headers: &[String]) -> ChartType {
    let (chart_type, cue) = classify(text, headers);
    trace!(?cue, chart_type = %chart_type, "classified chart type");
    chart_type
}

#[must_use]
pub fn classify(text: &str, headers: &[String]) -> (ChartType, ClassificationCue) {
    let lower = text.to_lowercase();
    for (keywords, chart_type) in &KEYWORD_RULES {
        if let Some(keyword) = keywords.iter().copied().find(|keyword| lower.contains(keyword)) {
            return (*chart_type, ClassificationCue::Keyword(keyword));
        }
    }

    let temporal_header = headers.first().is_some_and(|header| {
        let header = header.to_lowercase();
        TEMPORAL_HEADER_WORDS
            .iter()
            .any(|word| header.contains(word))
    });
    if temporal_header {
        return (ChartType::Line, ClassificationCue::TemporalHeader);
    }

    (ChartType::Line, ClassificationCue::Default)
}

//! Heuristic recovery of chartable series from free-form text.
//!
//! Extraction runs an ordered chain of strategies (markdown table, inline
//! text, bullet points). The first strategy that yields at least one point
//! wins; results are never merged or scored across strategies. A strategy
//! error is logged and the chain moves on, so callers only ever observe
//! `Some(result)` or `None`.

mod bullets;
mod chartable;
mod classify;
mod inline;
mod labels;
pub mod normalize;
mod table;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{ChartType, DataPoint, XValue};
use crate::error::ChartResult;

pub use chartable::has_chartable_data;
pub use classify::determine_chart_type;
pub use labels::{ChartLabels, extract_labels};

/// Identifies which strategy produced an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionSource {
    MarkdownTable,
    InlineText,
    BulletPoints,
}

impl ExtractionSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MarkdownTable => "markdown_table",
            Self::InlineText => "inline_text",
            Self::BulletPoints => "bullet_points",
        }
    }
}

impl fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionMetadata {
    pub source: ExtractionSource,
    pub data_points: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

/// Points recovered from one text payload plus the inferred chart semantics.
///
/// `data` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub data: Vec<DataPoint>,
    pub chart_type: ChartType,
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub metadata: ExtractionMetadata,
}

/// Caller overrides applied after the heuristics run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ExtractOptions {
    pub chart_type: Option<ChartType>,
    pub title: Option<String>,
}

/// Raw output of a single strategy.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct StrategyOutput {
    pub(crate) points: Vec<DataPoint>,
    pub(crate) headers: Vec<String>,
}

type StrategyFn = fn(&str) -> ChartResult<Option<StrategyOutput>>;

/// Evaluation order of the strategy chain.
const STRATEGIES: [(ExtractionSource, StrategyFn); 3] = [
    (ExtractionSource::MarkdownTable, table::try_extract),
    (ExtractionSource::InlineText, inline::try_extract),
    (ExtractionSource::BulletPoints, bullets::try_extract),
];

static PAREN_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]+)\)").expect("valid parenthesis regex"));

/// Extracts points and chart semantics from `text`.
///
/// Returns `None` for blank input or when no strategy finds a point.
#[must_use]
pub fn extract_data(text: &str) -> Option<ExtractionResult> {
    extract_data_with(text, &ExtractOptions::default())
}

#[must_use]
pub fn extract_data_with(text: &str, options: &ExtractOptions) -> Option<ExtractionResult> {
    if text.trim().is_empty() {
        return None;
    }

    let (source, output) = run_strategies(text)?;
    let chart_type = options
        .chart_type
        .unwrap_or_else(|| determine_chart_type(text, &output.headers));
    let labels = extract_labels(text, &output.headers);
    let title = options.title.clone().unwrap_or(labels.title);
    let units = units_from(&output.headers, &labels.y_axis_title);
    let date_range = date_range_of(&output.points);

    debug!(
        source = %source,
        points = output.points.len(),
        chart_type = %chart_type,
        "extracted chart data"
    );

    Some(ExtractionResult {
        metadata: ExtractionMetadata {
            source,
            data_points: output.points.len(),
            date_range,
            units,
        },
        data: output.points,
        chart_type,
        title,
        x_axis_title: labels.x_axis_title,
        y_axis_title: labels.y_axis_title,
    })
}

fn run_strategies(text: &str) -> Option<(ExtractionSource, StrategyOutput)> {
    for (source, strategy) in STRATEGIES {
        match strategy(text) {
            Ok(Some(output)) if !output.points.is_empty() => return Some((source, output)),
            Ok(_) => trace!(source = %source, "strategy found no points"),
            Err(err) => warn!(source = %source, error = %err, "extraction strategy failed"),
        }
    }
    None
}

fn units_from(headers: &[String], y_axis_title: &str) -> Option<String> {
    headers
        .get(1)
        .map(String::as_str)
        .into_iter()
        .chain(std::iter::once(y_axis_title))
        .find_map(|text| {
            PAREN_SUFFIX
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|unit| unit.as_str().trim().to_owned())
                .filter(|unit| !unit.is_empty())
        })
}

fn date_range_of(points: &[DataPoint]) -> Option<DateRange> {
    let mut dates = Vec::with_capacity(points.len());
    for point in points {
        match &point.x {
            XValue::Text(text) if normalize::is_valid_iso_date(text) => dates.push(text.as_str()),
            _ => return None,
        }
    }
    // ISO dates order lexicographically.
    let start = dates.iter().min()?;
    let end = dates.iter().max()?;
    Some(DateRange {
        start: (*start).to_owned(),
        end: (*end).to_owned(),
    })
}

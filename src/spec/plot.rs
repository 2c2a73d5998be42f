//! Schema of the declarative-vector engine: `{ data, layout, config }`.
//!
//! Field names follow the wire format used by chart payloads found in
//! messages, so both built specs and hand-written specs go through the same
//! types. Every field is optional on input.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotSpec {
    #[serde(default)]
    pub data: Vec<Trace>,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub config: PlotConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(rename = "type", default = "default_trace_type")]
    pub trace_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub x: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub y: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fillcolor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub textinfo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hole: Option<f64>,
}

fn default_trace_type() -> String {
    "scatter".to_owned()
}

impl Trace {
    #[must_use]
    pub fn new(trace_type: impl Into<String>) -> Self {
        Self {
            trace_type: trace_type.into(),
            x: Vec::new(),
            y: Vec::new(),
            labels: Vec::new(),
            values: Vec::new(),
            name: None,
            mode: None,
            fill: None,
            fillcolor: None,
            line: None,
            marker: None,
            hovertemplate: None,
            textinfo: None,
            hole: None,
        }
    }

    /// True when `mode` asks for connecting lines (the default for scatter).
    #[must_use]
    pub fn draws_lines(&self) -> bool {
        self.mode.as_deref().is_none_or(|mode| mode.contains("lines"))
    }

    #[must_use]
    pub fn draws_markers(&self) -> bool {
        self.mode
            .as_deref()
            .is_some_and(|mode| mode.contains("markers"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

/// A single color or one color per point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    Single(String),
    PerPoint(Vec<String>),
}

impl ColorValue {
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&str> {
        match self {
            Self::Single(color) => Some(color),
            Self::PerPoint(colors) if colors.is_empty() => None,
            Self::PerPoint(colors) => colors.get(index % colors.len()).map(String::as_str),
        }
    }
}

/// Titles appear both as bare strings and as `{ "text": ... }` objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TitleSpec {
    Text(String),
    Object {
        #[serde(default)]
        text: String,
    },
}

impl TitleSpec {
    #[must_use]
    pub fn object(text: impl Into<String>) -> Self {
        Self::Object { text: text.into() }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Object { text } => text,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<TitleSpec>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub axis_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tickformat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub showgrid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gridcolor: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    #[serde(default = "default_margin_side")]
    pub l: f64,
    #[serde(default = "default_margin_side")]
    pub r: f64,
    #[serde(default = "default_margin_side")]
    pub t: f64,
    #[serde(default = "default_margin_side")]
    pub b: f64,
}

fn default_margin_side() -> f64 {
    50.0
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            l: 60.0,
            r: 30.0,
            t: 60.0,
            b: 60.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Font {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<TitleSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autosize: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_bgcolor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot_bgcolor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hovermode: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsive: Option<bool>,
    #[serde(
        rename = "displayModeBar",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub display_mode_bar: Option<bool>,
    #[serde(rename = "displaylogo", default, skip_serializing_if = "Option::is_none")]
    pub display_logo: Option<bool>,
}

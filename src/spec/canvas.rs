//! Schema of the canvas-imperative engine and the adapter that upgrades the
//! legacy option shape to the current one.
//!
//! Legacy options describe axes as arrays (`scales.xAxes[0]`,
//! `scales.yAxes[0]`) and carry the chart title at the top level. Current
//! options use named axes (`scales.x`, `scales.y`) and `plugins.title`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ChartResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSpec {
    #[serde(rename = "type", default = "default_canvas_type")]
    pub chart_type: String,
    #[serde(default)]
    pub data: CanvasData,
    #[serde(default)]
    pub options: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

fn default_canvas_type() -> String {
    "line".to_owned()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasData {
    #[serde(default)]
    pub labels: Vec<Value>,
    #[serde(default)]
    pub datasets: Vec<CanvasDataset>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasDataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub data: Vec<CanvasDatum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<ColorList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<ColorList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
}

impl CanvasDataset {
    #[must_use]
    pub fn fills_area(&self) -> bool {
        match &self.fill {
            Some(Value::Bool(fill)) => *fill,
            Some(Value::String(fill)) => fill != "false",
            _ => false,
        }
    }
}

/// A bare value (paired with `data.labels`) or an explicit point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CanvasDatum {
    Value(f64),
    Point { x: Value, y: f64 },
}

impl CanvasDatum {
    #[must_use]
    pub fn y(&self) -> f64 {
        match self {
            Self::Value(y) | Self::Point { y, .. } => *y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorList {
    One(String),
    Many(Vec<String>),
}

impl ColorList {
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&str> {
        match self {
            Self::One(color) => Some(color),
            Self::Many(colors) if colors.is_empty() => None,
            Self::Many(colors) => colors.get(index % colors.len()).map(String::as_str),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasTitle {
    #[serde(default)]
    pub display: bool,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasToggle {
    #[serde(default)]
    pub display: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasPlugins {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<CanvasTitle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<CanvasToggle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasScale {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub scale_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<CanvasTitle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<CanvasToggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin_at_zero: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Current option shape: named axes and title under `plugins`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsive: Option<bool>,
    #[serde(default)]
    pub plugins: CanvasPlugins,
    #[serde(default)]
    pub scales: IndexMap<String, CanvasScale>,
}

impl CanvasOptions {
    #[must_use]
    pub fn title_text(&self) -> Option<&str> {
        self.plugins
            .title
            .as_ref()
            .filter(|title| title.display && !title.text.is_empty())
            .map(|title| title.text.as_str())
    }

    #[must_use]
    pub fn axis_title(&self, axis: &str) -> Option<&str> {
        self.scales
            .get(axis)
            .and_then(|scale| scale.title.as_ref())
            .filter(|title| title.display && !title.text.is_empty())
            .map(|title| title.text.as_str())
    }

    #[must_use]
    pub fn shows_grid(&self, axis: &str) -> bool {
        self.scales
            .get(axis)
            .and_then(|scale| scale.grid)
            .is_none_or(|grid| grid.display)
    }
}

/// Legacy option shape: axis arrays and a top-level title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyCanvasOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<LegacyTitle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<CanvasToggle>,
    #[serde(default)]
    pub plugins: CanvasPlugins,
    #[serde(default)]
    pub scales: LegacyScales,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyTitle {
    #[serde(default)]
    pub display: Option<bool>,
    #[serde(default)]
    pub text: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyScales {
    #[serde(default)]
    pub x_axes: Vec<LegacyAxis>,
    #[serde(default)]
    pub y_axes: Vec<LegacyAxis>,
    #[serde(flatten)]
    pub named: IndexMap<String, CanvasScale>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyAxis {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub scale_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_label: Option<LegacyScaleLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_lines: Option<CanvasToggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticks: Option<LegacyTicks>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyScaleLabel {
    #[serde(default)]
    pub display: bool,
    #[serde(default)]
    pub label_string: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyTicks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin_at_zero: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl LegacyAxis {
    fn upgrade(self) -> CanvasScale {
        let ticks = self.ticks.unwrap_or_default();
        CanvasScale {
            scale_type: self.scale_type,
            title: self.scale_label.map(|label| CanvasTitle {
                display: label.display,
                text: label.label_string,
            }),
            grid: self.grid_lines,
            begin_at_zero: ticks.begin_at_zero,
            min: ticks.min,
            max: ticks.max,
        }
    }
}

impl LegacyCanvasOptions {
    /// Upgrades to the current shape. Named axes already present win over
    /// the first element of the legacy axis arrays, and an explicit
    /// `plugins.title` wins over the top-level title.
    #[must_use]
    pub fn upgrade(self) -> CanvasOptions {
        let mut scales = self.scales.named;
        for (name, axes) in [("x", self.scales.x_axes), ("y", self.scales.y_axes)] {
            if let Some(first) = axes.into_iter().next() {
                scales.entry(name.to_owned()).or_insert_with(|| first.upgrade());
            }
        }

        let mut plugins = self.plugins;
        if plugins.title.is_none() {
            plugins.title = self.title.map(|title| {
                let text = legacy_title_text(&title.text);
                CanvasTitle {
                    display: title.display.unwrap_or(!text.is_empty()),
                    text,
                }
            });
        }
        if plugins.legend.is_none() {
            plugins.legend = self.legend;
        }

        CanvasOptions {
            responsive: self.responsive,
            plugins,
            scales,
        }
    }
}

fn legacy_title_text(text: &Value) -> String {
    match text {
        Value::String(text) => text.clone(),
        Value::Array(lines) => lines
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" "),
        _ => String::new(),
    }
}

/// True when `options` uses any legacy key.
#[must_use]
pub fn is_legacy_options(options: &Value) -> bool {
    let scales = options.get("scales");
    options.get("title").is_some()
        || options.get("legend").is_some()
        || scales.and_then(|scales| scales.get("xAxes")).is_some()
        || scales.and_then(|scales| scales.get("yAxes")).is_some()
}

/// Reads raw options in either shape and returns the current shape.
pub fn normalize_canvas_options(options: &Value) -> ChartResult<CanvasOptions> {
    if options.is_null() {
        return Ok(CanvasOptions::default());
    }
    if is_legacy_options(options) {
        let legacy: LegacyCanvasOptions = serde_json::from_value(options.clone())?;
        return Ok(legacy.upgrade());
    }
    Ok(serde_json::from_value(options.clone())?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{is_legacy_options, normalize_canvas_options};

    #[test]
    fn legacy_axis_arrays_become_named_axes() {
        let legacy = json!({
            "title": { "display": true, "text": "Sales" },
            "scales": {
                "xAxes": [{ "scaleLabel": { "display": true, "labelString": "Month" } }],
                "yAxes": [{ "ticks": { "beginAtZero": true }, "gridLines": { "display": false } }]
            }
        });
        assert!(is_legacy_options(&legacy));

        let modern = normalize_canvas_options(&legacy).expect("normalize");
        assert_eq!(modern.title_text(), Some("Sales"));
        assert_eq!(modern.axis_title("x"), Some("Month"));
        assert_eq!(modern.scales["y"].begin_at_zero, Some(true));
        assert!(!modern.shows_grid("y"));
        assert!(modern.shows_grid("x"));
    }

    #[test]
    fn modern_options_pass_through() {
        let options = json!({ "plugins": { "title": { "display": true, "text": "T" } } });
        assert!(!is_legacy_options(&options));
        let modern = normalize_canvas_options(&options).expect("normalize");
        assert_eq!(modern.title_text(), Some("T"));
    }
}

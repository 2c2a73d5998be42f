use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Schema of the low-level-drawing engine: raw `{x, y}` rows plus a mark type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingSpec {
    #[serde(rename = "type", default = "default_mark")]
    pub mark: String,
    #[serde(default)]
    pub data: Vec<DrawingDatum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

fn default_mark() -> String {
    "line".to_owned()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingDatum {
    pub x: Value,
    pub y: f64,
}

impl DrawingSpec {
    /// Reads either the full object form or a bare array of `{x, y}` rows,
    /// which draws as a line.
    pub fn from_value(value: &Value) -> serde_json::Result<Self> {
        match value {
            Value::Array(rows) => Ok(Self {
                mark: default_mark(),
                data: rows
                    .iter()
                    .map(|row| serde_json::from_value(row.clone()))
                    .collect::<serde_json::Result<_>>()?,
                width: None,
                height: None,
                title: None,
                x_label: None,
                y_label: None,
                color: None,
            }),
            other => serde_json::from_value(other.clone()),
        }
    }

    #[must_use]
    pub fn draws_bars(&self) -> bool {
        self.mark == "bar"
    }
}

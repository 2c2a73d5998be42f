use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::EngineId;

use super::Theme;

/// Display options applied when building a chart spec.
///
/// Serializable so hosts can keep chart preferences next to their other
/// settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartDisplayConfig {
    #[serde(default)]
    pub engine: EngineId,
    #[serde(default)]
    pub show_legend: bool,
    #[serde(default = "default_true")]
    pub show_grid: bool,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_true")]
    pub responsive: bool,
    #[serde(default)]
    pub display_mode_bar: bool,
}

impl Default for ChartDisplayConfig {
    fn default() -> Self {
        Self {
            engine: EngineId::default(),
            show_legend: false,
            show_grid: true,
            height: default_height(),
            width: None,
            theme: Theme::default(),
            responsive: true,
            display_mode_bar: false,
        }
    }
}

impl ChartDisplayConfig {
    #[must_use]
    pub fn with_engine(mut self, engine: EngineId) -> Self {
        self.engine = engine;
        self
    }

    #[must_use]
    pub fn with_legend(mut self, show_legend: bool) -> Self {
        self.show_legend = show_legend;
        self
    }

    #[must_use]
    pub fn with_grid(mut self, show_grid: bool) -> Self {
        self.show_grid = show_grid;
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: Option<f64>, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub fn with_mode_bar(mut self, display_mode_bar: bool) -> Self {
        self.display_mode_bar = display_mode_bar;
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(ChartError::InvalidData(
                "chart height must be finite and > 0".to_owned(),
            ));
        }
        if let Some(width) = self.width {
            if !width.is_finite() || width <= 0.0 {
                return Err(ChartError::InvalidData(
                    "chart width must be finite and > 0".to_owned(),
                ));
            }
        }
        Ok(self)
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str::<Self>(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))?
            .validate()
    }
}

fn default_true() -> bool {
    true
}

fn default_height() -> f64 {
    400.0
}

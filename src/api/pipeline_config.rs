use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::spec::ChartDisplayConfig;

/// Public pipeline bootstrap configuration.
///
/// Serializable so host applications can persist chart preferences
/// alongside their own settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub display: ChartDisplayConfig,
    #[serde(default = "default_memo_capacity")]
    pub memo_capacity: usize,
    /// Skip extraction entirely when the chartability gate says no.
    #[serde(default = "default_enforce_gate")]
    pub enforce_gate: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            display: ChartDisplayConfig::default(),
            memo_capacity: default_memo_capacity(),
            enforce_gate: default_enforce_gate(),
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn with_display(mut self, display: ChartDisplayConfig) -> Self {
        self.display = display;
        self
    }

    #[must_use]
    pub fn with_memo_capacity(mut self, memo_capacity: usize) -> Self {
        self.memo_capacity = memo_capacity;
        self
    }

    #[must_use]
    pub fn with_gate(mut self, enforce_gate: bool) -> Self {
        self.enforce_gate = enforce_gate;
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        if self.memo_capacity == 0 {
            return Err(ChartError::InvalidData(
                "memo capacity must be >= 1".to_owned(),
            ));
        }
        self.display.validate()?;
        Ok(self)
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str::<Self>(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))?
            .validate()
    }
}

fn default_memo_capacity() -> usize {
    128
}

fn default_enforce_gate() -> bool {
    true
}

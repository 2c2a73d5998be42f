//! Adaptive chart spec building.
//!
//! Points and titles are analysed once (dates, years, numeric x,
//! temperature vocabulary), a color scheme is picked from a fixed priority
//! table, and a spec native to the requested engine is assembled.

mod builder;
pub mod canvas;
mod characteristics;
mod config;
mod convert;
pub mod drawing;
mod palette;
pub mod plot;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::render::EngineId;

pub use builder::{ChartLabelsRef, build_from_extraction, build_spec};
pub use characteristics::DataCharacteristics;
pub use config::ChartDisplayConfig;
pub use palette::{ColorScheme, Theme, ThemeColors, with_alpha};

/// An engine-native chart description paired with the engine that reads it.
///
/// Immutable once built: display changes produce a new spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    engine: EngineId,
    spec: Value,
}

impl ChartSpec {
    #[must_use]
    pub fn new(engine: EngineId, spec: Value) -> Self {
        Self { engine, spec }
    }

    #[must_use]
    pub fn engine(&self) -> EngineId {
        self.engine
    }

    #[must_use]
    pub fn spec(&self) -> &Value {
        &self.spec
    }

    #[must_use]
    pub fn into_parts(self) -> (EngineId, Value) {
        (self.engine, self.spec)
    }

    /// Returns a copy rendered at `height` pixels.
    #[must_use]
    pub fn with_height(&self, height: f64) -> Self {
        let mut spec = self.spec.clone();
        if let Value::Object(root) = &mut spec {
            if self.engine == EngineId::Vector {
                let layout = root
                    .entry("layout")
                    .or_insert_with(|| Value::Object(serde_json::Map::new()));
                if let Value::Object(layout) = layout {
                    layout.insert("height".to_owned(), Value::from(height));
                }
            } else {
                root.insert("height".to_owned(), Value::from(height));
            }
        }
        Self::new(self.engine, spec)
    }
}

/// Outcome of a build: either a spec or the no-data sentinel.
#[derive(Debug, Clone, PartialEq)]
pub enum BuiltChart {
    NoData,
    Ready(ChartSpec),
}

impl BuiltChart {
    #[must_use]
    pub fn into_spec(self) -> Option<ChartSpec> {
        match self {
            Self::NoData => None,
            Self::Ready(spec) => Some(spec),
        }
    }
}

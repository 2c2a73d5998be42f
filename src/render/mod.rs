//! Rendering: engine backends, the fallback renderer and chart surfaces.
//!
//! Every engine materializes a [`RenderFrame`]; frames are serialized by a
//! [`Renderer`] (SVG always, Cairo PNG behind `cairo-backend`).

pub mod backends;
mod chrome;
mod fallback;
mod frame;
mod null_renderer;
mod primitives;
mod registry;
mod surface;
mod svg;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use backends::{CanvasBackend, ChartBackend, DrawingBackend, VectorBackend, create_backend};
pub use chrome::truncate_label;
pub use fallback::{FALLBACK_NOTICE, draw_fallback};
pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{
    CirclePrimitive, Color, LinePrimitive, PolygonPrimitive, RectPrimitive, TextHAlign,
    TextPrimitive,
};
pub use registry::{Activation, BackendRegistry, BackendState, LoadOutcome, LoadTicket};
pub use surface::{ChartSurface, ExportRequest, ExportedImage, RenderedOutput};
pub use svg::{SvgRenderer, escape_xml};

use crate::error::ChartResult;

/// Contract implemented by any frame serializer.
///
/// Renderers receive a fully materialized, deterministic `RenderFrame` so
/// output code stays isolated from spec parsing.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}

/// The three interchangeable rendering engines.
///
/// Serialized with the library tags found in chat payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EngineId {
    /// Declarative vector plots (`data`/`layout`/`config`).
    #[default]
    #[serde(rename = "plotly")]
    Vector,
    /// Canvas-imperative charts (`type` plus `data.labels`/`datasets`).
    #[serde(rename = "chartjs")]
    Canvas,
    /// Low-level drawing over raw `{x, y}` rows.
    #[serde(rename = "d3")]
    Drawing,
}

impl EngineId {
    pub const ALL: [Self; 3] = [Self::Vector, Self::Canvas, Self::Drawing];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vector => "plotly",
            Self::Canvas => "chartjs",
            Self::Drawing => "d3",
        }
    }

    /// Engine for a fence language or envelope library tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|engine| engine.as_str().eq_ignore_ascii_case(tag))
    }

    /// Engines that load on first use instead of at construction.
    #[must_use]
    pub fn is_lazy(self) -> bool {
        !matches!(self, Self::Vector)
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Svg,
}

impl ExportFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }

    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoRenderStats, CairoRenderer};

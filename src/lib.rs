//! text-charts: turns free-form assistant text into charts.
//!
//! Text is mined for a numeric series (`extract`), turned into a spec native
//! to one of three chart engines (`spec`), and drawn through a backend
//! registry that falls back to a built-in SVG renderer when the primary
//! engine fails (`render`). `api` ties these together for chat messages.

pub mod api;
pub mod core;
pub mod error;
pub mod extract;
pub mod render;
pub mod spec;
pub mod telemetry;

pub use api::{ChartPipeline, ContentBlock, PipelineConfig, PipelineOutcome, detect_visualization};
pub use error::{ChartError, ChartResult};
pub use extract::{ExtractOptions, ExtractionResult, extract_data, has_chartable_data};
pub use render::{ChartSurface, EngineId, RenderedOutput, draw_fallback};
pub use spec::{BuiltChart, ChartDisplayConfig, ChartSpec, build_spec};

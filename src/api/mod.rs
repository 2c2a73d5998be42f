//! Message intake: embedded chart specs and the memoized text pipeline.

mod content;
mod pipeline;
mod pipeline_config;
mod sniff;
mod spec_cache;

pub use content::{ContentBlock, FencedBlock, detect_visualization, fenced_blocks, parse_envelope};
pub use pipeline::{ChartPipeline, PipelineOutcome, PipelineStats};
pub use pipeline_config::PipelineConfig;
pub use sniff::sniff_engine;
pub use spec_cache::SpecCacheStats;

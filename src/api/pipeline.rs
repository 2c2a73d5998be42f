use tracing::{debug, trace};

use crate::error::ChartResult;
use crate::extract::{ExtractOptions, ExtractionResult, extract_data_with, has_chartable_data};
use crate::spec::{BuiltChart, ChartSpec, build_from_extraction};

use super::spec_cache::{SpecCache, SpecCacheKey, SpecCacheStats};
use super::{ContentBlock, PipelineConfig, detect_visualization};

/// Result of running text through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// The chartability gate rejected the text; extraction never ran.
    NotChartable,
    /// Extraction found no points.
    NoData,
    Chart {
        extraction: ExtractionResult,
        spec: ChartSpec,
    },
}

impl PipelineOutcome {
    #[must_use]
    pub fn spec(&self) -> Option<&ChartSpec> {
        match self {
            Self::Chart { spec, .. } => Some(spec),
            Self::NotChartable | Self::NoData => None,
        }
    }

    #[must_use]
    pub fn into_spec(self) -> Option<ChartSpec> {
        match self {
            Self::Chart { spec, .. } => Some(spec),
            Self::NotChartable | Self::NoData => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
    /// Extraction runs actually performed (memo misses past the gate).
    pub extractions: u64,
    pub gate_rejections: u64,
}

/// Text to chart spec, memoized on the text, the caller overrides and the
/// display config.
#[derive(Debug)]
pub struct ChartPipeline {
    config: PipelineConfig,
    cache: SpecCache,
    extractions: u64,
    gate_rejections: u64,
}

impl ChartPipeline {
    pub fn new(config: PipelineConfig) -> ChartResult<Self> {
        let config = config.validate()?;
        Ok(Self {
            cache: SpecCache::new(config.memo_capacity),
            config,
            extractions: 0,
            gate_rejections: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> PipelineConfig {
        self.config
    }

    pub fn run(&mut self, text: &str) -> ChartResult<PipelineOutcome> {
        self.run_with(text, &ExtractOptions::default())
    }

    pub fn run_with(
        &mut self,
        text: &str,
        options: &ExtractOptions,
    ) -> ChartResult<PipelineOutcome> {
        if self.config.enforce_gate && !has_chartable_data(text) {
            self.gate_rejections = self.gate_rejections.saturating_add(1);
            trace!(text_len = text.len(), "chartability gate rejected text");
            return Ok(PipelineOutcome::NotChartable);
        }

        let key = SpecCacheKey::new(text, options, &self.config.display);
        if let Some(outcome) = self.cache.get(&key) {
            return Ok(outcome);
        }

        self.extractions = self.extractions.saturating_add(1);
        let outcome = match extract_data_with(text, options) {
            None => PipelineOutcome::NoData,
            Some(extraction) => match build_from_extraction(&extraction, &self.config.display)? {
                BuiltChart::NoData => PipelineOutcome::NoData,
                BuiltChart::Ready(spec) => PipelineOutcome::Chart { extraction, spec },
            },
        };
        debug!(
            engine = %self.config.display.engine,
            charted = outcome.spec().is_some(),
            "pipeline run"
        );

        self.cache.insert(key, outcome.clone());
        Ok(outcome)
    }

    /// Resolves a message: an embedded chart spec wins, otherwise the text
    /// is charted through the pipeline, otherwise it stays text.
    pub fn process(&mut self, text: &str) -> ChartResult<ContentBlock> {
        if let ContentBlock::Chart(spec) = detect_visualization(text) {
            return Ok(ContentBlock::Chart(spec));
        }
        Ok(match self.run(text)?.into_spec() {
            Some(spec) => ContentBlock::Chart(spec),
            None => ContentBlock::Text(text.to_owned()),
        })
    }

    #[must_use]
    pub fn stats(&self) -> PipelineStats {
        let SpecCacheStats { hits, misses, size } = self.cache.stats();
        PipelineStats {
            hits,
            misses,
            size,
            extractions: self.extractions,
            gate_rejections: self.gate_rejections,
        }
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

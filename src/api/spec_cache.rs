use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use tracing::trace;

use crate::core::ChartType;
use crate::extract::ExtractOptions;
use crate::render::EngineId;
use crate::spec::{ChartDisplayConfig, Theme};

use super::PipelineOutcome;

/// Runtime metrics of the pipeline memo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpecCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}

/// Hashable image of a display config; floats are compared by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct DisplayKey {
    engine: EngineId,
    show_legend: bool,
    show_grid: bool,
    height: OrderedFloat<f64>,
    width: Option<OrderedFloat<f64>>,
    theme: Theme,
    responsive: bool,
    display_mode_bar: bool,
}

impl From<&ChartDisplayConfig> for DisplayKey {
    fn from(config: &ChartDisplayConfig) -> Self {
        Self {
            engine: config.engine,
            show_legend: config.show_legend,
            show_grid: config.show_grid,
            height: OrderedFloat(config.height),
            width: config.width.map(OrderedFloat),
            theme: config.theme,
            responsive: config.responsive,
            display_mode_bar: config.display_mode_bar,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(super) struct SpecCacheKey {
    text: String,
    chart_type: Option<ChartType>,
    title: Option<String>,
    display: DisplayKey,
}

impl SpecCacheKey {
    pub(super) fn new(text: &str, options: &ExtractOptions, display: &ChartDisplayConfig) -> Self {
        Self {
            text: text.to_owned(),
            chart_type: options.chart_type,
            title: options.title.clone(),
            display: DisplayKey::from(display),
        }
    }
}

/// Bounded least-recently-used memo of pipeline outcomes.
#[derive(Debug)]
pub(super) struct SpecCache {
    entries: IndexMap<SpecCacheKey, PipelineOutcome>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl SpecCache {
    pub(super) fn new(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Looks up `key`, marking it most recently used on a hit.
    pub(super) fn get(&mut self, key: &SpecCacheKey) -> Option<PipelineOutcome> {
        let Some(index) = self.entries.get_index_of(key) else {
            self.misses = self.misses.saturating_add(1);
            return None;
        };
        self.hits = self.hits.saturating_add(1);
        let last = self.entries.len() - 1;
        self.entries.move_index(index, last);
        self.entries.get_index(last).map(|(_, outcome)| outcome.clone())
    }

    pub(super) fn insert(&mut self, key: SpecCacheKey, outcome: PipelineOutcome) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            if let Some((evicted, _)) = self.entries.shift_remove_index(0) {
                trace!(text_len = evicted.text.len(), capacity = self.capacity, "memo eviction");
            }
        }
        self.entries.insert(key, outcome);
    }

    pub(super) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(super) fn stats(&self) -> SpecCacheStats {
        SpecCacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(text: &str) -> SpecCacheKey {
        SpecCacheKey::new(text, &ExtractOptions::default(), &ChartDisplayConfig::default())
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut cache = SpecCache::new(2);
        cache.insert(key("a"), PipelineOutcome::NoData);
        cache.insert(key("b"), PipelineOutcome::NoData);
        assert!(cache.get(&key("a")).is_some());

        cache.insert(key("c"), PipelineOutcome::NoData);
        assert!(cache.get(&key("b")).is_none());
        assert!(cache.get(&key("a")).is_some());
        assert!(cache.get(&key("c")).is_some());

        let stats = cache.stats();
        assert_eq!(stats.size, 2);
        assert_eq!(stats.hits, 3);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn display_config_is_part_of_the_key() {
        let tall = ChartDisplayConfig::default().with_size(None, 600.0);
        let default_key = key("a");
        let tall_key = SpecCacheKey::new("a", &ExtractOptions::default(), &tall);
        assert_ne!(default_key, tall_key);
    }
}

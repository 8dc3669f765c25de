//! Owned table of live charts, one slot per service.

use super::{ChartBackend, ChartConfig};
use crate::status::ServiceKey;
use std::collections::HashMap;

/// Live chart handles keyed by service.
///
/// The only way in is [`ChartRegistry::install`], which destroys whatever
/// occupies the slot before constructing the replacement, so a key never
/// owns two charts.
#[derive(Debug)]
pub struct ChartRegistry<H> {
    charts: HashMap<ServiceKey, H>,
}

impl<H> Default for ChartRegistry<H> {
    fn default() -> Self {
        Self {
            charts: HashMap::new(),
        }
    }
}

impl<H> ChartRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the chart for `key`.
    pub fn install<B>(&mut self, backend: &mut B, key: &ServiceKey, canvas: &str, config: &ChartConfig)
    where
        B: ChartBackend<Chart = H>,
    {
        self.teardown(backend, key);
        let chart = backend.construct(canvas, config);
        self.charts.insert(key.clone(), chart);
    }

    /// Destroy the chart for `key`. Returns whether one existed.
    pub fn teardown<B>(&mut self, backend: &mut B, key: &ServiceKey) -> bool
    where
        B: ChartBackend<Chart = H>,
    {
        match self.charts.remove(key) {
            Some(chart) => {
                backend.destroy(chart);
                true
            }
            None => false,
        }
    }

    /// Destroy every chart.
    pub fn clear<B>(&mut self, backend: &mut B)
    where
        B: ChartBackend<Chart = H>,
    {
        for (_, chart) in self.charts.drain() {
            backend.destroy(chart);
        }
    }

    pub fn get(&self, key: &ServiceKey) -> Option<&H> {
        self.charts.get(key)
    }

    pub fn contains(&self, key: &ServiceKey) -> bool {
        self.charts.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

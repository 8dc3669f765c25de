//! Per-service rendering.
//!
//! The [`Renderer`] turns one [`ServiceSnapshot`] into surface mutations
//! (card class, status text, link target) and a freshly built history chart.
//! It talks to the outside world through two small traits:
//!
//! - [`Surface`]: element lookup plus class/text/link setters
//! - [`ChartBackend`]: construct a chart on a canvas, destroy it again

mod chart;
mod registry;


pub use chart::*;
pub use registry::ChartRegistry;

use crate::status::{ServiceKey, ServiceSnapshot, LAST_UPDATED_ID};

/// DOM-like element store the renderer writes into.
///
/// Lookups of unknown ids return `None`; callers treat that as a soft
/// failure.
pub trait Surface {
    /// Handle to a resolved element.
    type Element: Copy;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Replace every state class on the element with `tag`.
    fn set_class_exclusive(&mut self, element: Self::Element, tag: &str);

    fn set_text(&mut self, element: Self::Element, text: &str);

    fn set_link_target(&mut self, element: Self::Element, url: &str);
}

/// Charting capability: construct a chart on a canvas, destroy it later.
pub trait ChartBackend {
    /// Handle owning every resource tied to one chart.
    type Chart;

    fn construct(&mut self, canvas: &str, config: &ChartConfig) -> Self::Chart;

    fn destroy(&mut self, chart: Self::Chart);
}

/// Resolved elements of one service card.
struct CardTargets<E> {
    card: E,
    link: E,
    status_text: E,
}

/// Applies service snapshots to a surface and owns the chart table.
pub struct Renderer<S: Surface, C: ChartBackend> {
    surface: S,
    charts: C,
    registry: ChartRegistry<C::Chart>,
    max_ticks: usize,
}

impl<S: Surface, C: ChartBackend> Renderer<S, C> {
    pub fn new(surface: S, charts: C) -> Self {
        Self {
            surface,
            charts,
            registry: ChartRegistry::new(),
            max_ticks: DEFAULT_MAX_TICKS,
        }
    }

    /// Limit the number of time-axis ticks on every chart.
    pub fn with_max_ticks(mut self, max_ticks: usize) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// Render one service.
    ///
    /// If any of the card's elements is missing nothing is touched and a
    /// warning is logged.
    pub fn render(&mut self, key: &ServiceKey, snapshot: &ServiceSnapshot) {
        let chart_id = key.chart_id();
        let (Some(targets), Some(_canvas)) =
            (self.resolve(key), self.surface.element_by_id(&chart_id))
        else {
            tracing::warn!(service = %key, "UI elements not found for service");
            return;
        };

        self.surface.set_link_target(targets.link, snapshot.link_target());

        let bucket = snapshot.status.bucket();
        self.surface.set_class_exclusive(targets.card, bucket.class_name());
        self.surface.set_text(targets.status_text, bucket.label());

        let series = ChartSeries::from_history(&snapshot.history);
        if series.is_empty() {
            if self.registry.teardown(&mut self.charts, key) {
                tracing::debug!(service = %key, "Removed chart for service without history");
            }
            return;
        }

        let config = ChartConfig::new(series).with_max_ticks(self.max_ticks);
        self.registry
            .install(&mut self.charts, key, &chart_id, &config);

        tracing::trace!(
            service = %key,
            bucket = %bucket,
            points = config.series.len(),
            "Rendered service"
        );
    }

    /// Set the shared "last updated" indicator.
    pub fn set_last_updated(&mut self, text: &str) {
        match self.surface.element_by_id(LAST_UPDATED_ID) {
            Some(element) => self.surface.set_text(element, text),
            None => tracing::warn!(id = LAST_UPDATED_ID, "Last-updated element not found"),
        }
    }

    fn resolve(&self, key: &ServiceKey) -> Option<CardTargets<S::Element>> {
        Some(CardTargets {
            card: self.surface.element_by_id(&key.card_id())?,
            link: self.surface.element_by_id(&key.link_id())?,
            status_text: self.surface.element_by_id(&key.status_text_id())?,
        })
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn charts(&self) -> &C {
        &self.charts
    }

    pub fn registry(&self) -> &ChartRegistry<C::Chart> {
        &self.registry
    }

    /// Destroy every chart and hand back the surface and backend.
    pub fn into_parts(mut self) -> (S, C) {
        self.registry.clear(&mut self.charts);
        (self.surface, self.charts)
    }
}

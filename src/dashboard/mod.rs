//! Refresh cycle: applies one poll outcome to the whole board.
//!
//! A successful report renders every service in response order and stamps
//! the "last updated" indicator. A failed fetch only changes the indicator;
//! every card keeps its last rendered state.

use crate::poller::FetchError;
use crate::render::{ChartBackend, Renderer, Surface};
use crate::status::{ServiceKey, StatusReport};
use chrono::{DateTime, Local};

/// Indicator text after a failed fetch.
pub const UPDATE_ERROR_TEXT: &str = "Update Error";

/// Indicator text after a successful fetch at `now`.
pub fn last_updated_text(now: DateTime<Local>) -> String {
    format!("Last updated: {}", now.format("%H:%M:%S"))
}

/// Owns the renderer and applies poll outcomes to it.
pub struct Dashboard<S: Surface, C: ChartBackend> {
    renderer: Renderer<S, C>,
}

impl<S: Surface, C: ChartBackend> Dashboard<S, C> {
    pub fn new(renderer: Renderer<S, C>) -> Self {
        Self { renderer }
    }

    /// Apply a fetch result using the current local time.
    pub fn apply(&mut self, result: Result<StatusReport, FetchError>) {
        self.apply_at(result, Local::now());
    }

    /// Apply a fetch result as if it arrived at `now`.
    pub fn apply_at(&mut self, result: Result<StatusReport, FetchError>, now: DateTime<Local>) {
        match result {
            Ok(report) => {
                let rendered = self.render_report(&report);
                self.renderer.set_last_updated(&last_updated_text(now));
                tracing::debug!(
                    services = report.len(),
                    rendered,
                    "Applied status report"
                );
            }
            Err(error) => {
                tracing::error!(error = %error, "Failed to fetch status");
                self.renderer.set_last_updated(UPDATE_ERROR_TEXT);
            }
        }
    }

    /// Render every entry of `report`; returns how many had a valid key.
    fn render_report(&mut self, report: &StatusReport) -> usize {
        let mut rendered = 0;
        for (raw_key, snapshot) in report {
            match ServiceKey::parse(raw_key) {
                Ok(key) => {
                    self.renderer.render(&key, snapshot);
                    rendered += 1;
                }
                Err(error) => {
                    tracing::warn!(key = %raw_key, error = %error, "Skipping service with invalid key");
                }
            }
        }
        rendered
    }

    pub fn renderer(&self) -> &Renderer<S, C> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer<S, C> {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> Renderer<S, C> {
        self.renderer
    }
}

//! Output formatting helpers for CLI commands

use crate::render::{segment_color, ChartSeries};
use crate::status::{Bucket, ServiceSnapshot};
use chrono::{DateTime, Local};
use serde_json::json;

/// One history point as shown in a chart tooltip.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PointView {
    /// Milliseconds since the Unix epoch
    pub x: i64,
    /// Severity
    pub y: f64,
    pub title: String,
    pub label: String,
    pub color: String,
}

/// View model for service display
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ServiceView {
    pub key: String,
    pub name: Option<String>,
    pub status: String,
    pub bucket: Bucket,
    pub label: &'static str,
    pub link: String,
    pub history: Vec<PointView>,
}

impl ServiceView {
    pub fn new(key: &str, snapshot: &ServiceSnapshot) -> Self {
        let bucket = snapshot.status.bucket();
        let series = ChartSeries::from_history(&snapshot.history);
        let history = series
            .points()
            .iter()
            .map(|point| {
                let tooltip = series.tooltip(point);
                PointView {
                    x: point.x,
                    y: point.y,
                    title: tooltip.title,
                    label: tooltip.label,
                    color: segment_color(point.y).border.to_string(),
                }
            })
            .collect();

        Self {
            key: key.to_string(),
            name: snapshot.name.clone(),
            status: snapshot.status.to_string(),
            bucket,
            label: bucket.label(),
            link: snapshot.link_target().to_string(),
            history,
        }
    }
}

/// Format services as JSON
pub fn format_services_json(
    services: &[ServiceView],
    updated: DateTime<Local>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json!({
        "updated": updated.to_rfc3339(),
        "services": services
    }))
}

/// Get status icon for a bucket
pub fn status_icon(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::Online => "✓",
        Bucket::Offline => "✗",
        Bucket::Error => "!",
        Bucket::Checking => "?",
    }
}

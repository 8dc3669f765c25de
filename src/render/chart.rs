//! Chart series and chart configuration.
//!
//! Everything a chart needs is computed here as plain data: the points, the
//! timestamp → detailed status lookup used by tooltips, axis ticks and the
//! formatting functions. Chart backends only consume the result.

use crate::status::{
    HistorySample, StatusCode, SEVERITY_ERROR, SEVERITY_OFFLINE, SEVERITY_ONLINE,
};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Tick label format on the time axis.
pub const TICK_FORMAT: &str = "%H:%M";
/// Tooltip title format.
pub const TOOLTIP_FORMAT: &str = "%b %-d, %H:%M:%S";
/// Default maximum number of time-axis ticks.
pub const DEFAULT_MAX_TICKS: usize = 5;
/// Tooltip label when a point has no recorded status.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// One plotted sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Epoch milliseconds
    pub x: i64,
    /// Severity (0, 0.5 or 1)
    pub y: f64,
}

/// Parse an ISO-8601 timestamp into epoch milliseconds.
///
/// Timestamps without an offset are read as local time.
pub fn parse_timestamp(timestamp: &str) -> Option<i64> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(parsed.timestamp_millis());
    }
    let naive = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.timestamp_millis())
}

/// Points of one service's history plus the lookup for tooltips.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    points: Vec<ChartPoint>,
    details: HashMap<i64, StatusCode>,
}

impl ChartSeries {
    /// Map history samples to points, keeping their order.
    ///
    /// Samples with an unreadable timestamp are skipped. When two samples
    /// share a timestamp the later one wins the tooltip lookup.
    pub fn from_history(history: &[HistorySample]) -> Self {
        let mut points = Vec::with_capacity(history.len());
        let mut details = HashMap::with_capacity(history.len());

        for sample in history {
            let Some(x) = parse_timestamp(&sample.timestamp) else {
                tracing::warn!(
                    timestamp = %sample.timestamp,
                    status = %sample.status,
                    "Skipping history sample with unreadable timestamp"
                );
                continue;
            };
            points.push(ChartPoint {
                x,
                y: sample.status.severity(),
            });
            details.insert(x, sample.status.clone());
        }

        Self { points, details }
    }

    pub fn points(&self) -> &[ChartPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Detailed status recorded at `x`.
    pub fn detail(&self, x: i64) -> Option<&StatusCode> {
        self.details.get(&x)
    }

    /// Tooltip for a point, rendered in local time.
    pub fn tooltip(&self, point: &ChartPoint) -> Tooltip {
        self.tooltip_in(point, &Local)
    }

    /// Tooltip for a point, rendered in `tz`.
    pub fn tooltip_in<Tz>(&self, point: &ChartPoint, tz: &Tz) -> Tooltip
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Tooltip {
            title: format_millis(point.x, tz, TOOLTIP_FORMAT),
            label: tooltip_label(self.detail(point.x)),
        }
    }

    /// Points where the detailed status differs from the previous point.
    ///
    /// The first point always counts as a change.
    pub fn changes(&self) -> Vec<ChartPoint> {
        let mut last: Option<&StatusCode> = None;
        let mut changes = Vec::new();
        for point in &self.points {
            let detail = self.detail(point.x);
            if last.is_none() || detail != last {
                changes.push(*point);
            }
            last = detail;
        }
        changes
    }
}

/// Text shown when pointing at a sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tooltip {
    pub title: String,
    pub label: String,
}

/// Format epoch milliseconds in `tz`; empty for out-of-range values.
pub fn format_millis<Tz>(millis: i64, tz: &Tz, format: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    tz.timestamp_millis_opt(millis)
        .single()
        .map(|time| time.format(format).to_string())
        .unwrap_or_default()
}

/// Human-readable tooltip label for a detailed status.
///
/// `offline_conn_error` becomes `Offline: Conn Error`; a missing status is
/// shown as `Unknown`.
pub fn tooltip_label(detail: Option<&StatusCode>) -> String {
    let Some(detail) = detail else {
        return UNKNOWN_LABEL.to_string();
    };
    let words: Vec<String> = detail
        .as_str()
        .split('_')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect();
    if words.is_empty() {
        return UNKNOWN_LABEL.to_string();
    }

    let mut label = words.join(" ");
    for prefix in ["Error ", "Offline "] {
        if label.starts_with(prefix) {
            label.insert(prefix.len() - 1, ':');
            break;
        }
    }
    label
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Value-axis label for a tick; empty for anything but 0, 0.5 and 1.
pub fn value_axis_label(value: f64) -> &'static str {
    if value == SEVERITY_ONLINE {
        "Online"
    } else if value == SEVERITY_ERROR {
        "Error"
    } else if value == SEVERITY_OFFLINE {
        "Offline"
    } else {
        ""
    }
}

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Line and fill color of one segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentColor {
    pub border: Rgba,
    pub fill: Rgba,
}

const ONLINE_COLOR: SegmentColor = SegmentColor {
    border: Rgba::new(56, 161, 105, 0.7),
    fill: Rgba::new(56, 161, 105, 0.1),
};
const ERROR_COLOR: SegmentColor = SegmentColor {
    border: Rgba::new(221, 107, 32, 0.7),
    fill: Rgba::new(221, 107, 32, 0.1),
};
const OFFLINE_COLOR: SegmentColor = SegmentColor {
    border: Rgba::new(229, 62, 62, 0.7),
    fill: Rgba::new(229, 62, 62, 0.1),
};

/// Color of the segment starting at a point of severity `y`.
pub fn segment_color(y: f64) -> SegmentColor {
    if y == SEVERITY_ONLINE {
        ONLINE_COLOR
    } else if y == SEVERITY_ERROR {
        ERROR_COLOR
    } else {
        OFFLINE_COLOR
    }
}

/// How consecutive points are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    /// Hold each value until the next sample
    Stepped,
}

/// Chronological time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeAxis {
    pub tick_format: &'static str,
    pub tooltip_format: &'static str,
    pub max_ticks: usize,
}

impl Default for TimeAxis {
    fn default() -> Self {
        Self {
            tick_format: TICK_FORMAT,
            tooltip_format: TOOLTIP_FORMAT,
            max_ticks: DEFAULT_MAX_TICKS,
        }
    }
}

impl TimeAxis {
    /// Indices of the points that carry a tick, evenly spread, first and
    /// last included.
    pub fn tick_indices(&self, len: usize) -> Vec<usize> {
        match (len, self.max_ticks) {
            (0, _) | (_, 0) => Vec::new(),
            (_, 1) => vec![0],
            _ if len <= self.max_ticks => (0..len).collect(),
            _ => {
                let last = len - 1;
                let slots = self.max_ticks - 1;
                let mut indices: Vec<usize> = (0..=slots).map(|i| i * last / slots).collect();
                indices.dedup();
                indices
            }
        }
    }

    /// Tick positions and local-time labels for `points`.
    pub fn ticks(&self, points: &[ChartPoint]) -> Vec<(usize, String)> {
        self.ticks_in(points, &Local)
    }

    pub fn ticks_in<Tz>(&self, points: &[ChartPoint], tz: &Tz) -> Vec<(usize, String)>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        self.tick_indices(points.len())
            .into_iter()
            .map(|i| (i, format_millis(points[i].x, tz, self.tick_format)))
            .collect()
    }
}

/// Fixed severity axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueAxis {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for ValueAxis {
    fn default() -> Self {
        // Headroom above "Online"
        Self {
            min: 0.0,
            max: 1.2,
            step: 0.5,
        }
    }
}

impl ValueAxis {
    /// Labeled ticks, top to bottom. Unlabeled steps are dropped.
    pub fn labeled_ticks(&self) -> Vec<(f64, &'static str)> {
        let mut ticks = Vec::new();
        let mut value = self.min;
        while value <= self.max + f64::EPSILON {
            let label = value_axis_label(value);
            if !label.is_empty() {
                ticks.push((value, label));
            }
            value += self.step;
        }
        ticks.reverse();
        ticks
    }
}

/// Everything a chart backend needs to draw one service's history.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub series: ChartSeries,
    pub line: LineStyle,
    pub time_axis: TimeAxis,
    pub value_axis: ValueAxis,
}

impl ChartConfig {
    pub fn new(series: ChartSeries) -> Self {
        Self {
            series,
            line: LineStyle::Stepped,
            time_axis: TimeAxis::default(),
            value_axis: ValueAxis::default(),
        }
    }

    pub fn with_max_ticks(mut self, max_ticks: usize) -> Self {
        self.time_axis.max_ticks = max_ticks;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const T0: i64 = 1_704_067_200_000; // 2024-01-01T00:00:00Z

    #[test]
    fn test_series_from_history() {
        let history = vec![
            HistorySample::new("2024-01-01T00:00:00Z", "online"),
            HistorySample::new("2024-01-01T00:01:00Z", "offline_timeout"),
        ];
        let series = ChartSeries::from_history(&history);

        assert_eq!(
            series.points(),
            &[ChartPoint { x: T0, y: 1.0 }, ChartPoint { x: T0 + 60_000, y: 0.0 }]
        );
        assert_eq!(series.detail(T0 + 60_000).unwrap().as_str(), "offline_timeout");
    }

    #[test]
    fn test_series_accepts_offset_and_fraction() {
        let history = vec![
            HistorySample::new("2024-01-01T00:00:00.250000+00:00", "error_502"),
            HistorySample::new("2024-01-01T02:00:00+02:00", "online"),
        ];
        let series = ChartSeries::from_history(&history);
        assert_eq!(series.points()[0], ChartPoint { x: T0 + 250, y: 0.5 });
        assert_eq!(series.points()[1].x, T0);
    }

    #[test]
    fn test_series_skips_unreadable_timestamps() {
        let history = vec![
            HistorySample::new("yesterday", "online"),
            HistorySample::new("2024-01-01T00:00:00Z", "online"),
        ];
        let series = ChartSeries::from_history(&history);
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_series_preserves_order() {
        let history = vec![
            HistorySample::new("2024-01-01T00:02:00Z", "online"),
            HistorySample::new("2024-01-01T00:01:00Z", "error_500"),
        ];
        let series = ChartSeries::from_history(&history);
        assert_eq!(series.points()[0].x, T0 + 120_000);
        assert_eq!(series.points()[1].x, T0 + 60_000);
    }

    #[test]
    fn test_tooltip_label_formatting() {
        let label = |s: &str| tooltip_label(Some(&StatusCode::from(s)));
        assert_eq!(label("online"), "Online");
        assert_eq!(label("offline_timeout"), "Offline: Timeout");
        assert_eq!(label("offline_conn_error"), "Offline: Conn Error");
        assert_eq!(label("error_503"), "Error: 503");
        assert_eq!(label("checking"), "Checking");
        assert_eq!(label(""), "Unknown");
        assert_eq!(tooltip_label(None), "Unknown");
    }

    #[test]
    fn test_tooltip_uses_detail_lookup() {
        let series = ChartSeries::from_history(&[HistorySample::new(
            "2024-01-01T00:00:00Z",
            "error_500",
        )]);
        let tooltip = series.tooltip_in(&series.points()[0], &Utc);
        assert_eq!(tooltip.title, "Jan 1, 00:00:00");
        assert_eq!(tooltip.label, "Error: 500");

        let stray = ChartPoint { x: T0 + 1, y: 0.0 };
        assert_eq!(series.tooltip_in(&stray, &Utc).label, "Unknown");
    }

    #[test]
    fn test_value_axis_labels() {
        assert_eq!(value_axis_label(1.0), "Online");
        assert_eq!(value_axis_label(0.5), "Error");
        assert_eq!(value_axis_label(0.0), "Offline");
        assert_eq!(value_axis_label(1.2), "");
        assert_eq!(value_axis_label(0.25), "");
    }

    #[test]
    fn test_value_axis_ticks() {
        let ticks = ValueAxis::default().labeled_ticks();
        assert_eq!(ticks, vec![(1.0, "Online"), (0.5, "Error"), (0.0, "Offline")]);
    }

    #[test]
    fn test_segment_colors() {
        assert_eq!(segment_color(1.0).border.to_string(), "rgba(56, 161, 105, 0.7)");
        assert_eq!(segment_color(0.5).fill.to_string(), "rgba(221, 107, 32, 0.1)");
        assert_eq!(segment_color(0.0), segment_color(0.3));
    }

    #[test]
    fn test_tick_indices() {
        let axis = TimeAxis::default();
        assert!(axis.tick_indices(0).is_empty());
        assert_eq!(axis.tick_indices(3), vec![0, 1, 2]);
        assert_eq!(axis.tick_indices(30), vec![0, 7, 14, 21, 29]);

        let single = TimeAxis {
            max_ticks: 1,
            ..Default::default()
        };
        assert_eq!(single.tick_indices(10), vec![0]);
    }

    #[test]
    fn test_ticks_are_formatted() {
        let points = [
            ChartPoint { x: T0, y: 1.0 },
            ChartPoint { x: T0 + 60_000, y: 1.0 },
        ];
        let ticks = TimeAxis::default().ticks_in(&points, &Utc);
        assert_eq!(ticks, vec![(0, "00:00".to_string()), (1, "00:01".to_string())]);
    }

    #[test]
    fn test_changes_marks_transitions() {
        let history = vec![
            HistorySample::new("2024-01-01T00:00:00Z", "online"),
            HistorySample::new("2024-01-01T00:01:00Z", "online"),
            HistorySample::new("2024-01-01T00:02:00Z", "offline_timeout"),
            HistorySample::new("2024-01-01T00:03:00Z", "offline_conn_error"),
            HistorySample::new("2024-01-01T00:04:00Z", "offline_conn_error"),
        ];
        let changes = ChartSeries::from_history(&history).changes();
        let xs: Vec<_> = changes.iter().map(|p| (p.x - T0) / 60_000).collect();
        assert_eq!(xs, vec![0, 2, 3]);
    }

    #[test]
    fn test_chart_config_defaults() {
        let config = ChartConfig::new(ChartSeries::default()).with_max_ticks(3);
        assert_eq!(config.line, LineStyle::Stepped);
        assert_eq!(config.time_axis.max_ticks, 3);
        assert_eq!(config.value_axis.max, 1.2);
    }
}

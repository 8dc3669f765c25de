//! Terminal chart backend.
//!
//! Each chart is rendered once, at construction, into text lines: one row
//! per labeled severity, a time axis, and the most recent state changes with
//! their tooltip text. The lines stay attached to the canvas until the chart
//! is destroyed.

use crate::render::{segment_color, ChartBackend, ChartConfig, Rgba};
use chrono::{Local, TimeZone};
use colored::Colorize;
use std::collections::HashMap;
use std::fmt;

const LABEL_WIDTH: usize = 7;
const LEVEL_CELL: &str = "█";
const FILL_CELL: &str = "░";
const EMPTY_CELL: &str = " ";

/// Options for turning a chart config into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotOptions {
    /// How many recent state changes to list under the chart
    pub recent_changes: usize,
    /// Emit ANSI colors
    pub color: bool,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            recent_changes: 3,
            color: true,
        }
    }
}

fn paint(cell: &str, color: Rgba, enabled: bool) -> String {
    if enabled {
        cell.truecolor(color.r, color.g, color.b).to_string()
    } else {
        cell.to_string()
    }
}

/// Lay out tick labels on a row of `width` columns, dropping labels that
/// would overlap the previous one.
fn tick_row(ticks: &[(usize, String)], width: usize) -> String {
    let mut row = String::new();
    let mut col = 0;
    for (index, label) in ticks {
        if *index < col || *index >= width.max(1) {
            continue;
        }
        row.push_str(&" ".repeat(index - col));
        row.push_str(label);
        col = index + label.chars().count() + 1;
        row.push(' ');
    }
    row.trim_end().to_string()
}

/// Render `config` as text lines, formatting times in `tz`.
///
/// Each sample takes one column, so the x-axis is per sample and not a
/// proportional time scale: a gap in the history draws as adjacent columns.
/// The tick row carries the actual times.
pub fn plot_in<Tz>(config: &ChartConfig, options: PlotOptions, tz: &Tz) -> Vec<String>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let points = config.series.points();
    let mut lines = Vec::new();

    for (value, label) in config.value_axis.labeled_ticks() {
        let mut line = format!("{:>width$} │", label, width = LABEL_WIDTH);
        for point in points {
            let color = segment_color(point.y);
            let cell = if point.y == value {
                paint(LEVEL_CELL, color.border, options.color)
            } else if point.y > value {
                paint(FILL_CELL, color.border, options.color)
            } else {
                EMPTY_CELL.to_string()
            };
            line.push_str(&cell);
        }
        lines.push(line.trim_end().to_string());
    }

    let indent = " ".repeat(LABEL_WIDTH + 1);
    lines.push(format!("{}└{}", indent, "─".repeat(points.len())));

    let ticks = config.time_axis.ticks_in(points, tz);
    let ticks = tick_row(&ticks, points.len());
    if !ticks.is_empty() {
        lines.push(format!("{} {}", indent, ticks));
    }

    let changes = config.series.changes();
    let skip = changes.len().saturating_sub(options.recent_changes);
    for point in &changes[skip..] {
        let tooltip = config.series.tooltip_in(point, tz);
        let label = paint(&tooltip.label, segment_color(point.y).border, options.color);
        lines.push(format!("  {}  {}", tooltip.title, label));
    }

    lines
}

/// Render `config` in local time.
pub fn plot(config: &ChartConfig, options: PlotOptions) -> Vec<String> {
    plot_in(config, options, &Local)
}

/// Handle to a chart drawn by [`TerminalCharts`].
#[derive(Debug)]
pub struct TerminalChart {
    id: u64,
    canvas: String,
}

impl TerminalChart {
    pub fn canvas(&self) -> &str {
        &self.canvas
    }
}

#[derive(Debug)]
struct Plot {
    id: u64,
    lines: Vec<String>,
}

/// Chart backend that renders into text, one plot per canvas id.
#[derive(Debug, Default)]
pub struct TerminalCharts {
    next_id: u64,
    canvases: HashMap<String, Plot>,
    options: PlotOptions,
}

impl TerminalCharts {
    pub fn new(options: PlotOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Rendered lines of the live chart on `canvas`.
    pub fn output(&self, canvas: &str) -> Option<&[String]> {
        self.canvases.get(canvas).map(|plot| plot.lines.as_slice())
    }

    /// Number of live charts.
    pub fn live_count(&self) -> usize {
        self.canvases.len()
    }
}

impl ChartBackend for TerminalCharts {
    type Chart = TerminalChart;

    fn construct(&mut self, canvas: &str, config: &ChartConfig) -> TerminalChart {
        self.next_id += 1;
        let id = self.next_id;
        let lines = plot(config, self.options);
        if let Some(stale) = self.canvases.insert(canvas.to_string(), Plot { id, lines }) {
            tracing::warn!(canvas, stale_id = stale.id, "Chart constructed over a live canvas");
        }
        TerminalChart {
            id,
            canvas: canvas.to_string(),
        }
    }

    fn destroy(&mut self, chart: TerminalChart) {
        if self.canvases.get(&chart.canvas).map(|plot| plot.id) == Some(chart.id) {
            self.canvases.remove(&chart.canvas);
        }
    }
}

//! Chart assembly and output renderers
//!
//! Supports multiple output formats, picked by the output file extension:
//! - `svg`  - Standalone vector chart
//! - `html` - HTML page embedding the SVG chart
//! - `json` - The assembled chart as machine-readable JSON
//!
//! On-screen display draws the same chart in the terminal (see [`terminal`]).

mod html;
mod json;
mod svg;
pub mod terminal;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::config::ChartConfig;
use crate::models::{Dataset, TimeUnit};
use crate::peaks::{select_peaks, PeakFinder, PeakSelection, Point};
use crate::transform::{TransformError, TransformResult};

/// What gets drawn on top of the commit lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Lines plus up/down markers at turning points
    Peak,
    /// Lines only
    Line,
    /// Reserved; currently draws the plain line chart
    Euclidean,
}

impl std::fmt::Display for RenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderMode::Peak => write!(f, "peak"),
            RenderMode::Line => write!(f, "line"),
            RenderMode::Euclidean => write!(f, "euclidean"),
        }
    }
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Html,
    Json,
}

impl OutputFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .ok_or_else(|| {
                anyhow!(
                    "Output file '{}' has no extension. Valid extensions: svg, html, json",
                    path.display()
                )
            })?;
        ext.parse()
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "html" | "htm" => Ok(OutputFormat::Html),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!(
                "Unsupported output format '{}'. Valid extensions: svg, html, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Svg => write!(f, "svg"),
            OutputFormat::Html => write!(f, "html"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// How x positions should be read back into labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    /// Calendar dates (no shift applied)
    Dates,
    /// Relative offsets in time units
    Offsets,
}

/// One plotted line and its optional peak markers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peaks: Option<PeakSelection>,
}

/// Data range covered by every point of a chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    /// Widen zero-width ranges so they can be scaled.
    pub fn padded(self) -> Self {
        let (x_min, x_max) = widen(self.x_min, self.x_max);
        let (y_min, y_max) = widen(self.y_min, self.y_max);
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }
}

fn widen(min: f64, max: f64) -> (f64, f64) {
    if max > min {
        (min, max)
    } else {
        (min - 1.0, max + 1.0)
    }
}

/// A display-ready chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title: String,
    pub mode: RenderMode,
    pub unit: TimeUnit,
    pub axis: AxisKind,
    pub series: Vec<ChartSeries>,
}

impl Chart {
    /// Build a chart from transformed data.
    ///
    /// Every mode draws one line per series; [`RenderMode::Peak`] also asks
    /// `finder` for markers and attaches the selected points.
    pub fn assemble(
        mode: RenderMode,
        dataset: &Dataset,
        finder: &dyn PeakFinder,
        title: impl Into<String>,
    ) -> TransformResult<Self> {
        for series in &dataset.series {
            series.check_shape()?;
        }

        let overlays: Vec<Option<PeakSelection>> = match mode {
            RenderMode::Peak => {
                let markers = finder.find_peaks(dataset);
                if markers.len() != dataset.len() {
                    return Err(TransformError::LengthMismatch {
                        label: "peak markers".to_string(),
                        expected: dataset.len(),
                        actual: markers.len(),
                    });
                }
                dataset
                    .series
                    .iter()
                    .zip(&markers)
                    .map(|(s, m)| select_peaks(s, m).map(Some))
                    .collect::<TransformResult<_>>()?
            }
            RenderMode::Line | RenderMode::Euclidean => vec![None; dataset.len()],
        };

        let series = dataset
            .series
            .iter()
            .zip(overlays)
            .map(|(s, peaks)| ChartSeries {
                label: s.label.clone(),
                points: s.points().map(|(x, y)| Point { x, y }).collect(),
                peaks,
            })
            .collect();

        let axis = if dataset.has_date_keys() {
            AxisKind::Dates
        } else {
            AxisKind::Offsets
        };

        debug!("Assembled {} chart with {} series", mode, dataset.len());
        Ok(Self {
            title: title.into(),
            mode,
            unit: dataset.unit,
            axis,
            series,
        })
    }

    /// Range of all points, or `None` for a chart without data.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut points = self.series.iter().flat_map(|s| s.points.iter());
        let first = points.next()?;
        let init = Bounds {
            x_min: first.x.position(),
            x_max: first.x.position(),
            y_min: first.y,
            y_max: first.y,
        };
        Some(points.fold(init, |b, p| Bounds {
            x_min: b.x_min.min(p.x.position()),
            x_max: b.x_max.max(p.x.position()),
            y_min: b.y_min.min(p.y),
            y_max: b.y_max.max(p.y),
        }))
    }

    pub fn has_peaks(&self) -> bool {
        self.series
            .iter()
            .any(|s| s.peaks.as_ref().is_some_and(|p| !p.is_empty()))
    }

    /// Label for an x position on this chart's axis.
    pub fn x_label(&self, position: f64) -> String {
        match self.axis {
            AxisKind::Dates => NaiveDate::from_num_days_from_ce_opt(position.round() as i32)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            AxisKind::Offsets => format_value(position),
        }
    }

    /// Caption for the x axis.
    pub fn x_caption(&self) -> String {
        match self.axis {
            AxisKind::Dates => "Date".to_string(),
            AxisKind::Offsets => format!("{}s", self.unit),
        }
    }
}

/// Title used for commit-frequency charts.
pub fn commits_title(unit: TimeUnit) -> String {
    format!("Number of commits over time ({}s)", unit)
}

/// Format a number with at most two decimals and no trailing zeros.
pub fn format_value(v: f64) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// `count` evenly spaced values from `min` to `max` inclusive.
pub(crate) fn ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    if count < 2 {
        return vec![min];
    }
    let step = (max - min) / (count - 1) as f64;
    (0..count).map(|i| min + step * i as f64).collect()
}

/// Line colours, cycled per series
pub(crate) const PALETTE: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

pub(crate) const UP_COLOR: &str = "green";
pub(crate) const DOWN_COLOR: &str = "red";

/// Render a chart in the given format
pub fn render(chart: &Chart, format: OutputFormat, config: &ChartConfig) -> Result<String> {
    match format {
        OutputFormat::Svg => svg::render(chart, config),
        OutputFormat::Html => html::render(chart, config),
        OutputFormat::Json => json::render(chart),
    }
}

/// Render a chart to a file, choosing the format from its extension.
pub fn write_file(chart: &Chart, path: &Path, config: &ChartConfig) -> Result<()> {
    let format = OutputFormat::from_path(path)?;
    let content = render(chart, format, config)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("Wrote {} chart to {}", format, path.display());
    Ok(())
}

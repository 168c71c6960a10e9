//! SVG renderer
//!
//! Draws the chart as a standalone SVG document: one polyline per series,
//! triangles for peak markers, a legend in the upper-left corner of the plot
//! area and slanted x labels.

use anyhow::Result;
use std::fmt::Write as _;

use super::{format_value, ticks, Bounds, Chart, DOWN_COLOR, PALETTE, UP_COLOR};
use crate::config::ChartConfig;
use crate::peaks::Point;

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 90.0;
const TICK_COUNT: usize = 6;
const MARKER_SIZE: f64 = 5.0;
const LEGEND_ROW: f64 = 18.0;

/// Maps data coordinates onto the plot area
struct Frame {
    bounds: Bounds,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Frame {
    fn new(bounds: Bounds, config: &ChartConfig) -> Self {
        Self {
            bounds: bounds.padded(),
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: (config.width as f64 - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            height: (config.height as f64 - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
        }
    }

    fn x(&self, v: f64) -> f64 {
        let b = &self.bounds;
        self.left + (v - b.x_min) / (b.x_max - b.x_min) * self.width
    }

    fn y(&self, v: f64) -> f64 {
        let b = &self.bounds;
        self.top + self.height - (v - b.y_min) / (b.y_max - b.y_min) * self.height
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Render chart as SVG
pub fn render(chart: &Chart, config: &ChartConfig) -> Result<String> {
    let mut svg = String::new();
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="12">"#,
        w = config.width,
        h = config.height
    )?;
    writeln!(
        svg,
        r#"<rect width="100%" height="100%" fill="white"/>"#
    )?;
    writeln!(
        svg,
        r#"<text class="title" x="{}" y="28" text-anchor="middle" font-size="16">{}</text>"#,
        config.width as f64 / 2.0,
        xml_escape(&chart.title)
    )?;

    let Some(bounds) = chart.bounds() else {
        writeln!(
            svg,
            r##"<text x="{}" y="{}" text-anchor="middle" fill="#666">No data</text>"##,
            config.width as f64 / 2.0,
            config.height as f64 / 2.0
        )?;
        svg.push_str("</svg>\n");
        return Ok(svg);
    };

    let frame = Frame::new(bounds, config);
    render_axes(&mut svg, chart, &frame)?;

    for (i, series) in chart.series.iter().enumerate() {
        render_line(&mut svg, &series.points, PALETTE[i % PALETTE.len()], &frame)?;
    }

    for series in &chart.series {
        if let Some(peaks) = &series.peaks {
            for p in &peaks.ups {
                render_marker(&mut svg, p, true, &frame)?;
            }
            for p in &peaks.downs {
                render_marker(&mut svg, p, false, &frame)?;
            }
        }
    }

    render_legend(&mut svg, chart, &frame)?;
    svg.push_str("</svg>\n");
    Ok(svg)
}

fn render_axes(svg: &mut String, chart: &Chart, frame: &Frame) -> Result<()> {
    let b = frame.bounds;
    writeln!(
        svg,
        r##"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="#333"/>"##,
        frame.left, frame.top, frame.width, frame.height
    )?;

    for v in ticks(b.y_min, b.y_max, TICK_COUNT) {
        let y = frame.y(v);
        writeln!(
            svg,
            r##"<line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#e0e0e0"/>"##,
            frame.left,
            frame.right()
        )?;
        writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"#,
            frame.left - 6.0,
            y + 4.0,
            format_value(v)
        )?;
    }

    for v in ticks(b.x_min, b.x_max, TICK_COUNT) {
        let x = frame.x(v);
        let y = frame.bottom() + 14.0;
        writeln!(
            svg,
            r##"<line x1="{x:.1}" y1="{:.1}" x2="{x:.1}" y2="{:.1}" stroke="#333"/>"##,
            frame.bottom(),
            frame.bottom() + 4.0
        )?;
        writeln!(
            svg,
            r#"<text x="{x:.1}" y="{y:.1}" text-anchor="end" transform="rotate(-30 {x:.1} {y:.1})">{}</text>"#,
            xml_escape(&chart.x_label(v))
        )?;
    }

    writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
        frame.left + frame.width / 2.0,
        frame.bottom() + MARGIN_BOTTOM - 12.0,
        xml_escape(&chart.x_caption())
    )?;
    Ok(())
}

fn render_line(svg: &mut String, points: &[Point], color: &str, frame: &Frame) -> Result<()> {
    if points.is_empty() {
        return Ok(());
    }
    let coords: Vec<String> = points
        .iter()
        .map(|p| format!("{:.1},{:.1}", frame.x(p.x.position()), frame.y(p.y)))
        .collect();
    writeln!(
        svg,
        r#"<polyline class="series" fill="none" stroke="{}" stroke-width="1.5" points="{}"/>"#,
        color,
        coords.join(" ")
    )?;
    Ok(())
}

fn triangle(cx: f64, cy: f64, up: bool) -> String {
    let s = MARKER_SIZE;
    if up {
        format!("{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}", cx, cy - s, cx - s, cy + s, cx + s, cy + s)
    } else {
        format!("{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}", cx, cy + s, cx - s, cy - s, cx + s, cy - s)
    }
}

fn render_marker(svg: &mut String, point: &Point, up: bool, frame: &Frame) -> Result<()> {
    let (class, color) = if up { ("up", UP_COLOR) } else { ("down", DOWN_COLOR) };
    writeln!(
        svg,
        r#"<polygon class="{}" fill="{}" points="{}"/>"#,
        class,
        color,
        triangle(frame.x(point.x.position()), frame.y(point.y), up)
    )?;
    Ok(())
}

fn render_legend(svg: &mut String, chart: &Chart, frame: &Frame) -> Result<()> {
    let mut entries: Vec<(String, String, Option<bool>)> = chart
        .series
        .iter()
        .enumerate()
        .map(|(i, s)| (s.label.clone(), PALETTE[i % PALETTE.len()].to_string(), None))
        .collect();
    if chart.has_peaks() {
        entries.push(("Up".to_string(), UP_COLOR.to_string(), Some(true)));
        entries.push(("Down".to_string(), DOWN_COLOR.to_string(), Some(false)));
    }
    if entries.is_empty() {
        return Ok(());
    }

    let longest = entries.iter().map(|e| e.0.chars().count()).max().unwrap_or(0);
    let x = frame.left + 10.0;
    let y = frame.top + 10.0;
    writeln!(
        svg,
        r##"<rect class="legend" x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="white" fill-opacity="0.85" stroke="#ccc"/>"##,
        x,
        y,
        longest as f64 * 7.0 + 44.0,
        entries.len() as f64 * LEGEND_ROW + 8.0
    )?;

    for (i, (label, color, marker)) in entries.iter().enumerate() {
        let row = y + 4.0 + LEGEND_ROW * (i as f64 + 0.5);
        match marker {
            Some(up) => writeln!(
                svg,
                r#"<polygon fill="{}" points="{}"/>"#,
                color,
                triangle(x + 18.0, row, *up)
            )?,
            None => writeln!(
                svg,
                r#"<line x1="{:.1}" y1="{row:.1}" x2="{:.1}" y2="{row:.1}" stroke="{}" stroke-width="2"/>"#,
                x + 6.0,
                x + 30.0,
                color
            )?,
        }
        writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}">{}</text>"#,
            x + 36.0,
            row + 4.0,
            xml_escape(label)
        )?;
    }
    Ok(())
}

pub(super) fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

//! HTML renderer
//!
//! Generates a standalone page with the SVG chart and a per-series summary
//! table. Opens in any browser without network access.

use anyhow::Result;
use chrono::Local;

use super::svg::{self, xml_escape};
use super::{format_value, Chart, ChartSeries};
use crate::config::ChartConfig;

/// Render chart as standalone HTML
pub fn render(chart: &Chart, config: &ChartConfig) -> Result<String> {
    let mut html = String::new();

    html.push_str(&render_head(chart));
    html.push_str("<body>\n<div class=\"container\">\n");
    html.push_str(&render_header(chart));

    html.push_str("<div class=\"chart\">\n");
    html.push_str(&svg::render(chart, config)?);
    html.push_str("</div>\n");

    html.push_str(&render_summary(chart));
    html.push_str("</div>\n</body>\n</html>\n");

    Ok(html)
}

fn render_head(chart: &Chart) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
    <style>
{CSS}
    </style>
</head>
"#,
        xml_escape(&chart.title)
    )
}

fn render_header(chart: &Chart) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!(
        r#"<div class="header">
    <h1>{}</h1>
    <p class="timestamp">Generated {} &middot; {} mode</p>
</div>
"#,
        xml_escape(&chart.title),
        timestamp,
        chart.mode
    )
}

fn render_summary(chart: &Chart) -> String {
    let mut rows = String::new();
    for series in &chart.series {
        rows.push_str(&render_row(chart, series));
    }

    format!(
        r#"<table class="summary">
    <thead><tr><th>Repository</th><th>From</th><th>To</th><th>Points</th><th>Max</th><th>Ups</th><th>Downs</th></tr></thead>
    <tbody>
{}    </tbody>
</table>
"#,
        rows
    )
}

fn render_row(chart: &Chart, series: &ChartSeries) -> String {
    let from = series.points.first().map(|p| chart.x_label(p.x.position()));
    let to = series.points.last().map(|p| chart.x_label(p.x.position()));
    let max = series.points.iter().map(|p| p.y).fold(None, |m: Option<f64>, y| {
        Some(m.map_or(y, |m| m.max(y)))
    });
    let (ups, downs) = series
        .peaks
        .as_ref()
        .map(|p| (p.ups.len().to_string(), p.downs.len().to_string()))
        .unwrap_or_else(|| ("-".to_string(), "-".to_string()));

    format!(
        "        <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        xml_escape(&series.label),
        from.unwrap_or_else(|| "-".to_string()),
        to.unwrap_or_else(|| "-".to_string()),
        series.points.len(),
        max.map(format_value).unwrap_or_else(|| "-".to_string()),
        ups,
        downs
    )
}

// Embedded CSS
const CSS: &str = r#"
body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    color: #1e293b;
    background: #f8fafc;
    padding: 2rem;
}

.container {
    max-width: 1100px;
    margin: 0 auto;
    background: white;
    border-radius: 12px;
    box-shadow: 0 4px 6px -1px rgba(0,0,0,0.1);
    padding: 1.5rem 2rem;
}

.header h1 {
    font-size: 1.4rem;
    margin: 0;
}

.timestamp {
    color: #64748b;
    font-size: 0.85rem;
}

.chart svg {
    max-width: 100%;
    height: auto;
}

table.summary {
    border-collapse: collapse;
    width: 100%;
    margin-top: 1.5rem;
    font-size: 0.9rem;
}

table.summary th, table.summary td {
    border-bottom: 1px solid #e2e8f0;
    padding: 0.4rem 0.6rem;
    text-align: left;
}
"#;

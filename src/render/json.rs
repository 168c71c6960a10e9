//! JSON renderer
//!
//! Outputs the assembled chart as pretty-printed JSON.
//! Useful for piping to jq or plotting with another tool.

use super::Chart;
use anyhow::Result;

/// Render chart as JSON
pub fn render(chart: &Chart) -> Result<String> {
    Ok(serde_json::to_string_pretty(chart)?)
}

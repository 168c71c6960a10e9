//! Plot configuration support
//!
//! Loads configuration from an explicit `--config` file, `commitplot.toml` in
//! the current directory, or the user config directory, in that order.
//!
//! # Configuration Format
//!
//! ```toml
//! # commitplot.toml
//!
//! [history]
//! max_commits = 0        # 0 = unlimited
//! first_parent = false
//!
//! [normalise]
//! on_constant = "zero"   # zero | error
//!
//! [chart]
//! width = 960
//! height = 540
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::transform::DegeneratePolicy;

/// File name looked up in the current directory
pub const CONFIG_FILE_NAME: &str = "commitplot.toml";

/// Example written by `commitplot init`
pub const EXAMPLE_CONFIG: &str = r#"# commitplot configuration

[history]
# Stop after this many commits per repository (0 = unlimited)
max_commits = 0

# Only follow the first parent of merge commits
first_parent = false

[normalise]
# What --norm does with a series whose values are all equal: "zero" or "error"
on_constant = "zero"

[chart]
# Size of SVG/HTML output in pixels
width = 960
height = 540
"#;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct PlotConfig {
    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub normalise: NormaliseConfig,

    #[serde(default)]
    pub chart: ChartConfig,
}

/// How repository history is walked
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct HistoryConfig {
    /// Maximum commits read per repository (0 = unlimited)
    #[serde(default)]
    pub max_commits: usize,

    /// Follow only the first parent of merges
    #[serde(default)]
    pub first_parent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct NormaliseConfig {
    #[serde(default)]
    pub on_constant: DegeneratePolicy,
}

/// Dimensions of file output
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChartConfig {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_width() -> u32 {
    960
}

fn default_height() -> u32 {
    540
}

/// Get the user config file path
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("commitplot").join("config.toml"))
}

/// Load configuration.
///
/// An explicit path must exist and parse. Implicit files that fail to parse
/// are reported and skipped.
pub fn load_plot_config(explicit: Option<&Path>) -> Result<PlotConfig> {
    resolve_config(explicit, Path::new("."), user_config_path().as_deref())
}

fn resolve_config(
    explicit: Option<&Path>,
    search_dir: &Path,
    user_path: Option<&Path>,
) -> Result<PlotConfig> {
    if let Some(path) = explicit {
        let config = load_toml_config(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        return Ok(config);
    }

    let local = search_dir.join(CONFIG_FILE_NAME);
    let candidates = std::iter::once(local.as_path()).chain(user_path);
    for path in candidates {
        if !path.exists() {
            continue;
        }
        match load_toml_config(path) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                return Ok(config);
            }
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
            }
        }
    }

    debug!("No config found, using defaults");
    Ok(PlotConfig::default())
}

/// Load configuration from a TOML file
fn load_toml_config(path: &Path) -> Result<PlotConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: PlotConfig = toml::from_str(&content)?;
    Ok(config)
}

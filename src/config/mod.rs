//! Configuration module for commitplot
//!
//! This module handles:
//! - Plot configuration files (commitplot.toml)
//! - History walking limits
//! - Normalisation policy for constant series
//! - Chart dimensions for file output

mod plot_config;

pub use plot_config::{
    ChartConfig,
    HistoryConfig,
    NormaliseConfig,
    PlotConfig,
    CONFIG_FILE_NAME,
    EXAMPLE_CONFIG,
    load_plot_config,
    user_config_path,
};

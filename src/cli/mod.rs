//! CLI command definitions and handlers

mod init;
mod plot;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::render::RenderMode;

/// Commitplot - commit frequency charts for git repositories
#[derive(Parser, Debug)]
#[command(name = "commitplot")]
#[command(
    version,
    about = "Plot commit frequencies of git repositories over time",
    after_help = "\
Examples:
  commitplot line . -t week                       Weekly commits of the current repo
  commitplot peak repo-a repo-b -t month --norm   Compare two repos with turning points
  commitplot line . -t day --acc --shift left     Cumulative commits from the first day
  commitplot line . -t month --hide -o chart.svg  Write an SVG without showing the chart"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Configuration file (default: ./commitplot.toml, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Plot commit frequencies with up/down markers at turning points
    Peak(PlotArgs),

    /// Plot commit frequencies as plain lines
    Line(PlotArgs),

    /// Reserved mode; currently plots plain lines
    Euclidean(PlotArgs),

    /// Write an example commitplot.toml to the current directory
    Init {
        /// Overwrite an existing commitplot.toml
        #[arg(long)]
        force: bool,
    },
}

/// Options shared by every plotting command
#[derive(Args, Debug, Clone)]
pub struct PlotArgs {
    /// Repository paths to read commits from
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<String>,

    /// Time unit commits are bucketed by
    #[arg(long, short = 't', value_parser = ["day", "week", "month", "year"])]
    pub timeunit: String,

    /// Do not show the chart on screen
    #[arg(long)]
    pub hide: bool,

    /// Write the chart to a file; the extension picks the format (svg, html, json)
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,

    /// Anchor every series at its first (left) or last (right) bucket
    #[arg(long, value_parser = ["left", "right"])]
    pub shift: Option<String>,

    /// Normalise values into [0, 1]
    #[arg(long)]
    pub norm: bool,

    /// Accumulate values over time
    #[arg(long)]
    pub acc: bool,
}

/// Run the CLI
pub fn run(cli: Cli) -> Result<()> {
    let config = cli.config.as_deref();
    let (mode, args) = match cli.command {
        Commands::Init { force } => return init::run(std::path::Path::new("."), force),
        Commands::Peak(args) => (RenderMode::Peak, args),
        Commands::Line(args) => (RenderMode::Line, args),
        Commands::Euclidean(args) => (RenderMode::Euclidean, args),
    };
    plot::run(mode, &args, config)
}

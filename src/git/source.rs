//! Commit-count series from repository history

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, TimeZone};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use super::CommitHistory;
use crate::config::HistoryConfig;
use crate::models::{Dataset, Keys, Series, TimeUnit};

/// Anything that can produce commit-frequency series for a list of ids.
pub trait CommitSource {
    /// One series per id, in the order the ids were given.
    fn get_commit_frequencies(&self, ids: &[String], unit: TimeUnit) -> Result<Dataset>;
}

/// Reads commit frequencies from local git repositories; each id is a path.
pub struct GitCommitSource {
    config: HistoryConfig,
}

impl GitCommitSource {
    pub fn new(config: HistoryConfig) -> Self {
        Self { config }
    }

    fn read_series(&self, id: &str, unit: TimeUnit, spinner: &ProgressBar) -> Result<Series> {
        spinner.set_message(format!("Reading history of {}...", id));
        let history = CommitHistory::open(Path::new(id))
            .with_context(|| format!("Cannot read commits for '{}'", id))?;
        let dates = history.commit_dates(&self.config)?;
        let series = commit_frequencies(id, &dates, unit);
        spinner.finish_with_message(format!(
            "{}{}: {} commits in {} {}s",
            style("✓ ").green(),
            style(id).cyan(),
            style(dates.len()).bold(),
            series.len(),
            unit
        ));
        Ok(series)
    }
}

impl CommitSource for GitCommitSource {
    fn get_commit_frequencies(&self, ids: &[String], unit: TimeUnit) -> Result<Dataset> {
        let mut series = Vec::with_capacity(ids.len());
        for id in ids {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(create_spinner_style());
            spinner.enable_steady_tick(Duration::from_millis(100));
            let result = self.read_series(id, unit, &spinner);
            if result.is_err() {
                spinner.finish_and_clear();
            }
            series.push(result?);
        }
        info!("Loaded commit frequencies for {} repositories", series.len());
        Ok(Dataset::new(unit, series))
    }
}

/// Count commits per bucket, filling every bucket between the first and last
/// commit so the series has no gaps.
///
/// Each commit lands in the bucket of its date in its own time zone.
pub fn commit_frequencies<Tz: TimeZone>(
    label: &str,
    dates: &[DateTime<Tz>],
    unit: TimeUnit,
) -> Series {
    let mut counts: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for date in dates {
        *counts.entry(unit.bucket(date.date_naive())).or_insert(0.0) += 1.0;
    }

    let (first, last) = match (counts.keys().next(), counts.keys().next_back()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Series::new(label, Keys::Dates(Vec::new()), Vec::new()),
    };

    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut bucket = Some(first);
    while let Some(current) = bucket.filter(|b| *b <= last) {
        x.push(current);
        y.push(counts.get(&current).copied().unwrap_or(0.0));
        bucket = unit.next(current);
    }

    debug!("{}: {} commits over {} buckets", label, dates.len(), x.len());
    Series::new(label, Keys::Dates(x), y)
}

/// Create spinner progress style
fn create_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

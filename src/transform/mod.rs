//! Series transformer
//!
//! Turns raw per-repository commit counts into display-ready series. Three
//! independent steps are available and always run in this order when enabled:
//!
//! 1. accumulate - running total of the counts
//! 2. normalise  - rescale each series onto `[0, 1]`
//! 3. shift      - rebase the x-axis to offsets from the first or last key
//!
//! # Example
//!
//! ```
//! use commitplot::models::{Dataset, Keys, Series, TimeUnit};
//! use commitplot::transform::{process, ShiftDirection, TransformOptions};
//!
//! let data = Dataset::new(
//!     TimeUnit::Day,
//!     vec![Series::new("repo", Keys::Offsets(vec![3, 4, 5]), vec![1.0, 2.0, 3.0])],
//! );
//! let opts = TransformOptions {
//!     accumulate: true,
//!     shift: ShiftDirection::Left,
//!     ..Default::default()
//! };
//! let out = process(&data, &opts).unwrap();
//! assert_eq!(out.series[0].y, vec![1.0, 3.0, 6.0]);
//! assert_eq!(out.series[0].x, Keys::Offsets(vec![0, 1, 2]));
//! ```

mod ops;

pub use ops::{accumulate, normalise, shift};

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use crate::models::Dataset;

/// Errors raised while validating or transforming series data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Length mismatch in '{label}': expected {expected} values, found {actual}")]
    LengthMismatch {
        label: String,
        expected: usize,
        actual: usize,
    },

    #[error("Cannot normalise '{label}': all values are equal")]
    DegenerateRange { label: String },
}

pub type TransformResult<T> = Result<T, TransformError>;

/// Which end of each series the x-axis is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftDirection {
    /// Keep calendar dates
    #[default]
    None,
    /// First key of every series becomes 0
    Left,
    /// Last key of every series becomes 0
    Right,
}

impl ShiftDirection {
    /// Parse an optional `--shift` value; absent means no shift.
    pub fn from_flag(value: Option<&str>) -> TransformResult<Self> {
        value.map_or(Ok(ShiftDirection::None), str::parse)
    }
}

impl FromStr for ShiftDirection {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(ShiftDirection::None),
            "left" => Ok(ShiftDirection::Left),
            "right" => Ok(ShiftDirection::Right),
            _ => Err(TransformError::InvalidConfiguration(format!(
                "unknown shift direction '{}'. Valid values: left, right",
                s
            ))),
        }
    }
}

impl std::fmt::Display for ShiftDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShiftDirection::None => write!(f, "none"),
            ShiftDirection::Left => write!(f, "left"),
            ShiftDirection::Right => write!(f, "right"),
        }
    }
}

/// What normalisation does with a series whose values are all equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegeneratePolicy {
    /// Map every value to 0
    #[default]
    Zero,
    /// Fail with [`TransformError::DegenerateRange`]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransformOptions {
    pub accumulate: bool,
    pub normalise: bool,
    pub shift: ShiftDirection,
    pub on_constant: DegeneratePolicy,
}

/// Apply the enabled transforms to every series, returning a new dataset.
///
/// All series are shape-checked before anything is computed, so a malformed
/// series aborts the whole batch.
pub fn process(dataset: &Dataset, options: &TransformOptions) -> TransformResult<Dataset> {
    for series in &dataset.series {
        series.check_shape()?;
    }

    let mut out = Vec::with_capacity(dataset.series.len());
    for series in &dataset.series {
        let mut series = series.clone();
        if options.accumulate {
            series.y = accumulate(&series.y);
        }
        if options.normalise {
            series.y = normalise(&series.label, &series.y, options.on_constant)?;
        }
        if options.shift != ShiftDirection::None {
            series.x = shift(&series.x, dataset.unit, options.shift);
        }
        debug!(
            "Transformed '{}' ({} points, {:?})",
            series.label,
            series.len(),
            options
        );
        out.push(series);
    }

    Ok(Dataset::new(dataset.unit, out))
}

//! Peak overlays
//!
//! A peak finder classifies every point of a series with a marker: `1` for an
//! upward turn (local maximum), `-1` for a downward turn (local minimum) and
//! `0` otherwise. [`select_peaks`] turns those markers into the points drawn
//! as up and down triangles on the chart.

use serde::{Deserialize, Serialize};

use crate::models::{Dataset, Key, Series};
use crate::transform::{TransformError, TransformResult};

pub const UP: i8 = 1;
pub const DOWN: i8 = -1;

/// A single chart point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: Key,
    pub y: f64,
}

/// Points to mark on one series, in series order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PeakSelection {
    pub ups: Vec<Point>,
    pub downs: Vec<Point>,
}

impl PeakSelection {
    pub fn is_empty(&self) -> bool {
        self.ups.is_empty() && self.downs.is_empty()
    }
}

/// Pick the points whose marker is [`UP`] or [`DOWN`].
pub fn select_peaks(series: &Series, markers: &[i8]) -> TransformResult<PeakSelection> {
    series.check_shape()?;
    if markers.len() != series.y.len() {
        return Err(TransformError::LengthMismatch {
            label: series.label.clone(),
            expected: series.y.len(),
            actual: markers.len(),
        });
    }

    let mut selection = PeakSelection::default();
    for ((x, y), marker) in series.points().zip(markers) {
        match *marker {
            UP => selection.ups.push(Point { x, y }),
            DOWN => selection.downs.push(Point { x, y }),
            _ => {}
        }
    }
    Ok(selection)
}

/// Source of per-point peak markers for a dataset.
pub trait PeakFinder {
    /// One marker sequence per series, each as long as its series.
    fn find_peaks(&self, dataset: &Dataset) -> Vec<Vec<i8>>;
}

/// Marks strict local extrema: a point higher than both neighbours is an up
/// turn, one lower than both is a down turn. Endpoints are never marked.
#[derive(Debug, Clone, Copy, Default)]
pub struct TurningPoints;

impl TurningPoints {
    fn markers(values: &[f64]) -> Vec<i8> {
        let mut markers = vec![0; values.len()];
        for i in 1..values.len().saturating_sub(1) {
            let (prev, cur, next) = (values[i - 1], values[i], values[i + 1]);
            if prev < cur && cur > next {
                markers[i] = UP;
            } else if prev > cur && cur < next {
                markers[i] = DOWN;
            }
        }
        markers
    }
}

impl PeakFinder for TurningPoints {
    fn find_peaks(&self, dataset: &Dataset) -> Vec<Vec<i8>> {
        dataset.series.iter().map(|s| Self::markers(&s.y)).collect()
    }
}

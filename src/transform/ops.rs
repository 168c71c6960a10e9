//! The individual series transforms.

use crate::models::{Keys, TimeUnit};

use super::{DegeneratePolicy, ShiftDirection, TransformError, TransformResult};

/// Running total: `out[i] = values[0] + ... + values[i]`.
pub fn accumulate(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |total, v| {
            *total += v;
            Some(*total)
        })
        .collect()
}

/// Rescale linearly so the minimum maps to 0 and the maximum to 1.
///
/// Empty input is returned as is. A constant series has no well-defined
/// rescaling and is handled according to `on_constant`.
pub fn normalise(
    label: &str,
    values: &[f64],
    on_constant: DegeneratePolicy,
) -> TransformResult<Vec<f64>> {
    if values.is_empty() {
        return Ok(Vec::new());
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if range == 0.0 {
        return match on_constant {
            DegeneratePolicy::Zero => Ok(vec![0.0; values.len()]),
            DegeneratePolicy::Error => Err(TransformError::DegenerateRange {
                label: label.to_string(),
            }),
        };
    }

    Ok(values.iter().map(|v| (v - min) / range).collect())
}

/// Rebase keys onto integer offsets from the first (left) or last (right) key.
///
/// Date keys are measured in `unit`; offset keys are plain differences, which
/// makes a repeated left shift a no-op.
pub fn shift(keys: &Keys, unit: TimeUnit, direction: ShiftDirection) -> Keys {
    match (direction, keys) {
        (ShiftDirection::None, _) => keys.clone(),
        (_, Keys::Dates(dates)) => {
            let anchor = match direction {
                ShiftDirection::Right => dates.last(),
                _ => dates.first(),
            };
            match anchor {
                Some(&anchor) => {
                    Keys::Offsets(dates.iter().map(|d| unit.offset(anchor, *d)).collect())
                }
                None => Keys::Offsets(Vec::new()),
            }
        }
        (_, Keys::Offsets(offsets)) => {
            let anchor = match direction {
                ShiftDirection::Right => offsets.last(),
                _ => offsets.first(),
            };
            match anchor {
                Some(&anchor) => Keys::Offsets(offsets.iter().map(|o| o - anchor).collect()),
                None => Keys::Offsets(Vec::new()),
            }
        }
    }
}

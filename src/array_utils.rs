//! Small numeric helpers over 1-D `ndarray` arrays.

use itertools::Itertools;
use ndarray::{Array1, ArrayView1};

/// Median of the values, averaging the two central elements for even lengths.
/// An empty input yields NaN; callers guard against empty series.
pub(crate) fn median(values: ArrayView1<f64>) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let sorted = values
        .iter()
        .copied()
        .sorted_by(|a, b| a.partial_cmp(b).expect("found nan"))
        .collect_vec();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        0.5 * (sorted[mid - 1] + sorted[mid])
    } else {
        sorted[mid]
    }
}

/// Clamp all negative entries to zero in place.
pub(crate) fn clamp_negative(values: &mut Array1<f64>) {
    values.mapv_inplace(|x| if x < 0.0 { 0.0 } else { x });
}

/// Peak-to-trough range `max - min`, or zero for an empty array.
pub(crate) fn peak_to_trough(values: ArrayView1<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    max - min
}

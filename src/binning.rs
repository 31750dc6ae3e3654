//! Reusable binning utilities: fixed-count equal-width bins and
//! rank-based equal-frequency groups.

use std::cmp::Ordering;

/// Assign each value to one of `n_bins` equal-width bins spanning the
/// observed range.
///
/// Bins are right-closed; the lowest edge is treated as extended below the
/// observed minimum so that the minimum lands in bin 0 and the maximum in
/// bin `n_bins - 1`. Every value falls in exactly one bin.
///
/// If all values are identical the range has zero width and every value is
/// placed in the centre bin (`n_bins / 2`).
///
/// Returns one bin index (ascending with value) per input value, in input
/// order. An empty input yields an empty output.
pub fn equal_width_bins(values: &[f64], n_bins: usize) -> Vec<usize> {
    assert!(n_bins > 0, "bin count must be positive");

    if values.is_empty() {
        return Vec::new();
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &value in values {
        min = min.min(value);
        max = max.max(value);
    }

    if min == max {
        return vec![n_bins / 2; values.len()];
    }

    let width = (max - min) / n_bins as f64;
    values
        .iter()
        .map(|&value| {
            if value <= min {
                return 0;
            }
            let index = ((value - min) / width).ceil() as usize - 1;
            index.min(n_bins - 1)
        })
        .collect()
}

/// Assign each value to one of `groups` rank-ordered groups of
/// as-equal-as-possible size.
///
/// Rows are stably sorted by value; ascending groups receive consecutive
/// runs of the sorted order, with earlier groups taking the remainder when
/// the row count does not divide evenly. Equal values at a group boundary
/// may land in different groups.
///
/// Returns one group index (0 = lowest values) per input value, in input
/// order.
pub fn quantile_groups(values: &[f64], groups: usize) -> Vec<usize> {
    assert!(groups > 0, "group count must be positive");

    let n = values.len();
    if n == 0 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));

    let base = n / groups;
    let remainder = n % groups;

    let mut assignment = vec![0usize; n];
    let mut start = 0;
    for group in 0..groups {
        let size = base + usize::from(group < remainder);
        for &row in &order[start..start + size] {
            assignment[row] = group;
        }
        start += size;
    }
    assignment
}

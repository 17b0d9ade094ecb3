use itertools::{Itertools, MinMaxResult};
use std::cmp::Ordering;

use crate::errors::{ErrorKind, GeosiftError, GeosiftResult};

use super::config::BreakMethod;

/// Computes class breaks over a numeric sequence.
///
/// The output is exactly `break_count` ascending `[min, max]` pairs covering
/// the full value range with no gaps. The input order does not affect the
/// result beyond establishing a deterministic sort for tied values.
///
/// # Arguments
///
/// * `values` - The normalized numeric sequence (see
///   [extract_values](super::extract_values))
/// * `method` - The binning algorithm
/// * `break_count` - Number of classes, at least 1
///
/// # Returns
///
/// The break pairs, or a `ValidationError` for a zero break count, or a
/// `DataError` for an empty sequence.
pub fn classify(
    values: &[f64],
    method: BreakMethod,
    break_count: usize,
) -> GeosiftResult<Vec<[f64; 2]>> {
    if break_count < 1 {
        log::error!("Break count must be at least 1, got {}", break_count);
        return Err(GeosiftError::new(
            "break count must be at least 1",
            ErrorKind::ValidationError,
        ));
    }

    let (min, max) = match values.iter().cloned().minmax() {
        MinMaxResult::NoElements => {
            log::error!("Cannot classify an empty numeric set");
            return Err(GeosiftError::new(
                "cannot classify an empty numeric set",
                ErrorKind::DataError,
            ));
        }
        MinMaxResult::OneElement(v) => (v, v),
        MinMaxResult::MinMax(min, max) => (min, max),
    };

    let breaks = match method {
        BreakMethod::EqualInterval => equal_interval_breaks(min, max, break_count),
        BreakMethod::Quantile => quantile_breaks(&ascending(values), break_count),
        BreakMethod::NaturalBreaks => natural_breaks(&ascending(values), break_count),
        BreakMethod::StandardDeviation => {
            standard_deviation_breaks(values, min, max, break_count)
        }
    };

    log::debug!(
        "Classified {} values into {} {:?} breaks",
        values.len(),
        break_count,
        method
    );
    Ok(breaks)
}

fn ascending(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Constant-width bins.
///
/// Edges are accumulated by repeated addition of the width, matching the
/// arithmetic of the reference feature service, and the final edge is forced
/// to exactly `max` to eliminate floating-point drift at the top of the
/// range.
fn equal_interval_breaks(min: f64, max: f64, break_count: usize) -> Vec<[f64; 2]> {
    let width = (max - min) / break_count as f64;
    let mut edges = Vec::with_capacity(break_count + 1);
    edges.push(min);
    for i in 0..break_count {
        let next = edges[i] + width;
        edges.push(next);
    }
    edges[break_count] = max;

    (0..break_count).map(|i| [edges[i], edges[i + 1]]).collect()
}

/// Equal record counts per bin.
///
/// The sorted sequence is split into `break_count` contiguous groups as
/// evenly sized as possible, with any remainder distributed to the earliest
/// groups. Adjacent breaks may share a boundary value when duplicates sit on
/// a partition edge. With more classes than values, the trailing classes
/// collapse onto the maximum value.
fn quantile_breaks(sorted: &[f64], break_count: usize) -> Vec<[f64; 2]> {
    let n = sorted.len();
    let base = n / break_count;
    let remainder = n % break_count;

    let mut pairs = Vec::with_capacity(break_count);
    let mut start = 0usize;
    for i in 0..break_count {
        let size = base + usize::from(i < remainder);
        if size == 0 {
            let v = sorted[n - 1];
            pairs.push([v, v]);
            continue;
        }
        let end = start + size;
        pairs.push([sorted[start], sorted[end - 1]]);
        start = end;
    }
    pairs
}

/// Jenks natural-breaks optimization.
///
/// Classic dynamic program over the sorted values choosing the contiguous
/// partition that minimizes the total within-class sum of squared deviations
/// from each class mean. Classes holding a single repeated value collapse to
/// `[v, v]`.
fn natural_breaks(sorted: &[f64], break_count: usize) -> Vec<[f64; 2]> {
    let n = sorted.len();
    if n <= break_count {
        // one value per class, trailing classes pinned to the maximum
        let mut pairs: Vec<[f64; 2]> = sorted.iter().map(|&v| [v, v]).collect();
        let top = sorted[n - 1];
        pairs.resize(break_count, [top, top]);
        return pairs;
    }

    // lower_class_limits[l][j] holds the 1-based index of the lowest value
    // assigned to class j in an optimal partition of the first l values
    let mut lower_class_limits = vec![vec![0usize; break_count + 1]; n + 1];
    let mut variance_combinations = vec![vec![0.0f64; break_count + 1]; n + 1];

    for j in 1..=break_count {
        lower_class_limits[1][j] = 1;
        variance_combinations[1][j] = 0.0;
        for l in 2..=n {
            variance_combinations[l][j] = f64::INFINITY;
        }
    }

    for l in 2..=n {
        let mut sum = 0.0;
        let mut sum_squares = 0.0;
        let mut w = 0.0;
        let mut variance = 0.0;

        for m in 1..=l {
            let lower = l - m + 1;
            let value = sorted[lower - 1];
            w += 1.0;
            sum += value;
            sum_squares += value * value;
            variance = sum_squares - (sum * sum) / w;

            if lower != 1 {
                for j in 2..=break_count {
                    let candidate = variance + variance_combinations[lower - 1][j - 1];
                    if candidate <= variance_combinations[l][j] {
                        lower_class_limits[l][j] = lower;
                        variance_combinations[l][j] = candidate;
                    }
                }
            }
        }

        lower_class_limits[l][1] = 1;
        variance_combinations[l][1] = variance;
    }

    // walk back from the full set to recover each class extent
    let mut pairs = vec![[0.0, 0.0]; break_count];
    let mut upper = n;
    for j in (1..=break_count).rev() {
        let lower = if j > 1 { lower_class_limits[upper][j] } else { 1 };
        pairs[j - 1] = [sorted[lower - 1], sorted[upper - 1]];
        if j > 1 {
            upper = lower - 1;
        }
    }
    pairs
}

/// Classes centered on the mean at standard-deviation increments.
///
/// Interior edges sit at `mean + k * sd` for `k` symmetric around zero,
/// clamped to the observed range and kept non-decreasing; the outermost
/// edges are pinned to the observed minimum and maximum so the classes
/// always cover the full range.
fn standard_deviation_breaks(
    values: &[f64],
    min: f64,
    max: f64,
    break_count: usize,
) -> Vec<[f64; 2]> {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    let sd = variance.sqrt();

    let half = break_count as f64 / 2.0;
    let mut edges = Vec::with_capacity(break_count + 1);
    edges.push(min);
    for i in 1..break_count {
        let edge = mean + (i as f64 - half) * sd;
        let floor = edges[i - 1];
        edges.push(edge.clamp(min, max).max(floor));
    }
    edges.push(max);

    (0..break_count).map(|i| [edges[i], edges[i + 1]]).collect()
}

//! Per-transcript error metrics and the descriptive statistics used to
//! summarise them.

use crate::error::CompareError;

/// Symmetric relative difference, bounded in `[-2, 2]` for non-negative input.
///
/// Defined as 0 when both values are 0.
pub fn rel_diff(x: f64, y: f64) -> f64 {
    if x == 0.0 && y == 0.0 {
        return 0.0;
    }
    2.0 * (x - y) / (x + y).abs()
}

/// Relative error of `x` with respect to `y`; `None` when `y` is 0.
pub fn rel_err(x: f64, y: f64) -> Option<f64> {
    if y == 0.0 { None } else { Some((x - y) / y) }
}

fn check_lengths(oracle: &[f64], estimate: &[f64]) -> Result<(), CompareError> {
    if oracle.len() != estimate.len() {
        return Err(CompareError::LengthMismatch { oracle: oracle.len(), estimate: estimate.len() });
    }
    Ok(())
}

/// `rel_diff(estimate, oracle)` for each pair.
pub fn relative_differences(oracle: &[f64], estimate: &[f64]) -> Result<Vec<f64>, CompareError> {
    check_lengths(oracle, estimate)?;
    Ok(oracle.iter().zip(estimate).map(|(&o, &e)| rel_diff(e, o)).collect())
}

/// `rel_err(estimate, oracle)` for each pair; missing where the oracle is 0.
pub fn relative_errors(oracle: &[f64], estimate: &[f64]) -> Result<Vec<Option<f64>>, CompareError> {
    check_lengths(oracle, estimate)?;
    Ok(oracle.iter().zip(estimate).map(|(&o, &e)| rel_err(e, o)).collect())
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median, averaging the two middle values for even lengths. NaNs are ignored.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Pearson correlation; `None` for fewer than two points, zero variance or
/// non-finite input.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<Option<f64>, CompareError> {
    check_lengths(x, y)?;
    if x.len() < 2 {
        return Ok(None);
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let (mut num, mut denom_x, mut denom_y) = (0.0, 0.0, 0.0);
    for (&xx, &yy) in x.iter().zip(y) {
        let dx = xx - mean_x;
        let dy = yy - mean_y;
        num += dx * dy;
        denom_x += dx * dx;
        denom_y += dy * dy;
    }

    let denom = denom_x.sqrt() * denom_y.sqrt();
    if denom == 0.0 {
        return Ok(None);
    }
    let r = num / denom;
    Ok(r.is_finite().then_some(r))
}

/// Spearman rank correlation with average ranks for ties.
pub fn spearman(x: &[f64], y: &[f64]) -> Result<Option<f64>, CompareError> {
    check_lengths(x, y)?;
    pearson(&rank(x), &rank(y))
}

/// 1-based ranks; tied values share the mean of their positions.
pub fn rank(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i + 1;
        while j < order.len() && values[order[j]] == values[order[i]] {
            j += 1;
        }
        let avg_rank = ((i + 1) + j) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = avg_rank;
        }
        i = j;
    }
    ranks
}

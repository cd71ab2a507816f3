//! MPdist: a matrix-profile-derived distance between two time series.
//!
//! Both series are decomposed into z-normalized subsequences of a fixed
//! window length; the distance is the k-th smallest value of the
//! concatenated A-to-B and B-to-A nearest-neighbor distance profiles,
//! which makes the measure robust to length differences and partial
//! matches (Gharghabi et al., "Matrix Profile XII: MPdist", 2018).

use crate::error::{MtsError, Result};

/// Default percentile for the k-th smallest profile value.
pub const DEFAULT_PERCENTAGE: f64 = 0.05;

/// Compute the MPdist between `a` and `b` with subsequence window `m`.
///
/// `k = ceil(percentage * (|a| + |b|))`, capped at the last profile index.
/// Fails with [`MtsError::InvalidParameter`] for a window below 2 or a
/// percentage outside `(0, 1]`, and [`MtsError::InsufficientData`] when a
/// series is shorter than the window.
pub fn mpdist(a: &[f64], b: &[f64], m: usize, percentage: f64) -> Result<f64> {
    if m < 2 {
        return Err(MtsError::InvalidParameter(format!(
            "subsequence window must be at least 2, got {m}"
        )));
    }
    if !(percentage > 0.0 && percentage <= 1.0) {
        return Err(MtsError::InvalidParameter(format!(
            "percentage must be in (0, 1], got {percentage}"
        )));
    }
    let shortest = a.len().min(b.len());
    if shortest < m {
        return Err(MtsError::InsufficientData {
            needed: m,
            got: shortest,
        });
    }

    let subs_a = znormalized_subsequences(a, m);
    let subs_b = znormalized_subsequences(b, m);

    // Concatenated nearest-neighbor profiles: A against B, then B against A.
    let mut p_abba = Vec::with_capacity(subs_a.len() + subs_b.len());
    p_abba.extend(subs_a.iter().map(|s| nearest_distance(s, &subs_b)));
    p_abba.extend(subs_b.iter().map(|s| nearest_distance(s, &subs_a)));

    let k = ((percentage * (a.len() + b.len()) as f64).ceil() as usize)
        .min(p_abba.len().saturating_sub(1));

    // O(n) partial sort for the k-th smallest value.
    let (_, kth, _) = p_abba.select_nth_unstable_by(k, |x, y| {
        x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(*kth)
}

/// All z-normalized subsequences of length `m`. A constant subsequence has
/// zero deviation and maps to the zero vector.
fn znormalized_subsequences(series: &[f64], m: usize) -> Vec<Vec<f64>> {
    series
        .windows(m)
        .map(|window| {
            let mean = window.iter().sum::<f64>() / m as f64;
            let variance = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / m as f64;
            let std = variance.sqrt();
            if std < 1e-12 {
                vec![0.0; m]
            } else {
                window.iter().map(|x| (x - mean) / std).collect()
            }
        })
        .collect()
}

/// Euclidean distance to the nearest subsequence in `pool`.
fn nearest_distance(sub: &[f64], pool: &[Vec<f64>]) -> f64 {
    pool.iter()
        .map(|other| {
            sub.iter()
                .zip(other.iter())
                .map(|(x, y)| (x - y).powi(2))
                .sum::<f64>()
                .sqrt()
        })
        .fold(f64::INFINITY, f64::min)
}

//! Dynamic Time Warping distance.
//!
//! DTW tolerates local misalignment by elastically matching positions of
//! one series against the other.

/// Euclidean distance between two equal-length sequences.
///
/// Callers are expected to have checked the lengths; mismatched input
/// yields infinity.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return f64::INFINITY;
    }

    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// DTW distance with unconstrained warping.
///
/// Local cost is the absolute difference. Empty input yields infinity.
pub fn dtw_distance(a: &[f64], b: &[f64]) -> f64 {
    dtw_with_band(a, b, None)
}

/// DTW distance constrained to a Sakoe-Chiba band of half-width `window`.
///
/// The band is widened to at least the length difference so a complete
/// warping path always exists.
pub fn dtw_distance_windowed(a: &[f64], b: &[f64], window: usize) -> f64 {
    dtw_with_band(a, b, Some(window))
}

fn dtw_with_band(a: &[f64], b: &[f64], window: Option<usize>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return f64::INFINITY;
    }

    let n = a.len();
    let m = b.len();
    let band = window.map(|w| w.max(n.abs_diff(m)));

    // Two-row rolling buffer over the (n+1) x (m+1) accumulated-cost grid.
    let mut prev = vec![f64::INFINITY; m + 1];
    let mut curr = vec![f64::INFINITY; m + 1];
    prev[0] = 0.0;

    for i in 1..=n {
        curr.fill(f64::INFINITY);
        let (j_start, j_end) = match band {
            Some(w) => (1.max(i.saturating_sub(w)), m.min(i + w)),
            None => (1, m),
        };
        for j in j_start..=j_end {
            let cost = (a[i - 1] - b[j - 1]).abs();
            curr[j] = cost + prev[j].min(curr[j - 1]).min(prev[j - 1]);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[m]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ==================== dtw_distance ====================

    #[test]
    fn dtw_identical_series_is_zero() {
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(dtw_distance(&a, &a), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn dtw_aligns_shifted_peaks() {
        let a: Vec<f64> = vec![0.0, 0.0, 1.0, 2.0, 1.0, 0.0];
        let b: Vec<f64> = vec![0.0, 1.0, 2.0, 1.0, 0.0, 0.0];

        // Elastic alignment must not cost more than the rigid pairing.
        let rigid: f64 = a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).abs())
            .sum();
        assert!(dtw_distance(&a, &b) <= rigid);
    }

    #[test]
    fn dtw_handles_unequal_lengths() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![1.0, 2.0, 3.0, 4.0, 5.0];

        let dist = dtw_distance(&a, &b);
        assert!(dist.is_finite());
        assert!(dist > 0.0);
    }

    #[test]
    fn dtw_single_elements() {
        assert_relative_eq!(dtw_distance(&[5.0], &[3.0]), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn dtw_empty_is_infinite() {
        assert_eq!(dtw_distance(&[], &[1.0, 2.0]), f64::INFINITY);
        assert_eq!(dtw_distance(&[1.0, 2.0], &[]), f64::INFINITY);
    }

    #[test]
    fn dtw_is_symmetric() {
        let a = vec![1.0, 3.0, 2.0, 5.0];
        let b = vec![2.0, 2.0, 4.0];
        assert_relative_eq!(dtw_distance(&a, &b), dtw_distance(&b, &a), epsilon = 1e-12);
    }

    // ==================== dtw_distance_windowed ====================

    #[test]
    fn windowed_identical_is_zero() {
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(dtw_distance_windowed(&a, &a, 1), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn windowed_is_at_least_the_full_dtw() {
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let b = vec![1.1, 2.1, 3.1, 4.1, 5.1];

        let full = dtw_distance(&a, &b);
        let banded = dtw_distance_windowed(&a, &b, 1);
        assert!(banded >= full - 1e-12);
    }

    #[test]
    fn windowed_band_widens_for_length_difference() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];

        // Band 0 alone could not reach the corner; result must be finite.
        assert!(dtw_distance_windowed(&a, &b, 0).is_finite());
    }

    // ==================== euclidean_distance ====================

    #[test]
    fn euclidean_basic() {
        assert_relative_eq!(
            euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]),
            5.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn euclidean_length_mismatch_is_infinite() {
        assert_eq!(euclidean_distance(&[1.0], &[1.0, 2.0]), f64::INFINITY);
    }
}

//! Metric multidimensional scaling of a distance matrix into the plane.
//!
//! SMACOF with majorization: seeded random initialization, repeated
//! Guttman transforms, stop on relative stress improvement below the
//! tolerance.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{MtsError, Result};

/// Tuning knobs for [`mds_projection`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MdsConfig {
    pub max_iter: usize,
    /// Relative stress improvement below which iteration stops.
    pub tolerance: f64,
    /// Seed for the initial configuration; a fixed seed makes the
    /// embedding reproducible.
    pub seed: u64,
}

impl Default for MdsConfig {
    fn default() -> Self {
        Self {
            max_iter: 300,
            tolerance: 1e-9,
            seed: 6,
        }
    }
}

impl MdsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Embed an N x N dissimilarity matrix into 2-D, one point per row.
///
/// Fails with [`MtsError::EmptyData`] for an empty matrix and
/// [`MtsError::DimensionMismatch`] when a row length disagrees with the
/// matrix height.
pub fn mds_projection(d: &[Vec<f64>], config: &MdsConfig) -> Result<Vec<[f64; 2]>> {
    let n = d.len();
    if n == 0 {
        return Err(MtsError::EmptyData);
    }
    for row in d {
        if row.len() != n {
            return Err(MtsError::DimensionMismatch {
                expected: n,
                got: row.len(),
            });
        }
    }
    if n == 1 {
        return Ok(vec![[0.0, 0.0]]);
    }

    let scale = d
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0_f64, |acc, &x| acc.max(x));
    if scale <= 0.0 {
        // All dissimilarities zero: every point collapses onto the origin.
        return Ok(vec![[0.0, 0.0]; n]);
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut points: Vec<[f64; 2]> = (0..n)
        .map(|_| {
            [
                rng.gen_range(-0.5..0.5) * scale,
                rng.gen_range(-0.5..0.5) * scale,
            ]
        })
        .collect();

    let mut prev_stress = stress(d, &points);
    for _ in 0..config.max_iter {
        points = guttman_transform(d, &points);
        let current = stress(d, &points);
        if prev_stress > 0.0 && (prev_stress - current) / prev_stress < config.tolerance {
            break;
        }
        prev_stress = current;
    }

    Ok(points)
}

/// One majorization step: `X' = (1/n) B(X) X`.
fn guttman_transform(d: &[Vec<f64>], points: &[[f64; 2]]) -> Vec<[f64; 2]> {
    let n = points.len();
    let mut next = vec![[0.0; 2]; n];

    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let dist = point_distance(points[i], points[j]);
            // A coincident pair contributes nothing to the update.
            if dist > 1e-12 {
                let ratio = d[i][j] / dist;
                next[i][0] += ratio * (points[i][0] - points[j][0]);
                next[i][1] += ratio * (points[i][1] - points[j][1]);
            }
        }
        next[i][0] /= n as f64;
        next[i][1] /= n as f64;
    }

    next
}

/// Raw stress: squared residual between target and embedded distances
/// over the upper triangle.
fn stress(d: &[Vec<f64>], points: &[[f64; 2]]) -> f64 {
    let n = points.len();
    let mut total = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            let residual = d[i][j] - point_distance(points[i], points[j]);
            total += residual * residual;
        }
    }
    total
}

fn point_distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
}

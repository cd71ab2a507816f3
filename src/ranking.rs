//! Separation ranking: score how well each distance matrix separates two
//! index sets of the population.

use crate::error::{MtsError, Result};

/// Guards the denominator when both groups are internally identical.
pub const SEPARATION_EPS: f64 = 1e-17;

/// Score each matrix in `d_list` by how strongly it separates the groups
/// `u` and `v`.
///
/// Per matrix `D` with `n = |U|` and `m = |V|`:
///
/// ```text
/// cross  = sum over i in U, j in V of D[i][j] / (n * m)
/// w_u    = sum over i, j in U of D[i][j] / (2 * n^2)
/// w_v    = sum over i, j in V of D[i][j] / (2 * m^2)
/// s_u    = sum over i, j in U of D[i][j] / (2 * n)
/// s_v    = sum over i, j in V of D[i][j] / (2 * m)
/// score  = (cross - w_u - w_v) / (s_u + s_v + EPS)
/// ```
///
/// Higher means better separated. Scores come back in the order of
/// `d_list`, so the caller can rank variables by their matrix's score.
/// Fails with [`MtsError::EmptyData`] when either group is empty and
/// [`MtsError::IndexOutOfBounds`] when an index does not fit a matrix.
pub fn separation_scores(
    d_list: &[Vec<Vec<f64>>],
    u: &[usize],
    v: &[usize],
) -> Result<Vec<f64>> {
    if u.is_empty() || v.is_empty() {
        return Err(MtsError::EmptyData);
    }

    d_list
        .iter()
        .map(|matrix| separation_score(matrix, u, v))
        .collect()
}

fn separation_score(matrix: &[Vec<f64>], u: &[usize], v: &[usize]) -> Result<f64> {
    let size = matrix.len();
    for &index in u.iter().chain(v.iter()) {
        if index >= size {
            return Err(MtsError::IndexOutOfBounds { index, size });
        }
    }

    let n = u.len() as f64;
    let m = v.len() as f64;

    let cross: f64 = u
        .iter()
        .flat_map(|&i| v.iter().map(move |&j| matrix[i][j]))
        .sum::<f64>()
        / (n * m);

    let sum_u: f64 = u
        .iter()
        .flat_map(|&i| u.iter().map(move |&j| matrix[i][j]))
        .sum();
    let sum_v: f64 = v
        .iter()
        .flat_map(|&i| v.iter().map(move |&j| matrix[i][j]))
        .sum();

    let within_u = sum_u / (2.0 * n * n);
    let within_v = sum_v / (2.0 * m * m);
    let spread_u = sum_u / (2.0 * n);
    let spread_v = sum_v / (2.0 * m);

    Ok((cross - within_u - within_v) / (spread_u + spread_v + SEPARATION_EPS))
}

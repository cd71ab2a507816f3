//! Population-level distance matrices: one N x N matrix per variable plus
//! their weighted combination.

use crate::core::MTSerie;
use crate::error::{MtsError, Result};

use super::metric::Metric;

/// Per-variable distance matrices and their weighted root-sum-of-squares
/// combination.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrices {
    /// `combined[i][j] = sqrt(sum_k alphas[k]^2 * per_variable[k][i][j]^2)`.
    pub combined: Vec<Vec<f64>>,
    /// Raw (unweighted) matrices, one per requested variable, in request
    /// order.
    pub per_variable: Vec<Vec<Vec<f64>>>,
}

/// Build the distance matrices for a population of multivariate series.
///
/// For each requested variable the metric is evaluated on every ordered
/// pair of containers, the diagonal included; the per-variable matrices
/// are kept raw, the weights only enter the combined matrix. Fails with
/// [`MtsError::DimensionMismatch`] when `variables` and `alphas` disagree
/// in length, [`MtsError::UnknownVariable`] when a container lacks one of
/// the variables, and propagates the metric's own errors.
pub fn distance_matrix<M: Metric>(
    mtseries: &[MTSerie],
    variables: &[&str],
    alphas: &[f64],
    metric: &M,
) -> Result<DistanceMatrices> {
    if variables.len() != alphas.len() {
        return Err(MtsError::DimensionMismatch {
            expected: variables.len(),
            got: alphas.len(),
        });
    }
    if let Some(alpha) = alphas.iter().find(|a| **a < 0.0 || !a.is_finite()) {
        return Err(MtsError::InvalidParameter(format!(
            "weights must be finite and non-negative, got {alpha}"
        )));
    }

    let n = mtseries.len();
    let mut per_variable = Vec::with_capacity(variables.len());

    for &variable in variables {
        let series: Vec<&[f64]> = mtseries
            .iter()
            .map(|mts| mts.get_serie(variable))
            .collect::<Result<_>>()?;

        let mut matrix = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                matrix[i][j] = metric.distance(series[i], series[j])?;
            }
        }
        per_variable.push(matrix);
    }

    let mut combined = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..n {
            let sum: f64 = per_variable
                .iter()
                .zip(alphas.iter())
                .map(|(matrix, alpha)| (alpha * matrix[i][j]).powi(2))
                .sum();
            combined[i][j] = sum.sqrt();
        }
    }

    Ok(DistanceMatrices {
        combined,
        per_variable,
    })
}

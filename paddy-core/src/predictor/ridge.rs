use serde::{Deserialize, Serialize};

use super::{TrainingSet, YieldModel};
use crate::error::ModelError;

const N: usize = 8;

/// L2-regularised linear regression with an unpenalised intercept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidgeRegression {
    pub alpha: f64,
    pub coefficients: [f64; N],
    pub intercept: f64,
}

impl RidgeRegression {
    pub const DEFAULT_ALPHA: f64 = 1.0;

    /// Fits on centred data: `(XcᵀXc + αI) w = Xcᵀyc`, `b = ȳ - x̄·w`.
    pub fn fit(data: &TrainingSet, alpha: f64) -> Result<Self, ModelError> {
        if data.is_empty() {
            return Err(ModelError::Empty);
        }
        let n = data.len() as f64;

        let mut x_mean = [0.0; N];
        for row in &data.features {
            for (m, v) in x_mean.iter_mut().zip(row) {
                *m += v / n;
            }
        }
        let y_mean = data.targets.iter().sum::<f64>() / n;

        let mut a = [[0.0; N]; N];
        let mut b = [0.0; N];
        for (row, y) in data.features.iter().zip(&data.targets) {
            let xc: [f64; N] = std::array::from_fn(|j| row[j] - x_mean[j]);
            let yc = y - y_mean;
            for i in 0..N {
                b[i] += xc[i] * yc;
                for j in 0..N {
                    a[i][j] += xc[i] * xc[j];
                }
            }
        }
        for (i, row) in a.iter_mut().enumerate() {
            row[i] += alpha;
        }

        let coefficients = solve(a, b)?;
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(&x_mean)
                .map(|(w, m)| w * m)
                .sum::<f64>();

        Ok(Self {
            alpha,
            coefficients,
            intercept,
        })
    }
}

impl YieldModel for RidgeRegression {
    fn predict(&self, normalized: &[f64; N]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(normalized)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}

/// Gaussian elimination with partial pivoting.
fn solve(mut a: [[f64; N]; N], mut b: [f64; N]) -> Result<[f64; N], ModelError> {
    for col in 0..N {
        let pivot = (col..N)
            .max_by(|&r, &s| a[r][col].abs().total_cmp(&a[s][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < 1e-12 {
            return Err(ModelError::Singular);
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..N {
            let factor = a[row][col] / a[col][col];
            for k in col..N {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0; N];
    for row in (0..N).rev() {
        let tail: f64 = (row + 1..N).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Ok(x)
}

//! Feature Standardization
//!
//! Column-wise zero-mean unit-variance scaling. Every department
//! partition fits its own scaler; parameters are never shared across
//! partitions or with the archetype reference set.

use ndarray::{Array1, Array2, Axis};

/// Column-wise standardizer (population variance)
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Fit to the columns of `x`
    ///
    /// Constant columns get a unit scale so they standardize to zero
    /// instead of dividing by zero.
    pub fn fit(x: &Array2<f64>) -> Self {
        let n = x.nrows().max(1) as f64;
        let mean = x.sum_axis(Axis(0)) / n;

        let mut scale = Array1::zeros(x.ncols());
        for (j, column) in x.columns().into_iter().enumerate() {
            let var = column
                .iter()
                .map(|v| (v - mean[j]).powi(2))
                .sum::<f64>()
                / n;
            let std = var.sqrt();
            scale[j] = if std > 0.0 { std } else { 1.0 };
        }

        Self { mean, scale }
    }

    /// Standardize `x` with the fitted parameters
    pub fn transform(&self, x: &Array2<f64>) -> Array2<f64> {
        let mut out = x.clone();
        for mut row in out.rows_mut() {
            for j in 0..row.len() {
                row[j] = (row[j] - self.mean[j]) / self.scale[j];
            }
        }
        out
    }

    /// Fit and standardize in one step
    pub fn fit_transform(x: &Array2<f64>) -> Array2<f64> {
        Self::fit(x).transform(x)
    }

    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    pub fn scale(&self) -> &Array1<f64> {
        &self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_zero_mean_unit_variance() {
        let x = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [4.0, 40.0]];
        let xs = StandardScaler::fit_transform(&x);

        for j in 0..2 {
            let col = xs.column(j);
            let mean: f64 = col.iter().sum::<f64>() / col.len() as f64;
            let var: f64 = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / col.len() as f64;
            assert!(mean.abs() < 1e-12);
            assert!((var - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_constant_column_guard() {
        let x = array![[5.0, 1.0], [5.0, 2.0], [5.0, 3.0]];
        let xs = StandardScaler::fit_transform(&x);
        // Constant column standardizes to zeros, no division by zero
        assert!(xs.column(0).iter().all(|v| *v == 0.0));
        assert!(xs.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_transform_uses_fitted_params() {
        let train = array![[0.0], [2.0]];
        let scaler = StandardScaler::fit(&train);
        let out = scaler.transform(&array![[4.0]]);
        // mean 1, std 1 -> (4 - 1) / 1
        assert!((out[[0, 0]] - 3.0).abs() < 1e-12);
    }
}

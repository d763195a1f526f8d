//! Diagonal Gaussian Mixture Model
//!
//! Expectation-maximization fit with seeded initialization, log-sum-exp
//! responsibilities, and a BIC score for model-order selection.
//! Covariances are diagonal; the per-department partitions this engine
//! fits are often single-digit row counts.

use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::SeedableRng;
use thiserror::Error;

/// EM iteration cap
pub const DEFAULT_MAX_ITER: usize = 100;
/// Convergence tolerance on the total log-likelihood
pub const DEFAULT_TOL: f64 = 1e-3;
/// Variance floor added to every component variance
pub const DEFAULT_REG_COVAR: f64 = 1e-6;

const LN_2PI: f64 = 1.837_877_066_409_345_4;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum FitError {
    #[error("cannot fit {n_components} components to {n_samples} samples")]
    TooFewSamples {
        n_samples: usize,
        n_components: usize,
    },

    #[error("degenerate fit: log-likelihood became non-finite at iteration {iteration}")]
    Degenerate { iteration: usize },
}

// ============================================================================
// MODEL
// ============================================================================

/// Mixture configuration
#[derive(Debug, Clone)]
pub struct GaussianMixture {
    pub n_components: usize,
    pub max_iter: usize,
    pub tol: f64,
    pub reg_covar: f64,
    pub seed: u64,
}

impl GaussianMixture {
    pub fn new(n_components: usize, seed: u64) -> Self {
        Self {
            n_components,
            max_iter: DEFAULT_MAX_ITER,
            tol: DEFAULT_TOL,
            reg_covar: DEFAULT_REG_COVAR,
            seed,
        }
    }

    /// Fit by EM on the rows of `x`
    pub fn fit(&self, x: &Array2<f64>) -> Result<MixtureFit, FitError> {
        let (n, d) = (x.nrows(), x.ncols());
        let k = self.n_components;
        if n < k {
            return Err(FitError::TooFewSamples {
                n_samples: n,
                n_components: k,
            });
        }

        let mut fit = self.initialize(x);
        let mut previous_ll = f64::NEG_INFINITY;
        let mut converged = false;
        let mut iterations = 0;

        for iteration in 0..self.max_iter {
            iterations = iteration + 1;

            // E-step: responsibilities and total log-likelihood
            let log_prob = fit.weighted_log_prob(x);
            let mut log_likelihood = 0.0;
            let mut resp = Array2::zeros((n, k));
            for i in 0..n {
                let lse = log_sum_exp(log_prob.row(i).iter().copied());
                log_likelihood += lse;
                for c in 0..k {
                    resp[[i, c]] = (log_prob[[i, c]] - lse).exp();
                }
            }
            if !log_likelihood.is_finite() {
                return Err(FitError::Degenerate { iteration });
            }

            // M-step: update weights, means, variances
            let nk = resp.sum_axis(Axis(0)).mapv(|v| v + 10.0 * f64::EPSILON);
            for c in 0..k {
                for j in 0..d {
                    let mut mean = 0.0;
                    for i in 0..n {
                        mean += resp[[i, c]] * x[[i, j]];
                    }
                    mean /= nk[c];
                    fit.means[[c, j]] = mean;

                    let mut var = 0.0;
                    for i in 0..n {
                        var += resp[[i, c]] * (x[[i, j]] - mean).powi(2);
                    }
                    fit.variances[[c, j]] = var / nk[c] + self.reg_covar;
                }
                fit.weights[c] = nk[c] / n as f64;
            }

            fit.log_likelihood = log_likelihood;
            if (log_likelihood - previous_ll).abs() < self.tol {
                converged = true;
                break;
            }
            previous_ll = log_likelihood;
        }

        fit.converged = converged;
        fit.n_iter = iterations;
        Ok(fit)
    }

    /// Seeded initialization: means from distinct sample rows, shared
    /// per-column data variance, uniform weights
    fn initialize(&self, x: &Array2<f64>) -> MixtureFit {
        let (n, d) = (x.nrows(), x.ncols());
        let k = self.n_components;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let picks = sample(&mut rng, n, k).into_vec();

        let mut means = Array2::zeros((k, d));
        for (c, &i) in picks.iter().enumerate() {
            means.row_mut(c).assign(&x.row(i));
        }

        let column_mean = x.sum_axis(Axis(0)) / n as f64;
        let mut variances = Array2::zeros((k, d));
        for j in 0..d {
            let var = x
                .column(j)
                .iter()
                .map(|v| (v - column_mean[j]).powi(2))
                .sum::<f64>()
                / n as f64
                + self.reg_covar;
            for c in 0..k {
                variances[[c, j]] = var;
            }
        }

        MixtureFit {
            n_components: k,
            weights: Array1::from_elem(k, 1.0 / k as f64),
            means,
            variances,
            log_likelihood: f64::NEG_INFINITY,
            converged: false,
            n_iter: 0,
        }
    }
}

// ============================================================================
// FITTED MIXTURE
// ============================================================================

/// A fitted mixture: weights, diagonal Gaussians, fit diagnostics
#[derive(Debug, Clone)]
pub struct MixtureFit {
    pub n_components: usize,
    pub weights: Array1<f64>,
    /// Component means, one row per component
    pub means: Array2<f64>,
    /// Per-component diagonal variances
    pub variances: Array2<f64>,
    /// Total log-likelihood of the training data at the last E-step
    pub log_likelihood: f64,
    pub converged: bool,
    pub n_iter: usize,
}

impl MixtureFit {
    /// ln(weight_c) + ln N(x_i | mean_c, var_c) for every sample/component
    fn weighted_log_prob(&self, x: &Array2<f64>) -> Array2<f64> {
        let (n, d) = (x.nrows(), x.ncols());
        let k = self.n_components;
        let mut out = Array2::zeros((n, k));
        for c in 0..k {
            let log_weight = self.weights[c].ln();
            for i in 0..n {
                let mut lp = 0.0;
                for j in 0..d {
                    let var = self.variances[[c, j]];
                    let diff = x[[i, j]] - self.means[[c, j]];
                    lp += -0.5 * (LN_2PI + var.ln() + diff * diff / var);
                }
                out[[i, c]] = log_weight + lp;
            }
        }
        out
    }

    /// Hard assignment: most probable component per row
    pub fn predict(&self, x: &Array2<f64>) -> Vec<usize> {
        let log_prob = self.weighted_log_prob(x);
        log_prob
            .rows()
            .into_iter()
            .map(|row| {
                let mut best = 0;
                for (c, v) in row.iter().enumerate() {
                    if *v > row[best] {
                        best = c;
                    }
                }
                best
            })
            .collect()
    }

    /// Bayesian Information Criterion on `x` (lower is better)
    pub fn bic(&self, x: &Array2<f64>) -> f64 {
        let n = x.nrows();
        let log_prob = self.weighted_log_prob(x);
        let ll: f64 = (0..n)
            .map(|i| log_sum_exp(log_prob.row(i).iter().copied()))
            .sum();
        -2.0 * ll + self.n_parameters(x.ncols()) as f64 * (n as f64).ln()
    }

    /// Free parameters of a diagonal mixture: k means + k variances per
    /// dimension, plus k-1 free weights
    fn n_parameters(&self, n_features: usize) -> usize {
        2 * self.n_components * n_features + self.n_components - 1
    }
}

fn log_sum_exp(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let max = values.clone().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return max;
    }
    let sum: f64 = values.map(|v| (v - max).exp()).sum();
    max + sum.ln()
}

// ============================================================================
// TESTS
// ============================================================================

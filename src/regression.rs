use faer::{Mat, Side, linalg::solvers::DenseSolveCore};
use rand::RngCore;
use rand_distr::{Distribution, StandardNormal};

use crate::error::{BanditError, Result};

/// Observations between two re-inversions of the precision matrix
pub const REFRESH_INTERVAL: usize = 64;

/// Bayesian linear regression with a Gaussian prior and known noise
///
/// Maintains the multivariate Gaussian posterior `N(mean, covariance)` of the
/// weight vector under the prior `N(0, prior_variance · I)`. The covariance is
/// updated online with the Sherman-Morrison formula, so no matrix is inverted
/// per observation. Every [`REFRESH_INTERVAL`] observations the covariance is
/// recomputed from the precision matrix to discard accumulated rounding error.
#[derive(Debug, Clone)]
pub struct BayesianLinearRegression {
    /// Observation noise variance
    pub noise_variance: f64,
    /// Posterior mean of the weights (d × 1)
    pub mean: Mat<f64>,
    /// Posterior covariance of the weights (d × d)
    pub covariance: Mat<f64>,
    /// Posterior precision, the source of the periodic re-inversion
    pub precision: Mat<f64>,
    /// Precision-weighted mean `X^T y / noise_variance`
    pub xty: Mat<f64>,
    /// Number of features
    pub num_features: usize,
    n_observations: usize,
}

impl BayesianLinearRegression {
    /// Create a model at its prior
    pub fn new(num_features: usize, prior_variance: f64, noise_variance: f64) -> Self {
        let mut covariance = Mat::<f64>::zeros(num_features, num_features);
        let mut precision = Mat::<f64>::zeros(num_features, num_features);
        for i in 0..num_features {
            covariance[(i, i)] = prior_variance;
            precision[(i, i)] = 1.0 / prior_variance;
        }

        Self {
            noise_variance,
            mean: Mat::<f64>::zeros(num_features, 1),
            covariance,
            precision,
            xty: Mat::<f64>::zeros(num_features, 1),
            num_features,
            n_observations: 0,
        }
    }

    /// Condition on one observation `y = w · x + noise`
    pub fn fit(&mut self, x: &[f64], y: f64) {
        let d = self.num_features;
        let x_vec = Mat::from_fn(d, 1, |i, _| x[i]);

        for i in 0..d {
            for j in 0..d {
                self.precision[(i, j)] += x[i] * x[j] / self.noise_variance;
            }
        }

        // covariance_new = covariance - (covariance x)(covariance x)^T / (noise_variance + x^T covariance x)
        // The denominator is at least noise_variance since the covariance is PSD.
        let cov_x = &self.covariance * &x_vec;
        let mut denominator = self.noise_variance;
        for i in 0..d {
            denominator += x[i] * cov_x[(i, 0)];
        }

        self.n_observations += 1;
        if self.n_observations % REFRESH_INTERVAL == 0 {
            self.covariance = self.precision.partial_piv_lu().inverse();
        } else {
            for i in 0..d {
                for j in 0..d {
                    self.covariance[(i, j)] -= cov_x[(i, 0)] * cov_x[(j, 0)] / denominator;
                }
            }
        }

        for (i, &xi) in x.iter().enumerate().take(d) {
            self.xty[(i, 0)] += xi * y / self.noise_variance;
        }

        self.mean = &self.covariance * &self.xty;
    }

    /// Posterior mean of `w · x`
    pub fn predict(&self, x: &[f64]) -> f64 {
        x.iter()
            .enumerate()
            .take(self.num_features)
            .map(|(i, &xi)| xi * self.mean[(i, 0)])
            .sum()
    }

    /// Posterior variance of `w · x`
    pub fn variance(&self, x: &[f64]) -> f64 {
        let d = self.num_features;
        let mut result = 0.0;
        for i in 0..d {
            for j in 0..d {
                result += x[i] * self.covariance[(i, j)] * x[j];
            }
        }
        result
    }

    /// Number of observations conditioned on
    pub fn n_observations(&self) -> usize {
        self.n_observations
    }

    /// Factor the posterior covariance once for repeated weight draws
    pub fn sampler(&self) -> Result<WeightSampler> {
        let llt = self
            .covariance
            .llt(Side::Lower)
            .map_err(|e| BanditError::NumericalError {
                message: format!("posterior covariance is not positive definite: {e:?}"),
            })?;
        Ok(WeightSampler {
            mean: (0..self.num_features).map(|i| self.mean[(i, 0)]).collect(),
            lower: llt.L().to_owned(),
        })
    }

    /// Draw a weight vector from the posterior
    pub fn sample(&self, rng: &mut dyn RngCore) -> Result<Vec<f64>> {
        Ok(self.sampler()?.sample(rng))
    }
}

/// Posterior mean and lower Cholesky factor of the covariance
#[derive(Debug, Clone)]
pub struct WeightSampler {
    mean: Vec<f64>,
    lower: Mat<f64>,
}

impl WeightSampler {
    /// Draw `mean + L z` with `z ~ N(0, I)`
    pub fn sample(&self, rng: &mut dyn RngCore) -> Vec<f64> {
        let z: Vec<f64> = (0..self.mean.len())
            .map(|_| StandardNormal.sample(rng))
            .collect();
        self.mean
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let noise: f64 = (0..=i).map(|j| self.lower[(i, j)] * z[j]).sum();
                m + noise
            })
            .collect()
    }
}

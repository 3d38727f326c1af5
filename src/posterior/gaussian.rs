use rand::RngCore;
use rand_distr::{Distribution, Normal};

use crate::error::{BanditError, Result};

/// Conjugate Gaussian posteriors over arm means with known noise
#[derive(Clone, Debug)]
pub struct GaussianPosterior {
    mean: Vec<f64>,
    precision: Vec<f64>,
    noise_precision: Vec<f64>,
}

impl GaussianPosterior {
    pub fn new(prior_mean: f64, prior_variance: f64, noise_std: &[f64]) -> Self {
        Self {
            mean: vec![prior_mean; noise_std.len()],
            precision: vec![1.0 / prior_variance; noise_std.len()],
            noise_precision: noise_std.iter().map(|s| 1.0 / (s * s)).collect(),
        }
    }

    pub fn update(&mut self, arm: usize, reward: f64) {
        let tau = self.noise_precision[arm];
        let precision = self.precision[arm] + tau;
        self.mean[arm] = (self.precision[arm] * self.mean[arm] + tau * reward) / precision;
        self.precision[arm] = precision;
    }

    pub fn expected_reward(&self, arm: usize) -> f64 {
        self.mean[arm]
    }

    /// Posterior variance of one arm's mean
    pub fn variance(&self, arm: usize) -> f64 {
        1.0 / self.precision[arm]
    }

    pub fn sample_means(&self, rng: &mut dyn RngCore) -> Result<Vec<f64>> {
        self.mean
            .iter()
            .zip(&self.precision)
            .map(|(&mu, &precision)| {
                let dist = Normal::new(mu, precision.recip().sqrt()).map_err(|e| {
                    BanditError::NumericalError {
                        message: format!("invalid gaussian posterior ({mu}, {precision}): {e}"),
                    }
                })?;
                Ok(dist.sample(rng))
            })
            .collect()
    }
}

use std::sync::Arc;

use rand::RngCore;

use crate::arm::dot;
use crate::error::Result;
use crate::regression::BayesianLinearRegression;

/// Multivariate Gaussian posterior over the shared parameter of a linear bandit
#[derive(Clone, Debug)]
pub struct LinearPosterior {
    features: Arc<Vec<Vec<f64>>>,
    regression: BayesianLinearRegression,
}

impl LinearPosterior {
    pub fn new(features: Arc<Vec<Vec<f64>>>, prior_variance: f64, noise_std: f64) -> Self {
        let num_features = features.first().map_or(0, Vec::len);
        Self {
            features,
            regression: BayesianLinearRegression::new(
                num_features,
                prior_variance,
                noise_std * noise_std,
            ),
        }
    }

    pub fn update(&mut self, arm: usize, reward: f64) {
        self.regression.fit(&self.features[arm], reward);
    }

    pub fn expected_reward(&self, arm: usize) -> f64 {
        self.regression.predict(&self.features[arm])
    }

    /// Posterior variance of one arm's mean reward
    pub fn variance(&self, arm: usize) -> f64 {
        self.regression.variance(&self.features[arm])
    }

    pub fn regression(&self) -> &BayesianLinearRegression {
        &self.regression
    }

    pub fn sample_means(&self, rng: &mut dyn RngCore) -> Result<Vec<f64>> {
        let theta = self.regression.sample(rng)?;
        Ok(self.features.iter().map(|x| dot(&theta, x)).collect())
    }

    /// `n` draws of the arm means from one factorization of the covariance
    pub fn sample_many(&self, n: usize, rng: &mut dyn RngCore) -> Result<Vec<Vec<f64>>> {
        let sampler = self.regression.sampler()?;
        Ok((0..n)
            .map(|_| {
                let theta = sampler.sample(rng);
                self.features.iter().map(|x| dot(&theta, x)).collect()
            })
            .collect())
    }
}

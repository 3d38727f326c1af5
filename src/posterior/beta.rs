use rand::RngCore;
use rand_distr::{Beta, Distribution};

use crate::error::{BanditError, Result};

/// Independent Beta posteriors over Bernoulli success probabilities
#[derive(Clone, Debug)]
pub struct BetaPosterior {
    alpha: Vec<f64>,
    beta: Vec<f64>,
}

impl BetaPosterior {
    pub fn new(n_arms: usize, prior_alpha: f64, prior_beta: f64) -> Self {
        Self {
            alpha: vec![prior_alpha; n_arms],
            beta: vec![prior_beta; n_arms],
        }
    }

    /// Rewards in `[0, 1]` count as fractional successes
    pub fn update(&mut self, arm: usize, reward: f64) {
        let reward = reward.clamp(0.0, 1.0);
        self.alpha[arm] += reward;
        self.beta[arm] += 1.0 - reward;
    }

    pub fn expected_reward(&self, arm: usize) -> f64 {
        self.alpha[arm] / (self.alpha[arm] + self.beta[arm])
    }

    /// `(alpha, beta)` of one arm
    pub fn params(&self, arm: usize) -> (f64, f64) {
        (self.alpha[arm], self.beta[arm])
    }

    pub fn sample_means(&self, rng: &mut dyn RngCore) -> Result<Vec<f64>> {
        self.alpha
            .iter()
            .zip(&self.beta)
            .map(|(&a, &b)| {
                let dist = Beta::new(a, b).map_err(|e| BanditError::NumericalError {
                    message: format!("invalid beta posterior ({a}, {b}): {e}"),
                })?;
                Ok(dist.sample(rng))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_binary_rewards() {
        let mut posterior = BetaPosterior::new(2, 1.0, 1.0);
        posterior.update(0, 1.0);
        posterior.update(0, 0.0);
        posterior.update(0, 1.0);

        assert_eq!(posterior.params(0), (3.0, 2.0));
        assert_abs_diff_eq!(posterior.expected_reward(0), 0.6);
        assert_abs_diff_eq!(posterior.expected_reward(1), 0.5);
    }

    #[test]
    fn test_rewards_are_clamped() {
        let mut posterior = BetaPosterior::new(1, 1.0, 1.0);
        posterior.update(0, 4.0);
        assert_eq!(posterior.params(0), (2.0, 1.0));
    }

    #[test]
    fn test_samples_concentrate() {
        let mut posterior = BetaPosterior::new(1, 1.0, 1.0);
        for i in 0..400 {
            posterior.update(0, if i % 4 == 0 { 0.0 } else { 1.0 });
        }
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let draw = posterior.sample_means(&mut rng).unwrap()[0];
            assert!((draw - 0.75).abs() < 0.1);
        }
    }
}

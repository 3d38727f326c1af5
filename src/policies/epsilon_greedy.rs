use rand::{Rng, RngCore};

use crate::error::{BanditError, Result};
use crate::policy::{Policy, Selection};
use crate::posterior::Belief;
use crate::utils::random_argmax;

/// Epsilon-greedy policy - explores with probability epsilon, exploits otherwise
///
/// Exploitation uses empirical average rewards; unpulled arms are exploited first.
#[derive(Clone, Debug)]
pub struct EpsilonGreedy {
    epsilon: f64,
}

impl EpsilonGreedy {
    /// Creates a new EpsilonGreedy policy with the given epsilon
    pub fn new(epsilon: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(BanditError::invalid(format!(
                "epsilon must be between 0 and 1, got {epsilon}"
            )));
        }
        Ok(Self { epsilon })
    }

    /// Gets the epsilon value
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

impl Policy for EpsilonGreedy {
    fn select(&self, belief: &Belief, rng: &mut dyn RngCore) -> Result<Selection> {
        let n_arms = belief.n_arms();
        if n_arms == 0 {
            return Err(BanditError::NoArmsAvailable);
        }

        // Explore with probability epsilon
        let r: f64 = rng.random_range(0.0..1.0);
        if r < self.epsilon {
            return Ok(Selection::arm(rng.random_range(0..n_arms)));
        }

        let averages: Vec<f64> = (0..n_arms)
            .map(|k| {
                let stats = belief.stats(k);
                if stats.pulls == 0 {
                    f64::INFINITY
                } else {
                    stats.average_reward()
                }
            })
            .collect();
        Ok(Selection::arm(random_argmax(&averages, rng)))
    }

    fn name(&self) -> &'static str {
        "EpsilonGreedy"
    }
}

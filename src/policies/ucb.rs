use rand::RngCore;

use crate::error::{BanditError, Result};
use crate::policy::{Policy, Selection};
use crate::posterior::{ArmStats, Belief};

/// Upper Confidence Bound (UCB1) policy
///
/// This policy balances exploration and exploitation by selecting arms based on
/// their upper confidence bounds. Arms with higher uncertainty or higher average
/// rewards are more likely to be selected. Unpulled arms are played first.
#[derive(Clone, Debug)]
pub struct Ucb {
    /// Confidence parameter (typically 1.0)
    alpha: f64,
}

impl Ucb {
    /// Creates a new UCB1 policy with the given confidence parameter
    ///
    /// # Arguments
    /// * `alpha` - Confidence parameter, must be positive and finite.
    ///   Higher values encourage more exploration
    pub fn new(alpha: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha.is_finite()) {
            return Err(BanditError::invalid(format!(
                "alpha must be positive and finite, got {alpha}"
            )));
        }
        Ok(Self { alpha })
    }

    /// Gets the confidence parameter
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// UCB score of one arm after `total_rounds` observations
    pub fn score(&self, stats: &ArmStats, total_rounds: usize) -> f64 {
        if stats.pulls == 0 {
            // Unpulled arms have infinite UCB score (explore first)
            f64::INFINITY
        } else {
            let exploitation = stats.average_reward();
            let exploration =
                self.alpha * ((2.0 * (total_rounds as f64).ln()) / stats.pulls as f64).sqrt();
            exploitation + exploration
        }
    }
}

impl Policy for Ucb {
    fn select(&self, belief: &Belief, _rng: &mut dyn RngCore) -> Result<Selection> {
        if belief.n_arms() == 0 {
            return Err(BanditError::NoArmsAvailable);
        }

        // Select arm with highest UCB score, lowest index on ties
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for k in 0..belief.n_arms() {
            let score = self.score(belief.stats(k), belief.round());
            if score > best_score {
                best = k;
                best_score = score;
            }
        }
        Ok(Selection::arm(best))
    }

    fn name(&self) -> &'static str {
        "UCB1"
    }
}

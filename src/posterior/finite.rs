use std::sync::Arc;

use rand::RngCore;
use rand::distr::weighted::WeightedIndex;
use rand_distr::Distribution;

use crate::error::{BanditError, Result};
use crate::finite::FiniteModel;
use crate::utils::{NUMERIC_ZERO, entropy};

/// Exact discrete posterior over the candidates of a [`FiniteModel`]
///
/// The model (outcome tensor and reward map) is shared read-only; only the
/// candidate weights belong to this posterior.
#[derive(Clone, Debug)]
pub struct FinitePosterior {
    prior: Vec<f64>,
    model: Arc<FiniteModel>,
}

impl FinitePosterior {
    /// Posterior equal to the model's prior
    pub fn new(model: Arc<FiniteModel>) -> Self {
        Self {
            prior: model.prior().to_vec(),
            model,
        }
    }

    /// Current candidate weights
    pub fn weights(&self) -> &[f64] {
        &self.prior
    }

    pub fn model(&self) -> &FiniteModel {
        &self.model
    }

    /// Bayes update after observing `outcome` on `arm`
    ///
    /// Fails with [`BanditError::DegeneratePosterior`] when the outcome is
    /// impossible under every candidate; the weights are left untouched.
    pub fn update(&mut self, arm: usize, outcome: usize) -> Result<()> {
        let n_arms = self.model.n_arms();
        if arm >= n_arms {
            return Err(BanditError::ArmOutOfRange { arm, n_arms });
        }
        if outcome >= self.model.n_outcomes() {
            return Err(BanditError::invalid(format!(
                "outcome {outcome} out of range for {} outcomes",
                self.model.n_outcomes()
            )));
        }

        let unnormalized: Vec<f64> = self
            .prior
            .iter()
            .enumerate()
            .map(|(m, w)| w * self.model.likelihood(m, arm, outcome))
            .collect();
        let total: f64 = unnormalized.iter().sum();
        if !(total > 0.0) {
            return Err(BanditError::DegeneratePosterior { arm, outcome });
        }

        self.prior = unnormalized.into_iter().map(|w| w / total).collect();
        Ok(())
    }

    /// `Σ_m prior[m] Σ_o q[m, arm, o] R[o]`
    pub fn expected_reward(&self, arm: usize) -> f64 {
        self.prior
            .iter()
            .enumerate()
            .map(|(m, w)| w * self.model.mean(m, arm))
            .sum()
    }

    /// Posterior probability that each arm is the optimal one
    pub fn optimal_arm_distribution(&self) -> Vec<f64> {
        let mut p_star = vec![0.0; self.model.n_arms()];
        for (m, w) in self.prior.iter().enumerate() {
            p_star[self.model.optimal_arm(m)] += w;
        }
        p_star
    }

    /// Posterior expected reward of the optimal arm
    pub fn expected_optimal_reward(&self) -> f64 {
        self.prior
            .iter()
            .enumerate()
            .map(|(m, w)| w * self.model.mean(m, self.model.optimal_arm(m)))
            .sum()
    }

    /// Entropy of the optimal-arm distribution
    pub fn entropy(&self) -> f64 {
        entropy(&self.optimal_arm_distribution())
    }

    /// Expected regret `Δ(k)` of every arm
    ///
    /// `Δ(k) = E[max_a μ_a] − E[μ_k]`, measured against the expected optimal
    /// reward rather than the best posterior mean.
    pub fn gaps(&self) -> Vec<f64> {
        let best = self.expected_optimal_reward();
        (0..self.model.n_arms())
            .map(|k| (best - self.expected_reward(k)).max(0.0))
            .collect()
    }

    /// Expected information gain `g(k)` about the optimal arm from pulling each arm
    ///
    /// `g(k) = H(p*) - Σ_o P(o | k) H(p* | k, o)`, the mutual information between
    /// the outcome of arm `k` and the identity of the optimal arm.
    pub fn information_gains(&self) -> Vec<f64> {
        let n_arms = self.model.n_arms();
        let n_outcomes = self.model.n_outcomes();
        let prior_entropy = self.entropy();

        (0..n_arms)
            .map(|k| {
                let mut expected_entropy = 0.0;
                for o in 0..n_outcomes {
                    // joint[a] = P(a* = a, outcome o | pull k)
                    let mut joint = vec![0.0; n_arms];
                    for (m, w) in self.prior.iter().enumerate() {
                        joint[self.model.optimal_arm(m)] += w * self.model.likelihood(m, k, o);
                    }
                    let p_outcome: f64 = joint.iter().sum();
                    if p_outcome <= 0.0 {
                        continue;
                    }
                    let conditional: Vec<f64> = joint.iter().map(|j| j / p_outcome).collect();
                    expected_entropy += p_outcome * entropy(&conditional);
                }
                let gain = prior_entropy - expected_entropy;
                if gain < NUMERIC_ZERO { 0.0 } else { gain }
            })
            .collect()
    }

    /// Mean rewards under one candidate drawn from the posterior
    pub fn sample_means(&self, rng: &mut dyn RngCore) -> Result<Vec<f64>> {
        let index = WeightedIndex::new(&self.prior).map_err(|e| BanditError::NumericalError {
            message: format!("cannot sample from finite posterior: {e}"),
        })?;
        Ok(self.model.means(index.sample(rng)).to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// 4 candidates, 2 arms, 2 outcomes with reward = outcome index.
    fn grid() -> Arc<FiniteModel> {
        Arc::new(
            FiniteModel::new(
                vec![0.25; 4],
                vec![
                    vec![vec![0.1, 0.9], vec![0.8, 0.2]],
                    vec![vec![0.3, 0.7], vec![0.6, 0.4]],
                    vec![vec![0.6, 0.4], vec![0.3, 0.7]],
                    vec![vec![0.9, 0.1], vec![0.2, 0.8]],
                ],
                vec![0.0, 1.0],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_update_stays_normalized() {
        let mut posterior = FinitePosterior::new(grid());
        for (arm, outcome) in [(0, 1), (1, 0), (0, 1), (1, 1), (0, 0)] {
            posterior.update(arm, outcome).unwrap();
            let total: f64 = posterior.weights().iter().sum();
            assert_abs_diff_eq!(total, 1.0, epsilon = 1e-9);
            assert!(posterior.weights().iter().all(|w| *w >= 0.0));
        }
        // candidate 0 favours outcome 1 on arm 0
        assert!(posterior.weights()[0] > posterior.weights()[3]);
    }

    #[test]
    fn test_degenerate_update_is_an_error() {
        let model = Arc::new(
            FiniteModel::new(
                vec![0.5, 0.5],
                vec![vec![vec![1.0, 0.0]], vec![vec![1.0, 0.0]]],
                vec![0.0, 1.0],
            )
            .unwrap(),
        );
        let mut posterior = FinitePosterior::new(model);
        let err = posterior.update(0, 1).unwrap_err();
        assert_eq!(err, BanditError::DegeneratePosterior { arm: 0, outcome: 1 });
        assert_eq!(posterior.weights(), &[0.5, 0.5]);
    }

    #[test]
    fn test_expected_reward() {
        let posterior = FinitePosterior::new(grid());
        assert_abs_diff_eq!(posterior.expected_reward(0), 0.525, epsilon = 1e-12);
        assert_abs_diff_eq!(posterior.expected_reward(1), 0.525, epsilon = 1e-12);
    }

    #[test]
    fn test_optimal_arm_distribution_and_gaps() {
        let posterior = FinitePosterior::new(grid());
        let p_star = posterior.optimal_arm_distribution();
        assert_abs_diff_eq!(p_star[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(p_star[1], 0.5, epsilon = 1e-12);

        // E[max] = (0.9 + 0.7 + 0.7 + 0.8) / 4
        assert_abs_diff_eq!(posterior.expected_optimal_reward(), 0.775, epsilon = 1e-12);
        // both arms share the best posterior mean, yet each has a positive gap
        let gaps = posterior.gaps();
        assert_abs_diff_eq!(gaps[0], 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(gaps[1], 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_information_gain_bounds() {
        let posterior = FinitePosterior::new(grid());
        let gains = posterior.information_gains();
        for g in &gains {
            assert!(*g > 0.0);
            assert!(*g <= posterior.entropy() + 1e-12);
        }
    }

    #[test]
    fn test_fully_informative_arm_reveals_entropy() {
        // arm 1 reveals the candidate exactly, arm 0 is uninformative
        let model = Arc::new(
            FiniteModel::new(
                vec![0.5, 0.5],
                vec![
                    vec![vec![0.5, 0.5], vec![1.0, 0.0]],
                    vec![vec![0.5, 0.5], vec![0.0, 1.0]],
                ],
                vec![0.0, 1.0],
            )
            .unwrap(),
        );
        let posterior = FinitePosterior::new(model);
        let gains = posterior.information_gains();
        assert_eq!(gains[0], 0.0);
        assert_abs_diff_eq!(gains[1], posterior.entropy(), epsilon = 1e-12);
        assert_abs_diff_eq!(gains[1], std::f64::consts::LN_2, epsilon = 1e-12);
    }

    #[test]
    fn test_concentrated_posterior_has_no_gain() {
        let mut posterior = FinitePosterior::new(grid());
        posterior.prior = vec![1.0, 0.0, 0.0, 0.0];
        assert_eq!(posterior.information_gains(), vec![0.0, 0.0]);
        let gaps = posterior.gaps();
        assert_eq!(gaps[0], 0.0);
        assert!(gaps[1] > 0.0);
    }
}

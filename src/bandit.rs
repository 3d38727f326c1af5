use std::sync::Arc;

use rand::RngCore;

use crate::arm::{Observation, RewardModel};
use crate::error::{BanditError, Result};
use crate::finite::FiniteModel;

/// The Bayesian model a policy assumes about a bandit.
///
/// Every bandit family carries the prior its posterior starts from. The prior
/// never reveals the true arm parameters.
#[derive(Clone, Debug)]
pub enum Prior {
    /// Independent `Beta(alpha, beta)` priors on Bernoulli success probabilities.
    Beta { alpha: f64, beta: f64 },
    /// Independent `N(mean, variance)` priors on arm means with known noise.
    Gaussian {
        mean: f64,
        variance: f64,
        noise_std: Vec<f64>,
    },
    /// `N(0, prior_variance · I)` prior on the shared linear parameter.
    Linear {
        features: Arc<Vec<Vec<f64>>>,
        prior_variance: f64,
        noise_std: f64,
    },
    /// Discrete prior over the candidates of a finite model.
    Finite(Arc<FiniteModel>),
}

/// A stochastic multi-armed bandit instance
///
/// Holds the true reward model of every arm, the best achievable mean reward,
/// and the prior a Bayesian policy starts from. `best_mean` is computed once at
/// construction.
#[derive(Clone, Debug)]
pub struct BanditInstance {
    arms: Vec<RewardModel>,
    best_mean: f64,
    prior: Prior,
}

impl BanditInstance {
    /// Creates a new bandit with the given arms and prior
    pub fn new(arms: Vec<RewardModel>, prior: Prior) -> Result<Self> {
        if arms.is_empty() {
            return Err(BanditError::NoArmsAvailable);
        }
        validate_prior(&prior, arms.len())?;

        let best_mean = arms
            .iter()
            .map(RewardModel::true_mean)
            .fold(f64::NEG_INFINITY, f64::max);

        Ok(Self {
            arms,
            best_mean,
            prior,
        })
    }

    /// Bernoulli bandit with a uniform `Beta(1, 1)` prior on every arm
    pub fn bernoulli(probs: &[f64]) -> Result<Self> {
        let arms = probs
            .iter()
            .map(|&p| RewardModel::bernoulli(p))
            .collect::<Result<Vec<_>>>()?;
        Self::new(
            arms,
            Prior::Beta {
                alpha: 1.0,
                beta: 1.0,
            },
        )
    }

    /// Gaussian bandit from `(mean, std)` pairs with a `N(0, 1)` prior on each mean
    pub fn gaussian(params: &[(f64, f64)]) -> Result<Self> {
        let arms = params
            .iter()
            .map(|&(mean, std)| RewardModel::gaussian(mean, std))
            .collect::<Result<Vec<_>>>()?;
        let noise_std = params.iter().map(|&(_, std)| std).collect();
        Self::new(
            arms,
            Prior::Gaussian {
                mean: 0.0,
                variance: 1.0,
                noise_std,
            },
        )
    }

    /// Linear-Gaussian bandit: arm `k` pays `theta · features[k] + N(0, noise_std²)`
    ///
    /// The policy's prior on `theta` is `N(0, prior_variance · I)`.
    pub fn linear_gaussian(
        theta: Vec<f64>,
        features: Vec<Vec<f64>>,
        noise_std: f64,
        prior_variance: f64,
    ) -> Result<Self> {
        let theta: Arc<[f64]> = Arc::from(theta);
        let arms = features
            .iter()
            .map(|x| RewardModel::linear_gaussian(theta.clone(), x.clone(), noise_std))
            .collect::<Result<Vec<_>>>()?;
        Self::new(
            arms,
            Prior::Linear {
                features: Arc::new(features),
                prior_variance,
                noise_std,
            },
        )
    }

    /// Finite-parameter bandit whose arms follow candidate `true_index`
    pub fn finite(model: Arc<FiniteModel>, true_index: usize) -> Result<Self> {
        if true_index >= model.n_candidates() {
            return Err(BanditError::invalid(format!(
                "true candidate index {true_index} out of range for {} candidates",
                model.n_candidates()
            )));
        }
        let arm_probs = (0..model.n_arms())
            .map(|k| model.outcome_probs(true_index, k).to_vec())
            .collect();
        Self::finite_with_arms(model, arm_probs)
    }

    /// Finite-parameter bandit with explicit true outcome distributions per arm
    ///
    /// The true distributions do not need to match any candidate of `model`.
    pub fn finite_with_arms(model: Arc<FiniteModel>, arm_probs: Vec<Vec<f64>>) -> Result<Self> {
        let arms = arm_probs
            .into_iter()
            .map(|probs| RewardModel::finite(model.rewards().to_vec(), probs))
            .collect::<Result<Vec<_>>>()?;
        Self::new(arms, Prior::Finite(model))
    }

    /// Number of arms
    pub fn n_arms(&self) -> usize {
        self.arms.len()
    }

    /// Gets the arms
    pub fn arms(&self) -> &[RewardModel] {
        &self.arms
    }

    /// Best true mean reward over all arms
    pub fn best_mean(&self) -> f64 {
        self.best_mean
    }

    /// The prior a Bayesian policy starts from
    pub fn prior(&self) -> &Prior {
        &self.prior
    }

    /// Pull arm `arm` and observe its reward
    pub fn pull(&self, arm: usize, rng: &mut dyn RngCore) -> Result<Observation> {
        self.arm(arm).map(|model| model.sample(rng))
    }

    /// Instantaneous pseudo-regret of pulling `arm`
    pub fn regret(&self, arm: usize) -> Result<f64> {
        self.arm(arm)
            .map(|model| (self.best_mean - model.true_mean()).max(0.0))
    }

    fn arm(&self, arm: usize) -> Result<&RewardModel> {
        self.arms.get(arm).ok_or(BanditError::ArmOutOfRange {
            arm,
            n_arms: self.arms.len(),
        })
    }
}

fn validate_prior(prior: &Prior, n_arms: usize) -> Result<()> {
    match prior {
        Prior::Beta { alpha, beta } => {
            if !(*alpha > 0.0 && *beta > 0.0) {
                return Err(BanditError::invalid(format!(
                    "beta prior parameters must be positive, got ({alpha}, {beta})"
                )));
            }
        }
        Prior::Gaussian {
            mean,
            variance,
            noise_std,
        } => {
            if !mean.is_finite() || !(*variance > 0.0) || !variance.is_finite() {
                return Err(BanditError::invalid(format!(
                    "gaussian prior needs a finite mean and positive variance, got ({mean}, {variance})"
                )));
            }
            if noise_std.len() != n_arms {
                return Err(BanditError::invalid(format!(
                    "gaussian prior has {} noise levels for {n_arms} arms",
                    noise_std.len()
                )));
            }
            if let Some(std) = noise_std.iter().find(|s| !(**s > 0.0)) {
                return Err(BanditError::invalid(format!(
                    "gaussian posterior needs positive noise std, got {std}"
                )));
            }
        }
        Prior::Linear {
            features,
            prior_variance,
            noise_std,
        } => {
            if features.len() != n_arms {
                return Err(BanditError::invalid(format!(
                    "linear prior has {} feature vectors for {n_arms} arms",
                    features.len()
                )));
            }
            if !(*prior_variance > 0.0) || !(*noise_std > 0.0) {
                return Err(BanditError::invalid(format!(
                    "linear prior needs positive variance and noise std, got ({prior_variance}, {noise_std})"
                )));
            }
        }
        Prior::Finite(model) => {
            if model.n_arms() != n_arms {
                return Err(BanditError::invalid(format!(
                    "finite model describes {} arms but the bandit has {n_arms}",
                    model.n_arms()
                )));
            }
        }
    }
    Ok(())
}

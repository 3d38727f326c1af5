//! Reward models for bandit arms.
//!
//! A [`RewardModel`] is the reward-generating distribution behind one arm. Its
//! parameters are fixed at construction; only the random source varies between
//! pulls. The true mean is bookkeeping for pseudo-regret and is never shown to
//! a policy.

use std::sync::Arc;

use rand::{Rng, RngCore};
use rand::distr::weighted::WeightedIndex;
use rand_distr::{Distribution, Normal};

use crate::error::{BanditError, Result};

/// Tolerance used when checking that probability vectors sum to one.
pub(crate) const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// The result of pulling an arm.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observation {
    /// Observed reward.
    pub reward: f64,
    /// Outcome index, only set for arms with a finite outcome set.
    pub outcome: Option<usize>,
}

impl Observation {
    /// Observation without an outcome index.
    pub fn reward(reward: f64) -> Self {
        Self {
            reward,
            outcome: None,
        }
    }
}

/// Represents the reward distribution of a single arm.
///
/// # Examples
///
/// ```
/// use infobandit::RewardModel;
///
/// let coin = RewardModel::bernoulli(0.3).unwrap();
/// assert_eq!(coin.true_mean(), 0.3);
///
/// let noisy = RewardModel::gaussian(1.5, 2.0).unwrap();
/// assert_eq!(noisy.true_mean(), 1.5);
/// ```
#[derive(Clone, Debug)]
pub enum RewardModel {
    /// Binary reward with success probability `p`.
    Bernoulli(Bernoulli),
    /// Normally distributed reward.
    Gaussian(Gaussian),
    /// Reward `theta · features` plus Gaussian noise.
    LinearGaussian(LinearGaussian),
    /// Reward drawn from a finite outcome set.
    Finite(FiniteOutcomes),
}

impl RewardModel {
    /// Bernoulli arm; `p` must lie in `[0, 1]`.
    pub fn bernoulli(p: f64) -> Result<Self> {
        Bernoulli::new(p).map(RewardModel::Bernoulli)
    }

    /// Gaussian arm; `std` must be finite and non-negative.
    pub fn gaussian(mean: f64, std: f64) -> Result<Self> {
        Gaussian::new(mean, std).map(RewardModel::Gaussian)
    }

    /// Linear-Gaussian arm sharing the latent `theta` with its siblings.
    pub fn linear_gaussian(theta: Arc<[f64]>, features: Vec<f64>, noise_std: f64) -> Result<Self> {
        LinearGaussian::new(theta, features, noise_std).map(RewardModel::LinearGaussian)
    }

    /// Finite-outcome arm: outcome `o` has reward `values[o]` and probability `probs[o]`.
    pub fn finite(values: Vec<f64>, probs: Vec<f64>) -> Result<Self> {
        FiniteOutcomes::new(values, probs).map(RewardModel::Finite)
    }

    /// Draw one observation.
    pub fn sample(&self, rng: &mut dyn RngCore) -> Observation {
        match self {
            RewardModel::Bernoulli(arm) => arm.sample(rng),
            RewardModel::Gaussian(arm) => arm.sample(rng),
            RewardModel::LinearGaussian(arm) => arm.sample(rng),
            RewardModel::Finite(arm) => arm.sample(rng),
        }
    }

    /// Expected reward of the arm.
    pub fn true_mean(&self) -> f64 {
        match self {
            RewardModel::Bernoulli(arm) => arm.p,
            RewardModel::Gaussian(arm) => arm.mean,
            RewardModel::LinearGaussian(arm) => arm.mean,
            RewardModel::Finite(arm) => arm.mean,
        }
    }
}

/// Bernoulli reward distribution.
#[derive(Clone, Debug)]
pub struct Bernoulli {
    p: f64,
}

impl Bernoulli {
    pub fn new(p: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&p) {
            return Err(BanditError::invalid(format!(
                "bernoulli probability must be in [0, 1], got {p}"
            )));
        }
        Ok(Self { p })
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    fn sample(&self, rng: &mut dyn RngCore) -> Observation {
        let hit = rng.random::<f64>() < self.p;
        Observation::reward(if hit { 1.0 } else { 0.0 })
    }
}

/// Gaussian reward distribution.
#[derive(Clone, Debug)]
pub struct Gaussian {
    mean: f64,
    std: f64,
    normal: Normal<f64>,
}

impl Gaussian {
    pub fn new(mean: f64, std: f64) -> Result<Self> {
        if !mean.is_finite() {
            return Err(BanditError::invalid(format!(
                "gaussian mean must be finite, got {mean}"
            )));
        }
        if !std.is_finite() || std < 0.0 {
            return Err(BanditError::invalid(format!(
                "standard deviation must be finite and non-negative, got {std}"
            )));
        }
        let normal = Normal::new(mean, std).map_err(|e| BanditError::invalid(e.to_string()))?;
        Ok(Self { mean, std, normal })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std(&self) -> f64 {
        self.std
    }

    fn sample(&self, rng: &mut dyn RngCore) -> Observation {
        Observation::reward(self.normal.sample(rng))
    }
}

/// Linear reward `theta · features + N(0, noise_std²)`.
#[derive(Clone, Debug)]
pub struct LinearGaussian {
    theta: Arc<[f64]>,
    features: Vec<f64>,
    mean: f64,
    noise: Normal<f64>,
}

impl LinearGaussian {
    pub fn new(theta: Arc<[f64]>, features: Vec<f64>, noise_std: f64) -> Result<Self> {
        if features.len() != theta.len() {
            return Err(BanditError::invalid(format!(
                "feature vector has {} entries but theta has {}",
                features.len(),
                theta.len()
            )));
        }
        if !noise_std.is_finite() || noise_std < 0.0 {
            return Err(BanditError::invalid(format!(
                "noise standard deviation must be finite and non-negative, got {noise_std}"
            )));
        }
        let mean = dot(&theta, &features);
        let noise =
            Normal::new(0.0, noise_std).map_err(|e| BanditError::invalid(e.to_string()))?;
        Ok(Self {
            theta,
            features,
            mean,
            noise,
        })
    }

    pub fn features(&self) -> &[f64] {
        &self.features
    }

    pub fn theta(&self) -> &[f64] {
        &self.theta
    }

    pub fn noise_std(&self) -> f64 {
        self.noise.std_dev()
    }

    fn sample(&self, rng: &mut dyn RngCore) -> Observation {
        Observation::reward(self.mean + self.noise.sample(rng))
    }
}

/// Finite outcome distribution.
#[derive(Clone, Debug)]
pub struct FiniteOutcomes {
    values: Vec<f64>,
    probs: Vec<f64>,
    mean: f64,
    sampler: WeightedIndex<f64>,
}

impl FiniteOutcomes {
    pub fn new(values: Vec<f64>, probs: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(BanditError::invalid("finite arm needs at least one outcome"));
        }
        if values.len() != probs.len() {
            return Err(BanditError::invalid(format!(
                "finite arm has {} outcome values but {} probabilities",
                values.len(),
                probs.len()
            )));
        }
        validate_distribution(&probs, "outcome probabilities")?;
        let mean = dot(&values, &probs);
        let sampler =
            WeightedIndex::new(&probs).map_err(|e| BanditError::invalid(e.to_string()))?;
        Ok(Self {
            values,
            probs,
            mean,
            sampler,
        })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn probs(&self) -> &[f64] {
        &self.probs
    }

    fn sample(&self, rng: &mut dyn RngCore) -> Observation {
        let outcome = self.sampler.sample(rng);
        Observation {
            reward: self.values[outcome],
            outcome: Some(outcome),
        }
    }
}

/// Check that `probs` is a probability vector.
pub(crate) fn validate_distribution(probs: &[f64], what: &str) -> Result<()> {
    if let Some(p) = probs.iter().find(|p| !(0.0..=1.0).contains(*p)) {
        return Err(BanditError::invalid(format!(
            "{what} must be in [0, 1], got {p}"
        )));
    }
    let total: f64 = probs.iter().sum();
    if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(BanditError::invalid(format!(
            "{what} must sum to 1, got {total}"
        )));
    }
    Ok(())
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_bernoulli_validation() {
        assert!(RewardModel::bernoulli(0.0).is_ok());
        assert!(RewardModel::bernoulli(1.0).is_ok());
        assert!(matches!(
            RewardModel::bernoulli(1.2),
            Err(BanditError::InvalidParameter { .. })
        ));
        assert!(RewardModel::bernoulli(-0.1).is_err());
        assert!(RewardModel::bernoulli(f64::NAN).is_err());
    }

    #[test]
    fn test_bernoulli_samples_are_binary() {
        let arm = RewardModel::bernoulli(0.7).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let mut hits = 0.0;
        for _ in 0..5000 {
            let obs = arm.sample(&mut rng);
            assert!(obs.reward == 0.0 || obs.reward == 1.0);
            assert_eq!(obs.outcome, None);
            hits += obs.reward;
        }
        assert!((hits / 5000.0 - 0.7).abs() < 0.03);
    }

    #[test]
    fn test_gaussian_rejects_negative_std() {
        assert!(matches!(
            RewardModel::gaussian(0.0, -1.0),
            Err(BanditError::InvalidParameter { .. })
        ));
        let degenerate = RewardModel::gaussian(2.5, 0.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(degenerate.sample(&mut rng).reward, 2.5);
    }

    #[test]
    fn test_linear_gaussian_mean() {
        let theta: Arc<[f64]> = Arc::from(vec![1.0, -2.0, 0.5]);
        let arm = RewardModel::linear_gaussian(theta.clone(), vec![0.5, 0.25, 2.0], 1.0).unwrap();
        assert_abs_diff_eq!(arm.true_mean(), 1.0, epsilon = 1e-12);

        let mismatched = RewardModel::linear_gaussian(theta, vec![1.0], 1.0);
        assert!(matches!(mismatched, Err(BanditError::InvalidParameter { .. })));
    }

    #[test]
    fn test_finite_outcomes() {
        let arm = RewardModel::finite(vec![0.0, 0.5, 1.0], vec![0.2, 0.3, 0.5]).unwrap();
        assert_abs_diff_eq!(arm.true_mean(), 0.65, epsilon = 1e-12);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let obs = arm.sample(&mut rng);
            let outcome = obs.outcome.unwrap();
            assert_eq!(obs.reward, [0.0, 0.5, 1.0][outcome]);
        }
    }

    #[test]
    fn test_finite_outcomes_validation() {
        assert!(RewardModel::finite(vec![0.0, 1.0], vec![0.5, 0.6]).is_err());
        assert!(RewardModel::finite(vec![0.0, 1.0], vec![1.0]).is_err());
        assert!(RewardModel::finite(vec![0.0, 1.0], vec![1.5, -0.5]).is_err());
        assert!(RewardModel::finite(vec![], vec![]).is_err());
    }
}

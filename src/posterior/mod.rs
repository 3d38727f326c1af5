//! Posterior beliefs over unknown bandit parameters.
//!
//! Each bandit family has a conjugate (or exact discrete) posterior. A
//! [`Posterior`] is created from the instance's [`Prior`] at the start of a
//! trial, mutated after every round, and dropped with the trial.

mod beta;
mod finite;
mod gaussian;
mod linear;

pub use beta::BetaPosterior;
pub use finite::FinitePosterior;
pub use gaussian::GaussianPosterior;
pub use linear::LinearPosterior;

use rand::RngCore;

use crate::arm::Observation;
use crate::bandit::Prior;
use crate::error::{BanditError, Result};

/// Belief over the parameters of one bandit instance
#[derive(Clone, Debug)]
pub enum Posterior {
    Beta(BetaPosterior),
    Gaussian(GaussianPosterior),
    Linear(LinearPosterior),
    Finite(FinitePosterior),
}

impl Posterior {
    /// Posterior at time zero, equal to the prior
    pub fn from_prior(prior: &Prior, n_arms: usize) -> Self {
        match prior {
            Prior::Beta { alpha, beta } => {
                Posterior::Beta(BetaPosterior::new(n_arms, *alpha, *beta))
            }
            Prior::Gaussian {
                mean,
                variance,
                noise_std,
            } => Posterior::Gaussian(GaussianPosterior::new(*mean, *variance, noise_std)),
            Prior::Linear {
                features,
                prior_variance,
                noise_std,
            } => Posterior::Linear(LinearPosterior::new(
                features.clone(),
                *prior_variance,
                *noise_std,
            )),
            Prior::Finite(model) => Posterior::Finite(FinitePosterior::new(model.clone())),
        }
    }

    /// Condition on the observation made after pulling `arm`
    pub fn update(&mut self, arm: usize, observation: &Observation) -> Result<()> {
        match self {
            Posterior::Beta(p) => p.update(arm, observation.reward),
            Posterior::Gaussian(p) => p.update(arm, observation.reward),
            Posterior::Linear(p) => p.update(arm, observation.reward),
            Posterior::Finite(p) => {
                let outcome = observation.outcome.ok_or_else(|| {
                    BanditError::invalid("finite posterior needs an outcome index")
                })?;
                p.update(arm, outcome)?;
            }
        }
        Ok(())
    }

    /// Posterior mean reward of `arm`
    pub fn expected_reward(&self, arm: usize) -> f64 {
        match self {
            Posterior::Beta(p) => p.expected_reward(arm),
            Posterior::Gaussian(p) => p.expected_reward(arm),
            Posterior::Linear(p) => p.expected_reward(arm),
            Posterior::Finite(p) => p.expected_reward(arm),
        }
    }

    /// One joint posterior draw of every arm's mean reward
    pub fn sample_means(&self, rng: &mut dyn RngCore) -> Result<Vec<f64>> {
        match self {
            Posterior::Beta(p) => p.sample_means(rng),
            Posterior::Gaussian(p) => p.sample_means(rng),
            Posterior::Linear(p) => p.sample_means(rng),
            Posterior::Finite(p) => p.sample_means(rng),
        }
    }

    /// `n` independent draws of every arm's mean reward
    pub fn sample_many(&self, n: usize, rng: &mut dyn RngCore) -> Result<Vec<Vec<f64>>> {
        match self {
            Posterior::Linear(p) => p.sample_many(n, rng),
            _ => (0..n).map(|_| self.sample_means(rng)).collect(),
        }
    }
}

/// Per-arm empirical statistics
#[derive(Clone, Debug, Default)]
pub struct ArmStats {
    pub pulls: usize,
    pub total_reward: f64,
}

impl ArmStats {
    pub fn average_reward(&self) -> f64 {
        if self.pulls == 0 {
            0.0
        } else {
            self.total_reward / self.pulls as f64
        }
    }
}

/// Everything a policy may consult when choosing an arm
///
/// Bundles the posterior with empirical pull statistics. It contains no true
/// arm parameters.
#[derive(Clone, Debug)]
pub struct Belief {
    posterior: Posterior,
    stats: Vec<ArmStats>,
    round: usize,
}

impl Belief {
    pub fn new(posterior: Posterior, n_arms: usize) -> Self {
        Self {
            posterior,
            stats: vec![ArmStats::default(); n_arms],
            round: 0,
        }
    }

    /// Record an observation in the posterior and the empirical statistics
    pub fn observe(&mut self, arm: usize, observation: &Observation) -> Result<()> {
        let n_arms = self.stats.len();
        let stats = self
            .stats
            .get_mut(arm)
            .ok_or(BanditError::ArmOutOfRange { arm, n_arms })?;
        stats.pulls += 1;
        stats.total_reward += observation.reward;
        self.round += 1;
        self.posterior.update(arm, observation)
    }

    pub fn posterior(&self) -> &Posterior {
        &self.posterior
    }

    pub fn n_arms(&self) -> usize {
        self.stats.len()
    }

    pub fn stats(&self, arm: usize) -> &ArmStats {
        &self.stats[arm]
    }

    /// Number of observations so far
    pub fn round(&self) -> usize {
        self.round
    }

    /// Posterior mean reward of every arm
    pub fn expected_rewards(&self) -> Vec<f64> {
        (0..self.n_arms())
            .map(|k| self.posterior.expected_reward(k))
            .collect()
    }
}

//! Finite-parameter-space bandit models.
//!
//! The latent parameter is one of `M` candidates. Candidate `m` fixes, for every
//! arm `k`, a distribution `q[m][k][·]` over `N` outcomes, and outcome `o` pays
//! `rewards[o]`. The model is read-only once built and is shared between trials
//! behind an `Arc`.

use rand::{Rng, RngCore};

use crate::arm::validate_distribution;
use crate::error::{BanditError, Result};
use crate::utils::argmax;

/// Prior, outcome tensor and reward map of a finite-parameter problem.
#[derive(Clone, Debug)]
pub struct FiniteModel {
    prior: Vec<f64>,
    /// Row-major `[candidate][arm][outcome]`.
    q: Vec<f64>,
    rewards: Vec<f64>,
    n_arms: usize,
    /// `means[m * n_arms + k]` is the mean reward of arm `k` under candidate `m`.
    means: Vec<f64>,
    /// Optimal arm under each candidate, lowest index on ties.
    optimal_arms: Vec<usize>,
}

impl FiniteModel {
    /// Build and validate a finite model.
    ///
    /// # Arguments
    /// * `prior` - probability of each of the `M` candidates
    /// * `q` - `M × K × N` conditional outcome probabilities
    /// * `rewards` - reward paid by each of the `N` outcomes
    pub fn new(prior: Vec<f64>, q: Vec<Vec<Vec<f64>>>, rewards: Vec<f64>) -> Result<Self> {
        if prior.is_empty() {
            return Err(BanditError::invalid("finite model needs at least one candidate"));
        }
        if q.len() != prior.len() {
            return Err(BanditError::invalid(format!(
                "prior has {} candidates but the outcome tensor has {}",
                prior.len(),
                q.len()
            )));
        }
        validate_distribution(&prior, "prior probabilities")?;

        let n_arms = q[0].len();
        if n_arms == 0 {
            return Err(BanditError::NoArmsAvailable);
        }
        let n_outcomes = rewards.len();
        if n_outcomes == 0 {
            return Err(BanditError::invalid("finite model needs at least one outcome"));
        }

        let mut flat = Vec::with_capacity(prior.len() * n_arms * n_outcomes);
        for (m, per_arm) in q.iter().enumerate() {
            if per_arm.len() != n_arms {
                return Err(BanditError::invalid(format!(
                    "candidate {m} defines {} arms, expected {n_arms}",
                    per_arm.len()
                )));
            }
            for (k, row) in per_arm.iter().enumerate() {
                if row.len() != n_outcomes {
                    return Err(BanditError::invalid(format!(
                        "q[{m}][{k}] has {} outcomes, expected {n_outcomes}",
                        row.len()
                    )));
                }
                validate_distribution(row, &format!("q[{m}][{k}]"))?;
                flat.extend_from_slice(row);
            }
        }

        let means: Vec<f64> = flat
            .chunks(n_outcomes)
            .map(|row| row.iter().zip(&rewards).map(|(p, r)| p * r).sum())
            .collect();
        let optimal_arms = means.chunks(n_arms).map(argmax).collect();

        Ok(Self {
            prior,
            q: flat,
            rewards,
            n_arms,
            means,
            optimal_arms,
        })
    }

    /// Random grid of Bernoulli candidates with a uniform prior.
    ///
    /// Every candidate draws each arm's probability of outcome `0` uniformly;
    /// outcome `o` pays reward `o`.
    pub fn bernoulli_grid(n_candidates: usize, n_arms: usize, rng: &mut dyn RngCore) -> Result<Self> {
        if n_candidates == 0 {
            return Err(BanditError::invalid("n_candidates must be positive"));
        }
        if n_arms == 0 {
            return Err(BanditError::NoArmsAvailable);
        }
        let prior = vec![1.0 / n_candidates as f64; n_candidates];
        let q = (0..n_candidates)
            .map(|_| {
                (0..n_arms)
                    .map(|_| {
                        let fail: f64 = rng.random();
                        vec![fail, 1.0 - fail]
                    })
                    .collect()
            })
            .collect();
        Self::new(prior, q, vec![0.0, 1.0])
    }

    pub fn prior(&self) -> &[f64] {
        &self.prior
    }

    pub fn rewards(&self) -> &[f64] {
        &self.rewards
    }

    pub fn n_candidates(&self) -> usize {
        self.prior.len()
    }

    pub fn n_arms(&self) -> usize {
        self.n_arms
    }

    pub fn n_outcomes(&self) -> usize {
        self.rewards.len()
    }

    /// Outcome distribution of `arm` under candidate `candidate`.
    pub fn outcome_probs(&self, candidate: usize, arm: usize) -> &[f64] {
        let n = self.n_outcomes();
        let start = (candidate * self.n_arms + arm) * n;
        &self.q[start..start + n]
    }

    /// `q[candidate][arm][outcome]`.
    pub fn likelihood(&self, candidate: usize, arm: usize, outcome: usize) -> f64 {
        self.outcome_probs(candidate, arm)[outcome]
    }

    /// Mean reward of `arm` under `candidate`.
    pub fn mean(&self, candidate: usize, arm: usize) -> f64 {
        self.means[candidate * self.n_arms + arm]
    }

    /// Mean reward of every arm under `candidate`.
    pub fn means(&self, candidate: usize) -> &[f64] {
        &self.means[candidate * self.n_arms..(candidate + 1) * self.n_arms]
    }

    /// Optimal arm under `candidate`.
    pub fn optimal_arm(&self, candidate: usize) -> usize {
        self.optimal_arms[candidate]
    }
}

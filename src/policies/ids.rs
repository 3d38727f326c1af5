//! Information-Directed Sampling.
//!
//! Every round IDS computes, for each arm `k`, the expected regret `Δ(k)` and
//! the expected information gain `g(k)` about the identity of the optimal arm,
//! then plays the distribution over at most two arms that minimizes the
//! information ratio `(E[Δ])² / E[g]`.
//!
//! How `Δ` and `g` are obtained depends on the posterior:
//!
//! - finite candidate sets are handled exactly;
//! - Beta posteriors are approximated by a finite set of posterior draws, on
//!   which the exact computation runs;
//! - Gaussian and linear posteriors use the variance of the conditional arm
//!   means given the optimal arm as the information measure, estimated from
//!   posterior draws.

use std::sync::Arc;

use rand::{Rng, RngCore};
use tracing::debug;

use crate::error::{BanditError, Result};
use crate::finite::FiniteModel;
use crate::policy::{Policy, Selection};
use crate::posterior::{Belief, FinitePosterior, Posterior};
use crate::utils::{NUMERIC_ZERO, argmax};

/// Default number of posterior draws for the sampled approximations
pub const DEFAULT_IDS_SAMPLES: usize = 1000;

/// A randomized choice between two arms
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IdsMixture {
    /// Arm played with probability `p`
    pub first: usize,
    /// Arm played with probability `1 - p`
    pub second: usize,
    /// Probability of playing `first`
    pub p: f64,
    /// Information ratio of the mixture
    pub ratio: f64,
}

/// Outcome of the per-round IDS optimization
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IdsPlan {
    /// An arm with neither regret nor information left to gain
    Terminal(usize),
    /// The ratio-minimizing mixture
    Mixture(IdsMixture),
    /// No arm carries information; fall back to the arm of least regret
    Degenerate(usize),
}

/// Find the ratio-minimizing mixture over pairs of arms
///
/// A pure function of `(delta, gain)`: pairs `(i, j)` with `i <= j` are scanned
/// in lexicographic order and a candidate replaces the current best only when
/// its ratio is strictly smaller. Pairs whose mixture has zero information gain
/// are never selected. Returns `None` when no pair has positive gain.
pub fn ids_mixture(delta: &[f64], gain: &[f64]) -> Option<IdsMixture> {
    let n_arms = delta.len().min(gain.len());
    let mut best: Option<IdsMixture> = None;

    let mut consider = |first: usize, second: usize, p: f64| {
        let g = p * gain[first] + (1.0 - p) * gain[second];
        if g <= NUMERIC_ZERO {
            return;
        }
        let d = p * delta[first] + (1.0 - p) * delta[second];
        let ratio = d * d / g;
        if best.is_none_or(|b| ratio < b.ratio) {
            best = Some(IdsMixture {
                first,
                second,
                p,
                ratio,
            });
        }
    };

    for i in 0..n_arms {
        consider(i, i, 1.0);
        for j in (i + 1)..n_arms {
            for p in candidate_weights(delta[i], delta[j], gain[i], gain[j]) {
                consider(i, j, p);
            }
        }
    }

    best
}

/// Mixture weights worth evaluating for the pair `(i, j)`
///
/// The interior stationary point of `(pΔi + (1-p)Δj)² / (pgi + (1-p)gj)` is
/// `p = Δj / (Δi - Δj) - 2gj / (gi - gj)`, clamped to `[0, 1]`. The boundaries
/// are always evaluated because the stationary point may be a maximum.
fn candidate_weights(di: f64, dj: f64, gi: f64, gj: f64) -> impl Iterator<Item = f64> {
    let dd = di - dj;
    let dg = gi - gj;
    let interior = if dd != 0.0 && dg != 0.0 {
        let p = dj / dd - 2.0 * gj / dg;
        p.is_finite().then(|| p.clamp(0.0, 1.0))
    } else {
        None
    };
    [Some(1.0), Some(0.0), interior].into_iter().flatten()
}

/// Plan one IDS round from the regret and information vectors
pub fn ids_plan(delta: &[f64], gain: &[f64]) -> IdsPlan {
    if let Some(k) =
        (0..delta.len()).find(|&k| delta[k] <= NUMERIC_ZERO && gain[k] <= NUMERIC_ZERO)
    {
        return IdsPlan::Terminal(k);
    }
    match ids_mixture(delta, gain) {
        Some(mixture) => IdsPlan::Mixture(mixture),
        None => {
            let negated: Vec<f64> = delta.iter().map(|d| -d).collect();
            IdsPlan::Degenerate(argmax(&negated))
        }
    }
}

/// Information-Directed Sampling policy
#[derive(Clone, Debug)]
pub struct Ids {
    n_samples: usize,
}

impl Default for Ids {
    fn default() -> Self {
        Self {
            n_samples: DEFAULT_IDS_SAMPLES,
        }
    }
}

impl Ids {
    /// Creates an IDS policy using `n_samples` posterior draws for the
    /// approximated posteriors
    pub fn new(n_samples: usize) -> Result<Self> {
        if n_samples == 0 {
            return Err(BanditError::invalid("IDS needs at least one posterior sample"));
        }
        Ok(Self { n_samples })
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Expected regret and information gain of every arm
    pub fn gaps_and_gains(
        &self,
        belief: &Belief,
        rng: &mut dyn RngCore,
    ) -> Result<(Vec<f64>, Vec<f64>)> {
        match belief.posterior() {
            Posterior::Finite(posterior) => Ok((posterior.gaps(), posterior.information_gains())),
            Posterior::Beta(_) => {
                let draws = self.draws(belief.posterior(), rng)?;
                let particles = bernoulli_particles(&draws)?;
                Ok((particles.gaps(), particles.information_gains()))
            }
            Posterior::Gaussian(_) | Posterior::Linear(_) => {
                let draws = self.draws(belief.posterior(), rng)?;
                Ok(variance_gaps_and_gains(&draws))
            }
        }
    }

    fn draws(&self, posterior: &Posterior, rng: &mut dyn RngCore) -> Result<Vec<Vec<f64>>> {
        posterior.sample_many(self.n_samples, rng)
    }
}

impl Policy for Ids {
    fn select(&self, belief: &Belief, rng: &mut dyn RngCore) -> Result<Selection> {
        let (delta, gain) = self.gaps_and_gains(belief, rng)?;

        let selection = match ids_plan(&delta, &gain) {
            IdsPlan::Terminal(arm) => Selection {
                arm,
                information_ratio: Some(0.0),
                degenerate: false,
            },
            IdsPlan::Mixture(mixture) => {
                let u: f64 = rng.random();
                let arm = if u < mixture.p {
                    mixture.first
                } else {
                    mixture.second
                };
                Selection {
                    arm,
                    information_ratio: Some(mixture.ratio),
                    degenerate: false,
                }
            }
            IdsPlan::Degenerate(arm) => {
                debug!(
                    round = belief.round(),
                    arm, "IDS found no informative arm, playing least-regret arm"
                );
                Selection {
                    arm,
                    information_ratio: Some(f64::INFINITY),
                    degenerate: true,
                }
            }
        };
        Ok(selection)
    }

    fn name(&self) -> &'static str {
        "IDS"
    }
}

/// Finite posterior over Bernoulli posterior draws, each weighted equally
fn bernoulli_particles(draws: &[Vec<f64>]) -> Result<FinitePosterior> {
    let n = draws.len();
    let prior = vec![1.0 / n as f64; n];
    let q = draws
        .iter()
        .map(|theta| theta.iter().map(|&p| vec![1.0 - p, p]).collect())
        .collect();
    let model = FiniteModel::new(prior, q, vec![0.0, 1.0])?;
    Ok(FinitePosterior::new(Arc::new(model)))
}

/// Expected regret and variance-based information measure from posterior draws
///
/// `Δ(k) = E[μ_{a*}] - E[μ_k]` and `v(k) = Σ_a P(a* = a) (E[μ_k | a* = a] - E[μ_k])²`.
pub(crate) fn variance_gaps_and_gains(draws: &[Vec<f64>]) -> (Vec<f64>, Vec<f64>) {
    let n = draws.len() as f64;
    let n_arms = draws.first().map_or(0, Vec::len);

    let mut mean = vec![0.0; n_arms];
    let mut conditional_sum = vec![vec![0.0; n_arms]; n_arms];
    let mut counts = vec![0usize; n_arms];
    let mut optimal_reward = 0.0;

    for draw in draws {
        let star = argmax(draw);
        counts[star] += 1;
        optimal_reward += draw[star];
        for k in 0..n_arms {
            mean[k] += draw[k];
            conditional_sum[star][k] += draw[k];
        }
    }
    mean.iter_mut().for_each(|m| *m /= n);
    optimal_reward /= n;

    let delta = mean.iter().map(|m| (optimal_reward - m).max(0.0)).collect();
    let gain = (0..n_arms)
        .map(|k| {
            let v: f64 = (0..n_arms)
                .filter(|&a| counts[a] > 0)
                .map(|a| {
                    let p_star = counts[a] as f64 / n;
                    let conditional = conditional_sum[a][k] / counts[a] as f64;
                    p_star * (conditional - mean[k]).powi(2)
                })
                .sum();
            if v < NUMERIC_ZERO { 0.0 } else { v }
        })
        .collect();

    (delta, gain)
}

//! Monte Carlo estimation of cumulative regret.
//!
//! A run plays one policy against `n_trials` independently drawn bandit
//! instances for `horizon` rounds each. Trial `i` is seeded with
//! `seed + i`, so two policies run with the same [`HarnessConfig`] face exactly
//! the same sequence of instances.

use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::bandit::BanditInstance;
use crate::error::{BanditError, Result};
use crate::policies::{Policy, PolicyConfig};
use crate::posterior::{Belief, Posterior};

/// Source of fresh bandit instances, one per trial
///
/// Implemented for every `Fn(&mut dyn RngCore) -> Result<BanditInstance>`
/// closure; see [`crate::experiment`] for the ready-made factories.
pub trait BanditFactory: Send + Sync {
    fn build(&self, rng: &mut dyn RngCore) -> Result<BanditInstance>;
}

impl<F> BanditFactory for F
where
    F: Fn(&mut dyn RngCore) -> Result<BanditInstance> + Send + Sync,
{
    fn build(&self, rng: &mut dyn RngCore) -> Result<BanditInstance> {
        self(rng)
    }
}

/// Settings of a Monte Carlo run
#[derive(Clone, Debug, PartialEq)]
pub struct HarnessConfig {
    n_trials: usize,
    horizon: usize,
    seed: u64,
    collect_information_ratio: bool,
    parallel: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            n_trials: 200,
            horizon: 1000,
            seed: 0,
            collect_information_ratio: false,
            parallel: true,
        }
    }
}

impl HarnessConfig {
    pub fn builder() -> HarnessConfigBuilder {
        HarnessConfigBuilder::default()
    }

    pub fn n_trials(&self) -> usize {
        self.n_trials
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Whether traces keep the per-round information ratio reported by IDS
    pub fn collect_information_ratio(&self) -> bool {
        self.collect_information_ratio
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }
}

/// Builder for [`HarnessConfig`], starting from the defaults
#[derive(Clone, Debug, Default)]
pub struct HarnessConfigBuilder {
    config: HarnessConfig,
}

impl HarnessConfigBuilder {
    pub fn n_trials(mut self, n_trials: usize) -> Self {
        self.config.n_trials = n_trials;
        self
    }

    pub fn horizon(mut self, horizon: usize) -> Self {
        self.config.horizon = horizon;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn collect_information_ratio(mut self, collect: bool) -> Self {
        self.config.collect_information_ratio = collect;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    pub fn build(self) -> Result<HarnessConfig> {
        if self.config.n_trials == 0 {
            return Err(BanditError::invalid("n_trials must be at least 1"));
        }
        if self.config.horizon == 0 {
            return Err(BanditError::invalid("horizon must be at least 1"));
        }
        Ok(self.config)
    }
}

/// Outcome of one trial
#[derive(Clone, Debug, PartialEq)]
pub struct RegretTrace {
    /// Cumulative pseudo-regret after each round, non-decreasing
    pub cumulative: Vec<f64>,
    /// Information ratio of every round, when collection is on and the policy
    /// reports one
    pub information_ratio: Option<Vec<f64>>,
    /// Rounds in which IDS found no informative arm
    pub degenerate_rounds: usize,
}

impl RegretTrace {
    /// Cumulative regret after the last round
    pub fn final_regret(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }
}

/// Monte Carlo runner
#[derive(Clone, Debug, Default)]
pub struct MonteCarlo {
    config: HarnessConfig,
}

impl MonteCarlo {
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run every trial of `policy` and return the traces in trial order
    ///
    /// A failing trial aborts the run with [`BanditError::TrialFailed`].
    pub fn run(
        &self,
        factory: &dyn BanditFactory,
        label: &str,
        policy: &PolicyConfig,
    ) -> Result<Vec<RegretTrace>> {
        policy.validate()?;
        let n_trials = self.config.n_trials;
        info!(
            label,
            n_trials,
            horizon = self.config.horizon,
            parallel = self.config.parallel,
            "starting policy run"
        );

        let trial = |trial: usize| {
            self.run_trial(factory, label, policy, trial)
                .map_err(|source| BanditError::TrialFailed {
                    label: label.to_string(),
                    trial,
                    source: Box::new(source),
                })
        };
        let traces = if self.config.parallel {
            (0..n_trials)
                .into_par_iter()
                .map(trial)
                .collect::<Result<Vec<_>>>()?
        } else {
            (0..n_trials).map(trial).collect::<Result<Vec<_>>>()?
        };

        let mean_final =
            traces.iter().map(RegretTrace::final_regret).sum::<f64>() / n_trials as f64;
        info!(label, n_trials, mean_final_regret = mean_final, "policy run complete");
        Ok(traces)
    }

    fn run_trial(
        &self,
        factory: &dyn BanditFactory,
        label: &str,
        policy_config: &PolicyConfig,
        trial: usize,
    ) -> Result<RegretTrace> {
        let mut instance_rng =
            Xoshiro256PlusPlus::seed_from_u64(self.config.seed.wrapping_add(trial as u64));
        let mut rng = instance_rng.clone();
        rng.jump();

        let bandit = factory.build(&mut instance_rng)?;
        let policy = policy_config.build()?;
        let trace = play(&bandit, policy.as_ref(), &self.config, &mut rng)?;

        if trace.degenerate_rounds > 0 {
            warn!(
                label,
                trial,
                degenerate_rounds = trace.degenerate_rounds,
                "IDS found no informative arm in some rounds"
            );
        }
        debug!(label, trial, final_regret = trace.final_regret(), "trial complete");
        Ok(trace)
    }
}

/// Play `policy` on `bandit` for `config.horizon()` rounds
///
/// Each round selects an arm, pulls it, accumulates its pseudo-regret and
/// conditions the belief on the observation.
pub fn play(
    bandit: &BanditInstance,
    policy: &dyn Policy,
    config: &HarnessConfig,
    rng: &mut dyn RngCore,
) -> Result<RegretTrace> {
    let n_arms = bandit.n_arms();
    let horizon = config.horizon;
    let mut belief = Belief::new(Posterior::from_prior(bandit.prior(), n_arms), n_arms);

    let mut cumulative = Vec::with_capacity(horizon);
    let mut ratios = config
        .collect_information_ratio
        .then(|| Vec::with_capacity(horizon));
    let mut degenerate_rounds = 0;
    let mut total = 0.0;

    for _ in 0..horizon {
        let selection = policy.select(&belief, rng)?;
        let observation = bandit.pull(selection.arm, rng)?;
        total += bandit.regret(selection.arm)?;
        cumulative.push(total);

        if selection.degenerate {
            degenerate_rounds += 1;
        }
        if let (Some(ratios), Some(ratio)) = (ratios.as_mut(), selection.information_ratio) {
            ratios.push(ratio);
        }
        belief.observe(selection.arm, &observation)?;
    }

    Ok(RegretTrace {
        cumulative,
        information_ratio: ratios.filter(|r| r.len() == horizon),
        degenerate_rounds,
    })
}

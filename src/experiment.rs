//! Experiment front door and ready-made bandit factories.
//!
//! ```no_run
//! use infobandit::experiment::{bernoulli_uniform, run_experiment};
//! use infobandit::{HarnessConfig, PolicyConfig, PolicyRegistry};
//!
//! let registry = PolicyRegistry::new()
//!     .with("TS", PolicyConfig::Thompson)?
//!     .with("IDS", PolicyConfig::ids())?;
//! let config = HarnessConfig::builder().n_trials(100).horizon(500).build()?;
//! let result = run_experiment(&bernoulli_uniform(10)?, &registry, &config)?;
//! for (label, summary) in result.iter() {
//!     println!("{label}: {:.2} ± {:.2}", summary.mean, summary.std);
//! }
//! # Ok::<(), infobandit::BanditError>(())
//! ```

use std::sync::Arc;

use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal, StandardNormal};
use tracing::info;

use crate::bandit::BanditInstance;
use crate::error::{BanditError, Result};
use crate::finite::FiniteModel;
use crate::harness::{BanditFactory, HarnessConfig, MonteCarlo};
use crate::policies::PolicyRegistry;
use crate::summary::{ExperimentResult, PolicySummary};

/// Run every registered policy on instances drawn from `factory`
///
/// Policies are run in registration order with the same harness seed, so they
/// all face the same instances. The first failing trial aborts the experiment.
pub fn run_experiment(
    factory: &dyn BanditFactory,
    registry: &PolicyRegistry,
    config: &HarnessConfig,
) -> Result<ExperimentResult> {
    if registry.is_empty() {
        return Err(BanditError::invalid("no policies registered"));
    }
    info!(
        n_policies = registry.len(),
        n_trials = config.n_trials(),
        horizon = config.horizon(),
        seed = config.seed(),
        "starting experiment"
    );

    let runner = MonteCarlo::new(config.clone());
    let mut result = ExperimentResult::new();
    for (label, policy) in registry.iter() {
        let traces = runner.run(factory, label, policy)?;
        let summary = PolicySummary::from_traces(&traces)?;
        info!(
            label,
            mean = summary.mean,
            std = summary.std,
            degenerate_rounds = summary.degenerate_rounds,
            "policy summarized"
        );
        result.insert(label.to_string(), summary);
    }

    info!(n_policies = result.len(), "experiment complete");
    Ok(result)
}

/// The same Bernoulli instance in every trial
#[derive(Clone, Debug)]
pub struct BernoulliFixed {
    bandit: BanditInstance,
}

pub fn bernoulli_fixed(probs: &[f64]) -> Result<BernoulliFixed> {
    Ok(BernoulliFixed {
        bandit: BanditInstance::bernoulli(probs)?,
    })
}

impl BanditFactory for BernoulliFixed {
    fn build(&self, _rng: &mut dyn RngCore) -> Result<BanditInstance> {
        Ok(self.bandit.clone())
    }
}

/// Bernoulli arms with success probabilities drawn from `U(0, 1)` per trial
#[derive(Clone, Debug)]
pub struct BernoulliUniform {
    n_arms: usize,
}

pub fn bernoulli_uniform(n_arms: usize) -> Result<BernoulliUniform> {
    if n_arms == 0 {
        return Err(BanditError::NoArmsAvailable);
    }
    Ok(BernoulliUniform { n_arms })
}

impl BanditFactory for BernoulliUniform {
    fn build(&self, rng: &mut dyn RngCore) -> Result<BanditInstance> {
        let probs: Vec<f64> = (0..self.n_arms).map(|_| rng.random::<f64>()).collect();
        BanditInstance::bernoulli(&probs)
    }
}

/// Gaussian arms with means drawn from `N(0, 1)` and unit noise per trial
#[derive(Clone, Debug)]
pub struct GaussianStandard {
    n_arms: usize,
}

pub fn gaussian_standard(n_arms: usize) -> Result<GaussianStandard> {
    if n_arms == 0 {
        return Err(BanditError::NoArmsAvailable);
    }
    Ok(GaussianStandard { n_arms })
}

impl BanditFactory for GaussianStandard {
    fn build(&self, rng: &mut dyn RngCore) -> Result<BanditInstance> {
        let params: Vec<(f64, f64)> = (0..self.n_arms)
            .map(|_| {
                let mean: f64 = StandardNormal.sample(rng);
                (mean, 1.0)
            })
            .collect();
        BanditInstance::gaussian(&params)
    }
}

/// Parameters of the linear-Gaussian experiment of Russo & Van Roy
#[derive(Clone, Debug, PartialEq)]
pub struct LinearPaperConfig {
    pub n_features: usize,
    pub n_arms: usize,
    /// Features are drawn from `U(-feature_bound, feature_bound)`
    pub feature_bound: f64,
    /// `theta` is drawn from `N(0, prior_variance · I)`
    pub prior_variance: f64,
    pub noise_std: f64,
}

impl Default for LinearPaperConfig {
    fn default() -> Self {
        Self {
            n_features: 5,
            n_arms: 30,
            feature_bound: 1.0 / 5f64.sqrt(),
            prior_variance: 10.0,
            noise_std: 1.0,
        }
    }
}

/// Linear-Gaussian instances with fresh features and parameter per trial
#[derive(Clone, Debug)]
pub struct LinearPaper {
    config: LinearPaperConfig,
    theta_dist: Normal<f64>,
}

pub fn linear_paper(config: LinearPaperConfig) -> Result<LinearPaper> {
    if config.n_arms == 0 {
        return Err(BanditError::NoArmsAvailable);
    }
    if config.n_features == 0 {
        return Err(BanditError::invalid("n_features must be positive"));
    }
    if !(config.feature_bound > 0.0 && config.feature_bound.is_finite()) {
        return Err(BanditError::invalid(format!(
            "feature bound must be positive and finite, got {}",
            config.feature_bound
        )));
    }
    if !(config.prior_variance > 0.0 && config.prior_variance.is_finite()) {
        return Err(BanditError::invalid(format!(
            "prior variance must be positive and finite, got {}",
            config.prior_variance
        )));
    }
    let theta_dist = Normal::new(0.0, config.prior_variance.sqrt())
        .map_err(|e| BanditError::invalid(e.to_string()))?;
    Ok(LinearPaper { config, theta_dist })
}

impl BanditFactory for LinearPaper {
    fn build(&self, rng: &mut dyn RngCore) -> Result<BanditInstance> {
        let LinearPaperConfig {
            n_features,
            n_arms,
            feature_bound,
            prior_variance,
            noise_std,
        } = self.config;

        let features: Vec<Vec<f64>> = (0..n_arms)
            .map(|_| {
                (0..n_features)
                    .map(|_| rng.random_range(-feature_bound..feature_bound))
                    .collect()
            })
            .collect();
        let theta: Vec<f64> = (0..n_features).map(|_| self.theta_dist.sample(rng)).collect();
        BanditInstance::linear_gaussian(theta, features, noise_std, prior_variance)
    }
}

/// Finite-set Bernoulli instances
///
/// Each trial draws a grid of `n_candidates` Bernoulli candidates and true
/// success probabilities from `U(0, 1)` independently of the grid, so the true
/// parameter is generally not one of the candidates.
#[derive(Clone, Debug)]
pub struct FiniteBernoulli {
    n_arms: usize,
    n_candidates: usize,
}

pub fn finite_bernoulli(n_arms: usize, n_candidates: usize) -> Result<FiniteBernoulli> {
    if n_arms == 0 {
        return Err(BanditError::NoArmsAvailable);
    }
    if n_candidates == 0 {
        return Err(BanditError::invalid("n_candidates must be positive"));
    }
    Ok(FiniteBernoulli {
        n_arms,
        n_candidates,
    })
}

impl BanditFactory for FiniteBernoulli {
    fn build(&self, rng: &mut dyn RngCore) -> Result<BanditInstance> {
        let model = Arc::new(FiniteModel::bernoulli_grid(
            self.n_candidates,
            self.n_arms,
            rng,
        )?);
        let arm_probs = (0..self.n_arms)
            .map(|_| {
                let p: f64 = rng.random();
                vec![1.0 - p, p]
            })
            .collect();
        BanditInstance::finite_with_arms(model, arm_probs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bandit::Prior;
    use crate::policies::PolicyConfig;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn small_config() -> HarnessConfig {
        HarnessConfig::builder()
            .n_trials(5)
            .horizon(20)
            .seed(3)
            .build()
            .unwrap()
    }

    #[test]
    fn test_factories_build_expected_families() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);

        let bandit = bernoulli_uniform(4).unwrap().build(&mut rng).unwrap();
        assert_eq!(bandit.n_arms(), 4);
        assert!(matches!(bandit.prior(), Prior::Beta { .. }));

        let bandit = gaussian_standard(3).unwrap().build(&mut rng).unwrap();
        assert!(matches!(bandit.prior(), Prior::Gaussian { .. }));

        let bandit = linear_paper(LinearPaperConfig::default())
            .unwrap()
            .build(&mut rng)
            .unwrap();
        assert_eq!(bandit.n_arms(), 30);
        match bandit.prior() {
            Prior::Linear { features, .. } => {
                let bound = 1.0 / 5f64.sqrt();
                assert!(features.iter().flatten().all(|x| x.abs() <= bound));
                assert!(features.iter().all(|x| x.len() == 5));
            }
            other => panic!("unexpected prior {other:?}"),
        }

        let bandit = finite_bernoulli(3, 8).unwrap().build(&mut rng).unwrap();
        match bandit.prior() {
            Prior::Finite(model) => {
                assert_eq!(model.n_candidates(), 8);
                assert_eq!(model.n_arms(), 3);
            }
            other => panic!("unexpected prior {other:?}"),
        }
    }

    #[test]
    fn test_fixed_factory_repeats_instance() {
        let factory = bernoulli_fixed(&[0.3, 0.6]).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let a = factory.build(&mut rng).unwrap();
        let b = factory.build(&mut rng).unwrap();
        assert_eq!(a.best_mean(), 0.6);
        assert_eq!(a.best_mean(), b.best_mean());
    }

    #[test]
    fn test_factory_validation() {
        assert!(bernoulli_fixed(&[1.2]).is_err());
        assert!(matches!(bernoulli_uniform(0), Err(BanditError::NoArmsAvailable)));
        assert!(gaussian_standard(0).is_err());
        assert!(finite_bernoulli(2, 0).is_err());
        let config = LinearPaperConfig {
            feature_bound: 0.0,
            ..LinearPaperConfig::default()
        };
        assert!(linear_paper(config).is_err());
    }

    #[test]
    fn test_run_experiment_keeps_registration_order() {
        let registry = PolicyRegistry::new()
            .with("random", PolicyConfig::Random)
            .unwrap()
            .with("greedy", PolicyConfig::Greedy)
            .unwrap()
            .with("ucb", PolicyConfig::Ucb { alpha: 1.0 })
            .unwrap();
        let factory = bernoulli_uniform(3).unwrap();
        let result = run_experiment(&factory, &registry, &small_config()).unwrap();

        let labels: Vec<&str> = result.labels().collect();
        assert_eq!(labels, vec!["random", "greedy", "ucb"]);
        for (_, summary) in result.iter() {
            assert_eq!(summary.n_trials(), 5);
            assert_eq!(summary.horizon(), 20);
            assert_eq!(summary.mean_regret.len(), 20);
            assert!(summary.mean >= 0.0);
        }
    }

    #[test]
    fn test_run_experiment_needs_policies() {
        let factory = bernoulli_uniform(3).unwrap();
        assert!(run_experiment(&factory, &PolicyRegistry::new(), &small_config()).is_err());
    }
}

//! infobandit: Bayesian multi-armed bandit simulation.
//!
//! This library evaluates sequential decision-making policies on Bernoulli,
//! Gaussian, linear-Gaussian and finite-parameter bandits and estimates their
//! expected cumulative regret by Monte Carlo. Alongside the classic policies
//! it implements Information-Directed Sampling (IDS), which every round plays
//! the mixture of at most two arms minimizing the information ratio.
//!
//! # Quick Start
//!
//! ```
//! use infobandit::experiment::{bernoulli_fixed, run_experiment};
//! use infobandit::{HarnessConfig, PolicyConfig, PolicyRegistry};
//!
//! let registry = PolicyRegistry::new()
//!     .with("UCB1", PolicyConfig::Ucb { alpha: 1.0 })?
//!     .with("Thompson", PolicyConfig::Thompson)?;
//!
//! let config = HarnessConfig::builder()
//!     .n_trials(10)
//!     .horizon(100)
//!     .seed(42)
//!     .build()?;
//!
//! let factory = bernoulli_fixed(&[0.9, 0.1])?;
//! let result = run_experiment(&factory, &registry, &config)?;
//!
//! let thompson = result.get("Thompson").unwrap();
//! assert_eq!(thompson.mean_regret.len(), 100);
//! assert_eq!(thompson.quantiles.len(), 21);
//! # Ok::<(), infobandit::BanditError>(())
//! ```
//!
//! Lower-level pieces are public too: build a [`BanditInstance`], wrap its
//! prior in a [`Belief`] and call [`Policy::select`] yourself, or play one
//! trial with [`harness::play`].

// #![warn(missing_docs)]

pub mod arm;
mod bandit;
mod error;
pub mod experiment;
mod finite;
pub mod harness;
pub mod policies;
mod policy;
pub mod posterior;
mod regression;
pub mod summary;
mod utils;

// Re-export main types
pub use arm::{Observation, RewardModel};
pub use bandit::{BanditInstance, Prior};
pub use error::{BanditError, Result};
pub use finite::FiniteModel;
pub use harness::{BanditFactory, HarnessConfig, MonteCarlo, RegretTrace};
pub use policies::{Policy, PolicyConfig, PolicyRegistry, Selection};
pub use posterior::{Belief, Posterior};
pub use regression::BayesianLinearRegression;
pub use summary::{ExperimentResult, PolicySummary};

/// Prelude module for convenient imports.
///
/// # Examples
///
/// ```
/// use infobandit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::experiment::run_experiment;
    pub use crate::policies::{
        EpsilonGreedy, Greedy, Ids, Policy, PolicyConfig, PolicyRegistry, Random,
        ThompsonSampling, Ucb,
    };
    pub use crate::{
        BanditError, BanditFactory, BanditInstance, Belief, HarnessConfig, MonteCarlo,
        Observation, Result,
    };
}

//! Bandit policies.
//!
//! Every policy implements [`Policy`]. [`PolicyConfig`] is the closed set of
//! policy variants with their parameters, and [`PolicyRegistry`] maps labels to
//! configurations for an experiment.

mod config;
mod epsilon_greedy;
mod greedy;
pub mod ids;
mod random;
mod thompson;
mod ucb;

pub use crate::policy::{Policy, Selection};
pub use config::{PolicyConfig, PolicyRegistry};
pub use epsilon_greedy::EpsilonGreedy;
pub use greedy::Greedy;
pub use ids::{Ids, IdsMixture, IdsPlan, ids_mixture, ids_plan};
pub use random::Random;
pub use thompson::ThompsonSampling;
pub use ucb::Ucb;

//! Policy trait definition for bandit algorithms

use rand::RngCore;

use crate::error::Result;
use crate::posterior::Belief;

/// The arm a policy chose for one round, with optional diagnostics
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Selection {
    /// The chosen arm
    pub arm: usize,
    /// Information ratio of the distribution the arm was drawn from (IDS only)
    pub information_ratio: Option<f64>,
    /// Set when IDS found no candidate with positive information gain
    pub degenerate: bool,
}

impl Selection {
    /// Plain selection without diagnostics
    pub fn arm(arm: usize) -> Self {
        Self {
            arm,
            information_ratio: None,
            degenerate: false,
        }
    }
}

/// Capability shared by every bandit policy: choose the next arm
///
/// Policies are read-only with respect to the trial: the harness owns the
/// [`Belief`] and updates it with each observation, so one policy value can
/// serve many concurrent trials.
///
/// The trait uses `dyn RngCore` instead of a generic parameter to stay
/// object-safe, allowing `Box<dyn Policy>` in the policy registry.
pub trait Policy: Send + Sync {
    /// Select an arm given everything observed so far in the trial
    ///
    /// # Arguments
    /// - `belief`: posterior and empirical statistics of the current trial
    /// - `rng`: the trial-local random source
    fn select(&self, belief: &Belief, rng: &mut dyn RngCore) -> Result<Selection>;

    /// Short human-readable name
    fn name(&self) -> &'static str;
}

use rand::RngCore;

use crate::error::Result;
use crate::policy::{Policy, Selection};
use crate::posterior::Belief;
use crate::utils::random_argmax;

/// Thompson Sampling policy
///
/// Draws one joint sample of the arm means from the posterior and plays the
/// arm that is best under that sample. Works with every posterior family:
/// Beta for binary rewards, Gaussian for known-noise rewards, a multivariate
/// Gaussian for linear rewards, and a weighted candidate draw for finite sets.
#[derive(Clone, Debug, Default)]
pub struct ThompsonSampling;

impl ThompsonSampling {
    pub fn new() -> Self {
        Self
    }
}

impl Policy for ThompsonSampling {
    fn select(&self, belief: &Belief, rng: &mut dyn RngCore) -> Result<Selection> {
        let draw = belief.posterior().sample_means(rng)?;
        Ok(Selection::arm(random_argmax(&draw, rng)))
    }

    fn name(&self) -> &'static str {
        "Thompson"
    }
}

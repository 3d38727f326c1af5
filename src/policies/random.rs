use rand::{Rng, RngCore};

use crate::error::{BanditError, Result};
use crate::policy::{Policy, Selection};
use crate::posterior::Belief;

/// Random selection policy - selects arms uniformly at random
#[derive(Clone, Debug, Default)]
pub struct Random;

impl Policy for Random {
    fn select(&self, belief: &Belief, rng: &mut dyn RngCore) -> Result<Selection> {
        match belief.n_arms() {
            0 => Err(BanditError::NoArmsAvailable),
            n => Ok(Selection::arm(rng.random_range(0..n))),
        }
    }

    fn name(&self) -> &'static str {
        "Random"
    }
}

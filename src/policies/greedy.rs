use rand::RngCore;

use crate::error::Result;
use crate::policy::{Policy, Selection};
use crate::posterior::Belief;
use crate::utils::random_argmax;

/// Bayesian greedy policy - always plays the arm of highest posterior mean
///
/// Ties are broken uniformly at random.
#[derive(Clone, Debug, Default)]
pub struct Greedy;

impl Policy for Greedy {
    fn select(&self, belief: &Belief, rng: &mut dyn RngCore) -> Result<Selection> {
        let expected = belief.expected_rewards();
        Ok(Selection::arm(random_argmax(&expected, rng)))
    }

    fn name(&self) -> &'static str {
        "Greedy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arm::Observation;
    use crate::bandit::BanditInstance;
    use crate::posterior::Posterior;
    use rand::SeedableRng;

    #[test]
    fn test_greedy_exploits_posterior_mean() {
        let bandit = BanditInstance::bernoulli(&[0.2, 0.8]).unwrap();
        let mut belief = Belief::new(Posterior::from_prior(bandit.prior(), 2), 2);
        belief.observe(0, &Observation::reward(0.0)).unwrap();
        belief.observe(1, &Observation::reward(1.0)).unwrap();

        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for _ in 0..20 {
            assert_eq!(Greedy.select(&belief, &mut rng).unwrap().arm, 1);
        }
    }
}

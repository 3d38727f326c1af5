//! Immutable policy configuration and the label → policy registry.

use indexmap::IndexMap;

use super::{EpsilonGreedy, Greedy, Ids, Random, ThompsonSampling, Ucb};
use crate::error::{BanditError, Result};
use crate::policy::Policy;

/// Configuration of one policy, validated before any trial runs
#[derive(Clone, Debug, PartialEq)]
pub enum PolicyConfig {
    /// Uniformly random arm choice
    Random,
    /// Highest posterior mean
    Greedy,
    /// Explore with probability `epsilon`
    EpsilonGreedy { epsilon: f64 },
    /// UCB1 with confidence parameter `alpha`
    Ucb { alpha: f64 },
    /// Thompson Sampling on the instance's posterior
    Thompson,
    /// Information-Directed Sampling; `n_samples` posterior draws drive the
    /// sampled approximations
    Ids { n_samples: usize },
}

impl PolicyConfig {
    /// IDS with the default number of posterior samples
    pub fn ids() -> Self {
        PolicyConfig::Ids {
            n_samples: super::ids::DEFAULT_IDS_SAMPLES,
        }
    }

    /// Check the parameters without building the policy
    pub fn validate(&self) -> Result<()> {
        self.build().map(|_| ())
    }

    /// Build the policy described by this configuration
    pub fn build(&self) -> Result<Box<dyn Policy>> {
        let policy: Box<dyn Policy> = match *self {
            PolicyConfig::Random => Box::new(Random),
            PolicyConfig::Greedy => Box::new(Greedy),
            PolicyConfig::EpsilonGreedy { epsilon } => Box::new(EpsilonGreedy::new(epsilon)?),
            PolicyConfig::Ucb { alpha } => Box::new(Ucb::new(alpha)?),
            PolicyConfig::Thompson => Box::new(ThompsonSampling),
            PolicyConfig::Ids { n_samples } => Box::new(Ids::new(n_samples)?),
        };
        Ok(policy)
    }
}

/// Policies to compare, keyed by label in registration order
#[derive(Clone, Debug, Default)]
pub struct PolicyRegistry {
    policies: IndexMap<String, PolicyConfig>,
}

impl PolicyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a validated policy under `label`
    pub fn register(&mut self, label: impl Into<String>, config: PolicyConfig) -> Result<()> {
        let label = label.into();
        if self.policies.contains_key(&label) {
            return Err(BanditError::DuplicatePolicy { label });
        }
        config.validate()?;
        self.policies.insert(label, config);
        Ok(())
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, label: impl Into<String>, config: PolicyConfig) -> Result<Self> {
        self.register(label, config)?;
        Ok(self)
    }

    pub fn get(&self, label: &str) -> Option<&PolicyConfig> {
        self.policies.get(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.policies.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PolicyConfig)> {
        self.policies.iter().map(|(label, config)| (label.as_str(), config))
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_validation() {
        assert!(PolicyConfig::EpsilonGreedy { epsilon: 0.5 }.validate().is_ok());
        assert!(matches!(
            PolicyConfig::EpsilonGreedy { epsilon: 1.5 }.validate(),
            Err(BanditError::InvalidParameter { .. })
        ));
        assert!(PolicyConfig::Ucb { alpha: 2.0 }.validate().is_ok());
        assert!(PolicyConfig::Ucb { alpha: 0.0 }.validate().is_err());
        assert!(PolicyConfig::Ids { n_samples: 0 }.validate().is_err());
        assert!(PolicyConfig::ids().validate().is_ok());
    }

    #[test]
    fn test_registry_preserves_order() {
        let registry = PolicyRegistry::new()
            .with("UCB", PolicyConfig::Ucb { alpha: 1.0 })
            .unwrap()
            .with("TS", PolicyConfig::Thompson)
            .unwrap()
            .with("uniform-random", PolicyConfig::Random)
            .unwrap();

        let labels: Vec<&str> = registry.labels().collect();
        assert_eq!(labels, vec!["UCB", "TS", "uniform-random"]);
        assert_eq!(registry.get("TS"), Some(&PolicyConfig::Thompson));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_registry_rejects_bad_entries() {
        let mut registry = PolicyRegistry::new();
        registry.register("greedy", PolicyConfig::Greedy).unwrap();
        assert_eq!(
            registry.register("greedy", PolicyConfig::Random).unwrap_err(),
            BanditError::DuplicatePolicy {
                label: "greedy".to_string()
            }
        );
        assert!(registry
            .register("eps", PolicyConfig::EpsilonGreedy { epsilon: -1.0 })
            .is_err());
        assert_eq!(registry.len(), 1);
    }
}

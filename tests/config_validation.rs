//! Construction-time validation of models, policies and harness settings.

use std::sync::Arc;

use infobandit::experiment::{LinearPaperConfig, bernoulli_fixed, linear_paper};
use infobandit::prelude::*;
use infobandit::{FiniteModel, RewardModel};

fn is_invalid<T>(result: Result<T>) -> bool {
    matches!(result, Err(BanditError::InvalidParameter { .. }))
}

#[test]
fn test_reward_model_validation() {
    assert!(is_invalid(RewardModel::bernoulli(1.2)));
    assert!(is_invalid(RewardModel::bernoulli(-0.1)));
    assert!(is_invalid(RewardModel::gaussian(0.0, -1.0)));
    assert!(is_invalid(RewardModel::finite(
        vec![0.0, 1.0],
        vec![0.5, 0.6]
    )));
    assert!(is_invalid(RewardModel::finite(vec![0.0, 1.0], vec![1.0])));
    assert!(RewardModel::finite(vec![0.0, 1.0], vec![0.25, 0.75]).is_ok());
}

#[test]
fn test_bandit_validation() {
    assert!(matches!(
        BanditInstance::bernoulli(&[]),
        Err(BanditError::NoArmsAvailable)
    ));
    assert!(is_invalid(BanditInstance::bernoulli(&[0.5, 1.5])));
    assert!(is_invalid(BanditInstance::gaussian(&[(0.0, 1.0), (1.0, -2.0)])));
    assert!(is_invalid(BanditInstance::linear_gaussian(
        vec![1.0, 0.0],
        vec![vec![1.0, 0.0], vec![0.0]],
        1.0,
        10.0,
    )));
}

#[test]
fn test_finite_model_shape_validation() {
    // candidate 1 is missing an arm
    let q = vec![
        vec![vec![0.5, 0.5], vec![0.5, 0.5]],
        vec![vec![0.5, 0.5]],
    ];
    assert!(is_invalid(FiniteModel::new(vec![0.5, 0.5], q, vec![0.0, 1.0])));

    // prior does not sum to one
    let q = vec![vec![vec![0.5, 0.5]], vec![vec![0.5, 0.5]]];
    assert!(is_invalid(FiniteModel::new(vec![0.5, 0.6], q.clone(), vec![0.0, 1.0])));

    // reward map of the wrong length
    assert!(is_invalid(FiniteModel::new(vec![0.5, 0.5], q.clone(), vec![0.0])));

    let model = Arc::new(FiniteModel::new(vec![0.5, 0.5], q, vec![0.0, 1.0]).unwrap());
    assert!(is_invalid(BanditInstance::finite(model, 2)));
}

#[test]
fn test_policy_validation() {
    assert!(is_invalid(EpsilonGreedy::new(1.1)));
    assert!(is_invalid(Ucb::new(0.0)));
    assert!(is_invalid(Ucb::new(-3.0)));
    assert!(is_invalid(Ids::new(0)));

    let mut registry = PolicyRegistry::new();
    assert!(is_invalid(
        registry.register("eps", PolicyConfig::EpsilonGreedy { epsilon: 2.0 })
    ));
    registry.register("ts", PolicyConfig::Thompson).unwrap();
    assert!(matches!(
        registry.register("ts", PolicyConfig::Greedy),
        Err(BanditError::DuplicatePolicy { .. })
    ));
}

#[test]
fn test_harness_validation() {
    assert!(is_invalid(HarnessConfig::builder().n_trials(0).build()));
    assert!(is_invalid(HarnessConfig::builder().horizon(0).build()));
    assert!(HarnessConfig::builder().n_trials(1).horizon(1).build().is_ok());
}

#[test]
fn test_factory_validation() {
    assert!(is_invalid(bernoulli_fixed(&[0.4, 2.0])));
    let config = LinearPaperConfig {
        prior_variance: -1.0,
        ..LinearPaperConfig::default()
    };
    assert!(is_invalid(linear_paper(config)));
}

//! Information-Directed Sampling on finite-parameter bandits.

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use infobandit::experiment::run_experiment;
use infobandit::policies::{IdsMixture, IdsPlan, ids_mixture, ids_plan};
use infobandit::posterior::FinitePosterior;
use infobandit::prelude::*;
use infobandit::{FiniteModel, Posterior};
use rand::{RngCore, SeedableRng};
use rand::rngs::StdRng;

/// Two arms, two outcomes paying 0 and 1, four equally likely candidates
fn four_candidates() -> Arc<FiniteModel> {
    let q = vec![
        vec![vec![0.2, 0.8], vec![0.7, 0.3]],
        vec![vec![0.6, 0.4], vec![0.3, 0.7]],
        vec![vec![0.5, 0.5], vec![0.9, 0.1]],
        vec![vec![0.8, 0.2], vec![0.4, 0.6]],
    ];
    Arc::new(FiniteModel::new(vec![0.25; 4], q, vec![0.0, 1.0]).unwrap())
}

fn ratio_config(seed: u64) -> HarnessConfig {
    HarnessConfig::builder()
        .n_trials(4)
        .horizon(50)
        .seed(seed)
        .collect_information_ratio(true)
        .build()
        .unwrap()
}

#[test]
fn test_first_round_information_ratio_is_reproducible() {
    let model = four_candidates();
    let factory = move |_: &mut dyn RngCore| BanditInstance::finite(model.clone(), 0);
    let ids = PolicyConfig::ids();

    let first = MonteCarlo::new(ratio_config(5)).run(&factory, "IDS", &ids).unwrap();
    let second = MonteCarlo::new(ratio_config(5)).run(&factory, "IDS", &ids).unwrap();

    let ratio = first[0].information_ratio.as_ref().unwrap()[0];
    assert!(ratio.is_finite());
    assert!(ratio >= 0.0);
    assert_eq!(ratio, second[0].information_ratio.as_ref().unwrap()[0]);
    assert_eq!(first, second);

    for trace in &first {
        assert_eq!(trace.information_ratio.as_ref().unwrap().len(), 50);
        assert_eq!(trace.information_ratio.as_ref().unwrap()[0], ratio);
    }
}

#[test]
fn test_information_ratio_curve_in_summary() {
    let model = four_candidates();
    let factory = move |_: &mut dyn RngCore| BanditInstance::finite(model.clone(), 0);
    let registry = PolicyRegistry::new()
        .with("IDS", PolicyConfig::ids())
        .unwrap()
        .with("TS", PolicyConfig::Thompson)
        .unwrap();
    let result = run_experiment(&factory, &registry, &ratio_config(8)).unwrap();

    let ids = result.get("IDS").unwrap();
    let curve = ids.information_ratio.as_ref().unwrap();
    assert_eq!(curve.len(), 50);
    assert!(curve[0].is_finite() && curve[0] >= 0.0);
    assert!(result.get("TS").unwrap().information_ratio.is_none());
}

#[test]
fn test_ids_search_is_a_pure_function() {
    let delta = [0.30, 0.05, 0.12];
    let gain = [0.40, 0.02, 0.10];

    let reference = ids_mixture(&delta, &gain).unwrap();
    for _ in 0..10 {
        assert_eq!(ids_mixture(&delta, &gain).unwrap(), reference);
    }
    assert!((0.0..=1.0).contains(&reference.p));
    assert!(reference.ratio >= 0.0);

    // No single arm or pair with another weight does better
    let ratio_of = |i: usize, j: usize, p: f64| {
        let d = p * delta[i] + (1.0 - p) * delta[j];
        let g = p * gain[i] + (1.0 - p) * gain[j];
        d * d / g
    };
    for i in 0..3 {
        for j in 0..3 {
            for step in 0..=100 {
                let p = step as f64 / 100.0;
                assert!(ratio_of(i, j, p) >= reference.ratio - 1e-9);
            }
        }
    }
}

#[test]
fn test_ids_two_arm_closed_form() {
    let mixture = ids_mixture(&[0.5, 0.1], &[1.0, 0.05]).unwrap();
    let IdsMixture {
        first,
        second,
        p,
        ratio,
    } = mixture;
    assert_eq!((first, second), (0, 1));
    assert_abs_diff_eq!(p, 0.144737, epsilon = 1e-5);
    assert_abs_diff_eq!(ratio, 0.13296, epsilon = 1e-4);
}

#[test]
fn test_plan_degenerate_and_terminal() {
    assert_eq!(ids_plan(&[0.2, 0.1], &[0.0, 0.0]), IdsPlan::Degenerate(1));
    assert_eq!(ids_plan(&[0.2, 0.0], &[0.3, 0.0]), IdsPlan::Terminal(1));
}

#[test]
fn test_posterior_stays_normalized() {
    let model = four_candidates();
    let mut posterior = FinitePosterior::new(model.clone());
    let bandit = BanditInstance::finite(model, 0).unwrap();
    let mut rng = StdRng::seed_from_u64(21);

    for round in 0..200 {
        let arm = round % 2;
        let outcome = bandit.pull(arm, &mut rng).unwrap().outcome.unwrap();
        posterior.update(arm, outcome).unwrap();
        let total: f64 = posterior.weights().iter().sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-9);
    }
    // The true candidate dominates after many observations
    assert!(posterior.weights()[0] > 0.9);
}

#[test]
fn test_impossible_outcome_is_rejected() {
    let q = vec![vec![vec![1.0, 0.0]], vec![vec![1.0, 0.0]]];
    let model = Arc::new(FiniteModel::new(vec![0.5, 0.5], q, vec![0.0, 1.0]).unwrap());

    let mut belief = Belief::new(Posterior::Finite(FinitePosterior::new(model)), 1);
    let impossible = Observation {
        reward: 1.0,
        outcome: Some(1),
    };
    assert_eq!(
        belief.observe(0, &impossible).unwrap_err(),
        BanditError::DegeneratePosterior { arm: 0, outcome: 1 }
    );
    match belief.posterior() {
        Posterior::Finite(posterior) => assert_eq!(posterior.weights(), &[0.5, 0.5]),
        _ => unreachable!(),
    }
}

#[test]
fn test_degenerate_trial_aborts_experiment() {
    // Every candidate says outcome 1 never happens, but the true arm always yields it
    let q = vec![vec![vec![1.0, 0.0]], vec![vec![1.0, 0.0]]];
    let model = Arc::new(FiniteModel::new(vec![0.5, 0.5], q, vec![0.0, 1.0]).unwrap());
    let factory = move |_: &mut dyn RngCore| {
        BanditInstance::finite_with_arms(model.clone(), vec![vec![0.0, 1.0]])
    };
    let registry = PolicyRegistry::new()
        .with("uniform-random", PolicyConfig::Random)
        .unwrap();
    let config = HarnessConfig::builder()
        .n_trials(3)
        .horizon(10)
        .parallel(false)
        .build()
        .unwrap();

    match run_experiment(&factory, &registry, &config).unwrap_err() {
        BanditError::TrialFailed {
            label,
            trial,
            source,
        } => {
            assert_eq!(label, "uniform-random");
            assert_eq!(trial, 0);
            assert_eq!(*source, BanditError::DegeneratePosterior { arm: 0, outcome: 1 });
        }
        other => panic!("unexpected error {other:?}"),
    }
}

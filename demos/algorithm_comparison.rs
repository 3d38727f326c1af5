use infobandit::experiment::{bernoulli_fixed, bernoulli_uniform, run_experiment};
use infobandit::{ExperimentResult, HarnessConfig, PolicyConfig, PolicyRegistry};
use tracing_subscriber::EnvFilter;

fn report(result: &ExperimentResult) {
    println!("{:<16} {:>10} {:>10} {:>10} {:>10}", "policy", "mean", "std", "q05", "q95");
    for (label, summary) in result.iter() {
        println!(
            "{:<16} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
            label, summary.mean, summary.std, summary.quantiles[1], summary.quantiles[19]
        );
    }
}

fn main() -> infobandit::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("infobandit: Bernoulli policy comparison\n");
    println!("{}", "=".repeat(60));

    let registry = PolicyRegistry::new()
        .with("uniform-random", PolicyConfig::Random)?
        .with("greedy", PolicyConfig::Greedy)?
        .with("epsilon-greedy", PolicyConfig::EpsilonGreedy { epsilon: 0.1 })?
        .with("UCB1", PolicyConfig::Ucb { alpha: 1.0 })?
        .with("Thompson", PolicyConfig::Thompson)?
        .with("IDS", PolicyConfig::Ids { n_samples: 200 })?;

    let config = HarnessConfig::builder()
        .n_trials(200)
        .horizon(1000)
        .seed(42)
        .build()?;

    // Frequentist setting: one fixed instance
    println!("\nFixed arms p = [0.9, 0.1], T = 1000, 200 trials\n");
    let result = run_experiment(&bernoulli_fixed(&[0.9, 0.1])?, &registry, &config)?;
    report(&result);

    // Bayesian setting: p_k ~ U(0, 1) per trial
    println!("\n10 arms with p_k ~ U(0, 1), T = 1000, 200 trials\n");
    let result = run_experiment(&bernoulli_uniform(10)?, &registry, &config)?;
    report(&result);

    Ok(())
}

use infobandit::experiment::{LinearPaperConfig, gaussian_standard, linear_paper, run_experiment};
use infobandit::{HarnessConfig, PolicyConfig, PolicyRegistry};
use tracing_subscriber::EnvFilter;

fn main() -> infobandit::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("infobandit: Gaussian and linear bandits\n");
    println!("{}", "=".repeat(60));

    let registry = PolicyRegistry::new()
        .with("greedy", PolicyConfig::Greedy)?
        .with("Thompson", PolicyConfig::Thompson)?
        .with("IDS", PolicyConfig::Ids { n_samples: 500 })?;
    let config = HarnessConfig::builder()
        .n_trials(50)
        .horizon(250)
        .seed(3)
        .build()?;

    println!("\n10 Gaussian arms, mu_k ~ N(0, 1), unit noise\n");
    let result = run_experiment(&gaussian_standard(10)?, &registry, &config)?;
    for (label, summary) in result.iter() {
        println!("  {:<10} {:>8.2} ± {:.2}", label, summary.mean, summary.std);
    }

    let linear = LinearPaperConfig::default();
    println!(
        "\nLinear bandit: {} arms, {} features, prior variance {}\n",
        linear.n_arms, linear.n_features, linear.prior_variance
    );
    let result = run_experiment(&linear_paper(linear)?, &registry, &config)?;
    for (label, summary) in result.iter() {
        let curve = &summary.mean_regret;
        println!(
            "  {:<10} T/4 {:>7.2}  T/2 {:>7.2}  T {:>7.2}",
            label,
            curve[curve.len() / 4],
            curve[curve.len() / 2],
            summary.mean
        );
    }

    Ok(())
}

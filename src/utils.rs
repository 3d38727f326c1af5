//! Small numeric helpers shared by posteriors and policies.

use rand::{Rng, RngCore};

/// Values below this magnitude are treated as zero by the information computations.
pub(crate) const NUMERIC_ZERO: f64 = 1e-12;

/// Index of the largest value, lowest index on ties.
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

/// Index of the largest value with ties broken uniformly at random.
pub(crate) fn random_argmax(values: &[f64], rng: &mut dyn RngCore) -> usize {
    let best = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let ties: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|&(_, v)| *v == best)
        .map(|(i, _)| i)
        .collect();
    match ties.len() {
        0 => argmax(values),
        1 => ties[0],
        n => ties[rng.random_range(0..n)],
    }
}

/// Shannon entropy (nats) of a probability vector; `0 ln 0 = 0`.
pub(crate) fn entropy(probs: &[f64]) -> f64 {
    -probs
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| p * p.ln())
        .sum::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_argmax_prefers_lowest_index() {
        assert_eq!(argmax(&[0.1, 0.5, 0.5, 0.2]), 1);
        assert_eq!(argmax(&[3.0]), 0);
    }

    #[test]
    fn test_random_argmax_breaks_ties() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = [false; 3];
        for _ in 0..100 {
            let i = random_argmax(&[1.0, 0.0, 1.0], &mut rng);
            assert_ne!(i, 1);
            seen[i] = true;
        }
        assert!(seen[0] && seen[2]);
    }

    #[test]
    fn test_entropy() {
        assert_eq!(entropy(&[1.0, 0.0]), 0.0);
        assert_abs_diff_eq!(entropy(&[0.5, 0.5]), std::f64::consts::LN_2, epsilon = 1e-12);
    }
}

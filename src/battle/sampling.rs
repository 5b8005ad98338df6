//! Stochastic draws shared by the volley and round machinery
//!
//! Probabilities are clamped to [0, 1] before sampling; zero or negative
//! inputs yield zero outcomes rather than errors.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Number of successes over `trials` independent Bernoulli trials at
/// probability `p`.
pub fn binomial(rng: &mut impl Rng, trials: u32, p: f64) -> u32 {
    if trials == 0 || !(p > 0.0) {
        return 0;
    }
    let p = p.min(1.0);
    if p >= 1.0 {
        return trials;
    }
    (0..trials).filter(|_| rng.gen_bool(p)).count() as u32
}

/// Round a non-negative real to an integer, carrying the fractional part as
/// a Bernoulli trial: `floor(x)` plus one with probability `frac(x)`.
pub fn stochastic_round(rng: &mut impl Rng, value: f64) -> u32 {
    if !(value > 0.0) {
        return 0;
    }
    let floor = value.floor();
    let frac = value - floor;
    let extra = if frac > 0.0 && rng.gen_bool(frac.min(1.0)) { 1 } else { 0 };
    floor as u32 + extra
}

/// Spread `hits` across slots proportionally to `weights`, drawing each hit
/// independently against one fixed weight snapshot (weights are not
/// re-evaluated as hits land). All-zero weights assign nothing.
pub fn assign_weighted(rng: &mut impl Rng, hits: u32, weights: &[u32]) -> Vec<u32> {
    let mut assigned = vec![0u32; weights.len()];
    if hits == 0 {
        return assigned;
    }
    let dist = match WeightedIndex::new(weights) {
        Ok(dist) => dist,
        Err(_) => return assigned, // empty or all-zero weights
    };
    for _ in 0..hits {
        assigned[dist.sample(rng)] += 1;
    }
    assigned
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn test_binomial_extremes() {
        let mut rng = rng();
        assert_eq!(binomial(&mut rng, 0, 0.5), 0);
        assert_eq!(binomial(&mut rng, 100, 0.0), 0);
        assert_eq!(binomial(&mut rng, 100, -0.3), 0);
        assert_eq!(binomial(&mut rng, 100, 1.0), 100);
        assert_eq!(binomial(&mut rng, 100, 2.5), 100);
    }

    #[test]
    fn test_binomial_stays_in_range() {
        let mut rng = rng();
        for _ in 0..50 {
            let successes = binomial(&mut rng, 40, 0.3);
            assert!(successes <= 40);
        }
    }

    #[test]
    fn test_stochastic_round_integral_is_exact() {
        let mut rng = rng();
        assert_eq!(stochastic_round(&mut rng, 6.0), 6);
        assert_eq!(stochastic_round(&mut rng, 0.0), 0);
        assert_eq!(stochastic_round(&mut rng, -1.5), 0);
    }

    #[test]
    fn test_stochastic_round_fractional_bounds() {
        let mut rng = rng();
        for _ in 0..50 {
            let rounded = stochastic_round(&mut rng, 3.4);
            assert!(rounded == 3 || rounded == 4);
        }
    }

    #[test]
    fn test_assign_weighted_conserves_hits() {
        let mut rng = rng();
        let assigned = assign_weighted(&mut rng, 25, &[10, 5, 1]);
        assert_eq!(assigned.iter().sum::<u32>(), 25);
    }

    #[test]
    fn test_assign_weighted_zero_weight_gets_nothing() {
        let mut rng = rng();
        let assigned = assign_weighted(&mut rng, 50, &[10, 0, 5]);
        assert_eq!(assigned[1], 0);
        assert_eq!(assigned.iter().sum::<u32>(), 50);
    }

    #[test]
    fn test_assign_weighted_all_zero_weights() {
        let mut rng = rng();
        assert_eq!(assign_weighted(&mut rng, 10, &[0, 0]), vec![0, 0]);
        assert_eq!(assign_weighted(&mut rng, 10, &[]), Vec::<u32>::new());
    }
}

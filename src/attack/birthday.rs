//! Closed-form birthday-bound formulas
//!
//! P(collision) ≈ 1 - e^(-n^2 / 2N) and its inverse. Both take the oracle
//! output space N explicitly so they stay pure and shareable between the
//! finder and the simulator.

use anyhow::{bail, Result};

/// Theoretical probability of at least one collision among `num_samples`
/// draws from a space of `output_space` values.
///
/// Exact arithmetic keeps this strictly below 1, but in f64 the result
/// saturates to exactly 1.0 once `exp(-n^2/2N)` falls under ~1.1e-16
/// (around n = 8.6*sqrt(N)).
pub fn collision_probability(num_samples: u64, output_space: u128) -> f64 {
    let n = num_samples as f64;
    let space = output_space as f64;
    1.0 - (-(n * n) / (2.0 * space)).exp()
}

/// Number of draws needed to reach collision probability `probability`,
/// solving the approximation above for n: `sqrt(-2N * ln(1 - p))`.
///
/// `probability` must lie in `[0, 1)`; at 1.0 the inverse diverges.
pub fn attempts_for_probability(probability: f64, output_space: u128) -> Result<u64> {
    if !(0.0..1.0).contains(&probability) {
        bail!(
            "Probability must be in [0, 1), got {}. ln(1-p) is undefined at p >= 1",
            probability
        );
    }
    let space = output_space as f64;
    Ok((-2.0 * space * (1.0 - probability).ln()).sqrt() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPACE_16: u128 = 1 << 16;

    #[test]
    fn zero_samples_zero_probability() {
        assert_eq!(collision_probability(0, SPACE_16), 0.0);
    }

    #[test]
    fn probability_is_monotone_and_bounded() {
        let mut last = 0.0;
        for n in (0..5000).step_by(50) {
            let p = collision_probability(n, SPACE_16);
            assert!((0.0..=1.0).contains(&p), "p={} at n={}", p, n);
            assert!(p >= last, "decreased at n={}", n);
            last = p;
        }
        // Strictly below 1 while exp(-n^2/2N) is still representable; for
        // sqrt(N) = 256 that holds comfortably up to n = 2000.
        for n in (0..=2000).step_by(50) {
            assert!(collision_probability(n, SPACE_16) < 1.0, "n={}", n);
        }
    }

    #[test]
    fn probability_saturates_to_one_in_f64() {
        // Around 8.6*sqrt(N) the exponential underflows past f64 resolution
        // and the probability rounds to exactly 1.0.
        assert_eq!(collision_probability(2500, SPACE_16), 1.0);
        assert_eq!(collision_probability(u64::MAX, SPACE_16), 1.0);
    }

    #[test]
    fn sqrt_n_samples_give_the_known_constant() {
        // n = sqrt(N) plugs in as 1 - e^(-1/2) ≈ 0.3935.
        let p = collision_probability(256, SPACE_16);
        assert!((p - 0.39347).abs() < 1e-4);
    }

    #[test]
    fn inverse_round_trips_within_tolerance() {
        let space: u128 = 1 << 32;
        for &p in &[0.1, 0.25, 0.5, 0.75, 0.9, 0.99] {
            let n = attempts_for_probability(p, space).unwrap();
            let back = collision_probability(n, space);
            // Truncating to integer attempts costs a little accuracy.
            assert!((back - p).abs() < 1e-3, "p={} back={}", p, back);
        }
    }

    #[test]
    fn half_probability_near_1_177_sqrt_n() {
        // sqrt(2 ln 2) ≈ 1.1774
        let n = attempts_for_probability(0.5, SPACE_16).unwrap();
        assert_eq!(n, (1.177410 * 256.0) as u64);
    }

    #[test]
    fn rejects_probability_outside_unit_interval() {
        assert!(attempts_for_probability(1.0, SPACE_16).is_err());
        assert!(attempts_for_probability(1.5, SPACE_16).is_err());
        assert!(attempts_for_probability(-0.1, SPACE_16).is_err());
        assert_eq!(attempts_for_probability(0.0, SPACE_16).unwrap(), 0);
    }
}

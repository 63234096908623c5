//! Monte Carlo collision-probability estimation
//!
//! Repeats a bounded insert-until-duplicate trial many times and compares the
//! empirical collision rate with the closed-form birthday approximation.
//! Trials are independent (each owns its table and rng stream) and fan out
//! across threads with rayon.

use crate::attack::birthday::{attempts_for_probability, collision_probability};
use crate::oracle::{get_oracle, HashOracle};
use anyhow::{bail, Result};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Aggregate outcome of one `run_simulation` call.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    pub bit_size: u32,
    pub output_space: u128,
    pub num_trials: u64,
    pub samples_per_trial: u64,
    pub collisions_found: u64,
    pub collision_rate: f64,
    pub theoretical_probability: f64,
    /// Mean 1-based index of the repeating draw, over trials that collided.
    /// 0.0 when no trial collided (sentinel, not an error).
    pub average_attempts_to_collision: f64,
    /// Draws needed for a 50% theoretical collision probability.
    pub theoretical_expected_attempts: u64,
    #[serde(skip)]
    pub total_time: Duration,
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation Results for {}-bit Hash", self.bit_size)?;
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(f, "Output Space: {} possible hash values", self.output_space)?;
        writeln!(f, "Trials: {}", self.num_trials)?;
        writeln!(f, "Samples per Trial: {}", self.samples_per_trial)?;
        writeln!(f)?;
        writeln!(f, "Collisions Found: {}/{}", self.collisions_found, self.num_trials)?;
        writeln!(f, "Empirical Collision Rate: {:.2}%", self.collision_rate * 100.0)?;
        writeln!(
            f,
            "Theoretical Probability: {:.2}%",
            self.theoretical_probability * 100.0
        )?;
        writeln!(
            f,
            "Error: {:.2}%",
            (self.collision_rate - self.theoretical_probability).abs() * 100.0
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "Average Attempts to Collision: {:.0}",
            self.average_attempts_to_collision
        )?;
        writeln!(f, "Theoretical Expected (50%): {}", self.theoretical_expected_attempts)?;
        write!(f, "Total Time: {:.2} seconds", self.total_time.as_secs_f64())
    }
}

/// One row of a scaling analysis: how the empirical rate tracks theory as the
/// per-trial sample count grows.
#[derive(Debug, Clone, Serialize)]
pub struct ScalingPoint {
    pub samples: u64,
    pub empirical_prob: f64,
    pub theoretical_prob: f64,
    pub collisions_found: u64,
    pub trials: u64,
}

/// Monte Carlo estimator for one oracle. Stateless aside from the oracle
/// handle; every trial owns its own seen-set and rng.
pub struct ProbabilitySimulator {
    oracle: Arc<dyn HashOracle>,
}

impl ProbabilitySimulator {
    pub fn new(oracle: Arc<dyn HashOracle>) -> Self {
        ProbabilitySimulator { oracle }
    }

    pub fn oracle(&self) -> &dyn HashOracle {
        self.oracle.as_ref()
    }

    /// Draw up to `num_samples` random 8-byte inputs and report whether a
    /// hash value repeated, plus the 1-based index of the repeating draw
    /// (`num_samples` when none did).
    pub fn run_single_trial(&self, num_samples: u64) -> (bool, u64) {
        self.trial_with_rng(num_samples, &mut StdRng::from_entropy())
    }

    /// Seeded variant for reproducible trials in tests.
    pub fn run_single_trial_seeded(&self, num_samples: u64, seed: u64) -> (bool, u64) {
        self.trial_with_rng(num_samples, &mut StdRng::seed_from_u64(seed))
    }

    fn trial_with_rng(&self, num_samples: u64, rng: &mut StdRng) -> (bool, u64) {
        let capacity = num_samples.min(1 << 20) as usize;
        let mut seen: HashSet<u64> = HashSet::with_capacity(capacity);

        for i in 0..num_samples {
            let input = rng.gen::<u64>().to_be_bytes();
            let hash_value = self.oracle.hash(&input);
            if !seen.insert(hash_value) {
                return (true, i + 1);
            }
        }
        (false, num_samples)
    }

    /// Run `num_trials` independent trials and aggregate. `samples_per_trial`
    /// defaults to `floor(sqrt(N))`, the point where the theoretical collision
    /// probability is 1 - e^(-1/2) ≈ 39.3%.
    pub fn run_simulation(
        &self,
        num_trials: u64,
        samples_per_trial: Option<u64>,
    ) -> Result<SimulationResult> {
        if num_trials == 0 {
            bail!("Number of trials must be positive");
        }
        let space = self.oracle.output_space();
        let samples = samples_per_trial.unwrap_or_else(|| (space as f64).sqrt() as u64);

        info!(
            "Running {} trials with {} samples each against {}",
            num_trials,
            samples,
            self.oracle.display_name()
        );
        let start = Instant::now();

        let outcomes: Vec<(bool, u64)> = (0..num_trials)
            .into_par_iter()
            .map(|_| self.run_single_trial(samples))
            .collect();

        let total_time = start.elapsed();
        let collisions_found = outcomes.iter().filter(|(found, _)| *found).count() as u64;
        let attempt_sum: u64 = outcomes
            .iter()
            .filter(|(found, _)| *found)
            .map(|(_, attempts)| attempts)
            .sum();
        let average_attempts_to_collision = if collisions_found > 0 {
            attempt_sum as f64 / collisions_found as f64
        } else {
            0.0
        };

        Ok(SimulationResult {
            bit_size: self.oracle.bit_size(),
            output_space: space,
            num_trials,
            samples_per_trial: samples,
            collisions_found,
            collision_rate: collisions_found as f64 / num_trials as f64,
            theoretical_probability: collision_probability(samples, space),
            average_attempts_to_collision,
            theoretical_expected_attempts: attempts_for_probability(0.5, space)?,
            total_time,
        })
    }

    /// Run one simulation per entry of `sample_counts`, preserving order.
    pub fn run_scaling_analysis(
        &self,
        sample_counts: &[u64],
        trials_per_count: u64,
    ) -> Result<Vec<ScalingPoint>> {
        let mut points = Vec::with_capacity(sample_counts.len());

        for &samples in sample_counts {
            info!("Scaling analysis: testing {} samples per trial", samples);
            let result = self.run_simulation(trials_per_count, Some(samples))?;
            points.push(ScalingPoint {
                samples,
                empirical_prob: result.collision_rate,
                theoretical_prob: result.theoretical_probability,
                collisions_found: result.collisions_found,
                trials: trials_per_count,
            });
        }

        Ok(points)
    }
}

/// Simulate each bit size at its own `floor(sqrt(N))` sample count so the
/// theoretical probability is the same across sizes. Keys are unique; callers
/// display in ascending order by convention.
pub fn compare_hash_sizes(
    bit_sizes: &[u32],
    trials: u64,
) -> Result<HashMap<u32, SimulationResult>> {
    let mut results = HashMap::new();

    for &bits in bit_sizes {
        // One simulation per distinct size; repeats in the input are skipped.
        if results.contains_key(&bits) {
            continue;
        }
        info!("Comparing hash sizes: simulating {}-bit oracle", bits);
        let oracle = get_oracle(bits)?;
        let samples = (oracle.output_space() as f64).sqrt() as u64;
        let simulator = ProbabilitySimulator::new(oracle);
        results.insert(bits, simulator.run_simulation(trials, Some(samples))?);
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trial_attempts_never_exceed_samples() {
        let simulator = ProbabilitySimulator::new(get_oracle(8).unwrap());
        for seed in 0..20 {
            let (found, attempts) = simulator.run_single_trial_seeded(30, seed);
            assert!(attempts <= 30);
            if !found {
                assert_eq!(attempts, 30);
            }
        }
    }

    #[test]
    fn pigeonhole_forces_a_collision() {
        // 4-bit space holds 16 values; 17 distinct hashes are impossible.
        let simulator = ProbabilitySimulator::new(get_oracle(4).unwrap());
        let (found, attempts) = simulator.run_single_trial(100);
        assert!(found);
        assert!(attempts <= 17);
    }

    #[test]
    fn wide_oracle_rarely_collides_in_few_samples() {
        let simulator = ProbabilitySimulator::new(get_oracle(64).unwrap());
        let (found, attempts) = simulator.run_single_trial_seeded(10, 7);
        assert!(!found);
        assert_eq!(attempts, 10);
    }

    #[test]
    fn seeded_trials_reproduce() {
        let simulator = ProbabilitySimulator::new(get_oracle(12).unwrap());
        assert_eq!(
            simulator.run_single_trial_seeded(64, 99),
            simulator.run_single_trial_seeded(64, 99)
        );
    }

    #[test]
    fn simulation_matches_theory_at_8_bits() {
        // 16 samples over 256 values: p = 1 - e^(-256/512) ≈ 0.3935. With 500
        // trials the empirical rate lands within ±0.10 except with vanishing
        // probability (>4 sigma).
        let simulator = ProbabilitySimulator::new(get_oracle(8).unwrap());
        let result = simulator.run_simulation(500, Some(16)).unwrap();

        assert!((result.theoretical_probability - 0.3935).abs() < 1e-3);
        assert!(
            (result.collision_rate - result.theoretical_probability).abs() < 0.10,
            "empirical {} vs theoretical {}",
            result.collision_rate,
            result.theoretical_probability
        );
        assert_eq!(result.num_trials, 500);
        assert_eq!(result.samples_per_trial, 16);
        assert_eq!(
            result.collision_rate,
            result.collisions_found as f64 / 500.0
        );
        if result.collisions_found > 0 {
            assert!(result.average_attempts_to_collision > 0.0);
            assert!(result.average_attempts_to_collision <= 16.0);
        }
    }

    #[test]
    fn default_samples_is_floor_sqrt_space() {
        let simulator = ProbabilitySimulator::new(get_oracle(10).unwrap());
        let result = simulator.run_simulation(5, None).unwrap();
        assert_eq!(result.samples_per_trial, 32);
    }

    #[test]
    fn zero_trials_is_an_error() {
        let simulator = ProbabilitySimulator::new(get_oracle(8).unwrap());
        assert!(simulator.run_simulation(0, Some(16)).is_err());
    }

    #[test]
    fn no_collisions_yields_zero_average_sentinel() {
        // 2 samples in a 32-bit space: collision odds ~2^-32 per trial.
        let simulator = ProbabilitySimulator::new(get_oracle(32).unwrap());
        let result = simulator.run_simulation(10, Some(2)).unwrap();
        assert_eq!(result.collisions_found, 0);
        assert_eq!(result.average_attempts_to_collision, 0.0);
    }

    #[test]
    fn scaling_analysis_preserves_input_order() {
        let simulator = ProbabilitySimulator::new(get_oracle(8).unwrap());
        let counts = [4u64, 16, 8, 32];
        let points = simulator.run_scaling_analysis(&counts, 20).unwrap();

        assert_eq!(points.len(), 4);
        for (point, &samples) in points.iter().zip(counts.iter()) {
            assert_eq!(point.samples, samples);
            assert_eq!(point.trials, 20);
            assert_eq!(point.theoretical_prob, collision_probability(samples, 256));
        }
    }

    #[test]
    fn compare_hash_sizes_runs_each_distinct_size_once() {
        let results = compare_hash_sizes(&[8, 8, 4, 8], 10).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.contains_key(&4));
        assert!(results.contains_key(&8));
    }

    #[test]
    fn compare_hash_sizes_keys_by_bit_size() {
        let results = compare_hash_sizes(&[4, 6, 8], 20).unwrap();
        assert_eq!(results.len(), 3);
        for bits in [4u32, 6, 8] {
            let result = &results[&bits];
            assert_eq!(result.bit_size, bits);
            assert_eq!(result.output_space, 1u128 << bits);
        }
    }
}

//! Hash-table birthday attack
//!
//! Insert-until-duplicate over a stream of candidate inputs: O(1) collision
//! detection against every earlier draw, expected success near sqrt(N)
//! attempts.

use crate::attack::generator::{GeneratorKind, InputGenerator};
use crate::oracle::HashOracle;
use anyhow::Result;
use log::{info, warn};
use serde_json::json;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Immutable outcome of one collision search.
#[derive(Debug, Clone)]
pub struct CollisionResult {
    pub found: bool,
    /// First-seen input for the colliding hash value; empty when not found.
    pub input1: Vec<u8>,
    /// The later draw that mapped onto the same value; empty when not found.
    pub input2: Vec<u8>,
    pub hash_value: u64,
    pub attempts: u64,
    pub elapsed: Duration,
    pub hash_name: String,
}

impl CollisionResult {
    /// Structured record for the experiment logger. Inputs are rendered as
    /// lossy text plus hex so arbitrary bytes survive serialization.
    pub fn record(&self) -> serde_json::Value {
        json!({
            "found": self.found,
            "input1": String::from_utf8_lossy(&self.input1),
            "input2": String::from_utf8_lossy(&self.input2),
            "input1_hex": hex::encode(&self.input1),
            "input2_hex": hex::encode(&self.input2),
            "hash_value": self.hash_value,
            "attempts": self.attempts,
            "elapsed_seconds": self.elapsed.as_secs_f64(),
            "hash_function": self.hash_name,
        })
    }
}

impl fmt::Display for CollisionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.found {
            return write!(f, "No collision found after {} attempts", self.attempts);
        }
        writeln!(f, "Collision Found!")?;
        writeln!(f, "================")?;
        writeln!(f, "Hash Function: {}", self.hash_name)?;
        writeln!(f, "Attempts: {}", self.attempts)?;
        writeln!(f, "Time: {:.4} seconds", self.elapsed.as_secs_f64())?;
        writeln!(f, "Hash Value: 0x{:x} ({})", self.hash_value, self.hash_value)?;
        writeln!(f)?;
        writeln!(f, "Input 1: {}", String::from_utf8_lossy(&self.input1))?;
        write!(f, "Input 2: {}", String::from_utf8_lossy(&self.input2))
    }
}

/// Birthday attack driver. Owns one seen-table exclusively per search; state
/// is cleared at the start of every `find_collision` call.
pub struct CollisionFinder {
    oracle: Arc<dyn HashOracle>,
    seen: HashMap<u64, Vec<u8>>,
    attempts: u64,
}

impl CollisionFinder {
    pub fn new(oracle: Arc<dyn HashOracle>) -> Self {
        CollisionFinder {
            oracle,
            seen: HashMap::new(),
            attempts: 0,
        }
    }

    /// Clear the seen-table and the attempt counter.
    pub fn reset(&mut self) {
        self.seen.clear();
        self.attempts = 0;
    }

    /// Budget used when the caller passes no limit: ten times the expected
    /// birthday-bound collision point, so uncollided runs still terminate.
    pub fn default_budget(&self) -> u64 {
        (10.0 * (self.oracle.output_space() as f64).sqrt()).ceil() as u64
    }

    /// Search for a collision, drawing inputs from a freshly built generator
    /// of the requested kind.
    pub fn find_collision(
        &mut self,
        max_attempts: Option<u64>,
        kind: GeneratorKind,
        prefix: &str,
    ) -> CollisionResult {
        self.find_collision_with(max_attempts, InputGenerator::new(kind, prefix))
    }

    /// Search over an arbitrary input stream. Lets tests substitute seeded or
    /// hand-built sequences for the stock generators.
    pub fn find_collision_with(
        &mut self,
        max_attempts: Option<u64>,
        inputs: impl IntoIterator<Item = Vec<u8>>,
    ) -> CollisionResult {
        self.reset();
        let start = Instant::now();
        let budget = max_attempts.unwrap_or_else(|| self.default_budget());

        let mut inputs = inputs.into_iter();
        while self.attempts < budget {
            let input = match inputs.next() {
                Some(input) => input,
                None => break,
            };
            self.attempts += 1;
            let hash_value = self.oracle.hash(&input);

            match self.seen.get(&hash_value) {
                Some(existing) if *existing != input => {
                    // Two distinct messages, one digest: a real collision.
                    return CollisionResult {
                        found: true,
                        input1: existing.clone(),
                        input2: input,
                        hash_value,
                        attempts: self.attempts,
                        elapsed: start.elapsed(),
                        hash_name: self.oracle.display_name(),
                    };
                }
                // Identical message drawn again: not two distinct inputs,
                // keep the first-seen entry and move on.
                Some(_) => {}
                None => {
                    self.seen.insert(hash_value, input);
                }
            }
        }

        CollisionResult {
            found: false,
            input1: Vec::new(),
            input2: Vec::new(),
            hash_value: 0,
            attempts: self.attempts,
            elapsed: start.elapsed(),
            hash_name: self.oracle.display_name(),
        }
    }
}

/// Run `count` independent searches with a fresh finder state and a distinct
/// prefix each, stopping early the first time a search exhausts its budget:
/// one failure means the budget is too tight for this oracle and repeating
/// the identical search would fail the same way.
pub fn find_multiple_collisions(
    oracle: Arc<dyn HashOracle>,
    count: usize,
    max_attempts_each: Option<u64>,
) -> Vec<CollisionResult> {
    let mut results = Vec::with_capacity(count);
    let mut finder = CollisionFinder::new(oracle);

    for i in 0..count {
        info!("Searching for collision {}/{}", i + 1, count);
        let result = finder.find_collision(
            max_attempts_each,
            GeneratorKind::Random,
            &format!("collision{}", i),
        );
        let found = result.found;
        results.push(result);

        if !found {
            warn!("Collision search {}/{} exhausted its budget, stopping", i + 1, count);
            break;
        }
    }

    results
}

/// Re-hash both inputs of a found collision against `oracle`. Used by the CLI
/// verification step and by tests.
pub fn verify_collision(oracle: &dyn HashOracle, result: &CollisionResult) -> Result<bool> {
    if !result.found {
        return Ok(false);
    }
    let h1 = oracle.hash(&result.input1);
    let h2 = oracle.hash(&result.input2);
    Ok(h1 == h2 && h1 == result.hash_value && result.input1 != result.input2)
}

//! birthdaycrack - birthday attack demonstration against toy hash oracles
//!
//! Searches for hash collisions with the classic hash-table birthday attack
//! and runs Monte Carlo trials to compare empirical collision rates against
//! the closed-form birthday-paradox approximation.
//!
//! Safety guarantees:
//! - Toy oracles only (1-64 bit outputs), never production hash functions
//! - Everything runs locally; no network, no persisted search state
//! - No unsafe code usage

#![deny(unsafe_code)]

pub mod attack;
pub mod config;
pub mod oracle;
pub mod utils;

// Re-export key types for library usage
pub use attack::{
    attempts_for_probability, collision_probability, compare_hash_sizes,
    find_multiple_collisions, CollisionFinder, CollisionResult, GeneratorKind, InputGenerator,
    ProbabilitySimulator, ScalingPoint, SimulationResult,
};
pub use oracle::{get_oracle, make_oracle, HashOracle};

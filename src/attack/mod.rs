//! Birthday attack core: input generation, collision search, and the
//! Monte Carlo probability simulator built on the same insert-until-duplicate
//! loop.

pub mod birthday;
pub mod finder;
pub mod generator;
pub mod simulator;

pub use birthday::{attempts_for_probability, collision_probability};
pub use finder::{find_multiple_collisions, CollisionFinder, CollisionResult};
pub use generator::{GeneratorKind, InputGenerator};
pub use simulator::{compare_hash_sizes, ProbabilitySimulator, ScalingPoint, SimulationResult};

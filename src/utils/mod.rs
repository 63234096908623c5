//! Utility functions and helpers
//!
//! Experiment logging and chart rendering downstream of the attack core.

pub mod logging;
pub mod viz;

// Re-export commonly used utilities
pub use logging::{setup_logging, ExperimentLogger};

//! Command-line configuration
//!
//! clap::Parser subcommands with default values (bits=16, trials=100, etc.)
//! mapping one-to-one onto the attack core's operations.

use crate::attack::generator::GeneratorKind;
use clap::{Parser, Subcommand};

/// Birthday attack hash collision simulation.
///
/// Educational demonstration of the birthday paradox against toy hash
/// functions with small output sizes. Does NOT attack production
/// cryptographic systems.
#[derive(Parser, Debug, Clone)]
#[command(name = "birthdaycrack", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Directory for experiment logs
    #[arg(long, default_value = "results/logs", global = true)]
    pub log_dir: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Find a hash collision with the birthday attack
    Find {
        /// Hash output size in bits
        #[arg(long, default_value_t = 16)]
        bits: u32,

        /// Maximum attempts (default: 10*sqrt(N))
        #[arg(long)]
        max_attempts: Option<u64>,

        /// Input generator type
        #[arg(long, value_enum, default_value_t = GeneratorKind::Sequential)]
        generator: GeneratorKind,
    },

    /// Run a Monte Carlo probability simulation
    Simulate {
        /// Hash output size in bits
        #[arg(long, default_value_t = 16)]
        bits: u32,

        /// Number of independent trials
        #[arg(long, default_value_t = 100)]
        trials: u64,

        /// Samples per trial (default: sqrt(N))
        #[arg(long)]
        samples: Option<u64>,
    },

    /// Generate charts and the summary table
    Visualize {
        /// Hash sizes to visualize
        #[arg(long = "bit-sizes", num_args = 1.., default_values_t = vec![16u32, 20, 24])]
        bit_sizes: Vec<u32>,

        /// Trials for the empirical measurements
        #[arg(long, default_value_t = 50)]
        trials: u64,

        /// Generate the complete visualization suite
        #[arg(long)]
        all: bool,

        /// Output directory for graphs
        #[arg(long, default_value = "results/graphs")]
        out_dir: String,
    },

    /// Run the interactive demo menu
    Demo,
}

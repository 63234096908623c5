//! birthdaycrack CLI - birthday attack hash collision simulation
//!
//! Educational demonstration of the birthday paradox against toy hash
//! functions. Uses small output sizes only and runs entirely locally.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use log::warn;
use std::io::{self, BufRead, Write};
use std::path::Path;

use birthdaycrack::attack::birthday::collision_probability;
use birthdaycrack::attack::finder::verify_collision;
use birthdaycrack::config::{Cli, Command};
use birthdaycrack::utils::logging::{setup_logging, ExperimentLogger};
use birthdaycrack::utils::viz;
use birthdaycrack::{
    compare_hash_sizes, get_oracle, CollisionFinder, GeneratorKind, ProbabilitySimulator,
};

fn print_banner() {
    println!(
        r"
=====================================================================
     BIRTHDAY ATTACK HASH COLLISION SIMULATION
     Educational Demonstration - Cryptography Assignment
=====================================================================

SAFETY NOTICE: This simulation uses toy hash functions (1-64 bits) only.
It does NOT attack production cryptographic hash functions.
All experiments run in a local, isolated environment.
"
    );
}

fn cmd_find(
    bits: u32,
    max_attempts: Option<u64>,
    generator: GeneratorKind,
    logger: &mut ExperimentLogger,
) -> Result<()> {
    println!("{}", "=".repeat(70));
    println!("Finding Collision: {}-bit Hash", bits);
    println!("{}", "=".repeat(70));

    let oracle = get_oracle(bits)?;
    println!("Hash Function: {}", oracle.display_name());
    println!("Output Space: {}", oracle.output_space());
    println!(
        "Expected attempts: ~{}",
        (oracle.output_space() as f64).sqrt() as u64
    );
    println!();

    let mut finder = CollisionFinder::new(oracle.clone());
    let result = finder.find_collision(max_attempts, generator, "msg");
    println!("{}", result);

    if result.found {
        let h1 = oracle.hash(&result.input1);
        let h2 = oracle.hash(&result.input2);
        println!("\nVerification:");
        println!("  Hash(input1) = 0x{:x}", h1);
        println!("  Hash(input2) = 0x{:x}", h2);
        println!("  Match: {}", verify_collision(oracle.as_ref(), &result)?);
    }

    logger.record_experiment(&format!("find-{}bit", bits), result.record())?;
    Ok(())
}

fn cmd_simulate(
    bits: u32,
    trials: u64,
    samples: Option<u64>,
    logger: &mut ExperimentLogger,
) -> Result<()> {
    println!("{}", "=".repeat(70));
    println!("Probability Simulation: {}-bit Hash", bits);
    println!("{}", "=".repeat(70));

    let oracle = get_oracle(bits)?;
    let simulator = ProbabilitySimulator::new(oracle);

    println!("Running {} trials...", trials);
    let result = simulator.run_simulation(trials, samples)?;
    println!("{}", result);

    logger.record_experiment(
        &format!("simulate-{}bit", bits),
        serde_json::to_value(&result)?,
    )?;
    Ok(())
}

fn cmd_visualize(bit_sizes: &[u32], trials: u64, all: bool, out_dir: &str) -> Result<()> {
    println!("{}", "=".repeat(70));
    println!("Generating Visualizations");
    println!("{}", "=".repeat(70));

    let out_dir = Path::new(out_dir);
    if all {
        viz::plot_all(bit_sizes, trials, out_dir)?;
    } else {
        for &bits in bit_sizes {
            println!("Generating plots for {}-bit hash...", bits);
            viz::plot_probability_vs_samples(
                bits,
                None,
                &out_dir.join(format!("probability_{}bit.svg", bits)),
            )?;
        }
        let complexity_sizes: Vec<u32> = (8..40).step_by(2).collect();
        viz::plot_attack_complexity(&complexity_sizes, &out_dir.join("attack_complexity.svg"))?;
    }

    println!("\nVisualizations saved to {}", out_dir.display());
    Ok(())
}

fn cmd_demo(log_dir: &str) -> Result<()> {
    println!("{}", "=".repeat(70));
    println!("Interactive Demo Mode");
    println!("{}", "=".repeat(70));

    println!("\nSelect a demonstration:");
    println!("  1. Find a single collision (16-bit hash)");
    println!("  2. Probability simulation (16-bit hash)");
    println!("  3. Hash size comparison (12, 16, 20-bit)");
    println!("  4. Generate visualizations");
    println!("  5. Run all demos");
    print!("\nEnter choice (1-5): ");
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        // Closed stdin: treat like a user interrupt and leave quietly.
        println!("\nInput closed. Exiting...");
        return Ok(());
    }

    match line.trim() {
        "1" => {
            let oracle = get_oracle(16)?;
            let mut finder = CollisionFinder::new(oracle);
            let result = finder.find_collision(None, GeneratorKind::Random, "msg");
            println!("{}", result);
        }
        "2" => {
            let simulator = ProbabilitySimulator::new(get_oracle(16)?);
            let result = simulator.run_simulation(100, None)?;
            println!("{}", result);
        }
        "3" => {
            let results = compare_hash_sizes(&[12, 16, 20], 50)?;
            let mut bit_sizes: Vec<u32> = results.keys().copied().collect();
            bit_sizes.sort_unstable();
            for bits in bit_sizes {
                println!(
                    "{}-bit: {:.2}% collision rate",
                    bits,
                    results[&bits].collision_rate * 100.0
                );
            }
        }
        "4" => {
            viz::plot_all(&[16, 20, 24], 50, Path::new("results/graphs"))?;
        }
        "5" => {
            println!("\nRunning all demos...");
            let mut logger = ExperimentLogger::new(log_dir)?;

            println!("\n1. Collision Finder Demo:");
            let oracle = get_oracle(16)?;
            let mut finder = CollisionFinder::new(oracle);
            let result = finder.find_collision(None, GeneratorKind::Random, "msg");
            println!("   Collision found after {} attempts", result.attempts);
            logger.record_experiment("demo-find", result.record())?;

            println!("\n2. Probability Simulation Demo:");
            let simulator = ProbabilitySimulator::new(get_oracle(16)?);
            let sim = simulator.run_simulation(50, None)?;
            println!(
                "   Empirical: {:.2}%, Theoretical: {:.2}%",
                sim.collision_rate * 100.0,
                sim.theoretical_probability * 100.0
            );
            logger.record_experiment("demo-simulate", serde_json::to_value(&sim)?)?;

            println!("\n3. Generating visualizations...");
            viz::plot_all(&[16, 20], 30, Path::new("results/graphs"))?;

            println!("\nAll demos completed!");
            println!("{}", logger.summary());
        }
        other => {
            warn!("Invalid demo choice: {:?}", other);
            println!("Invalid choice!");
        }
    }

    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Command::Find {
            bits,
            max_attempts,
            generator,
        } => {
            let mut logger = ExperimentLogger::new(&cli.log_dir)?;
            cmd_find(bits, max_attempts, generator, &mut logger)?;
            // Quick context line for the log: how far off theory this run was.
            let oracle = get_oracle(bits)?;
            let budget = max_attempts.unwrap_or((10.0 * (oracle.output_space() as f64).sqrt()).ceil() as u64);
            logger.log(&format!(
                "Budget {} gives theoretical collision probability {:.4}",
                budget,
                collision_probability(budget, oracle.output_space())
            ))?;
        }
        Command::Simulate {
            bits,
            trials,
            samples,
        } => {
            let mut logger = ExperimentLogger::new(&cli.log_dir)?;
            cmd_simulate(bits, trials, samples, &mut logger)?;
        }
        Command::Visualize {
            bit_sizes,
            trials,
            all,
            out_dir,
        } => cmd_visualize(&bit_sizes, trials, all, &out_dir)?,
        Command::Demo => cmd_demo(&cli.log_dir)?,
    }

    Ok(())
}

/// Exit cleanly (status 0, no stack trace) when the user interrupts a
/// long-running search or simulation.
fn install_interrupt_handler() {
    let handler = ctrlc::set_handler(|| {
        println!("\n\nInterrupted by user. Exiting...");
        std::process::exit(0);
    });
    if let Err(error) = handler {
        warn!("Could not install interrupt handler: {}", error);
    }
}

fn main() {
    setup_logging();
    install_interrupt_handler();
    let cli = Cli::parse();
    print_banner();

    if let Err(error) = run(cli) {
        eprintln!("Error: {:#}", error);
        std::process::exit(1);
    }
}

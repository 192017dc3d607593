//! CLI for koon, the k-out-of-n reliability estimator.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "koon")]
#[command(about = "koon: exact and Monte Carlo k-out-of-n reliability")]
#[command(version = koon_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute exact reliability by enumerating all component states
    Exact {
        /// Comma-separated component success probabilities, e.g. "0.97,0.97,0.97,0.97"
        #[arg(long)]
        probs: String,

        /// Minimum number of working components
        #[arg(long)]
        k: usize,

        /// Also print the success-count distribution
        #[arg(long)]
        pmf: bool,

        /// Emit JSON instead of the text summary
        #[arg(long)]
        json: bool,
    },

    /// Estimate reliability by Monte Carlo and compare against the exact value
    Simulate {
        /// Comma-separated component success probabilities
        #[arg(long)]
        probs: String,

        /// Minimum number of working components
        #[arg(long)]
        k: usize,

        /// Number of batches (one proportion per batch)
        #[arg(long, default_value = "100")]
        batches: usize,

        /// Trials per batch
        #[arg(long, default_value = "8192")]
        shots: usize,

        /// Confidence level for the Student-t interval
        #[arg(long, default_value = "0.95")]
        confidence: f64,

        /// Seed for reproducible runs (omit for fresh randomness)
        #[arg(long)]
        seed: Option<u64>,

        /// Print each batch proportion as it completes
        #[arg(long)]
        verbose: bool,

        /// Emit the report as JSON instead of the text summary
        #[arg(long)]
        json: bool,
    },

    /// Run the classic 3-out-of-4 demonstration with default settings
    Demo,

    /// Validate the sampler against exact enumeration with a statistical battery
    Check {
        /// Comma-separated component success probabilities
        #[arg(long)]
        probs: String,

        /// Minimum number of working components
        #[arg(long)]
        k: usize,

        /// Trials per batch for the evidence pool
        #[arg(long, default_value = "4096")]
        shots: usize,

        /// Battery seed (omit for a random seed)
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Exact { probs, k, pmf, json } => commands::exact::run(&probs, k, pmf, json),
        Commands::Simulate {
            probs,
            k,
            batches,
            shots,
            confidence,
            seed,
            verbose,
            json,
        } => commands::simulate::run(&probs, k, batches, shots, confidence, seed, verbose, json),
        Commands::Demo => commands::demo::run(),
        Commands::Check { probs, k, shots, seed } => commands::check::run(&probs, k, shots, seed),
    }
}

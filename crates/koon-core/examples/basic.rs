//! Basic reliability estimation example.
//!
//! Computes the exact reliability of a 3-out-of-4 system, runs a seeded
//! Monte Carlo estimate, and prints how well the two agree.
//!
//! Run: `cargo run --example basic`

use koon_core::{SimulationConfig, exact_reliability, run_simulation};

fn main() {
    let p = [0.97, 0.97, 0.97, 0.97];
    let k = 3;

    let exact = exact_reliability(&p, k).expect("valid probabilities");
    println!("Exact {k}-out-of-{} reliability: {exact:.6}", p.len());

    let config = SimulationConfig {
        batches: 50,
        shots: 4096,
        seed: Some(42),
        ..Default::default()
    };
    let report = run_simulation(&p, k, &config).expect("valid simulation");

    println!("Monte Carlo mean:            {:.6}", report.mean);
    println!(
        "{:.0}% confidence interval:    [{:.6}, {:.6}]",
        report.confidence * 100.0,
        report.ci_lower,
        report.ci_upper
    );
    println!("Relative error:              {:.4}%", report.relative_error_pct);
}

use koon_core::SimulationConfig;

/// Canonical 3-out-of-4 system at component reliability 0.97, run with the
/// default batch plan and fresh randomness.
pub fn run() {
    println!("{}", "=".repeat(60));
    println!("MONTE CARLO RELIABILITY SIMULATION");
    println!("System: 3-out-of-4 (k=3, n=4)");
    println!("Component Reliability: p = 0.97 for all components");
    println!("{}", "=".repeat(60));
    println!();

    let p = vec![0.97; 4];
    let config = SimulationConfig::default();
    let report = koon_core::run_simulation(&p, 3, &config).unwrap_or_else(|e| super::fail(&e));
    super::print_report(&report);
}

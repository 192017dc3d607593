pub mod check;
pub mod demo;
pub mod exact;
pub mod simulate;

/// Parse a comma-separated probability list, e.g. "0.97, 0.9,0.85".
pub fn parse_probs(input: &str) -> Result<Vec<f64>, String> {
    let mut probs = Vec::new();
    for (i, field) in input.split(',').enumerate() {
        let field = field.trim();
        match field.parse::<f64>() {
            Ok(v) => probs.push(v),
            Err(_) => return Err(format!("invalid probability at position {i}: '{field}'")),
        }
    }
    Ok(probs)
}

/// Print `e` to stderr and exit with status 1.
pub fn fail(e: &dyn std::fmt::Display) -> ! {
    eprintln!("Error: {e}");
    std::process::exit(1);
}

/// Print a simulation report as a fixed-width summary table.
pub fn print_report(report: &koon_core::SimulationReport) {
    println!("{}", "=".repeat(60));
    println!("SIMULATION RESULTS");
    println!("{}", "=".repeat(60));
    println!("{:<24} {} x {}", "Batches x Shots", report.batches, report.shots);
    println!("{:<24} {:.6}", "Exact Reliability", report.exact);
    println!("{:<24} {:.6}", "Monte Carlo Mean", report.mean);
    println!("{:<24} {:.6}", "Std Dev (batches)", report.std_dev);
    println!(
        "{:<24} [{:.6}, {:.6}]",
        format!("{:.0}% CI", report.confidence * 100.0),
        report.ci_lower,
        report.ci_upper
    );
    println!("{:<24} {:.4}%", "Relative Error", report.relative_error_pct);
    println!("{}", "=".repeat(60));
}

use koon_core::SimulationConfig;

#[allow(clippy::too_many_arguments)]
pub fn run(
    probs: &str,
    k: usize,
    batches: usize,
    shots: usize,
    confidence: f64,
    seed: Option<u64>,
    verbose: bool,
    json: bool,
) {
    let p = super::parse_probs(probs).unwrap_or_else(|e| super::fail(&e));
    let config = SimulationConfig {
        batches,
        shots,
        confidence,
        seed,
        // Batch-by-batch progress would corrupt a JSON stream.
        verbose: verbose && !json,
    };
    let report = koon_core::run_simulation(&p, k, &config).unwrap_or_else(|e| super::fail(&e));

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{s}"),
            Err(e) => super::fail(&e),
        }
    } else {
        super::print_report(&report);
    }
}

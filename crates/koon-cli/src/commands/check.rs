use koon_tests::BatteryConfig;

pub fn run(probs: &str, k: usize, shots: usize, seed: Option<u64>) {
    let p = super::parse_probs(probs).unwrap_or_else(|e| super::fail(&e));
    let config = BatteryConfig {
        shots,
        seed: seed.unwrap_or_else(rand::random),
        ..BatteryConfig::default()
    };

    println!(
        "🔬 Running validation battery: {} batches x {} shots, seed {}",
        config.batches, config.shots, config.seed
    );
    println!();

    let results = koon_tests::run_battery(&p, k, &config).unwrap_or_else(|e| super::fail(&e));

    println!(
        "{:<26} {:>4} {:>6} {:>9}  {}",
        "Check", "Pass", "Grade", "p-value", "Details"
    );
    println!("{}", "-".repeat(78));
    for r in &results {
        let ok = if r.passed { "✓" } else { "✗" };
        let p_str = match r.p_value {
            Some(p) => format!("{p:.4}"),
            None => "--".to_string(),
        };
        println!(
            "{:<26} {:>4} {:>6} {:>9}  {}",
            r.name, ok, r.grade, p_str, r.details
        );
    }
    println!("{}", "-".repeat(78));

    let passed = results.iter().filter(|r| r.passed).count();
    let score = koon_tests::calculate_score(&results);
    println!("Score: {score:.0}/100 ({passed}/{} passed)", results.len());
}

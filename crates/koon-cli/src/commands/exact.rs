use serde::Serialize;

#[derive(Serialize)]
struct ExactOutput {
    n: usize,
    k: usize,
    exact: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pmf: Option<Vec<f64>>,
}

pub fn run(probs: &str, k: usize, pmf: bool, json: bool) {
    let p = super::parse_probs(probs).unwrap_or_else(|e| super::fail(&e));
    let exact = koon_core::exact_reliability(&p, k).unwrap_or_else(|e| super::fail(&e));
    let distribution = if pmf {
        Some(koon_core::success_count_pmf(&p).unwrap_or_else(|e| super::fail(&e)))
    } else {
        None
    };

    if json {
        let out = ExactOutput {
            n: p.len(),
            k,
            exact,
            pmf: distribution,
        };
        match serde_json::to_string_pretty(&out) {
            Ok(s) => println!("{s}"),
            Err(e) => super::fail(&e),
        }
    } else {
        println!("Exact {k}-out-of-{} reliability: {exact:.6}", p.len());
        if let Some(dist) = &distribution {
            println!();
            println!("{:<12} {}", "Successes", "Probability");
            println!("{}", "-".repeat(24));
            for (count, share) in dist.iter().enumerate() {
                println!("{count:<12} {share:.6}");
            }
        }
    }
}

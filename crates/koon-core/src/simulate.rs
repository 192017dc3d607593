//! Monte Carlo estimation of k-out-of-n reliability.
//!
//! The driver runs repeated batches of Bernoulli trials through a
//! [`TrialSampler`], records one success proportion per batch, and packages
//! mean, sample standard deviation, Student-t confidence interval, and the
//! relative error against the exact enumeration into a single report.

use serde::Serialize;

use crate::error::{Error, Result, validate_probabilities};
use crate::exact::exact_reliability;
use crate::sampler::{PseudoRandomSampler, TrialSampler, meets_threshold};
use crate::stats;

/// Knobs for one simulation run.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Independent experiment batches; the confidence interval is computed
    /// across their proportions.
    pub batches: usize,
    /// Trials per batch.
    pub shots: usize,
    /// Two-sided confidence level in (0, 1).
    pub confidence: f64,
    /// Fixed PRNG seed; `None` seeds from the operating system.
    pub seed: Option<u64>,
    /// Print one progress line per batch.
    pub verbose: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            batches: 100,
            shots: 8192,
            confidence: 0.95,
            seed: None,
            verbose: false,
        }
    }
}

/// Everything one simulation run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    /// Exact reliability from enumeration.
    pub exact: f64,
    /// Mean of the per-batch success proportions.
    pub mean: f64,
    /// Sample standard deviation across batches; 0 for a single batch.
    pub std_dev: f64,
    /// Interval bounds; both equal `mean` when `batches == 1`.
    pub ci_lower: f64,
    pub ci_upper: f64,
    /// Level the interval was built at.
    pub confidence: f64,
    /// |mean - exact| / exact, as a percentage.
    pub relative_error_pct: f64,
    /// Echoed run parameters.
    pub batches: usize,
    pub shots: usize,
}

/// Estimate k-out-of-n reliability by simulation and compare it with the
/// exact enumeration.
///
/// Draws `config.batches` batches of `config.shots` trials each. Every trial
/// samples one Bernoulli outcome per component and tests the k-of-n success
/// predicate; each batch yields the fraction of successful trials. The
/// report carries the batch mean, sample standard deviation, the two-sided
/// Student-t interval at `config.confidence` (collapsed to the point
/// estimate for a single batch), and the relative error against the exact
/// value.
///
/// Returns an error for malformed probabilities, zero batches or shots, a
/// confidence level outside (0, 1), or an exact reliability of zero (the
/// relative error would divide by it).
pub fn run_simulation(p: &[f64], k: usize, config: &SimulationConfig) -> Result<SimulationReport> {
    let mut sampler = match config.seed {
        Some(seed) => PseudoRandomSampler::seeded(seed),
        None => PseudoRandomSampler::new(),
    };
    run_simulation_with(p, k, config, &mut sampler)
}

/// [`run_simulation`] with a caller-supplied sampler.
///
/// The driver is indifferent to where outcomes come from; this entry point
/// exists for alternative samplers and for tests that script exact outcome
/// sequences. `config.seed` is ignored here since the sampler is already
/// built.
pub fn run_simulation_with(
    p: &[f64],
    k: usize,
    config: &SimulationConfig,
    sampler: &mut dyn TrialSampler,
) -> Result<SimulationReport> {
    validate_probabilities(p)?;
    if config.batches == 0 {
        return Err(Error::NoBatches);
    }
    if config.shots == 0 {
        return Err(Error::NoShots);
    }
    if !(config.confidence > 0.0 && config.confidence < 1.0) {
        return Err(Error::InvalidConfidence(config.confidence));
    }

    let exact = exact_reliability(p, k)?;
    if exact == 0.0 {
        return Err(Error::ZeroExactReliability);
    }

    log::debug!(
        "simulating {}-of-{} system: {} batches x {} shots",
        k,
        p.len(),
        config.batches,
        config.shots
    );

    let mut outcomes = vec![false; p.len()];
    let mut proportions = Vec::with_capacity(config.batches);
    for batch in 0..config.batches {
        let mut hits = 0usize;
        for _ in 0..config.shots {
            sampler.draw(p, &mut outcomes);
            if meets_threshold(&outcomes, k) {
                hits += 1;
            }
        }
        let proportion = hits as f64 / config.shots as f64;
        if config.verbose {
            println!(
                "  batch {:>4}/{}: proportion {proportion:.6}",
                batch + 1,
                config.batches
            );
        }
        proportions.push(proportion);
    }

    let mean = stats::mean(&proportions);
    let std_dev = stats::sample_std_dev(&proportions);
    let interval = stats::confidence_interval(&proportions, config.confidence);
    let relative_error_pct = (mean - exact).abs() / exact * 100.0;

    Ok(SimulationReport {
        exact,
        mean,
        std_dev,
        ci_lower: interval.lower,
        ci_upper: interval.upper,
        confidence: config.confidence,
        relative_error_pct,
        batches: config.batches,
        shots: config.shots,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed outcome table, one row per trial.
    struct ScriptedSampler {
        rows: Vec<Vec<bool>>,
        next: usize,
    }

    impl ScriptedSampler {
        fn new(rows: Vec<Vec<bool>>) -> Self {
            Self { rows, next: 0 }
        }
    }

    impl TrialSampler for ScriptedSampler {
        fn draw(&mut self, _p: &[f64], outcomes: &mut [bool]) {
            let row = &self.rows[self.next % self.rows.len()];
            outcomes.copy_from_slice(row);
            self.next += 1;
        }
    }

    fn config(batches: usize, shots: usize) -> SimulationConfig {
        SimulationConfig {
            batches,
            shots,
            confidence: 0.95,
            seed: Some(11),
            verbose: false,
        }
    }

    #[test]
    fn test_scripted_proportions_are_exact() {
        // 8 scripted trials covering two batches of 4: the first batch hits
        // the 1-of-2 predicate twice, the second never.
        let rows = vec![
            vec![true, false],
            vec![false, false],
            vec![true, true],
            vec![false, false],
            vec![false, false],
            vec![false, false],
            vec![false, false],
            vec![false, false],
        ];
        let mut sampler = ScriptedSampler::new(rows);
        let report =
            run_simulation_with(&[0.5, 0.5], 1, &config(2, 4), &mut sampler).unwrap();

        assert!((report.exact - 0.75).abs() < 1e-12);
        assert!((report.mean - 0.25).abs() < 1e-12);
        // Proportions 0.5 and 0.0: sample std is sqrt(2 * 0.25^2 / 1).
        assert!((report.std_dev - 0.125f64.sqrt()).abs() < 1e-12);
        assert!(report.ci_lower <= report.mean && report.mean <= report.ci_upper);
        let expected_rel = (0.25f64 - 0.75).abs() / 0.75 * 100.0;
        assert!((report.relative_error_pct - expected_rel).abs() < 1e-9);
    }

    #[test]
    fn test_same_seed_same_report() {
        let p = [0.8, 0.7, 0.9];
        let cfg = SimulationConfig {
            batches: 20,
            shots: 500,
            seed: Some(99),
            ..Default::default()
        };
        let a = run_simulation(&p, 2, &cfg).unwrap();
        let b = run_simulation(&p, 2, &cfg).unwrap();
        assert_eq!(a.mean, b.mean);
        assert_eq!(a.std_dev, b.std_dev);
        assert_eq!(a.ci_lower, b.ci_lower);
        assert_eq!(a.ci_upper, b.ci_upper);
        assert_eq!(a.relative_error_pct, b.relative_error_pct);
    }

    #[test]
    fn test_seeded_mean_stays_within_standard_errors() {
        let p = [0.8, 0.7, 0.9];
        let cfg = SimulationConfig {
            batches: 50,
            shots: 2000,
            seed: Some(42),
            ..Default::default()
        };
        let report = run_simulation(&p, 2, &cfg).unwrap();
        let se = report.std_dev / (report.batches as f64).sqrt();
        assert!(
            (report.mean - report.exact).abs() < 4.0 * se,
            "mean={} exact={} se={}",
            report.mean,
            report.exact,
            se
        );
    }

    #[test]
    fn test_single_batch_collapses_interval() {
        let report = run_simulation(&[0.9, 0.9], 1, &config(1, 1000)).unwrap();
        assert_eq!(report.std_dev, 0.0);
        assert_eq!(report.ci_lower, report.mean);
        assert_eq!(report.ci_upper, report.mean);
    }

    #[test]
    fn test_interval_narrows_with_more_batches() {
        let p = [0.85, 0.75, 0.8, 0.9];
        let narrow = run_simulation(&p, 3, &config(80, 400)).unwrap();
        let wide = run_simulation(&p, 3, &config(10, 400)).unwrap();
        assert!(wide.ci_upper - wide.ci_lower > narrow.ci_upper - narrow.ci_lower);
    }

    #[test]
    fn test_sure_thing_system_has_zero_error() {
        let report = run_simulation(&[1.0, 1.0, 1.0], 2, &config(5, 100)).unwrap();
        assert_eq!(report.exact, 1.0);
        assert_eq!(report.mean, 1.0);
        assert_eq!(report.relative_error_pct, 0.0);
    }

    #[test]
    fn test_rejects_degenerate_configs() {
        let p = [0.9, 0.9];
        assert_eq!(
            run_simulation(&p, 1, &config(0, 100)),
            Err(Error::NoBatches)
        );
        assert_eq!(run_simulation(&p, 1, &config(10, 0)), Err(Error::NoShots));

        let mut cfg = config(10, 100);
        cfg.confidence = 1.0;
        assert_eq!(
            run_simulation(&p, 1, &cfg),
            Err(Error::InvalidConfidence(1.0))
        );
        cfg.confidence = 0.0;
        assert_eq!(
            run_simulation(&p, 1, &cfg),
            Err(Error::InvalidConfidence(0.0))
        );
    }

    #[test]
    fn test_rejects_zero_exact_reliability() {
        assert_eq!(
            run_simulation(&[0.0, 0.0], 1, &config(10, 100)),
            Err(Error::ZeroExactReliability)
        );
        // k > n also has exact 0.
        assert_eq!(
            run_simulation(&[0.9], 2, &config(10, 100)),
            Err(Error::ZeroExactReliability)
        );
    }

    #[test]
    fn test_rejects_malformed_probabilities() {
        assert!(matches!(
            run_simulation(&[0.9, 2.0], 1, &config(10, 100)),
            Err(Error::InvalidProbability { index: 1, .. })
        ));
    }
}

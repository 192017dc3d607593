//! Bernoulli trial sampling behind a seam.
//!
//! The Monte Carlo driver treats "draw one success/failure outcome per
//! component, then test the k-of-n predicate" as its atomic operation. The
//! [`TrialSampler`] trait is that seam: the driver never cares where the
//! outcomes come from. [`PseudoRandomSampler`] is the production
//! implementation; tests substitute scripted outcome sequences.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of per-component success/failure outcomes.
pub trait TrialSampler {
    /// Fill `outcomes[i]` with one Bernoulli draw at probability `p[i]`.
    ///
    /// Callers pass slices of equal length; implementations may ignore
    /// trailing entries of the longer one.
    fn draw(&mut self, p: &[f64], outcomes: &mut [bool]);
}

/// PRNG-backed sampler. Seeded construction gives reproducible runs.
pub struct PseudoRandomSampler {
    rng: StdRng,
}

impl PseudoRandomSampler {
    /// Sampler seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Sampler with a fixed seed; identical seeds draw identical sequences.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for PseudoRandomSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl TrialSampler for PseudoRandomSampler {
    fn draw(&mut self, p: &[f64], outcomes: &mut [bool]) {
        for (out, &pi) in outcomes.iter_mut().zip(p) {
            // random::<f64>() samples [0, 1), so p = 1.0 always succeeds
            // and p = 0.0 never does.
            let u: f64 = self.rng.random();
            *out = u < pi;
        }
    }
}

/// k-of-n success predicate: at least `k` outcomes are successes.
pub fn meets_threshold(outcomes: &[bool], k: usize) -> bool {
    outcomes.iter().filter(|&&ok| ok).count() >= k
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicate_boundaries() {
        assert!(meets_threshold(&[], 0));
        assert!(!meets_threshold(&[], 1));
        assert!(meets_threshold(&[true, false, true], 2));
        assert!(!meets_threshold(&[true, false, true], 3));
        assert!(meets_threshold(&[false, false], 0));
    }

    #[test]
    fn test_degenerate_probabilities_are_deterministic() {
        let mut sampler = PseudoRandomSampler::seeded(1);
        let p = [1.0, 0.0, 1.0];
        let mut outcomes = [false; 3];
        for _ in 0..100 {
            sampler.draw(&p, &mut outcomes);
            assert_eq!(outcomes, [true, false, true]);
        }
    }

    #[test]
    fn test_same_seed_same_draws() {
        let p = [0.3, 0.7, 0.5, 0.9];
        let mut a = PseudoRandomSampler::seeded(0xC0FFEE);
        let mut b = PseudoRandomSampler::seeded(0xC0FFEE);
        let mut out_a = [false; 4];
        let mut out_b = [false; 4];
        for _ in 0..50 {
            a.draw(&p, &mut out_a);
            b.draw(&p, &mut out_b);
            assert_eq!(out_a, out_b);
        }
    }

    #[test]
    fn test_empirical_rate_tracks_probability() {
        let mut sampler = PseudoRandomSampler::seeded(7);
        let p = [0.25];
        let mut outcome = [false];
        let trials = 20_000;
        let mut hits = 0;
        for _ in 0..trials {
            sampler.draw(&p, &mut outcome);
            if outcome[0] {
                hits += 1;
            }
        }
        let rate = hits as f64 / trials as f64;
        // ~6 standard deviations of slack at n = 20k.
        assert!((rate - 0.25).abs() < 0.02, "rate {rate} far from 0.25");
    }
}

//! Batch statistics for the stochastic estimator.
//!
//! Everything the Monte Carlo driver aggregates lives here: mean, sample
//! standard deviation, standard error, and the two-sided Student-t interval
//! across batch proportions.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Two-sided confidence interval for a batch mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    /// Level the interval was built at, e.g. 0.95.
    pub level: f64,
}

impl ConfidenceInterval {
    /// Whether `value` lies inside the interval (bounds included).
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// Interval width, `upper - lower`.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Arithmetic mean. 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator). 0.0 with fewer than two
/// values, matching a single-batch run where no spread is observable.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (sum_sq / (n - 1) as f64).sqrt()
}

/// Standard error of the mean: s / sqrt(n).
pub fn standard_error(std_dev: f64, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    std_dev / (n as f64).sqrt()
}

/// Two-sided Student-t critical value at `level` with `df` degrees of
/// freedom: the quantile at (1 + level) / 2.
///
/// Callers guarantee `level` in (0, 1) and `df >= 1`.
pub fn t_critical(level: f64, df: f64) -> f64 {
    let dist = StudentsT::new(0.0, 1.0, df).unwrap();
    dist.inverse_cdf((1.0 + level) / 2.0)
}

/// Confidence interval for the mean of `values` at `level`.
///
/// With fewer than two values there is no observable spread and the interval
/// collapses to the point estimate.
pub fn confidence_interval(values: &[f64], level: f64) -> ConfidenceInterval {
    let m = mean(values);
    let n = values.len();
    if n < 2 {
        return ConfidenceInterval {
            lower: m,
            upper: m,
            level,
        };
    }
    let se = standard_error(sample_std_dev(values), n);
    let t = t_critical(level, (n - 1) as f64);
    ConfidenceInterval {
        lower: m - t * se,
        upper: m + t * se,
        level,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

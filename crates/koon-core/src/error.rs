//! Invalid-argument errors for the estimators.
//!
//! The original failure modes here are silent: probabilities outside [0, 1]
//! produce nonsensical mass products, zero batches or shots divide by zero,
//! and a zero exact reliability makes the relative error undefined. Each is
//! surfaced as an explicit [`Error`] instead.

/// Why an estimator rejected its input.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A component probability is outside [0, 1] or not finite.
    InvalidProbability { index: usize, value: f64 },
    /// More components than the exhaustive enumeration can index.
    TooManyComponents { count: usize },
    /// Batch count is zero; mean and standard deviation are undefined.
    NoBatches,
    /// Shot count is zero; a batch proportion is undefined.
    NoShots,
    /// Confidence level outside the open interval (0, 1).
    InvalidConfidence(f64),
    /// Exact reliability is exactly zero; relative error divides by it.
    ZeroExactReliability,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidProbability { index, value } => write!(
                f,
                "component probability {value} at index {index} is outside [0, 1]"
            ),
            Self::TooManyComponents { count } => write!(
                f,
                "{count} components exceed the enumeration limit of {}",
                crate::exact::MAX_COMPONENTS
            ),
            Self::NoBatches => write!(f, "batch count must be at least 1"),
            Self::NoShots => write!(f, "shot count must be at least 1"),
            Self::InvalidConfidence(level) => {
                write!(f, "confidence level {level} is outside (0, 1)")
            }
            Self::ZeroExactReliability => {
                write!(f, "exact reliability is zero, so relative error is undefined")
            }
        }
    }
}

impl std::error::Error for Error {}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Check that every entry of `p` is a finite probability in [0, 1].
pub fn validate_probabilities(p: &[f64]) -> Result<()> {
    for (index, &value) in p.iter().enumerate() {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(Error::InvalidProbability { index, value });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! # koon-core
//!
//! **k-out-of-n system reliability, two ways.**
//!
//! A k-out-of-n redundant system is operational when at least k of its n
//! components function; each component succeeds independently with its own
//! probability. `koon-core` estimates the system reliability with two
//! parallel estimators and reports how well they agree:
//!
//! - exact: exhaustive enumeration of all 2^n success/failure assignments;
//! - stochastic: repeated Bernoulli trial batches with a Student-t
//!   confidence interval across batch proportions.
//!
//! ## Quick Start
//!
//! ```
//! use koon_core::{SimulationConfig, exact_reliability, run_simulation};
//!
//! let p = [0.97, 0.97, 0.97, 0.97];
//! let exact = exact_reliability(&p, 3).unwrap();
//! assert!(exact > 0.99);
//!
//! let config = SimulationConfig {
//!     batches: 20,
//!     shots: 500,
//!     seed: Some(7),
//!     ..Default::default()
//! };
//! let report = run_simulation(&p, 3, &config).unwrap();
//! assert!(report.ci_lower <= report.mean && report.mean <= report.ci_upper);
//! ```
//!
//! ## Architecture
//!
//! Probabilities + threshold → sampler → batches → stats → report
//!
//! The exact enumeration runs first and rides along in every report for
//! comparison. Sampling sits behind the [`TrialSampler`] trait: the driver's
//! atomic operation is "draw one outcome per component, test the k-of-n
//! predicate", indifferent to where the outcomes come from.

pub mod error;
pub mod exact;
pub mod sampler;
pub mod simulate;
pub mod stats;

pub use error::{Error, Result, validate_probabilities};
pub use exact::{MAX_COMPONENTS, exact_reliability, success_count_pmf};
pub use sampler::{PseudoRandomSampler, TrialSampler, meets_threshold};
pub use simulate::{SimulationConfig, SimulationReport, run_simulation, run_simulation_with};
pub use stats::{
    ConfidenceInterval, confidence_interval, mean, sample_std_dev, standard_error, t_critical,
};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

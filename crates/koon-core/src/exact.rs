//! Exact k-out-of-n reliability by exhaustive enumeration.
//!
//! Every success/failure assignment of the n components is one bit pattern.
//! Walking all 2^n patterns and summing the probability mass of those with at
//! least k successes gives the exact system reliability. Cost doubles with
//! every component, so this is a small-n tool; no binomial closed form or
//! dynamic-programming shortcut is substituted, even for identical
//! components.

use crate::error::{Error, Result, validate_probabilities};

/// Largest component count the enumeration will accept.
///
/// Assignments are indexed by the bits of a `u64`, and 2^63 iterations is
/// already far past any practical runtime.
pub const MAX_COMPONENTS: usize = 63;

/// Exact probability that at least `k` of the components succeed.
///
/// Component `i` succeeds independently with probability `p[i]`. Each
/// assignment with at least `k` successes contributes the product of its
/// per-component terms: `p[i]` for a success bit, `1 - p[i]` for a failure
/// bit.
///
/// `k == 0` always succeeds and `k > p.len()` never does; both return
/// without enumerating. Everything else walks all 2^n assignments.
pub fn exact_reliability(p: &[f64], k: usize) -> Result<f64> {
    validate_probabilities(p)?;
    let n = p.len();
    if k == 0 {
        return Ok(1.0);
    }
    if k > n {
        return Ok(0.0);
    }
    ensure_enumerable(n)?;

    let mut total = 0.0;
    for assignment in 0u64..(1u64 << n) {
        if (assignment.count_ones() as usize) < k {
            continue;
        }
        total += assignment_mass(p, assignment);
    }
    Ok(total)
}

/// Exact probability mass function of the number of successful components.
///
/// Entry `j` of the returned vector is P(exactly j successes); the vector has
/// `p.len() + 1` entries and sums to 1 up to floating-point error. Shares the
/// 2^n enumeration with [`exact_reliability`], so the same size cap applies.
pub fn success_count_pmf(p: &[f64]) -> Result<Vec<f64>> {
    validate_probabilities(p)?;
    let n = p.len();
    ensure_enumerable(n)?;

    let mut pmf = vec![0.0; n + 1];
    for assignment in 0u64..(1u64 << n) {
        pmf[assignment.count_ones() as usize] += assignment_mass(p, assignment);
    }
    Ok(pmf)
}

/// Probability of one specific success/failure assignment.
fn assignment_mass(p: &[f64], assignment: u64) -> f64 {
    let mut mass = 1.0;
    for (i, &pi) in p.iter().enumerate() {
        mass *= if assignment >> i & 1 == 1 { pi } else { 1.0 - pi };
    }
    mass
}

fn ensure_enumerable(n: usize) -> Result<()> {
    if n > MAX_COMPONENTS {
        return Err(Error::TooManyComponents { count: n });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

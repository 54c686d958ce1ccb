//! Volume estimators for H-polytopes.
//!
//! Purpose
//! - `volume`: multiphase Monte-Carlo estimator over a telescoping sequence
//!   of balls from the inscribed ball outward.
//! - `volume_cooling`: Gaussian-annealing estimator telescoping
//!   importance-sampling ratios along a cooling schedule, with an online
//!   sliding-window convergence test.
//!
//! Both take the body, a `VolumeCfg`, a precomputed Chebyshev ball, and an
//! explicit RNG handle, and return a single volume estimate (the cooling
//! estimator also reports its total step count). All failures are local
//! algorithmic failures with no retry semantics; the remedy is a different
//! configuration or body, not a retry.

mod cfg;
mod cooling;
mod sequence;
mod telescope;
mod window;

#[cfg(test)]
mod tests;

pub use cfg::VolumeCfg;
pub use cooling::{volume_cooling, volume_cooling_with_schedule, CoolingEstimate};
pub use sequence::ball_sequence;
pub use telescope::volume;

use std::fmt;

use crate::lp::LpError;
use crate::rounding::RoundingError;

/// Errors surfaced by the estimators.
#[derive(Debug)]
pub enum VolumeError {
    /// Inscribed ball has non-positive radius (degenerate or lower-dimensional
    /// body); checked before any logarithm is taken.
    ZeroRadius,
    /// The ball sequence came out empty: the sampled extent lies strictly
    /// below the inscribed radius. A precondition violation, not recoverable.
    EmptyBallSequence,
    /// A telescoping phase found no points in the small ball; the ratio is
    /// undefined and a larger sample count or walk length is needed.
    SamplingStarvation { phase: usize },
    /// A cooling phase exhausted its step ceiling before the window spread
    /// met the tolerance; `best` is the estimate accumulated so far.
    NoConvergence { phase: usize, steps: usize, best: f64 },
    /// Chebyshev ball LP failure (empty or unbounded body).
    Lp(LpError),
    /// Rounding failure (degenerate sample set or ellipsoid).
    Rounding(RoundingError),
}

impl fmt::Display for VolumeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeError::ZeroRadius => write!(f, "inscribed ball has non-positive radius"),
            VolumeError::EmptyBallSequence => write!(f, "ball sequence is empty (degenerate geometry)"),
            VolumeError::SamplingStarvation { phase } => {
                write!(f, "no sample points left in the small ball at phase {phase}")
            }
            VolumeError::NoConvergence { phase, steps, best } => write!(
                f,
                "cooling phase {phase} did not converge within {steps} steps (best estimate {best})"
            ),
            VolumeError::Lp(e) => write!(f, "chebyshev ball: {e}"),
            VolumeError::Rounding(e) => write!(f, "rounding: {e}"),
        }
    }
}

impl std::error::Error for VolumeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VolumeError::Lp(e) => Some(e),
            VolumeError::Rounding(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LpError> for VolumeError {
    fn from(e: LpError) -> Self {
        VolumeError::Lp(e)
    }
}

impl From<RoundingError> for VolumeError {
    fn from(e: RoundingError) -> Self {
        VolumeError::Rounding(e)
    }
}

/// Volume of the n-dimensional unit ball, `pi^(n/2) / Gamma(n/2 + 1)`.
///
/// Computed by the two-step recurrence `v_n = v_{n-2} · 2π/n`, which avoids a
/// gamma-function dependency and is exact enough for all practical n.
pub fn unit_ball_volume(n: usize) -> f64 {
    let mut v = if n % 2 == 0 { 1.0 } else { 2.0 };
    let mut k = if n % 2 == 0 { 2 } else { 3 };
    while k <= n {
        v *= 2.0 * std::f64::consts::PI / k as f64;
        k += 2;
    }
    v
}

//! Gaussian annealing (cooling) schedule.
//!
//! Produces the strictly decreasing sequence of variance parameters
//! ("temperatures") the cooling estimator telescopes over: the first
//! temperature concentrates the Gaussian well inside the inscribed ball, the
//! last is flat enough over the body that truncation bias stays below the
//! requested error budget.

use rand::Rng;

use crate::body::{ConvexBody, HPoly, Point};
use crate::sampling::{walk_uniform, WalkKind};

/// Build the temperature schedule for `poly` (already recentred so the
/// Chebyshev center is the origin).
///
/// - first temperature `a_0 = c0 · n / radius^2`;
/// - geometric cooling by `ratio` (callers use `1 - 1/n`, matching the walk's
///   mixing-time order);
/// - stop temperature `error / (4 R^2)` where `R` is the largest sample norm
///   seen on a short pilot walk, so `exp(-a_stop·R^2) >= 1 - error/4`.
///
/// The result always has at least two elements and is strictly decreasing.
pub fn schedule<R: Rng>(
    poly: &HPoly,
    error: f64,
    radius: f64,
    ratio: f64,
    c0: f64,
    walk_len: usize,
    kind: WalkKind,
    rng: &mut R,
) -> Vec<f64> {
    debug_assert!(radius > 0.0 && error > 0.0);
    debug_assert!(ratio > 0.0 && ratio < 1.0);
    let n = poly.dimension();
    let a0 = c0 * n as f64 / (radius * radius);

    // Pilot walk for the body's sampled extent; origin is interior by the
    // recentring contract.
    let mut p = Point::zeros(n);
    let mut pts = Vec::new();
    walk_uniform(poly, &mut p, (10 * n).max(100), walk_len, kind, rng, &mut pts);
    let r2_max = pts
        .iter()
        .map(|q| q.norm_squared())
        .fold(radius * radius, f64::max);

    let a_stop = (error / (4.0 * r2_max)).min(a0 * ratio);
    let mut vals = vec![a0];
    let mut a = a0 * ratio;
    while a > a_stop {
        vals.push(a);
        a *= ratio;
    }
    vals.push(a_stop);
    debug_assert!(vals.windows(2).all(|w| w[0] > w[1] && w[1] > 0.0));
    tracing::debug!(phases = vals.len() - 1, a0, a_stop, "annealing schedule");
    vals
}

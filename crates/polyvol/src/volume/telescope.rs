//! Multiphase Monte-Carlo volume estimation over a telescoping ball sequence.

use rand::Rng;

use super::{ball_sequence, unit_ball_volume, VolumeCfg, VolumeError};
use crate::body::{Ball, BallPoly, ConvexBody, HPoly, Point};
use crate::lp::chebyshev_ball;
use crate::rounding::round_to_ball;
use crate::sampling::{sphere_point, walk_uniform, WalkKind};

/// Estimate the volume of `poly` by the ball-sequence telescoping method.
///
/// `cheb` is the precomputed Chebyshev ball. With `cfg.round` set the body is
/// rounded in place first and the ball recomputed. `cfg.repetitions`
/// independent estimates are combined by arithmetic mean; each repetition
/// draws its own samples from `rng`, so the combination is order-independent
/// up to the sampler's statistical tolerance.
pub fn volume<R: Rng>(
    poly: &mut HPoly,
    cfg: &VolumeCfg,
    cheb: &Ball,
    rng: &mut R,
) -> Result<f64, VolumeError> {
    let n = poly.dimension();
    let mut center = cheb.center.clone();
    let mut radius = cheb.radius();
    if !(radius > 0.0) {
        return Err(VolumeError::ZeroRadius);
    }

    let mut round_value = 1.0;
    if cfg.round {
        round_value = round_to_ball(
            poly,
            &center,
            radius,
            cfg.samples.clamp(100, 1000),
            cfg.walk_len(n),
            walk_kind(cfg),
            rng,
        )?;
        let ball = chebyshev_ball(poly)?;
        radius = ball.radius();
        center = ball.center;
        if !(radius > 0.0) {
            return Err(VolumeError::ZeroRadius);
        }
    }

    let reps = cfg.repetitions.max(1);
    let mut acc = 0.0;
    for rep in 0..reps {
        let est = estimate_once(poly, cfg, &center, radius, rng)?;
        tracing::debug!(rep, est, "telescoping repetition");
        acc += est;
    }
    Ok(round_value * acc / reps as f64)
}

/// One independent telescoping estimate (no rounding, fixed inscribed ball).
fn estimate_once<R: Rng>(
    poly: &HPoly,
    cfg: &VolumeCfg,
    center: &Point,
    radius: f64,
    rng: &mut R,
) -> Result<f64, VolumeError> {
    let n = poly.dimension();
    let kind = walk_kind(cfg);
    let walk_len = cfg.walk_len(n);
    let target = cfg.samples.max(2);

    // First point: uniform on the inscribed sphere, then a long burn-in walk
    // before the sample proper.
    let mut p = sphere_point(n, radius, rng) + center;
    let mut samples: Vec<Point> = Vec::with_capacity(target);
    walk_uniform(poly, &mut p, 1, 50 * n, kind, rng, &mut samples);
    walk_uniform(poly, &mut p, target - 1, walk_len, kind, rng, &mut samples);

    let max_dist = samples
        .iter()
        .map(|q| (q - center).norm())
        .fold(0.0f64, f64::max);
    let balls = ball_sequence(center, radius, max_dist, n)?;
    if cfg.verbose {
        tracing::info!(balls = balls.len(), radius, max_dist, "ball sequence");
    }

    // Walk the sequence outside-in. Invariant: `samples` holds points
    // uniformly distributed in body ∩ balls[k] at the top of each phase.
    let mut telescoping = 1.0;
    for k in (1..balls.len()).rev() {
        let phase = balls.len() - 1 - k;
        let large_ball = &balls[k];
        let small = &balls[k - 1];
        let large = BallPoly::new(poly, large_ball);

        let considered = samples.len();
        samples.retain(|q| small.contains_point(q));
        if samples.is_empty() {
            return Err(VolumeError::SamplingStarvation { phase });
        }

        // Top up to the target count with fresh walks in the large
        // intersection, seeded from a retained sample; new points count
        // toward the ratio and are kept only if they land in the small ball.
        if considered < target {
            let mut chain = samples[0].clone();
            let mut fresh = Vec::with_capacity(target - considered);
            walk_uniform(
                &large,
                &mut chain,
                target - considered,
                walk_len,
                kind,
                rng,
                &mut fresh,
            );
            for q in fresh {
                if small.contains_point(&q) {
                    samples.push(q);
                }
            }
        }

        // Non-empty: the retain above errored otherwise and top-up only adds.
        let count_small = samples.len();
        let ratio = target as f64 / count_small as f64;
        telescoping *= ratio;
        if cfg.verbose {
            tracing::info!(
                phase,
                large = large_ball.radius(),
                small = small.radius(),
                count_small,
                ratio,
                "telescoping phase"
            );
        } else {
            tracing::debug!(phase, count_small, ratio, "telescoping phase");
        }
    }

    let inner = &balls[0];
    Ok(unit_ball_volume(n) * inner.radius().powi(n as i32) * telescoping)
}

#[inline]
fn walk_kind(cfg: &VolumeCfg) -> WalkKind {
    if cfg.coordinate {
        WalkKind::Coordinate
    } else {
        WalkKind::HitAndRun
    }
}

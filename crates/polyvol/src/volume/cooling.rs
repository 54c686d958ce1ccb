//! Gaussian-annealing (cooling) volume estimation.

use rand::Rng;

use super::window::SlidingWindow;
use super::{VolumeCfg, VolumeError};
use crate::annealing::schedule;
use crate::body::{Ball, ConvexBody, HPoly, Point};
use crate::lp::chebyshev_ball;
use crate::rounding::round_to_ball;
use crate::sampling::{gaussian_next, WalkKind};

/// Result of the cooling estimator: the volume and the total number of
/// sampler steps across all phases (diagnostic only).
#[derive(Clone, Copy, Debug)]
pub struct CoolingEstimate {
    pub volume: f64,
    pub steps: usize,
}

/// Estimate the volume of `poly` by Gaussian annealing.
///
/// Optionally rounds the body, recentres it so the Chebyshev center is the
/// origin (the Gaussian is centered there), obtains the cooling schedule,
/// and telescopes one importance-sampling ratio per temperature transition.
pub fn volume_cooling<R: Rng>(
    poly: &mut HPoly,
    cfg: &VolumeCfg,
    cheb: &Ball,
    rng: &mut R,
) -> Result<CoolingEstimate, VolumeError> {
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
            WalkKind::HitAndRun,
            rng,
        )?;
        let ball = chebyshev_ball(poly)?;
        radius = ball.radius();
        center = ball.center;
        if !(radius > 0.0) {
            return Err(VolumeError::ZeroRadius);
        }
    }

    // Align the Gaussian's center with the body's core.
    poly.translate(&center);

    let ratio = 1.0 - 1.0 / n as f64;
    let a_vals = schedule(
        poly,
        cfg.error,
        radius,
        ratio,
        2.0,
        cfg.walk_len(n),
        WalkKind::HitAndRun,
        rng,
    );
    volume_cooling_with_schedule(poly, cfg, &a_vals, round_value, rng)
}

/// Cooling estimation with a caller-supplied temperature schedule.
///
/// `poly` must already be recentred at its Chebyshev center; `a_vals` must be
/// strictly decreasing and positive. `round_value` scales the result (1 when
/// no rounding was applied).
pub fn volume_cooling_with_schedule<R: Rng>(
    poly: &HPoly,
    cfg: &VolumeCfg,
    a_vals: &[f64],
    round_value: f64,
    rng: &mut R,
) -> Result<CoolingEstimate, VolumeError> {
    let n = poly.dimension();
    debug_assert!(a_vals.windows(2).all(|w| w[0] > w[1] && w[1] > 0.0));

    let phases = a_vals.len().saturating_sub(1);
    let w = 4 * n * n + 500;
    let step_limit = cfg.phase_step_limit.unwrap_or(200 * w);
    let curr_eps = cfg.error / (phases.max(1) as f64).sqrt();

    // Closed-form Gaussian normalizing term at the first temperature.
    let mut vol = (std::f64::consts::PI / a_vals[0]).powf(n as f64 / 2.0) * round_value.abs();
    let mut total_steps = 0usize;

    for i in 0..phases {
        let a_i = a_vals[i];
        let a_next = a_vals[i + 1];
        let mut p = Point::zeros(n);
        let mut fn_sum = 0.0;
        let mut its = 0usize;
        let mut window = SlidingWindow::new(w);

        loop {
            gaussian_next(poly, &mut p, 1, a_i, WalkKind::HitAndRun, rng);
            its += 1;
            total_steps += 1;
            // exp(-a_next·|x|^2) / exp(-a_i·|x|^2)
            fn_sum += ((a_i - a_next) * p.norm_squared()).exp();
            let val = fn_sum / its as f64;
            window.push(val);

            if window.is_full() && window.spread() <= curr_eps / 2.0 {
                break;
            }
            if its >= step_limit {
                return Err(VolumeError::NoConvergence {
                    phase: i,
                    steps: total_steps,
                    best: vol * val,
                });
            }
        }

        let phase_ratio = fn_sum / its as f64;
        vol *= phase_ratio;
        if cfg.verbose {
            tracing::info!(phase = i, a_i, a_next, its, phase_ratio, "cooling phase");
        } else {
            tracing::debug!(phase = i, its, phase_ratio, "cooling phase");
        }
    }

    Ok(CoolingEstimate {
        volume: vol,
        steps: total_steps,
    })
}

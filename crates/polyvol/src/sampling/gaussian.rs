//! Gaussian-weighted hit-and-run walk.
//!
//! Along any chord, the restriction of `exp(-a·|x|^2)` is a 1-D Gaussian
//! with variance `1/(2a)` truncated to the chord interval, so each step
//! reduces to sampling a truncated normal. Chords may be half-open or fully
//! open (unconstrained bodies); the tail cases use Robert's exponential
//! rejection instead of looping on a near-zero acceptance rate.

use rand::Rng;
use rand_distr::StandardNormal;

use super::walk::{coord_dir, sphere_dir};
use super::WalkKind;
use crate::body::{ConvexBody, Point};

/// Advance `p` by `walk_len` Gaussian-weighted steps at variance parameter `a`.
pub fn gaussian_next<B: ConvexBody, R: Rng>(
    body: &B,
    p: &mut Point,
    walk_len: usize,
    a: f64,
    kind: WalkKind,
    rng: &mut R,
) {
    debug_assert!(a > 0.0, "variance parameter must be positive");
    for _ in 0..walk_len.max(1) {
        gaussian_step(body, p, a, kind, rng);
    }
}

/// Extend `out` by `count` points distributed as `exp(-a·|x|^2)` on `body`.
///
/// Same chain contract as `walk_uniform`: `p` is the chain state and is left
/// at the last sampled point.
pub fn walk_gaussian<B: ConvexBody, R: Rng>(
    body: &B,
    p: &mut Point,
    count: usize,
    walk_len: usize,
    a: f64,
    kind: WalkKind,
    rng: &mut R,
    out: &mut Vec<Point>,
) {
    for _ in 0..count {
        gaussian_next(body, p, walk_len, a, kind, rng);
        out.push(p.clone());
    }
}

fn gaussian_step<B: ConvexBody, R: Rng>(body: &B, p: &mut Point, a: f64, kind: WalkKind, rng: &mut R) {
    let n = body.dimension();
    let sigma = (1.0 / (2.0 * a)).sqrt();
    match kind {
        WalkKind::Coordinate => {
            let j = rng.gen_range(0..n);
            let dir = coord_dir(n, j);
            let Some((lo, hi)) = body.line_range(p, &dir) else {
                return;
            };
            // The coordinate value v = p[j] + t has density ∝ exp(-a v^2).
            p[j] = trunc_normal(p[j] + lo, p[j] + hi, sigma, rng);
        }
        WalkKind::HitAndRun => {
            let dir = sphere_dir(n, rng);
            let Some((lo, hi)) = body.line_range(p, &dir) else {
                return;
            };
            // |p + t·dir|^2 = t^2 + 2t(p·dir) + |p|^2: t is normal with mean
            // -(p·dir), truncated to the chord.
            let mu = -p.dot(&dir);
            let t = mu + trunc_normal(lo - mu, hi - mu, sigma, rng);
            *p += dir * t;
        }
    }
}

/// Sample `N(0, sigma^2)` truncated to `[lo, hi]`; either bound may be
/// infinite.
fn trunc_normal<R: Rng>(lo: f64, hi: f64, sigma: f64, rng: &mut R) -> f64 {
    if hi <= lo {
        return lo;
    }
    sigma * trunc_std_normal(lo / sigma, hi / sigma, rng)
}

fn trunc_std_normal<R: Rng>(a: f64, b: f64, rng: &mut R) -> f64 {
    if a == f64::NEG_INFINITY && b == f64::INFINITY {
        return rng.sample(StandardNormal);
    }
    if a == f64::NEG_INFINITY {
        return -trunc_std_normal(-b, f64::INFINITY, rng);
    }
    if b == f64::INFINITY {
        if a <= 0.0 {
            // Acceptance rate >= 1/2.
            loop {
                let z: f64 = rng.sample(StandardNormal);
                if z >= a {
                    return z;
                }
            }
        }
        return robert_tail(a, rng);
    }
    // Finite interval. Plain rejection works unless the interval sits deep in
    // a tail; then switch to a uniform proposal weighted by the density ratio
    // against the interval's mode.
    if a <= 2.0 && b >= -2.0 {
        for _ in 0..64 {
            let z: f64 = rng.sample(StandardNormal);
            if z >= a && z <= b {
                return z;
            }
        }
    }
    let mode = if a > 0.0 {
        a
    } else if b < 0.0 {
        b
    } else {
        0.0
    };
    for _ in 0..10_000 {
        let z = a + rng.gen::<f64>() * (b - a);
        let accept = ((mode * mode - z * z) / 2.0).exp();
        if rng.gen::<f64>() < accept {
            return z;
        }
    }
    mode
}

/// Robert's rejection sampler for the upper tail `z >= a`, `a > 0`.
fn robert_tail<R: Rng>(a: f64, rng: &mut R) -> f64 {
    let lambda = (a + (a * a + 4.0).sqrt()) / 2.0;
    for _ in 0..10_000 {
        let z = a - rng.gen::<f64>().ln() / lambda;
        let accept = (-(z - lambda) * (z - lambda) / 2.0).exp();
        if rng.gen::<f64>() < accept {
            return z;
        }
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::HPoly;
    use nalgebra::{DMatrix, DVector};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn free_space_gaussian_matches_moments() {
        // No constraints: the walk targets a plain N(0, 1/(2a)) per coordinate.
        let body = HPoly::new(DMatrix::zeros(0, 2), DVector::zeros(0));
        let a = 2.0;
        let mut rng = StdRng::seed_from_u64(19);
        let mut p = Point::zeros(2);
        let mut pts = Vec::new();
        walk_gaussian(&body, &mut p, 4000, 3, a, WalkKind::HitAndRun, &mut rng, &mut pts);
        let mean_sq: f64 = pts.iter().map(|q| q.norm_squared()).sum::<f64>() / pts.len() as f64;
        // E[|x|^2] = n/(2a) = 0.5 here.
        assert!((mean_sq - 0.5).abs() < 0.05, "mean_sq {mean_sq}");
    }

    #[test]
    fn truncated_gaussian_stays_inside_body() {
        let body = HPoly::cube(3, 0.3);
        let mut rng = StdRng::seed_from_u64(23);
        let mut p = Point::zeros(3);
        let mut pts = Vec::new();
        walk_gaussian(&body, &mut p, 500, 2, 5.0, WalkKind::Coordinate, &mut rng, &mut pts);
        assert!(pts.iter().all(|q| body.contains(q)));
    }

    #[test]
    fn tail_sampler_respects_lower_bound() {
        let mut rng = StdRng::seed_from_u64(29);
        for _ in 0..200 {
            let z = robert_tail(3.5, &mut rng);
            assert!(z >= 3.5);
        }
    }

    #[test]
    fn far_tail_interval_sampling() {
        let mut rng = StdRng::seed_from_u64(31);
        for _ in 0..200 {
            let z = trunc_std_normal(4.0, 4.5, &mut rng);
            assert!((4.0..=4.5).contains(&z));
        }
    }
}

//! Uniform hit-and-run and coordinate-direction walks.

use rand::Rng;
use rand_distr::StandardNormal;

use super::WalkKind;
use crate::body::{ConvexBody, Point};

/// Uniform point on the sphere of the given radius, centered at the origin.
pub fn sphere_point<R: Rng>(n: usize, radius: f64, rng: &mut R) -> Point {
    let dir = sphere_dir(n, rng);
    dir * radius
}

/// Uniform direction on the unit sphere (normalized Gaussian vector).
pub(crate) fn sphere_dir<R: Rng>(n: usize, rng: &mut R) -> Point {
    loop {
        let v = Point::from_fn(n, |_, _| rng.sample::<f64, _>(StandardNormal));
        let norm = v.norm();
        if norm > 1e-12 {
            return v / norm;
        }
    }
}

/// Unit vector along coordinate axis `j`.
pub(crate) fn coord_dir(n: usize, j: usize) -> Point {
    let mut d = Point::zeros(n);
    d[j] = 1.0;
    d
}

/// One uniform walk step; `p` must lie inside `body` and stays inside.
///
/// A step with a missing or infinite chord is skipped: the uniform walk is
/// only meaningful on bounded bodies, and a skipped step keeps the chain
/// valid instead of producing a point at infinity.
fn uniform_step<B: ConvexBody, R: Rng>(body: &B, p: &mut Point, kind: WalkKind, rng: &mut R) {
    let n = body.dimension();
    let dir = match kind {
        WalkKind::HitAndRun => sphere_dir(n, rng),
        WalkKind::Coordinate => coord_dir(n, rng.gen_range(0..n)),
    };
    let Some((lo, hi)) = body.line_range(p, &dir) else {
        return;
    };
    if !(lo.is_finite() && hi.is_finite()) || hi <= lo {
        return;
    }
    let t = lo + rng.gen::<f64>() * (hi - lo);
    *p += dir * t;
}

/// Extend `out` by `count` points uniformly distributed in `body`.
///
/// Each point is obtained by `walk_len` steps continuing from the previous
/// point (or from `p` for the first); `p` is left at the final chain state.
pub fn walk_uniform<B: ConvexBody, R: Rng>(
    body: &B,
    p: &mut Point,
    count: usize,
    walk_len: usize,
    kind: WalkKind,
    rng: &mut R,
    out: &mut Vec<Point>,
) {
    for _ in 0..count {
        for _ in 0..walk_len.max(1) {
            uniform_step(body, p, kind, rng);
        }
        out.push(p.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::HPoly;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn walk_stays_inside_cube() {
        let body = HPoly::cube(3, 0.5);
        let mut rng = StdRng::seed_from_u64(7);
        let mut p = Point::zeros(3);
        let mut pts = Vec::new();
        walk_uniform(&body, &mut p, 200, 5, WalkKind::HitAndRun, &mut rng, &mut pts);
        assert_eq!(pts.len(), 200);
        assert!(pts.iter().all(|q| body.contains(q)));
    }

    #[test]
    fn coordinate_walk_covers_the_cube() {
        let body = HPoly::cube(2, 1.0);
        let mut rng = StdRng::seed_from_u64(11);
        let mut p = Point::zeros(2);
        let mut pts = Vec::new();
        walk_uniform(&body, &mut p, 2000, 8, WalkKind::Coordinate, &mut rng, &mut pts);
        // Empirical mean of a uniform sample over a symmetric cube is near 0.
        let mean = pts.iter().fold(Point::zeros(2), |acc, q| acc + q) / (pts.len() as f64);
        assert!(mean.norm() < 0.1, "mean {mean}");
        // Corners region gets visited: spread should be cube-like, not ball-like.
        let max_coord = pts
            .iter()
            .map(|q| q.amax())
            .fold(0.0f64, f64::max);
        assert!(max_coord > 0.9);
    }

    #[test]
    fn sphere_point_has_requested_norm() {
        let mut rng = StdRng::seed_from_u64(3);
        let p = sphere_point(5, 2.5, &mut rng);
        assert!((p.norm() - 2.5).abs() < 1e-12);
    }
}

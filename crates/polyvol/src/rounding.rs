//! Ellipsoidal rounding of an H-polytope.
//!
//! Purpose
//! - Precondition skinny bodies before volume estimation: sample points in
//!   the body, fit their minimum-volume enclosing ellipsoid (MVEE), and apply
//!   the whitening map that sends that ellipsoid to a ball.
//!
//! The polytope is mutated in place (the one allowed side effect on a body);
//! the returned factor corrects the volume estimate computed on the
//! transformed body back to the original.

use std::fmt;

use nalgebra::{Cholesky, DMatrix, Dyn};
use rand::Rng;

use crate::body::{ConvexBody, HPoly, Point};
use crate::sampling::{sphere_point, walk_uniform, WalkKind};

/// Errors surfaced by rounding.
#[derive(Debug)]
pub enum RoundingError {
    /// Too few or affinely dependent sample points; no ellipsoid fits.
    DegeneratePointSet,
    /// The fitted shape matrix is not positive definite (numerical failure).
    BadEllipsoid,
}

impl fmt::Display for RoundingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundingError::DegeneratePointSet => {
                write!(f, "sample points span no full-dimensional ellipsoid")
            }
            RoundingError::BadEllipsoid => {
                write!(f, "enclosing ellipsoid is numerically degenerate")
            }
        }
    }
}

impl std::error::Error for RoundingError {}

/// Round `poly` in place and return the volume correction factor.
///
/// `center`/`radius` describe the current Chebyshev ball (walk seed);
/// `samples` points are drawn with `walk_len`-step walks for the MVEE fit.
/// After the call, estimates on the transformed body are multiplied by the
/// returned factor to recover the original volume.
pub fn round_to_ball<R: Rng>(
    poly: &mut HPoly,
    center: &Point,
    radius: f64,
    samples: usize,
    walk_len: usize,
    kind: WalkKind,
    rng: &mut R,
) -> Result<f64, RoundingError> {
    let n = poly.dimension();
    let mut p = sphere_point(n, radius, rng) + center;
    let mut pts = Vec::with_capacity(samples);
    // Long burn-in from the inscribed sphere, then the fit sample.
    walk_uniform(poly, &mut p, 1, 50 * n, kind, rng, &mut pts);
    walk_uniform(poly, &mut p, samples.saturating_sub(1), walk_len, kind, rng, &mut pts);

    let (shape, c) = mvee(&pts, 0.01, 1000).ok_or(RoundingError::DegeneratePointSet)?;
    let chol: Cholesky<f64, Dyn> =
        Cholesky::new(shape).ok_or(RoundingError::BadEllipsoid)?;
    let l = chol.l();
    // Map y = L^T (x - c) sends the ellipsoid to the unit ball; substitute
    // x = c + (L^T)^{-1} y into the constraints.
    let lt_inv = l
        .transpose()
        .try_inverse()
        .ok_or(RoundingError::BadEllipsoid)?;
    poly.translate(&c);
    poly.apply_linear(&lt_inv);

    let det_l: f64 = l.diagonal().iter().product();
    if !(det_l.is_finite() && det_l > 0.0) {
        return Err(RoundingError::BadEllipsoid);
    }
    tracing::debug!(det_l, "rounding applied");
    Ok(det_l.recip())
}

/// Minimum-volume enclosing ellipsoid `{ x : (x-c)^T A (x-c) <= 1 }` of a
/// point set, by Khachiyan's barycentric coordinate-ascent.
///
/// Returns `(A, c)`; `None` if the points are degenerate.
pub(crate) fn mvee(points: &[Point], tol: f64, max_iter: usize) -> Option<(DMatrix<f64>, Point)> {
    if points.is_empty() {
        return None;
    }
    let n = points[0].len();
    let np = points.len();
    if np < n + 1 {
        return None;
    }
    let d = n + 1;
    let df = d as f64;
    let mut u = vec![1.0 / np as f64; np];

    for _ in 0..max_iter {
        // X = sum_j u_j q_j q_j^T over lifted points q_j = (p_j, 1).
        let mut x = DMatrix::<f64>::zeros(d, d);
        for (j, p) in points.iter().enumerate() {
            let w = u[j];
            for r in 0..d {
                let qr = if r < n { p[r] } else { 1.0 };
                for s in 0..d {
                    let qs = if s < n { p[s] } else { 1.0 };
                    x[(r, s)] += w * qr * qs;
                }
            }
        }
        let xinv = x.try_inverse()?;
        // kappa = max_j q_j^T X^{-1} q_j; ascent bumps the weight of the
        // worst-covered point.
        let mut kappa = f64::NEG_INFINITY;
        let mut jmax = 0;
        for (j, p) in points.iter().enumerate() {
            let mut wj = 0.0;
            for r in 0..d {
                let qr = if r < n { p[r] } else { 1.0 };
                for s in 0..d {
                    let qs = if s < n { p[s] } else { 1.0 };
                    wj += qr * xinv[(r, s)] * qs;
                }
            }
            if wj > kappa {
                kappa = wj;
                jmax = j;
            }
        }
        if !kappa.is_finite() {
            return None;
        }
        if kappa <= df * (1.0 + tol) {
            break;
        }
        let step = (kappa - df) / (df * (kappa - 1.0));
        for w in u.iter_mut() {
            *w *= 1.0 - step;
        }
        u[jmax] += step;
    }

    let mut c = Point::zeros(n);
    for (j, p) in points.iter().enumerate() {
        c += p * u[j];
    }
    let mut m = DMatrix::zeros(n, n);
    for (j, p) in points.iter().enumerate() {
        let w = u[j];
        for r in 0..n {
            for s in 0..n {
                m[(r, s)] += w * p[r] * p[s];
            }
        }
    }
    for r in 0..n {
        for s in 0..n {
            m[(r, s)] -= c[r] * c[s];
        }
    }
    let a = m.try_inverse()? / n as f64;
    Some((a, c))
}

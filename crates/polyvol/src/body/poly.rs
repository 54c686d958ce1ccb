//! H-polytope `{ x : A x <= b }` with membership and chord geometry.

use nalgebra::{DMatrix, DVector};

use super::{ConvexBody, Point, FEAS_EPS};

/// Convex polytope as an intersection of half-spaces (rows of `A x <= b`).
///
/// Invariants:
/// - `a.nrows() == b.len()`; rows need not be normalized.
/// - Membership uses `a_i · x <= b_i + FEAS_EPS` per row.
///
/// Rounding and recentring mutate the coefficients in place; estimators
/// otherwise only read the body.
#[derive(Clone, Debug)]
pub struct HPoly {
    pub a: DMatrix<f64>,
    pub b: DVector<f64>,
}

impl HPoly {
    pub fn new(a: DMatrix<f64>, b: DVector<f64>) -> Self {
        assert_eq!(a.nrows(), b.len(), "row count mismatch");
        Self { a, b }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.a.nrows()
    }

    #[inline]
    pub fn contains_eps(&self, x: &Point, eps: f64) -> bool {
        (0..self.a.nrows()).all(|i| self.a.row(i).transpose().dot(x) <= self.b[i] + eps)
    }

    /// Shift so that `c` becomes the origin: `b <- b - A c`.
    pub fn translate(&mut self, c: &Point) {
        self.b -= &self.a * c;
    }

    /// Substitute `x = M y` (push-forward under the inverse map): `A <- A M`.
    pub fn apply_linear(&mut self, m: &DMatrix<f64>) {
        self.a = &self.a * m;
    }

    /// Axis-aligned cube `[-half_side, half_side]^n`.
    pub fn cube(n: usize, half_side: f64) -> Self {
        let mut a = DMatrix::zeros(2 * n, n);
        let mut b = DVector::zeros(2 * n);
        for i in 0..n {
            a[(2 * i, i)] = 1.0;
            a[(2 * i + 1, i)] = -1.0;
            b[2 * i] = half_side;
            b[2 * i + 1] = half_side;
        }
        Self { a, b }
    }

    /// Standard simplex `{ x >= 0, sum x_i <= 1 }`.
    pub fn simplex(n: usize) -> Self {
        let mut a = DMatrix::zeros(n + 1, n);
        let mut b = DVector::zeros(n + 1);
        for i in 0..n {
            a[(i, i)] = -1.0;
        }
        for j in 0..n {
            a[(n, j)] = 1.0;
        }
        b[n] = 1.0;
        Self { a, b }
    }

    /// Cross-polytope `{ x : sum |x_i| <= radius }` (2^n facets; small n only).
    pub fn cross(n: usize, radius: f64) -> Self {
        let rows = 1usize << n;
        let mut a = DMatrix::zeros(rows, n);
        let b = DVector::from_element(rows, radius);
        for s in 0..rows {
            for j in 0..n {
                a[(s, j)] = if s & (1 << j) != 0 { -1.0 } else { 1.0 };
            }
        }
        Self { a, b }
    }
}

impl ConvexBody for HPoly {
    fn dimension(&self) -> usize {
        self.a.ncols()
    }

    fn contains(&self, x: &Point) -> bool {
        self.contains_eps(x, FEAS_EPS)
    }

    fn line_range(&self, x: &Point, dir: &Point) -> Option<(f64, f64)> {
        let ax = &self.a * x;
        let ad = &self.a * dir;
        let mut lo = f64::NEG_INFINITY;
        let mut hi = f64::INFINITY;
        for i in 0..self.a.nrows() {
            let slack = self.b[i] - ax[i];
            if ad[i].abs() <= FEAS_EPS {
                if slack < -FEAS_EPS {
                    return None;
                }
            } else if ad[i] > 0.0 {
                hi = hi.min(slack / ad[i]);
            } else {
                lo = lo.max(slack / ad[i]);
            }
        }
        if lo > hi {
            return None;
        }
        Some((lo, hi))
    }
}

//! Chebyshev (largest inscribed) ball of an H-polytope.
//!
//! Purpose
//! - Recompute the inscribed ball after rounding, and let callers obtain the
//!   initial ball without an external LP dependency.
//!
//! Why this design
//! - The Chebyshev ball is the LP `max r` s.t. `a_i·x + |a_i| r <= b_i`.
//!   The instances here are small and dense (tens of rows, tens of columns),
//!   so a plain two-phase tableau simplex with Bland's rule is enough; no
//!   sparse machinery, no external solver.

use std::fmt;

use crate::body::{Ball, ConvexBody, HPoly, Point};

const TOL: f64 = 1e-9;
const MAX_PIVOTS: usize = 10_000;

/// Errors surfaced by the LP solver.
#[derive(Clone, Debug, PartialEq)]
pub enum LpError {
    /// Constraint system has no feasible point (empty polytope).
    Infeasible,
    /// The inscribed radius is unbounded (polytope not bounded).
    Unbounded,
    /// Pivot limit exhausted without termination.
    Stalled,
}

impl fmt::Display for LpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LpError::Infeasible => write!(f, "polytope is empty (LP infeasible)"),
            LpError::Unbounded => write!(f, "inscribed radius is unbounded (polytope unbounded)"),
            LpError::Stalled => write!(f, "simplex pivot limit exhausted"),
        }
    }
}

impl std::error::Error for LpError {}

/// Largest inscribed ball of `poly`.
///
/// Variables are `(x+, x-, r)` with `x = x+ - x-` (free `x` split into
/// non-negative parts) and the objective maximizes `r`.
pub fn chebyshev_ball(poly: &HPoly) -> Result<Ball, LpError> {
    let n = poly.dimension();
    let m = poly.rows();
    if m == 0 {
        return Err(LpError::Unbounded);
    }
    // Structural columns: x+ (n), x- (n), r (1).
    let nv = 2 * n + 1;
    let mut g = Vec::with_capacity(m);
    let mut rhs = Vec::with_capacity(m);
    for i in 0..m {
        let row = poly.a.row(i);
        let norm = row.norm();
        let mut coeffs = vec![0.0; nv];
        for j in 0..n {
            coeffs[j] = row[j];
            coeffs[n + j] = -row[j];
        }
        coeffs[2 * n] = norm;
        g.push(coeffs);
        rhs.push(poly.b[i]);
    }
    let z = simplex_maximize(&g, &rhs, 2 * n)?;
    let mut center = Point::zeros(n);
    for j in 0..n {
        center[j] = z[j] - z[n + j];
    }
    let r = z[2 * n].max(0.0);
    Ok(Ball::new(center, r * r))
}

/// Maximize `z[obj_col]` subject to `G z <= rhs`, `z >= 0`.
///
/// Returns the optimal structural variable values. Two phases: artificial
/// variables clear negative right-hand sides first, then the real objective
/// is optimized. Bland's rule (smallest index) prevents cycling.
fn simplex_maximize(g: &[Vec<f64>], rhs: &[f64], obj_col: usize) -> Result<Vec<f64>, LpError> {
    let m = g.len();
    let nv = g[0].len();
    let n_art = rhs.iter().filter(|&&v| v < 0.0).count();
    let ncols = nv + m + n_art;

    // Tableau rows: [structural | slack | artificial | rhs].
    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(m);
    let mut basis: Vec<usize> = Vec::with_capacity(m);
    let mut art = 0usize;
    for i in 0..m {
        let mut row = vec![0.0; ncols + 1];
        let neg = rhs[i] < 0.0;
        let sign = if neg { -1.0 } else { 1.0 };
        for j in 0..nv {
            row[j] = sign * g[i][j];
        }
        row[nv + i] = sign; // slack
        row[ncols] = sign * rhs[i];
        if neg {
            row[nv + m + art] = 1.0;
            basis.push(nv + m + art);
            art += 1;
        } else {
            basis.push(nv + i);
        }
        rows.push(row);
    }

    if n_art > 0 {
        // Phase 1: drive the artificial sum to zero. The reduced-cost row is
        // the sum of the artificial rows over non-artificial columns.
        let mut d = vec![0.0; ncols];
        for (i, row) in rows.iter().enumerate() {
            if basis[i] >= nv + m {
                for (j, dj) in d.iter_mut().enumerate().take(nv + m) {
                    *dj += row[j];
                }
            }
        }
        run_pivots(&mut rows, &mut basis, &mut d, nv + m)?;
        let infeasibility: f64 = rows
            .iter()
            .enumerate()
            .filter(|(i, _)| basis[*i] >= nv + m)
            .map(|(_, row)| row[ncols])
            .sum();
        if infeasibility > 1e-7 {
            return Err(LpError::Infeasible);
        }
        // Pivot remaining zero-valued artificials out of the basis; rows with
        // no eligible column are redundant and dropped.
        let mut i = 0;
        while i < rows.len() {
            if basis[i] >= nv + m {
                if let Some(col) = (0..nv + m).find(|&j| rows[i][j].abs() > TOL) {
                    pivot(&mut rows, &mut basis, i, col);
                } else {
                    rows.remove(i);
                    basis.remove(i);
                    continue;
                }
            }
            i += 1;
        }
    }

    // Phase 2: maximize the real objective.
    let mut d = vec![0.0; ncols];
    d[obj_col] = 1.0;
    for (i, &bi) in basis.iter().enumerate() {
        if bi == obj_col {
            let row = rows[i].clone();
            for (j, dj) in d.iter_mut().enumerate() {
                *dj -= row[j];
            }
            d[obj_col] = 0.0;
        }
    }
    run_pivots(&mut rows, &mut basis, &mut d, nv + m)?;

    let mut z = vec![0.0; nv];
    for (i, &bi) in basis.iter().enumerate() {
        if bi < nv {
            z[bi] = rows[i][ncols];
        }
    }
    Ok(z)
}

/// Bland-rule pivot loop over the first `allowed` columns.
fn run_pivots(
    rows: &mut Vec<Vec<f64>>,
    basis: &mut Vec<usize>,
    d: &mut [f64],
    allowed: usize,
) -> Result<(), LpError> {
    let ncols = d.len();
    for _ in 0..MAX_PIVOTS {
        let enter = match (0..allowed).find(|&j| d[j] > TOL) {
            Some(j) => j,
            None => return Ok(()),
        };
        let mut leave: Option<(usize, f64)> = None;
        for (i, row) in rows.iter().enumerate() {
            if row[enter] > TOL {
                let ratio = row[ncols] / row[enter];
                match leave {
                    None => leave = Some((i, ratio)),
                    Some((li, lr)) => {
                        if ratio < lr - TOL || (ratio < lr + TOL && basis[i] < basis[li]) {
                            leave = Some((i, ratio));
                        }
                    }
                }
            }
        }
        let (row_idx, _) = leave.ok_or(LpError::Unbounded)?;
        let scale = d[enter];
        pivot(rows, basis, row_idx, enter);
        let pivot_row = rows[row_idx].clone();
        for (j, dj) in d.iter_mut().enumerate() {
            *dj -= scale * pivot_row[j];
        }
    }
    Err(LpError::Stalled)
}

fn pivot(rows: &mut [Vec<f64>], basis: &mut [usize], r: usize, c: usize) {
    let p = rows[r][c];
    for v in rows[r].iter_mut() {
        *v /= p;
    }
    let pivot_row = rows[r].clone();
    for (i, row) in rows.iter_mut().enumerate() {
        if i == r {
            continue;
        }
        let factor = row[c];
        if factor.abs() > 0.0 {
            for (j, v) in row.iter_mut().enumerate() {
                *v -= factor * pivot_row[j];
            }
        }
    }
    basis[r] = c;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_chebyshev_ball() {
        let p = HPoly::cube(3, 0.7);
        let ball = chebyshev_ball(&p).unwrap();
        assert!(ball.center.norm() < 1e-7);
        assert!((ball.radius() - 0.7).abs() < 1e-7);
    }

    #[test]
    fn shifted_cube_chebyshev_center() {
        let mut p = HPoly::cube(2, 1.0);
        let shift = Point::from_vec(vec![-0.25, 0.5]);
        // Move the cube so its center sits at `shift`.
        p.translate(&-shift.clone());
        let ball = chebyshev_ball(&p).unwrap();
        assert!((ball.radius() - 1.0).abs() < 1e-7);
        assert!((ball.center - shift).norm() < 1e-7);
    }

    #[test]
    fn simplex_chebyshev_ball() {
        // For { x,y >= 0, x+y <= 1 } the inscribed radius is 1/(2+sqrt(2)).
        let p = HPoly::simplex(2);
        let ball = chebyshev_ball(&p).unwrap();
        let r_expect = 1.0 / (2.0 + std::f64::consts::SQRT_2);
        assert!((ball.radius() - r_expect).abs() < 1e-7);
        assert!((ball.center[0] - r_expect).abs() < 1e-7);
        assert!((ball.center[1] - r_expect).abs() < 1e-7);
    }

    #[test]
    fn unbounded_polytope_is_an_error() {
        // Single halfspace: radius grows without bound.
        let a = nalgebra::DMatrix::from_row_slice(1, 2, &[1.0, 0.0]);
        let b = nalgebra::DVector::from_vec(vec![1.0]);
        let p = HPoly::new(a, b);
        assert_eq!(chebyshev_ball(&p), Err(LpError::Unbounded));
    }

    #[test]
    fn empty_polytope_is_infeasible() {
        // x <= -1 and -x <= -1 (i.e. x >= 1): empty.
        let a = nalgebra::DMatrix::from_row_slice(2, 1, &[1.0, -1.0]);
        let b = nalgebra::DVector::from_vec(vec![-1.0, -1.0]);
        let p = HPoly::new(a, b);
        assert_eq!(chebyshev_ball(&p), Err(LpError::Infeasible));
    }
}

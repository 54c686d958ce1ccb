//! Convex bodies: H-polytopes, balls, and their intersection.
//!
//! Purpose
//! - Provide the body abstraction the estimators sample from: membership
//!   testing and chord (line-intersection) geometry behind one trait,
//!   implemented by `HPoly`, `Ball`, and the composite view `BallPoly`.
//!
//! Why this design
//! - The random walks only ever need two primitives: "is this point inside"
//!   and "how far can I move along this direction". Keeping both on a trait
//!   lets the telescoping estimator walk inside `body ∩ ball` without
//!   materializing the intersection.

mod ball;
mod poly;

pub use ball::{Ball, BallPoly};
pub use poly::HPoly;

use nalgebra::DVector;

/// Point in R^n, double precision.
pub type Point = DVector<f64>;

/// Feasibility/membership epsilon used by half-space checks.
pub(crate) const FEAS_EPS: f64 = 1e-9;

/// Membership and chord geometry shared by all sampleable bodies.
pub trait ConvexBody {
    fn dimension(&self) -> usize;

    /// Membership with the library-wide feasibility epsilon.
    fn contains(&self, x: &Point) -> bool;

    /// Parameter range `[t_lo, t_hi]` of the chord `{ x + t·dir }` inside the
    /// body. Either side may be infinite for unbounded bodies; `None` means
    /// the line misses the body entirely.
    fn line_range(&self, x: &Point, dir: &Point) -> Option<(f64, f64)>;
}

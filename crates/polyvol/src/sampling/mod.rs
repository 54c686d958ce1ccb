//! Random-walk point samplers.
//!
//! Purpose
//! - Advance a point inside a convex body by hit-and-run steps, either with
//!   uniform stationary distribution (`walk_uniform`) or with a spherical
//!   Gaussian `exp(-a·|x|^2)` restricted to the body (`walk_gaussian`).
//!
//! Why this design
//! - Both walks share the chord primitive of `ConvexBody::line_range`; the
//!   only difference is the 1-D distribution sampled along the chord
//!   (uniform vs. truncated normal). Walks mutate the chain state `p` in
//!   place so callers can continue a chain across phases.

mod gaussian;
mod walk;

pub use gaussian::{gaussian_next, walk_gaussian};
pub use walk::{sphere_point, walk_uniform};

/// Direction policy for a walk step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkKind {
    /// Uniform random direction on the unit sphere.
    HitAndRun,
    /// Uniformly chosen coordinate axis direction.
    Coordinate,
}

//! Randomized volume estimation for convex bodies in H-representation.
//!
//! Purpose
//! - Estimate the volume of an n-dimensional H-polytope `{ x : A x <= b }`,
//!   which is #P-hard to compute exactly, via two independent randomized
//!   estimators: a multiphase Monte-Carlo estimator over a telescoping
//!   sequence of balls (`volume::volume`), and a Gaussian-annealing
//!   estimator that cools a truncated Gaussian toward the body
//!   (`volume::volume_cooling`).
//! - Supporting machinery lives in its own modules: membership and chord
//!   geometry (`body`), random-walk samplers (`sampling`), the Chebyshev
//!   ball LP (`lp`), ellipsoidal rounding (`rounding`), and the annealing
//!   schedule (`annealing`).
//!
//! All estimators take an explicit `&mut impl Rng` handle; the library never
//! owns generator state. Diagnostics are emitted as `tracing` events and no
//! subscriber is installed here.

pub mod annealing;
pub mod body;
pub mod lp;
pub mod rounding;
pub mod sampling;
pub mod volume;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::body::{Ball, BallPoly, ConvexBody, HPoly, Point};
    pub use crate::lp::chebyshev_ball;
    pub use crate::volume::{volume, volume_cooling, CoolingEstimate, VolumeCfg, VolumeError};
}

//! Balls and the ball-intersect-polytope composite view.

use super::{ConvexBody, HPoly, Point};

/// Ball `(center, squared radius)`.
///
/// Balls are compared only by radius; a ball sequence must have strictly
/// increasing squared radii (enforced by the sequence builder).
#[derive(Clone, Debug, PartialEq)]
pub struct Ball {
    pub center: Point,
    pub sq_radius: f64,
}

impl Ball {
    #[inline]
    pub fn new(center: Point, sq_radius: f64) -> Self {
        Self { center, sq_radius }
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.sq_radius.sqrt()
    }

    #[inline]
    pub fn contains_point(&self, x: &Point) -> bool {
        (x - &self.center).norm_squared() <= self.sq_radius
    }
}

impl ConvexBody for Ball {
    fn dimension(&self) -> usize {
        self.center.len()
    }

    fn contains(&self, x: &Point) -> bool {
        self.contains_point(x)
    }

    fn line_range(&self, x: &Point, dir: &Point) -> Option<(f64, f64)> {
        // Solve |x + t·dir - c|^2 = r^2 for t.
        let rel = x - &self.center;
        let aa = dir.norm_squared();
        if aa <= 0.0 {
            return None;
        }
        let bb = rel.dot(dir);
        let cc = rel.norm_squared() - self.sq_radius;
        let disc = bb * bb - aa * cc;
        if disc < 0.0 {
            return None;
        }
        let sq = disc.sqrt();
        Some(((-bb - sq) / aa, (-bb + sq) / aa))
    }
}

/// Read-only view of `poly ∩ ball`; membership and chords intersect both.
#[derive(Clone, Copy, Debug)]
pub struct BallPoly<'a> {
    pub poly: &'a HPoly,
    pub ball: &'a Ball,
}

impl<'a> BallPoly<'a> {
    #[inline]
    pub fn new(poly: &'a HPoly, ball: &'a Ball) -> Self {
        Self { poly, ball }
    }
}

impl ConvexBody for BallPoly<'_> {
    fn dimension(&self) -> usize {
        self.poly.dimension()
    }

    fn contains(&self, x: &Point) -> bool {
        self.ball.contains_point(x) && self.poly.contains(x)
    }

    fn line_range(&self, x: &Point, dir: &Point) -> Option<(f64, f64)> {
        let (plo, phi) = self.poly.line_range(x, dir)?;
        let (blo, bhi) = self.ball.line_range(x, dir)?;
        let lo = plo.max(blo);
        let hi = phi.min(bhi);
        if lo > hi {
            None
        } else {
            Some((lo, hi))
        }
    }
}

//! Telescoping ball sequence construction.

use super::VolumeError;
use crate::body::{Ball, Point};

/// Build the concentric ball sequence from the inscribed radius out to a
/// ball covering the sampled extent `max_dist`.
///
/// Index bounds are `nb1 = floor(n·log2(radius))` and
/// `nb2 = ceil(n·log2(max_dist))`; the first ball is the inscribed ball
/// itself, later balls have radius `2^(i/n)`, so consecutive radii differ by
/// the factor `2^(1/n)` and the sample-count ratio per phase concentrates
/// near 2.
///
/// Errors: non-positive radii are a precondition violation (the logarithm is
/// guarded), and an empty index range means the sampled extent sits strictly
/// inside the inscribed ball, which no telescoping can bridge.
pub fn ball_sequence(
    center: &Point,
    radius: f64,
    max_dist: f64,
    n: usize,
) -> Result<Vec<Ball>, VolumeError> {
    if !(radius > 0.0) || !radius.is_finite() {
        return Err(VolumeError::ZeroRadius);
    }
    if !(max_dist > 0.0) || !max_dist.is_finite() {
        return Err(VolumeError::ZeroRadius);
    }
    let nf = n as f64;
    let nb1 = (nf * radius.log2()).floor() as i64;
    let nb2 = (nf * max_dist.log2()).ceil() as i64;
    if nb2 < nb1 {
        return Err(VolumeError::EmptyBallSequence);
    }
    let mut balls = Vec::with_capacity((nb2 - nb1 + 1) as usize);
    for i in nb1..=nb2 {
        let sq_radius = if i == nb1 {
            radius * radius
        } else {
            let r = 2f64.powf(i as f64 / nf);
            r * r
        };
        debug_assert!(
            balls
                .last()
                .map_or(true, |prev: &Ball| sq_radius > prev.sq_radius),
            "ball radii must be strictly increasing"
        );
        balls.push(Ball::new(center.clone(), sq_radius));
    }
    Ok(balls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn brackets_inscribed_and_sampled_radii() {
        let c = Point::zeros(3);
        let balls = ball_sequence(&c, 0.5, 0.9, 3).unwrap();
        assert!((balls[0].radius() - 0.5).abs() < 1e-12);
        assert!(balls.last().unwrap().radius() >= 0.9);
    }

    #[test]
    fn coinciding_radii_give_a_single_ball() {
        let c = Point::zeros(4);
        let balls = ball_sequence(&c, 1.0, 1.0, 4).unwrap();
        assert_eq!(balls.len(), 1);
        assert!((balls[0].sq_radius - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_radius_is_rejected_before_the_log() {
        let c = Point::zeros(2);
        assert!(matches!(
            ball_sequence(&c, 0.0, 1.0, 2),
            Err(VolumeError::ZeroRadius)
        ));
        assert!(matches!(
            ball_sequence(&c, 1.0, -1.0, 2),
            Err(VolumeError::ZeroRadius)
        ));
    }

    #[test]
    fn extent_below_inscribed_radius_can_empty_the_sequence() {
        let c = Point::zeros(5);
        assert!(matches!(
            ball_sequence(&c, 1.0, 0.5, 5),
            Err(VolumeError::EmptyBallSequence)
        ));
    }

    proptest! {
        #[test]
        fn sequence_is_strictly_increasing_and_bracketing(
            radius in 0.05f64..10.0,
            stretch in 1.0f64..8.0,
            n in 2usize..12,
        ) {
            let max_dist = radius * stretch;
            let c = Point::zeros(n);
            let balls = ball_sequence(&c, radius, max_dist, n).unwrap();
            prop_assert!(!balls.is_empty());
            prop_assert!((balls[0].radius() - radius).abs() < 1e-12);
            prop_assert!(balls.last().unwrap().radius() >= max_dist - 1e-9);
            for w in balls.windows(2) {
                prop_assert!(w[1].sq_radius > w[0].sq_radius);
            }
        }
    }
}

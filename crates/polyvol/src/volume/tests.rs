use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::f64::consts::PI;

use super::*;
use crate::body::{Ball, HPoly, Point};
use crate::lp::chebyshev_ball;

/// Regular k-gon inscribed-tangent to the unit circle: `cos/sin` normals,
/// offset 1. Inradius 1, circumradius `1/cos(pi/k)`; for large k the area is
/// within a fraction of a percent of `pi`.
fn disk_polygon(k: usize) -> HPoly {
    let mut a = DMatrix::zeros(k, 2);
    let b = DVector::from_element(k, 1.0);
    for i in 0..k {
        let th = 2.0 * PI * i as f64 / k as f64;
        a[(i, 0)] = th.cos();
        a[(i, 1)] = th.sin();
    }
    HPoly::new(a, b)
}

#[test]
fn telescoping_unit_cube_within_ten_percent() {
    let mut poly = HPoly::cube(3, 0.5);
    let cheb = Ball::new(Point::zeros(3), 0.25);
    let cfg = VolumeCfg {
        samples: 10_000,
        ..VolumeCfg::default()
    };
    let mut rng = StdRng::seed_from_u64(1234);
    let vol = volume(&mut poly, &cfg, &cheb, &mut rng).unwrap();
    assert!((vol - 1.0).abs() < 0.15, "cube volume estimate {vol}");
}

#[test]
fn telescoping_unit_disk_close_to_pi() {
    let mut poly = disk_polygon(64);
    let cheb = chebyshev_ball(&poly).unwrap();
    let cfg = VolumeCfg {
        samples: 10_000,
        ..VolumeCfg::default()
    };
    let mut rng = StdRng::seed_from_u64(77);
    let vol = volume(&mut poly, &cfg, &cheb, &mut rng).unwrap();
    assert!((vol - PI).abs() / PI < 0.15, "disk area estimate {vol}");
}

#[test]
fn telescoping_with_coordinate_walk() {
    let mut poly = HPoly::cube(2, 1.0);
    let cheb = Ball::new(Point::zeros(2), 1.0);
    let cfg = VolumeCfg {
        samples: 5000,
        coordinate: true,
        ..VolumeCfg::default()
    };
    let mut rng = StdRng::seed_from_u64(99);
    let vol = volume(&mut poly, &cfg, &cheb, &mut rng).unwrap();
    assert!((vol - 4.0).abs() / 4.0 < 0.2, "square area estimate {vol}");
}

#[test]
fn repetitions_average_independent_estimates() {
    let mut poly = HPoly::cube(2, 1.0);
    let cheb = Ball::new(Point::zeros(2), 1.0);
    let cfg = VolumeCfg {
        samples: 2000,
        repetitions: 3,
        ..VolumeCfg::default()
    };
    let mut rng = StdRng::seed_from_u64(5150);
    let vol = volume(&mut poly, &cfg, &cheb, &mut rng).unwrap();
    assert!((vol - 4.0).abs() / 4.0 < 0.2, "averaged estimate {vol}");
}

#[test]
fn zero_radius_chebyshev_ball_is_rejected() {
    let mut poly = HPoly::cube(3, 0.5);
    let cheb = Ball::new(Point::zeros(3), 0.0);
    let cfg = VolumeCfg::default();
    let mut rng = StdRng::seed_from_u64(2);
    assert!(matches!(
        volume(&mut poly, &cfg, &cheb, &mut rng),
        Err(VolumeError::ZeroRadius)
    ));
    assert!(matches!(
        volume_cooling(&mut poly, &cfg, &cheb, &mut rng),
        Err(VolumeError::ZeroRadius)
    ));
}

#[test]
fn starved_phase_reports_sampling_failure() {
    // Inscribed ball far smaller than the body: the innermost balls of the
    // sequence cover a vanishing fraction of the square, so a handful of
    // samples cannot survive the filter all the way down.
    let mut poly = HPoly::cube(2, 1.0);
    let cheb = Ball::new(Point::zeros(2), 1e-6);
    let cfg = VolumeCfg {
        samples: 4,
        ..VolumeCfg::default()
    };
    let mut rng = StdRng::seed_from_u64(13);
    assert!(matches!(
        volume(&mut poly, &cfg, &cheb, &mut rng),
        Err(VolumeError::SamplingStarvation { .. })
    ));
}

#[test]
fn rounding_round_trip_on_an_already_round_body() {
    // The disk is its own rounding fixed point: the correction factor is
    // close to 1 and the estimate matches the unrounded run.
    let cfg_plain = VolumeCfg {
        samples: 10_000,
        ..VolumeCfg::default()
    };
    let cfg_round = VolumeCfg {
        samples: 10_000,
        round: true,
        ..VolumeCfg::default()
    };

    let mut poly = disk_polygon(64);
    let cheb = chebyshev_ball(&poly).unwrap();
    let mut rng = StdRng::seed_from_u64(4242);
    let plain = volume(&mut poly, &cfg_plain, &cheb, &mut rng).unwrap();

    let mut poly = disk_polygon(64);
    let cheb = chebyshev_ball(&poly).unwrap();
    let mut rng = StdRng::seed_from_u64(4242);
    let rounded = volume(&mut poly, &cfg_round, &cheb, &mut rng).unwrap();

    assert!((plain - PI).abs() / PI < 0.15, "plain {plain}");
    assert!((rounded - PI).abs() / PI < 0.15, "rounded {rounded}");
    assert!((plain - rounded).abs() / plain < 0.25);
}

#[test]
fn cooling_free_space_matches_partition_function() {
    // With no constraints each phase ratio is the exact Gaussian integral
    // ratio (a_i/a_{i+1})^(n/2), so the telescoped estimate is the partition
    // function at the terminal temperature.
    let poly = HPoly::new(DMatrix::zeros(0, 2), DVector::zeros(0));
    let a_vals = [2.0, 1.8];
    let cfg = VolumeCfg::default();
    let mut rng = StdRng::seed_from_u64(314);
    let est = volume_cooling_with_schedule(&poly, &cfg, &a_vals, 1.0, &mut rng).unwrap();
    let expect = PI / 1.8; // (pi/a_last)^(n/2) with n = 2
    assert!(
        (est.volume - expect).abs() / expect < 0.08,
        "free-space estimate {} vs {expect}",
        est.volume
    );
    assert!(est.steps > 0);
}

#[test]
fn cooling_unit_cube_within_tolerance() {
    let mut poly = HPoly::cube(3, 0.5);
    let cheb = Ball::new(Point::zeros(3), 0.25);
    let cfg = VolumeCfg {
        error: 0.2,
        ..VolumeCfg::default()
    };
    let mut rng = StdRng::seed_from_u64(2024);
    let est = volume_cooling(&mut poly, &cfg, &cheb, &mut rng).unwrap();
    assert!(
        (est.volume - 1.0).abs() < 0.25,
        "cooling cube estimate {}",
        est.volume
    );
    assert!(est.steps > 0);
}

#[test]
fn cooling_step_ceiling_surfaces_non_convergence() {
    let poly = HPoly::new(DMatrix::zeros(0, 2), DVector::zeros(0));
    let a_vals = [2.0, 1.0];
    let cfg = VolumeCfg {
        phase_step_limit: Some(10),
        ..VolumeCfg::default()
    };
    let mut rng = StdRng::seed_from_u64(8);
    match volume_cooling_with_schedule(&poly, &cfg, &a_vals, 1.0, &mut rng) {
        Err(VolumeError::NoConvergence { phase, steps, best }) => {
            assert_eq!(phase, 0);
            assert_eq!(steps, 10);
            assert!(best.is_finite() && best > 0.0);
        }
        other => panic!("expected NoConvergence, got {other:?}"),
    }
}

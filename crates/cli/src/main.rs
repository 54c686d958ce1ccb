use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use nalgebra::{DMatrix, DVector};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use tracing_subscriber::fmt::SubscriberBuilder;

use polyvol::prelude::{chebyshev_ball, volume, volume_cooling, ConvexBody, HPoly, VolumeCfg};

#[derive(Parser)]
#[command(name = "polyvol")]
#[command(about = "Randomized volume estimation for H-polytopes")]
struct Cmd {
    /// Body family to estimate
    #[arg(long, value_enum, default_value_t = Body::Cube)]
    body: Body,

    /// Read the polytope from a halfspace file instead (one row per line:
    /// `a_1 ... a_n b`, whitespace or comma separated, `#` comments)
    #[arg(long, conflicts_with_all = ["body", "dim", "scale"])]
    file: Option<PathBuf>,

    /// Ambient dimension
    #[arg(long, default_value_t = 3)]
    dim: usize,

    /// Scale of the body (cube half-side, cross-polytope radius)
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Estimator to run
    #[arg(long, value_enum, default_value_t = Algo::Telescope)]
    algo: Algo,

    /// Sample points per telescoping phase
    #[arg(long, default_value_t = 1000)]
    samples: usize,

    /// Walk length between samples (0 picks 10 + dim/10)
    #[arg(long, default_value_t = 0)]
    walk: usize,

    /// Target relative error for the cooling estimator
    #[arg(long, default_value_t = 0.1)]
    error: f64,

    /// Independent repetitions, combined by arithmetic mean
    #[arg(long, default_value_t = 1)]
    reps: usize,

    /// Round the body to near-isotropic position first
    #[arg(long)]
    round: bool,

    /// Use the coordinate-direction walk instead of hit-and-run
    #[arg(long)]
    coordinate: bool,

    /// RNG seed; omit for a nondeterministic run
    #[arg(long)]
    seed: Option<u64>,

    /// Emit the result as a JSON object instead of plain text
    #[arg(long)]
    json: bool,

    /// Per-phase log output
    #[arg(long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Body {
    Cube,
    Simplex,
    Cross,
}

#[derive(Clone, Copy, ValueEnum)]
enum Algo {
    Telescope,
    Cooling,
}

#[derive(Serialize)]
struct Report {
    body: &'static str,
    dim: usize,
    algo: &'static str,
    volume: f64,
    exact: Option<f64>,
    steps: Option<usize>,
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(if cmd.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        })
        .init();

    let (mut poly, exact, body_label) = match &cmd.file {
        Some(path) => {
            let poly = read_hpoly(path)
                .with_context(|| format!("reading halfspaces from {}", path.display()))?;
            (poly, None, "file")
        }
        None => {
            if cmd.dim < 2 {
                bail!("dimension must be at least 2");
            }
            let (poly, exact) = build_body(&cmd)?;
            (poly, exact, body_name(cmd.body))
        }
    };
    let dim = poly.dimension();
    let cheb = chebyshev_ball(&poly).context("Chebyshev ball LP failed")?;
    tracing::info!(radius = cheb.radius(), "inscribed ball");

    let cfg = VolumeCfg {
        samples: cmd.samples,
        walk_steps: cmd.walk,
        repetitions: cmd.reps,
        error: cmd.error,
        round: cmd.round,
        coordinate: cmd.coordinate,
        verbose: cmd.verbose,
        ..VolumeCfg::default()
    };
    let mut rng = match cmd.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let (vol, steps, algo_name) = match cmd.algo {
        Algo::Telescope => {
            let v = volume(&mut poly, &cfg, &cheb, &mut rng)?;
            (v, None, "telescope")
        }
        Algo::Cooling => {
            let est = volume_cooling(&mut poly, &cfg, &cheb, &mut rng)?;
            (est.volume, Some(est.steps), "cooling")
        }
    };

    let report = Report {
        body: body_label,
        dim,
        algo: algo_name,
        volume: vol,
        exact,
        steps,
        seed: cmd.seed,
    };
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match exact {
            Some(e) => println!(
                "{} (dim {dim}): volume ~ {vol:.6}, exact {e:.6}, rel err {:.3}",
                report.body,
                (vol - e).abs() / e
            ),
            None => println!("{} (dim {dim}): volume ~ {vol:.6}", report.body),
        }
    }
    Ok(())
}

/// Parse a halfspace system: one constraint per line, the last field is the
/// right-hand side.
fn read_hpoly(path: &PathBuf) -> Result<HPoly> {
    let text = std::fs::read_to_string(path)?;
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let vals = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<f64>()
                    .with_context(|| format!("line {}: bad number {s:?}", lineno + 1))
            })
            .collect::<Result<Vec<f64>>>()?;
        if vals.len() < 3 {
            bail!("line {}: need at least 2 coefficients and a bound", lineno + 1);
        }
        if let Some(first) = rows.first() {
            if vals.len() != first.len() {
                bail!("line {}: inconsistent column count", lineno + 1);
            }
        }
        rows.push(vals);
    }
    if rows.is_empty() {
        bail!("no constraints found");
    }
    let m = rows.len();
    let n = rows[0].len() - 1;
    let a = DMatrix::from_fn(m, n, |i, j| rows[i][j]);
    let b = DVector::from_fn(m, |i, _| rows[i][n]);
    Ok(HPoly::new(a, b))
}

fn build_body(cmd: &Cmd) -> Result<(HPoly, Option<f64>)> {
    let n = cmd.dim;
    if !(cmd.scale > 0.0) {
        bail!("scale must be positive");
    }
    Ok(match cmd.body {
        Body::Cube => (
            HPoly::cube(n, cmd.scale),
            Some((2.0 * cmd.scale).powi(n as i32)),
        ),
        Body::Simplex => (HPoly::simplex(n), Some(factorial(n).recip())),
        Body::Cross => (
            HPoly::cross(n, cmd.scale),
            Some(2f64.powi(n as i32) * cmd.scale.powi(n as i32) / factorial(n)),
        ),
    })
}

fn factorial(n: usize) -> f64 {
    (1..=n).fold(1.0, |acc, k| acc * k as f64)
}

fn body_name(body: Body) -> &'static str {
    match body {
        Body::Cube => "cube",
        Body::Simplex => "simplex",
        Body::Cross => "cross",
    }
}

//! Estimator configuration.

/// Tunables shared by both estimators.
///
/// Passed by shared reference into every operation. The cooling estimator
/// ignores `coordinate`: its Gaussian walks always use hit-and-run.
#[derive(Clone, Copy, Debug)]
pub struct VolumeCfg {
    /// Target sample count per telescoping phase.
    pub samples: usize,
    /// Steps per walk between samples; 0 selects `10 + n/10`.
    pub walk_steps: usize,
    /// Independent repetitions whose estimates are averaged (arithmetic
    /// mean). Each repetition draws fresh samples from the caller's RNG.
    pub repetitions: usize,
    /// Target relative error for the cooling estimator.
    pub error: f64,
    /// Apply ellipsoidal rounding before estimating.
    pub round: bool,
    /// Emit info-level phase summaries (debug events are always emitted).
    pub verbose: bool,
    /// Use coordinate-direction walks instead of random-direction
    /// hit-and-run for the uniform sampler.
    pub coordinate: bool,
    /// Per-phase step ceiling for the cooling estimator; `None` derives
    /// `200 · W` from the window size `W`.
    pub phase_step_limit: Option<usize>,
}

impl Default for VolumeCfg {
    fn default() -> Self {
        Self {
            samples: 1000,
            walk_steps: 0,
            repetitions: 1,
            error: 0.1,
            round: false,
            verbose: false,
            coordinate: false,
            phase_step_limit: None,
        }
    }
}

impl VolumeCfg {
    /// Effective walk length for dimension `n`.
    #[inline]
    pub(crate) fn walk_len(&self, n: usize) -> usize {
        if self.walk_steps == 0 {
            10 + n / 10
        } else {
            self.walk_steps
        }
    }
}

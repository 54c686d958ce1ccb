//! Fixed-size sliding window with incremental min/max tracking.

/// Ring buffer over the last `cap` running-average values.
///
/// Min and max are tracked incrementally; a full rescan happens only when the
/// tracked extremum's slot is overwritten, which amortizes to O(1) per push
/// for non-adversarial streams.
#[derive(Debug)]
pub(crate) struct SlidingWindow {
    buf: Vec<f64>,
    cap: usize,
    pushed: usize,
    min_val: f64,
    min_idx: usize,
    max_val: f64,
    max_idx: usize,
}

impl SlidingWindow {
    pub(crate) fn new(cap: usize) -> Self {
        assert!(cap > 0);
        Self {
            buf: Vec::with_capacity(cap),
            cap,
            pushed: 0,
            min_val: f64::INFINITY,
            min_idx: 0,
            max_val: f64::NEG_INFINITY,
            max_idx: 0,
        }
    }

    pub(crate) fn push(&mut self, val: f64) {
        let idx = self.pushed % self.cap;
        if self.buf.len() < self.cap {
            self.buf.push(val);
        } else {
            self.buf[idx] = val;
        }
        self.pushed += 1;

        if val <= self.min_val {
            self.min_val = val;
            self.min_idx = idx;
        } else if self.min_idx == idx {
            // Evicted the tracked minimum: rescan.
            let (i, v) = scan(&self.buf, |a, b| a < b);
            self.min_idx = i;
            self.min_val = v;
        }
        if val >= self.max_val {
            self.max_val = val;
            self.max_idx = idx;
        } else if self.max_idx == idx {
            let (i, v) = scan(&self.buf, |a, b| a > b);
            self.max_idx = i;
            self.max_val = v;
        }
    }

    /// Relative spread `(max - min) / max` over the current contents.
    pub(crate) fn spread(&self) -> f64 {
        if self.pushed == 0 || self.max_val <= 0.0 {
            return f64::INFINITY;
        }
        (self.max_val - self.min_val) / self.max_val
    }

    /// Whether `cap` values have been seen (the minimum step count).
    pub(crate) fn is_full(&self) -> bool {
        self.pushed >= self.cap
    }
}

fn scan(buf: &[f64], better: impl Fn(f64, f64) -> bool) -> (usize, f64) {
    let mut idx = 0;
    let mut val = buf[0];
    for (i, &v) in buf.iter().enumerate().skip(1) {
        if better(v, val) {
            idx = i;
            val = v;
        }
    }
    (idx, val)
}

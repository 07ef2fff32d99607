use log::{Level, log_enabled, trace, warn};
use std::time::{Duration, Instant};

/// Trace-level timer around an integration run of a known number of steps.
pub struct ScopedTimer<'a> {
    label: &'a str,
    steps: usize,
    start: Instant,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(label: &'a str, steps: usize) -> Self {
        if log_enabled!(Level::Trace) {
            trace!("start {label}: {steps} steps");
        }
        Self {
            label,
            steps,
            start: Instant::now(),
        }
    }
}

impl<'a> Drop for ScopedTimer<'a> {
    fn drop(&mut self) {
        if log_enabled!(Level::Trace) {
            let elapsed = self.start.elapsed();
            trace!(
                "end {}: {} µs total, {:.3} µs/step",
                self.label,
                elapsed.as_micros(),
                micros_per_step(elapsed, self.steps)
            );
        }
    }
}

/// Mean wall time per step; zero when no step ran.
pub fn micros_per_step(elapsed: Duration, steps: usize) -> f64 {
    if steps == 0 {
        return 0.0;
    }
    elapsed.as_secs_f64() * 1e6 / steps as f64
}

/// Logs a warning when `frame` holds a NaN or infinite value. Returns whether it did.
pub fn warn_if_non_finite(frame: &[f64], t: usize) -> bool {
    match frame.iter().position(|q| !q.is_finite()) {
        Some(j) => {
            warn!(
                "Frame {t} holds a non-finite value at index {j} ({}); \
                 later frames will not recover",
                frame[j]
            );
            true
        }
        None => false,
    }
}

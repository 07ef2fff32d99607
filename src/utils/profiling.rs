use std::time::Duration;

use log::info;

/// Counters gathered over one integration run.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct IntegrationProfile {
    pub steps: usize,
    pub pair_evaluations: usize,
    /// Pairs whose squared distance was raised to the softening threshold.
    pub softened_pairs: usize,
    pub elapsed: Duration,
}

impl IntegrationProfile {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn record_step(&mut self, particle_count: usize, softened: usize) {
        self.steps += 1;
        self.pair_evaluations += particle_count * particle_count.saturating_sub(1);
        self.softened_pairs += softened;
    }

    /// Share of pair evaluations that hit the softening floor.
    pub fn softened_fraction(&self) -> f64 {
        if self.pair_evaluations == 0 {
            return 0.0;
        }
        self.softened_pairs as f64 / self.pair_evaluations as f64
    }

    pub fn report(&self) {
        info!(
            "integrated {} steps in {:.2} ms: {} pair evaluations, {} softened ({:.2}%)",
            self.steps,
            self.elapsed.as_secs_f64() * 1000.0,
            self.pair_evaluations,
            self.softened_pairs,
            self.softened_fraction() * 100.0
        );
    }
}

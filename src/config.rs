//! Global configuration constants and integrator settings for nbsim.

use serde::{Deserialize, Serialize};

/// Default gravitational constant `G`.
pub const DEFAULT_GRAVITATIONAL_CONSTANT: f64 = 20.0;

/// Default integration step size `H`.
pub const DEFAULT_STEP_SIZE: f64 = 0.1;

/// Default lower bound for the squared pair distance used in the force law.
pub const DEFAULT_SOFTENING_THRESHOLD: f64 = 100.0;

/// Minimum number of timesteps a trajectory store may hold.
pub const MIN_TIMESTEPS: usize = 3;

/// Number of steps between trace-level progress messages.
pub const PROGRESS_LOG_INTERVAL: usize = 1000;

/// Physical constants used by [`crate::dynamics::VerletIntegrator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorConfig {
    pub gravitational_constant: f64,
    pub step_size: f64,
    /// Squared distances below this value are clamped to it.
    pub softening_threshold: f64,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: DEFAULT_GRAVITATIONAL_CONSTANT,
            step_size: DEFAULT_STEP_SIZE,
            softening_threshold: DEFAULT_SOFTENING_THRESHOLD,
        }
    }
}

impl IntegratorConfig {
    pub fn new(gravitational_constant: f64, step_size: f64, softening_threshold: f64) -> Self {
        Self {
            gravitational_constant,
            step_size,
            softening_threshold,
        }
    }

    pub fn with_gravitational_constant(mut self, g: f64) -> Self {
        self.gravitational_constant = g;
        self
    }

    pub fn with_step_size(mut self, h: f64) -> Self {
        self.step_size = h;
        self
    }

    pub fn with_softening_threshold(mut self, threshold: f64) -> Self {
        self.softening_threshold = threshold;
        self
    }

    /// `H²`, the factor applied to the acceleration in the Verlet update.
    pub fn step_size_squared(&self) -> f64 {
        self.step_size * self.step_size
    }
}

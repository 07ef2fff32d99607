//! Serializable initial conditions for a simulation run.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::IntegratorConfig;
use crate::core::error::{Result, TrajectoryError};
use crate::core::store::TrajectoryStore;

/// Initial state of one particle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleState {
    pub position: Vec<f64>,
    /// Displacement per step; `None` means starting at rest.
    #[serde(default)]
    pub velocity: Option<Vec<f64>>,
    pub mass: f64,
}

impl ParticleState {
    pub fn at_rest(position: Vec<f64>, mass: f64) -> Self {
        Self {
            position,
            velocity: None,
            mass,
        }
    }
}

/// Everything needed to prime a [`TrajectoryStore`] and configure the integrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub timesteps: usize,
    pub degrees_of_freedom: usize,
    #[serde(default)]
    pub integrator: IntegratorConfig,
    pub particles: Vec<ParticleState>,
}

impl Scenario {
    /// Planar three-body system: masses 1, 5 and 8 released at rest.
    pub fn three_body_demo() -> Self {
        Self {
            timesteps: 10_000,
            degrees_of_freedom: 2,
            integrator: IntegratorConfig::default(),
            particles: vec![
                ParticleState::at_rest(vec![100.0, -90.0], 1.0),
                ParticleState::at_rest(vec![300.0, -40.0], 5.0),
                ParticleState::at_rest(vec![0.0, 0.0], 8.0),
            ],
        }
    }

    /// Allocates a store and writes every particle's initial state and mass.
    pub fn build_store(&self) -> Result<TrajectoryStore> {
        if self.particles.is_empty() {
            return Err(TrajectoryError::InvalidArgument(
                "A scenario needs at least one particle.".into(),
            ));
        }

        let mut store = TrajectoryStore::new(
            self.timesteps,
            self.particles.len(),
            self.degrees_of_freedom,
        )?;
        let at_rest = vec![0.0; self.degrees_of_freedom];

        for (i, particle) in self.particles.iter().enumerate() {
            let velocity = particle.velocity.as_deref().unwrap_or(at_rest.as_slice());
            store.set_initial_state(i, &particle.position, velocity)?;
            store.set_mass(i, particle.mass)?;
        }

        debug!("built scenario store: {store}");
        Ok(store)
    }
}

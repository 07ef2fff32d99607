//! nbsim – brute-force n-body gravity for Rust.
//!
//! A [`TrajectoryStore`] holds every frame of a run in an axis-major columnar
//! layout; a [`VerletIntegrator`] fills it forward in time from two primed
//! initial frames using softened Newtonian attraction. Renderers and other
//! consumers only read the store through its query methods.

pub mod config;
pub mod core;
pub mod dynamics;
pub mod utils;

pub use glam::{DVec2, DVec3};

pub use config::IntegratorConfig;
pub use crate::core::{
    error::{IndexKind, Result, TrajectoryError},
    scenario::{ParticleState, Scenario},
    shared::SharedTrajectory,
    store::{FrameLayout, TrajectoryStore},
};
pub use dynamics::{
    forces::{ForceLaw, SoftenedGravity},
    integrator::VerletIntegrator,
};
pub use utils::profiling::IntegrationProfile;

/// High-level convenience wrapper that owns a store and the integrator filling it.
pub struct Simulation {
    store: TrajectoryStore,
    integrator: VerletIntegrator,
}

impl Simulation {
    /// Allocates an empty store; prime it through [`Self::store_mut`] before [`Self::run`].
    pub fn new(
        timestep_count: usize,
        particle_count: usize,
        degrees_of_freedom: usize,
        config: IntegratorConfig,
    ) -> Result<Self> {
        Ok(Self {
            store: TrajectoryStore::new(timestep_count, particle_count, degrees_of_freedom)?,
            integrator: VerletIntegrator::new(config),
        })
    }

    pub fn from_scenario(scenario: &Scenario) -> Result<Self> {
        Ok(Self {
            store: scenario.build_store()?,
            integrator: VerletIntegrator::new(scenario.integrator),
        })
    }

    /// Fills every output frame. Running again recomputes them from frames 0 and 1.
    pub fn run(&mut self) -> IntegrationProfile {
        self.integrator.integrate(&mut self.store)
    }

    /// Enables or disables parallel force evaluation.
    pub fn set_parallel_enabled(&mut self, enabled: bool) {
        self.integrator.set_parallel(enabled);
    }

    pub fn parallel_enabled(&self) -> bool {
        self.integrator.parallel()
    }

    pub fn store(&self) -> &TrajectoryStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TrajectoryStore {
        &mut self.store
    }

    pub fn integrator(&self) -> &VerletIntegrator {
        &self.integrator
    }

    pub fn into_store(self) -> TrajectoryStore {
        self.store
    }
}

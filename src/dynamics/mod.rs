//! Simulation dynamics: force laws, the Verlet integrator, and trajectory diagnostics.

pub mod diagnostics;
pub mod forces;
pub mod integrator;
#[cfg(feature = "parallel")]
pub mod parallel;

pub use forces::{ForceLaw, SoftenedGravity};
pub use integrator::VerletIntegrator;

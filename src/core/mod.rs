//! Core data types: the trajectory store, its errors, and initial conditions.

pub mod error;
pub mod scenario;
pub mod shared;
pub mod store;

pub use error::{IndexKind, Result, TrajectoryError};
pub use scenario::{ParticleState, Scenario};
pub use shared::SharedTrajectory;
pub use store::{FrameLayout, FrameWindow, TrajectoryStore};

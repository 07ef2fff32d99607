use std::fmt;

use thiserror::Error;

/// Which index an [`TrajectoryError::OutOfRange`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Particle,
    Timestep,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Particle => write!(f, "Particle"),
            IndexKind::Timestep => write!(f, "Timestep"),
        }
    }
}

/// Errors raised by the trajectory store and the integrator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrajectoryError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{kind} index {index} not in range 0..{len}")]
    OutOfRange {
        kind: IndexKind,
        index: usize,
        len: usize,
    },
    #[error("Degenerate state: {0}")]
    DegenerateState(String),
}

pub type Result<T> = std::result::Result<T, TrajectoryError>;

//! Finite-difference observables computed from a filled store.
//!
//! Velocities are not stored; they are recovered as the backward difference
//! `(q(t) - q(t-1)) / h`, so every function here needs `t >= 1`.

use crate::core::error::{IndexKind, Result, TrajectoryError};
use crate::core::store::TrajectoryStore;

pub fn velocity(store: &TrajectoryStore, particle: usize, t: usize, h: f64) -> Result<Vec<f64>> {
    if t == 0 {
        return Err(TrajectoryError::OutOfRange {
            kind: IndexKind::Timestep,
            index: t,
            len: store.timestep_count(),
        });
    }
    let current = store.position(particle, t)?;
    let previous = store.position(particle, t - 1)?;
    Ok(current
        .iter()
        .zip(&previous)
        .map(|(q, p)| (q - p) / h)
        .collect())
}

/// Sum of `m_i * v_i` per axis.
pub fn total_momentum(store: &TrajectoryStore, t: usize, h: f64) -> Result<Vec<f64>> {
    let mut momentum = vec![0.0; store.degrees_of_freedom()];
    for (i, &m) in store.masses().iter().enumerate() {
        for (p, v) in momentum.iter_mut().zip(velocity(store, i, t, h)?) {
            *p += m * v;
        }
    }
    Ok(momentum)
}

/// `Σ ½ m_i |v_i|²`.
pub fn kinetic_energy(store: &TrajectoryStore, t: usize, h: f64) -> Result<f64> {
    let mut energy = 0.0;
    for (i, &m) in store.masses().iter().enumerate() {
        let v2: f64 = velocity(store, i, t, h)?.iter().map(|v| v * v).sum();
        energy += 0.5 * m * v2;
    }
    Ok(energy)
}

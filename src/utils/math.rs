//! glam adapters for consumers that draw the trajectory.

use glam::{DVec2, DVec3};

use crate::core::error::{Result, TrajectoryError};
use crate::core::store::TrajectoryStore;

/// Planar point from a coordinate slice; missing axes are zero.
pub fn to_dvec2(coords: &[f64]) -> DVec2 {
    DVec2::new(
        coords.first().copied().unwrap_or(0.0),
        coords.get(1).copied().unwrap_or(0.0),
    )
}

/// Spatial point from a coordinate slice; missing axes are zero.
pub fn to_dvec3(coords: &[f64]) -> DVec3 {
    DVec3::new(
        coords.first().copied().unwrap_or(0.0),
        coords.get(1).copied().unwrap_or(0.0),
        coords.get(2).copied().unwrap_or(0.0),
    )
}

/// Every particle's position at timestep `t` as a 3D point.
pub fn frame_points(store: &TrajectoryStore, t: usize) -> Result<Vec<DVec3>> {
    if store.degrees_of_freedom() > 3 {
        return Err(TrajectoryError::InvalidArgument(format!(
            "Cannot map {} degrees of freedom onto 3D points.",
            store.degrees_of_freedom()
        )));
    }
    (0..store.particle_count())
        .map(|i| store.position(i, t).map(|p| to_dvec3(&p)))
        .collect()
}

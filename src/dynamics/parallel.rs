use rayon::prelude::*;

use crate::core::store::FrameLayout;
use crate::dynamics::forces::ForceLaw;

/// Data-parallel counterpart of [`ForceLaw::accelerations`].
///
/// Each particle's sum is still reduced sequentially inside
/// [`ForceLaw::particle_acceleration`], so the output is bit-identical to the
/// sequential path for any thread count.
pub fn accelerations<F: ForceLaw>(
    force: &F,
    frame: &[f64],
    masses: &[f64],
    layout: FrameLayout,
    out: &mut [f64],
) -> usize {
    let per_particle: Vec<(Vec<f64>, usize)> = (0..layout.particle_count)
        .into_par_iter()
        .map(|z| {
            let mut acc = vec![0.0; layout.degrees_of_freedom];
            let softened = force.particle_acceleration(frame, masses, layout, z, &mut acc);
            (acc, softened)
        })
        .collect();

    let mut softened = 0;
    for (z, (acc, s)) in per_particle.into_iter().enumerate() {
        softened += s;
        for (axis, a) in acc.into_iter().enumerate() {
            out[layout.index(axis, z)] = a;
        }
    }
    softened
}

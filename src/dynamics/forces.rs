use crate::config::IntegratorConfig;
use crate::core::store::FrameLayout;

/// Trait describing a pairwise force law evaluated on one frame.
pub trait ForceLaw: Send + Sync {
    /// Writes the acceleration of `particle` along every axis into `out`
    /// (`out.len() == layout.degrees_of_freedom`) and returns how many pairs hit
    /// the softening floor.
    fn particle_acceleration(
        &self,
        frame: &[f64],
        masses: &[f64],
        layout: FrameLayout,
        particle: usize,
        out: &mut [f64],
    ) -> usize;

    /// Fills `out` with the axis-major acceleration of every particle.
    fn accelerations(
        &self,
        frame: &[f64],
        masses: &[f64],
        layout: FrameLayout,
        out: &mut [f64],
    ) -> usize {
        let mut per_particle = vec![0.0; layout.degrees_of_freedom];
        let mut softened = 0;
        for z in 0..layout.particle_count {
            softened += self.particle_acceleration(frame, masses, layout, z, &mut per_particle);
            for (axis, &a) in per_particle.iter().enumerate() {
                out[layout.index(axis, z)] = a;
            }
        }
        softened
    }
}

/// Brute-force Newtonian attraction with a clamped squared distance.
///
/// The pair term is `m_l * (q_z - q_l) / r²`, with `r²` floored at
/// `softening_threshold`, so the acceleration falls off as `1 / r` and stays
/// bounded when two particles coincide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftenedGravity {
    pub gravitational_constant: f64,
    pub softening_threshold: f64,
}

impl SoftenedGravity {
    pub fn new(gravitational_constant: f64, softening_threshold: f64) -> Self {
        Self {
            gravitational_constant,
            softening_threshold,
        }
    }

    pub fn from_config(config: &IntegratorConfig) -> Self {
        Self::new(config.gravitational_constant, config.softening_threshold)
    }

    /// Squared distance between particles `a` and `b`, clamped to the threshold.
    /// The flag reports whether the clamp was applied.
    #[inline]
    pub fn squared_distance(
        &self,
        frame: &[f64],
        layout: FrameLayout,
        a: usize,
        b: usize,
    ) -> (f64, bool) {
        let mut r2 = 0.0;
        for axis in 0..layout.degrees_of_freedom {
            let d = frame[layout.index(axis, a)] - frame[layout.index(axis, b)];
            r2 += d * d;
        }

        if r2 < self.softening_threshold {
            (self.softening_threshold, true)
        } else {
            (r2, false)
        }
    }
}

impl Default for SoftenedGravity {
    fn default() -> Self {
        Self::from_config(&IntegratorConfig::default())
    }
}

impl ForceLaw for SoftenedGravity {
    fn particle_acceleration(
        &self,
        frame: &[f64],
        masses: &[f64],
        layout: FrameLayout,
        particle: usize,
        out: &mut [f64],
    ) -> usize {
        out.fill(0.0);
        let mut softened = 0;

        // Sources are visited in index order for every axis; the parallel path
        // depends on this for bit-identical sums.
        for (l, &m_l) in masses.iter().enumerate() {
            if l == particle {
                continue;
            }
            let (r2, clamped) = self.squared_distance(frame, layout, particle, l);
            softened += clamped as usize;

            for (axis, acc) in out.iter_mut().enumerate() {
                let d = frame[layout.index(axis, particle)] - frame[layout.index(axis, l)];
                *acc -= m_l * d / r2;
            }
        }

        for acc in out.iter_mut() {
            *acc *= self.gravitational_constant;
        }
        softened
    }
}

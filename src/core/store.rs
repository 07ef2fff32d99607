use std::fmt;

use log::debug;

use crate::config::MIN_TIMESTEPS;
use crate::core::error::{IndexKind, Result, TrajectoryError};

/// Shape of a single frame.
///
/// Frames are axis-major: every particle's coordinate 0, then every particle's
/// coordinate 1, and so on. Consumers may rely on this ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub particle_count: usize,
    pub degrees_of_freedom: usize,
}

impl FrameLayout {
    pub fn new(particle_count: usize, degrees_of_freedom: usize) -> Self {
        Self {
            particle_count,
            degrees_of_freedom,
        }
    }

    /// Number of scalars in one frame.
    #[inline]
    pub fn width(&self) -> usize {
        self.particle_count * self.degrees_of_freedom
    }

    /// Flattened index of `particle`'s coordinate along `axis`.
    #[inline]
    pub fn index(&self, axis: usize, particle: usize) -> usize {
        axis * self.particle_count + particle
    }

    /// Splits a flattened index back into `(axis, particle)`.
    #[inline]
    pub fn split(&self, j: usize) -> (usize, usize) {
        (j / self.particle_count, j % self.particle_count)
    }
}

/// Frames `t - 1`, `t` and `t + 1` of a store, as needed by one Verlet step.
pub struct FrameWindow<'a> {
    pub layout: FrameLayout,
    pub masses: &'a [f64],
    pub previous: &'a [f64],
    pub current: &'a [f64],
    pub next: &'a mut [f64],
}

/// Columnar, time-indexed table of particle positions plus a mass per particle.
///
/// All frames live back-to-back in a single buffer; frame `t` occupies
/// `[t * width, (t + 1) * width)`. Frames 0 and 1 hold the initial conditions
/// (frame 1 implicitly encodes the initial velocity), the remaining frames are
/// written by [`crate::dynamics::VerletIntegrator`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryStore {
    layout: FrameLayout,
    timestep_count: usize,
    positions: Vec<f64>,
    masses: Vec<f64>,
}

impl TrajectoryStore {
    /// Allocates a zero-filled store.
    ///
    /// Fails with [`TrajectoryError::InvalidArgument`] when fewer than three
    /// timesteps are requested or when a dimension is zero.
    pub fn new(
        timestep_count: usize,
        particle_count: usize,
        degrees_of_freedom: usize,
    ) -> Result<Self> {
        if timestep_count < MIN_TIMESTEPS {
            return Err(TrajectoryError::InvalidArgument(format!(
                "The number of timesteps ({timestep_count}) must be at least {MIN_TIMESTEPS}."
            )));
        }
        if particle_count == 0 {
            return Err(TrajectoryError::InvalidArgument(
                "The number of particles must be at least 1.".into(),
            ));
        }
        if degrees_of_freedom == 0 {
            return Err(TrajectoryError::InvalidArgument(
                "The number of degrees of freedom must be at least 1.".into(),
            ));
        }

        let layout = FrameLayout::new(particle_count, degrees_of_freedom);
        debug!(
            "allocating trajectory store: {timestep_count} timesteps, \
             {particle_count} particles, {degrees_of_freedom} dof"
        );

        Ok(Self {
            layout,
            timestep_count,
            positions: vec![0.0; timestep_count * layout.width()],
            masses: vec![0.0; particle_count],
        })
    }

    pub fn layout(&self) -> FrameLayout {
        self.layout
    }

    pub fn timestep_count(&self) -> usize {
        self.timestep_count
    }

    pub fn particle_count(&self) -> usize {
        self.layout.particle_count
    }

    pub fn degrees_of_freedom(&self) -> usize {
        self.layout.degrees_of_freedom
    }

    /// Writes `coords` into frame 0 and copies frame 0 over frame 1, which
    /// resets the initial velocity of *every* particle to zero relative to
    /// frame 0. Call [`Self::set_initial_velocity`] afterwards, or use
    /// [`Self::set_initial_state`].
    pub fn set_initial_position(&mut self, particle: usize, coords: &[f64]) -> Result<()> {
        self.check_particle_arg(particle)?;
        self.check_dimension(coords, "Position")?;

        let layout = self.layout;
        let width = layout.width();
        for (axis, &value) in coords.iter().enumerate() {
            self.positions[layout.index(axis, particle)] = value;
        }
        self.positions.copy_within(0..width, width);
        Ok(())
    }

    /// Sets frame 1 to frame 0 plus `velocity` for this particle.
    ///
    /// Frame 0 must already hold the base position; otherwise the velocity is
    /// applied relative to the origin.
    pub fn set_initial_velocity(&mut self, particle: usize, velocity: &[f64]) -> Result<()> {
        self.check_particle_arg(particle)?;
        self.check_dimension(velocity, "Velocity")?;

        let layout = self.layout;
        let width = layout.width();
        for (axis, &value) in velocity.iter().enumerate() {
            let col = layout.index(axis, particle);
            self.positions[width + col] = self.positions[col] + value;
        }
        Ok(())
    }

    /// Sets position and velocity of one particle in a single call.
    ///
    /// Unlike [`Self::set_initial_position`], other particles' velocities are
    /// left untouched, so the calls can be made in any particle order. Both
    /// vectors are validated before anything is written.
    pub fn set_initial_state(
        &mut self,
        particle: usize,
        position: &[f64],
        velocity: &[f64],
    ) -> Result<()> {
        self.check_particle_arg(particle)?;
        self.check_dimension(position, "Position")?;
        self.check_dimension(velocity, "Velocity")?;

        let layout = self.layout;
        let width = layout.width();
        for axis in 0..layout.degrees_of_freedom {
            let col = layout.index(axis, particle);
            self.positions[col] = position[axis];
            self.positions[width + col] = position[axis] + velocity[axis];
        }
        Ok(())
    }

    /// Overwrites the mass of a particle. Zero and negative masses are accepted.
    pub fn set_mass(&mut self, particle: usize, mass: f64) -> Result<()> {
        self.check_particle_arg(particle)?;
        self.masses[particle] = mass;
        Ok(())
    }

    pub fn mass(&self, particle: usize) -> Result<f64> {
        self.check_particle(particle)?;
        Ok(self.masses[particle])
    }

    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    pub fn total_mass(&self) -> f64 {
        self.masses.iter().sum()
    }

    /// Coordinates of `particle` at timestep `t`.
    pub fn position(&self, particle: usize, t: usize) -> Result<Vec<f64>> {
        self.check_particle(particle)?;
        self.check_time(t)?;

        let frame = self.frame(t);
        Ok((0..self.layout.degrees_of_freedom)
            .map(|axis| frame[self.layout.index(axis, particle)])
            .collect())
    }

    /// Mass-weighted mean position at timestep `t`.
    ///
    /// Fails with [`TrajectoryError::DegenerateState`] when the masses sum to zero.
    pub fn center_of_mass(&self, t: usize) -> Result<Vec<f64>> {
        self.check_time(t)?;

        let total = self.total_mass();
        if total == 0.0 {
            return Err(TrajectoryError::DegenerateState(
                "Total mass is zero; center of mass is undefined.".into(),
            ));
        }

        let n = self.layout.particle_count;
        let frame = self.frame(t);
        Ok(frame
            .chunks_exact(n)
            .map(|axis_block| {
                axis_block
                    .iter()
                    .zip(&self.masses)
                    .fold(0.0, |sum, (q, m)| sum + m * q)
                    / total
            })
            .collect())
    }

    /// Direct access to frame `t`. Not part of the stable query contract.
    pub fn raw_frame(&self, t: usize) -> Option<&[f64]> {
        (t < self.timestep_count).then(|| self.frame(t))
    }

    /// Direct mutable access to frame `t`. Not part of the stable query contract.
    pub fn raw_frame_mut(&mut self, t: usize) -> Option<&mut [f64]> {
        if t >= self.timestep_count {
            return None;
        }
        let width = self.layout.width();
        Some(&mut self.positions[t * width..(t + 1) * width])
    }

    /// Borrows frames `t - 1` and `t` immutably together with frame `t + 1`
    /// mutably. Returns `None` unless `1 <= t <= timestep_count - 2`.
    pub fn frame_window_mut(&mut self, t: usize) -> Option<FrameWindow<'_>> {
        if t == 0 || t + 1 >= self.timestep_count {
            return None;
        }
        let width = self.layout.width();
        let window = &mut self.positions[(t - 1) * width..(t + 2) * width];
        let (history, next) = window.split_at_mut(2 * width);
        let (previous, current) = history.split_at(width);
        Some(FrameWindow {
            layout: self.layout,
            masses: &self.masses,
            previous,
            current,
            next,
        })
    }

    /// Zeroes every frame after the initial conditions.
    pub fn clear_output(&mut self) {
        let width = self.layout.width();
        self.positions[2 * width..].fill(0.0);
    }

    fn frame(&self, t: usize) -> &[f64] {
        let width = self.layout.width();
        &self.positions[t * width..(t + 1) * width]
    }

    fn check_time(&self, t: usize) -> Result<()> {
        if t < self.timestep_count {
            Ok(())
        } else {
            Err(TrajectoryError::OutOfRange {
                kind: IndexKind::Timestep,
                index: t,
                len: self.timestep_count,
            })
        }
    }

    fn check_particle(&self, particle: usize) -> Result<()> {
        if particle < self.layout.particle_count {
            Ok(())
        } else {
            Err(TrajectoryError::OutOfRange {
                kind: IndexKind::Particle,
                index: particle,
                len: self.layout.particle_count,
            })
        }
    }

    // Setters report a bad particle as a malformed argument rather than a range error.
    fn check_particle_arg(&self, particle: usize) -> Result<()> {
        if particle < self.layout.particle_count {
            Ok(())
        } else {
            Err(TrajectoryError::InvalidArgument(format!(
                "Particle identifier ({particle}) not in range 0..{}.",
                self.layout.particle_count
            )))
        }
    }

    fn check_dimension(&self, vec: &[f64], what: &str) -> Result<()> {
        if vec.len() == self.layout.degrees_of_freedom {
            Ok(())
        } else {
            Err(TrajectoryError::InvalidArgument(format!(
                "{what} vector has {} components, expected {}.",
                vec.len(),
                self.layout.degrees_of_freedom
            )))
        }
    }
}

impl fmt::Display for TrajectoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TrajectoryStore({} timesteps x {} particles x {} dof, total mass {})",
            self.timestep_count,
            self.layout.particle_count,
            self.layout.degrees_of_freedom,
            self.total_mass()
        )
    }
}

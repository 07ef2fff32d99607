use std::time::Instant;

use log::{info, trace};

use crate::config::{IntegratorConfig, PROGRESS_LOG_INTERVAL};
use crate::core::error::{IndexKind, Result, TrajectoryError};
use crate::core::shared::SharedTrajectory;
use crate::core::store::{FrameLayout, FrameWindow, TrajectoryStore};
use crate::dynamics::forces::{ForceLaw, SoftenedGravity};
use crate::utils::logging::{ScopedTimer, warn_if_non_finite};
use crate::utils::profiling::IntegrationProfile;

/// Störmer–Verlet integrator filling a [`TrajectoryStore`] forward in time.
///
/// Each step computes `q(t+1) = 2 q(t) - q(t-1) + H² a(t)` for every flattened
/// coordinate. Frames 0 and 1 are read as initial conditions and never written.
/// The integrator holds no per-run state, so the same instance can fill any
/// number of stores.
#[derive(Debug, Clone)]
pub struct VerletIntegrator<F: ForceLaw = SoftenedGravity> {
    config: IntegratorConfig,
    force: F,
    parallel: bool,
}

impl VerletIntegrator<SoftenedGravity> {
    pub fn new(config: IntegratorConfig) -> Self {
        Self::with_force_law(config, SoftenedGravity::from_config(&config))
    }
}

impl Default for VerletIntegrator<SoftenedGravity> {
    fn default() -> Self {
        Self::new(IntegratorConfig::default())
    }
}

impl<F: ForceLaw> VerletIntegrator<F> {
    /// Uses a custom force law. Only `config.step_size` is read by the
    /// integrator itself; the other constants belong to `force`.
    pub fn with_force_law(config: IntegratorConfig, force: F) -> Self {
        Self {
            config,
            force,
            parallel: false,
        }
    }

    pub fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    pub fn force_law(&self) -> &F {
        &self.force
    }

    /// Enables per-timestep fork-join evaluation. Without the `parallel`
    /// feature the flag is stored but evaluation stays sequential.
    pub fn set_parallel(&mut self, enabled: bool) {
        self.parallel = enabled;
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Computes frame `t + 1` from frames `t - 1` and `t`.
    ///
    /// Valid for `1 <= t <= timestep_count - 2`; returns the number of softened
    /// pairs.
    pub fn step(&self, store: &mut TrajectoryStore, t: usize) -> Result<usize> {
        let len = store.timestep_count();
        let window = store.frame_window_mut(t).ok_or(TrajectoryError::OutOfRange {
            kind: IndexKind::Timestep,
            index: t,
            len,
        })?;
        Ok(self.advance_window(window))
    }

    /// Fills frames `2..timestep_count` in place.
    pub fn integrate(&self, store: &mut TrajectoryStore) -> IntegrationProfile {
        let _timer = ScopedTimer::new("integrate", store.timestep_count() - 2);
        self.log_start(store.layout(), store.timestep_count());

        let start = Instant::now();
        let mut profile = IntegrationProfile::default();
        let mut warned = false;
        let n = store.particle_count();

        for t in 1..store.timestep_count() - 1 {
            if let Some(window) = store.frame_window_mut(t) {
                let softened = self.advance_window(window);
                profile.record_step(n, softened);
            }
            if !warned {
                if let Some(frame) = store.raw_frame(t + 1) {
                    warned = warn_if_non_finite(frame, t + 1);
                }
            }
            if t % PROGRESS_LOG_INTERVAL == 0 {
                trace!("integrated frame {} of {}", t + 1, store.timestep_count());
            }
        }

        profile.elapsed = start.elapsed();
        profile.report();
        profile
    }

    /// Fills a [`SharedTrajectory`], publishing each frame once it is complete
    /// so concurrent readers never observe a partially written frame.
    pub fn integrate_shared(&self, shared: &SharedTrajectory) -> Result<IntegrationProfile> {
        let (layout, timesteps, masses, mut previous, mut current) = {
            let store = shared.read();
            let first = store.raw_frame(0).map(<[f64]>::to_vec);
            let second = store.raw_frame(1).map(<[f64]>::to_vec);
            (
                store.layout(),
                store.timestep_count(),
                store.masses().to_vec(),
                first.unwrap_or_default(),
                second.unwrap_or_default(),
            )
        };
        let _timer = ScopedTimer::new("integrate_shared", timesteps - 2);
        self.log_start(layout, timesteps);

        let start = Instant::now();
        let mut profile = IntegrationProfile::default();
        let mut next = vec![0.0; layout.width()];
        let mut warned = false;

        for t in 1..timesteps - 1 {
            let softened = self.advance(&previous, &current, &masses, layout, &mut next);
            profile.record_step(layout.particle_count, softened);
            if !warned {
                warned = warn_if_non_finite(&next, t + 1);
            }

            shared.publish_frame(t + 1, &next)?;

            // previous <- current <- next; the old previous becomes scratch
            std::mem::swap(&mut previous, &mut current);
            std::mem::swap(&mut current, &mut next);
        }

        profile.elapsed = start.elapsed();
        profile.report();
        Ok(profile)
    }

    fn advance_window(&self, window: FrameWindow<'_>) -> usize {
        let FrameWindow {
            layout,
            masses,
            previous,
            current,
            next,
        } = window;
        self.advance(previous, current, masses, layout, next)
    }

    fn advance(
        &self,
        previous: &[f64],
        current: &[f64],
        masses: &[f64],
        layout: FrameLayout,
        next: &mut [f64],
    ) -> usize {
        // `next` holds the accelerations until the update below overwrites them.
        let softened = self.evaluate(current, masses, layout, next);
        let h2 = self.config.step_size_squared();

        for ((q_next, &q), &q_prev) in next.iter_mut().zip(current).zip(previous) {
            *q_next = 2.0 * q - q_prev + *q_next * h2;
        }
        softened
    }

    #[cfg(feature = "parallel")]
    fn evaluate(
        &self,
        frame: &[f64],
        masses: &[f64],
        layout: FrameLayout,
        out: &mut [f64],
    ) -> usize {
        if self.parallel {
            crate::dynamics::parallel::accelerations(&self.force, frame, masses, layout, out)
        } else {
            self.force.accelerations(frame, masses, layout, out)
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate(
        &self,
        frame: &[f64],
        masses: &[f64],
        layout: FrameLayout,
        out: &mut [f64],
    ) -> usize {
        self.force.accelerations(frame, masses, layout, out)
    }

    fn log_start(&self, layout: FrameLayout, timesteps: usize) {
        info!(
            "integrating {} particles x {} dof over {} timesteps (H = {}, parallel = {})",
            layout.particle_count,
            layout.degrees_of_freedom,
            timesteps,
            self.config.step_size,
            self.parallel
        );
    }
}

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{RwLock, RwLockReadGuard};

use crate::core::error::{IndexKind, Result, TrajectoryError};
use crate::core::store::TrajectoryStore;

/// A trajectory store that can be read while it is being filled.
///
/// Frames become visible one whole frame at a time: the writer fills frame
/// `t + 1` under the write lock and only then bumps the published count. Readers
/// asking for a frame that has not been published get
/// [`TrajectoryError::OutOfRange`].
#[derive(Debug)]
pub struct SharedTrajectory {
    store: RwLock<TrajectoryStore>,
    timestep_count: usize,
    published: AtomicUsize,
}

impl SharedTrajectory {
    /// Wraps a primed store; frames 0 and 1 are published immediately.
    pub fn new(store: TrajectoryStore) -> Self {
        Self {
            timestep_count: store.timestep_count(),
            store: RwLock::new(store),
            published: AtomicUsize::new(2),
        }
    }

    /// Number of frames that are complete and safe to read.
    pub fn published_frames(&self) -> usize {
        self.published.load(Ordering::Acquire)
    }

    pub fn timestep_count(&self) -> usize {
        self.timestep_count
    }

    /// Lock-free, so it is safe to call while holding the guard from [`Self::read`].
    pub fn is_complete(&self) -> bool {
        self.published_frames() == self.timestep_count
    }

    pub fn position(&self, particle: usize, t: usize) -> Result<Vec<f64>> {
        self.check_published(t)?;
        self.store.read().position(particle, t)
    }

    pub fn center_of_mass(&self, t: usize) -> Result<Vec<f64>> {
        self.check_published(t)?;
        self.store.read().center_of_mass(t)
    }

    /// Read guard over the whole store, including unpublished frames.
    pub fn read(&self) -> RwLockReadGuard<'_, TrajectoryStore> {
        self.store.read()
    }

    /// Copies `frame` into slot `t` and publishes every frame up to and including it.
    pub(crate) fn publish_frame(&self, t: usize, frame: &[f64]) -> Result<()> {
        {
            let mut store = self.store.write();
            let len = store.timestep_count();
            let slot = store.raw_frame_mut(t).ok_or(TrajectoryError::OutOfRange {
                kind: IndexKind::Timestep,
                index: t,
                len,
            })?;
            slot.copy_from_slice(frame);
        }
        self.published.store(t + 1, Ordering::Release);
        Ok(())
    }

    pub fn into_inner(self) -> TrajectoryStore {
        self.store.into_inner()
    }

    fn check_published(&self, t: usize) -> Result<()> {
        let published = self.published_frames();
        if t < published {
            Ok(())
        } else {
            Err(TrajectoryError::OutOfRange {
                kind: IndexKind::Timestep,
                index: t,
                len: published,
            })
        }
    }
}

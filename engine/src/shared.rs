//! Lock-guarded world aggregate shared between the simulation and its readers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use labyrinth_world::World;

/// Everything the simulation mutates during a tick.
#[derive(Debug)]
pub struct WorldState<C> {
    /// Authoritative game state.
    pub world: World,
    /// Surface the presenter draws onto.
    pub canvas: C,
}

/// Cloneable handle to the world state guarded by a single lock.
///
/// The simulation holds the lock for the whole computation of a tick and
/// releases it while sleeping. Readers should only copy what they need.
#[derive(Debug)]
pub struct SharedWorld<C> {
    inner: Arc<Mutex<WorldState<C>>>,
}

impl<C> Clone for SharedWorld<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> SharedWorld<C> {
    pub(crate) fn new(state: WorldState<C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    /// Runs `reader` with the lock held and returns its result.
    pub fn read<R>(&self, reader: impl FnOnce(&WorldState<C>) -> R) -> R {
        let guard = self.lock();
        reader(&guard)
    }

    /// Acquires the lock, recovering the state from a poisoned mutex.
    pub(crate) fn lock(&self) -> MutexGuard<'_, WorldState<C>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

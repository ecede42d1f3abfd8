//=========================================================================
// Event Queue
//=========================================================================
//
// Thread-safe append buffer between platform callbacks and the logic
// tick.
//
// Architecture:
//   platform callbacks (any thread) → push() → pending
//   logic thread (once per tick)    → drain() → snapshot apply → pool
//
// The mutex here is the only shared-mutable input state in the engine.
// `drain` is the single consumption point: there is no partial-drain or
// peek API, so a published snapshot can never observe half a frame.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::sync::Mutex;

//=== Internal Dependencies ===============================================

use super::event::InputEvent;
use super::pool::EventPool;

//=== Queue Internals =====================================================

struct Inner {
    /// Events appended since the last drain, in arrival order.
    pending: Vec<Box<InputEvent>>,

    /// Drained-out buffer kept for reuse; swapped with `pending` so the
    /// apply loop runs without holding the lock.
    scratch: Vec<Box<InputEvent>>,

    pool: EventPool,
}

//=== EventQueue ==========================================================

/// Append-only input buffer with a single drain point.
///
/// Pushes obtain a pooled box under the lock and append it; the drain
/// swaps the whole pending buffer out, applies events lock-free, then
/// recycles the boxes. Two vectors ping-pong between the roles, so the
/// steady-state tick allocates nothing.
pub struct EventQueue {
    inner: Mutex<Inner>,
}

impl EventQueue {
    /// Creates a queue whose pool refills in batches of `pool_refill`.
    ///
    /// # Panics
    ///
    /// Panics if `pool_refill == 0` (see [`EventPool::new`]).
    pub fn new(pool_refill: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                pending: Vec::new(),
                scratch: Vec::new(),
                pool: EventPool::new(pool_refill),
            }),
        }
    }

    /// Appends one event. Callable from any thread; never blocks beyond
    /// the short push critical section.
    pub fn push(&self, event: InputEvent) {
        let mut inner = self.lock();
        let mut slot = inner.pool.obtain();
        *slot = event;
        inner.pending.push(slot);
    }

    /// Drains every queued event in arrival order, applying each through
    /// `apply`, and returns how many were consumed.
    ///
    /// This is the only way events leave the queue. Events pushed
    /// concurrently with a drain land in the next one.
    pub fn drain(&self, mut apply: impl FnMut(&InputEvent)) -> usize {
        let mut batch = {
            let mut inner = self.lock();
            let empty = std::mem::take(&mut inner.scratch);
            std::mem::replace(&mut inner.pending, empty)
        };

        for event in &batch {
            apply(event);
        }
        let drained = batch.len();

        let mut inner = self.lock();
        for event in batch.drain(..) {
            inner.pool.free(event);
        }
        inner.scratch = batch;

        drained
    }

    /// Number of events waiting for the next drain.
    pub fn len(&self) -> usize {
        self.lock().pending.len()
    }

    /// Returns true if no events are waiting.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock means a pushing thread panicked mid-callback;
        // the Vec/pool state is still structurally valid, so keep going.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

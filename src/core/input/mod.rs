//=========================================================================
// Input System
//
// Frame-synchronized input for the console.
//
// Platform callbacks may fire on any thread at any time; scripts must
// see a frozen, internally consistent view for a whole frame. The split:
//
// - `InputHandle`: clonable callback surface; enqueues pooled events,
//   never touches published state.
// - `InputSystem`: owned by the logic thread; drains the queue exactly
//   once per tick and publishes the next snapshot.
//
// Responsibilities:
// - Accept raw key/touch callbacks from the platform layer
// - Publish one snapshot per tick (`process_received_events`)
// - Expose read-only queries for the script bridge
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
pub mod pool;
pub mod queue;
pub mod snapshot;

//=== External Crates =====================================================

use log::trace;
use std::sync::Arc;

//=== Internal Imports ====================================================

pub use event::{InputEvent, KeyCode, TouchPhase, TouchSignal};
use queue::EventQueue;
use snapshot::InputSnapshot;

//=== InputHandle =========================================================

/// Callback surface handed to the platform layer.
///
/// Cheap to clone; every method appends one pooled event to the shared
/// queue and returns immediately. Nothing here affects the snapshot the
/// scripts are currently reading.
#[derive(Clone)]
pub struct InputHandle {
    queue: Arc<EventQueue>,
}

impl InputHandle {
    pub fn on_key_pressed(&self, code: KeyCode) {
        self.queue.push(InputEvent::Key { code, pressed: true });
    }

    pub fn on_key_released(&self, code: KeyCode) {
        self.queue.push(InputEvent::Key { code, pressed: false });
    }

    pub fn on_touch_down(&self, signal: TouchSignal, x: f32, y: f32) {
        self.queue.push(InputEvent::Touch {
            signal,
            x,
            y,
            phase: TouchPhase::Down,
        });
    }

    pub fn on_touch_move(&self, signal: TouchSignal, x: f32, y: f32) {
        self.queue.push(InputEvent::Touch {
            signal,
            x,
            y,
            phase: TouchPhase::Move,
        });
    }

    pub fn on_touch_up(&self, signal: TouchSignal) {
        // Position is carried for uniformity; the snapshot keeps the last
        // live contact point for an Up.
        self.queue.push(InputEvent::Touch {
            signal,
            x: 0.0,
            y: 0.0,
            phase: TouchPhase::Up,
        });
    }
}

//=== InputSystem =========================================================

/// Owns the queue and the published snapshot.
///
/// Lives on the logic thread. `process_received_events` is the single
/// frame-boundary operation; everything else is a pure read of the last
/// published snapshot.
pub struct InputSystem {
    queue: Arc<EventQueue>,
    snapshot: InputSnapshot,
}

impl InputSystem {
    /// Creates the system with an event pool that refills in batches of
    /// `pool_refill`.
    ///
    /// # Panics
    ///
    /// Panics if `pool_refill == 0`; the cartridge manifest validates the
    /// value before it gets here.
    pub fn new(pool_refill: usize) -> Self {
        Self {
            queue: Arc::new(EventQueue::new(pool_refill)),
            snapshot: InputSnapshot::new(),
        }
    }

    /// Returns a clonable callback handle for the platform layer.
    pub fn handle(&self) -> InputHandle {
        InputHandle {
            queue: Arc::clone(&self.queue),
        }
    }

    //--- Frame Boundary ---------------------------------------------------

    /// Publishes the next snapshot: clears the one-frame edges, then
    /// drains and applies everything queued since the last call.
    ///
    /// Called exactly once per tick from the logic thread. All queries
    /// between two calls return identical results.
    pub fn process_received_events(&mut self) {
        self.snapshot.begin_frame();
        let snapshot = &mut self.snapshot;
        let drained = self.queue.drain(|event| snapshot.apply(event));

        if drained > 0 {
            trace!(target: "input", "Published snapshot from {} events", drained);
        }
    }

    //--- Query Methods ----------------------------------------------------

    /// Returns `true` while the button is held.
    pub fn is_key_pressed(&self, code: KeyCode) -> bool {
        self.snapshot.is_key_pressed(code)
    }

    /// Returns `true` only on the first frame after the button went down.
    pub fn is_key_just_pressed(&self, code: KeyCode) -> bool {
        self.snapshot.is_key_just_pressed(code)
    }

    /// Returns `true` only on the first frame after the button went up.
    pub fn is_key_just_released(&self, code: KeyCode) -> bool {
        self.snapshot.is_key_just_released(code)
    }

    pub fn any_key_pressed(&self) -> bool {
        self.snapshot.any_key_pressed()
    }

    pub fn any_key_just_pressed(&self) -> bool {
        self.snapshot.any_key_just_pressed()
    }

    /// Position of a live contact, or `None`.
    pub fn touched(&self, signal: TouchSignal) -> Option<(f32, f32)> {
        self.snapshot.touched(signal)
    }

    /// Position of a contact that started this frame, or `None`.
    pub fn just_touched(&self, signal: TouchSignal) -> Option<(f32, f32)> {
        self.snapshot.just_touched(signal)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

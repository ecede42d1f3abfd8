//=========================================================================
// Event Pool
//=========================================================================
//
// Free-list pool of boxed input events.
//
// Platform callbacks fire at OS event rate; without pooling, every
// keystroke and pointer move would allocate. The pool keeps a free list
// of boxed events and refills it in batches when it runs dry, so
// `obtain()` never fails and never blocks.
//
// Ownership: an obtained event is an owned `Box`. It lives in exactly
// one place (the pending queue, then the drain buffer) and returning it
// twice is a move error, not a runtime hazard.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::event::InputEvent;

//=== EventPool ===========================================================

/// Recycling allocator for [`InputEvent`] boxes.
///
/// `obtain` pops a recycled instance, refilling the free list with
/// `refill_size` fresh boxes when it is empty. `free` resets the instance
/// to its default state and returns it. The free list grows only in
/// refill steps; in steady state (drain every tick) it stops growing
/// entirely.
pub struct EventPool {
    free: Vec<Box<InputEvent>>,
    refill_size: usize,
}

impl EventPool {
    /// Creates a pool that refills in batches of `refill_size`.
    ///
    /// # Panics
    ///
    /// Panics if `refill_size == 0`. Callers configure the size through
    /// the cartridge manifest, which rejects zero before this runs.
    pub fn new(refill_size: usize) -> Self {
        assert!(refill_size > 0, "Event pool refill size must be positive");

        let mut free = Vec::with_capacity(refill_size);
        free.extend((0..refill_size).map(|_| Box::new(InputEvent::default())));

        Self { free, refill_size }
    }

    /// Returns a recycled event, refilling the free list if it is empty.
    ///
    /// The returned event still carries whatever state it was freed with;
    /// callers overwrite it completely before use.
    pub fn obtain(&mut self) -> Box<InputEvent> {
        if self.free.is_empty() {
            trace!(target: "input::pool", "Free list dry, refilling {} events", self.refill_size);
            self.free
                .extend((0..self.refill_size).map(|_| Box::new(InputEvent::default())));
        }

        self.free
            .pop()
            .expect("refill guarantees at least one free event")
    }

    /// Resets an event to its default state and returns it to the free list.
    pub fn free(&mut self, mut event: Box<InputEvent>) {
        *event = InputEvent::default();
        self.free.push(event);
    }

    /// Number of events currently available without a refill.
    pub fn available(&self) -> usize {
        self.free.len()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

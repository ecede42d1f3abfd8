//=========================================================================
// Input Snapshot
//=========================================================================
//
// Published per-frame view of button and touch state.
//
// Frame lifecycle: begin_frame() → apply(event)* → query until the next
// begin_frame. Between two publishes the snapshot never changes, so any
// number of script queries inside one frame read identical state.
//
// Edge semantics: pressed/released/touched edges are latched at the
// moment the transition event is applied and stay true for exactly one
// published frame. A press and release that both land in one inter-frame
// window therefore still read as just-pressed for that frame, even though
// the button finishes the frame up.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, TouchPhase, TouchSignal};

//=== Per-Key State =======================================================

#[derive(Debug, Default, Clone, Copy)]
struct KeyState {
    /// Held right now.
    down: bool,

    /// Up→down transition happened in the last applied batch.
    pressed: bool,

    /// Down→up transition happened in the last applied batch.
    released: bool,
}

//=== Per-Touch State =====================================================

#[derive(Debug, Clone, Copy)]
struct TouchState {
    down: bool,

    /// Contact started in the last applied batch.
    touched: bool,

    x: f32,
    y: f32,
}

//=== InputSnapshot =======================================================

/// Button and touch state for one published frame.
///
/// Owned by the logic thread; the queue drain is the only writer and
/// runs once per tick.
pub struct InputSnapshot {
    keys: HashMap<KeyCode, KeyState>,
    touches: HashMap<TouchSignal, TouchState>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self {
            keys: HashMap::new(),
            touches: HashMap::new(),
        }
    }

    //--- Frame Processing -------------------------------------------------

    /// Opens the next frame: clears one-frame edges and drops touch
    /// entries whose contact ended, so a lifted finger can never report
    /// a stale position.
    pub fn begin_frame(&mut self) {
        for state in self.keys.values_mut() {
            state.pressed = false;
            state.released = false;
        }

        self.touches.retain(|_, state| state.down);
        for state in self.touches.values_mut() {
            state.touched = false;
        }
    }

    /// Applies one queued event to the frame being built.
    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::Key { code, pressed } => self.apply_key(code, pressed),
            InputEvent::Touch { signal, x, y, phase } => self.apply_touch(signal, x, y, phase),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn apply_key(&mut self, code: KeyCode, pressed: bool) {
        if code == KeyCode::Unidentified {
            return;
        }

        let state = self.keys.entry(code).or_default();
        if pressed {
            // Duplicate downs (OS auto-repeat) do not re-trigger the edge.
            if !state.down {
                state.down = true;
                state.pressed = true;
            }
        } else if state.down {
            state.down = false;
            state.released = true;
        }
        // A release for a button that was never down is dropped.
    }

    fn apply_touch(&mut self, signal: TouchSignal, x: f32, y: f32, phase: TouchPhase) {
        match phase {
            TouchPhase::Down => {
                let state = self.touches.entry(signal).or_insert(TouchState {
                    down: false,
                    touched: false,
                    x,
                    y,
                });
                if !state.down {
                    state.down = true;
                    state.touched = true;
                }
                state.x = x;
                state.y = y;
            }
            TouchPhase::Move => {
                // Moves without a live contact carry no position we can trust.
                if let Some(state) = self.touches.get_mut(&signal) {
                    if state.down {
                        state.x = x;
                        state.y = y;
                    }
                }
            }
            TouchPhase::Up => {
                if let Some(state) = self.touches.get_mut(&signal) {
                    state.down = false;
                }
            }
        }
    }

    //=====================================================================
    // Query API - Buttons
    //=====================================================================

    /// Returns `true` while the button is held.
    pub fn is_key_pressed(&self, code: KeyCode) -> bool {
        self.keys.get(&code).map_or(false, |state| state.down)
    }

    /// Returns `true` only on the first published frame after the button
    /// went down.
    pub fn is_key_just_pressed(&self, code: KeyCode) -> bool {
        self.keys.get(&code).map_or(false, |state| state.pressed)
    }

    /// Returns `true` only on the first published frame after the button
    /// went up.
    pub fn is_key_just_released(&self, code: KeyCode) -> bool {
        self.keys.get(&code).map_or(false, |state| state.released)
    }

    /// Returns `true` if any button is held.
    pub fn any_key_pressed(&self) -> bool {
        self.keys.values().any(|state| state.down)
    }

    /// Returns `true` if any button went down this frame.
    pub fn any_key_just_pressed(&self) -> bool {
        self.keys.values().any(|state| state.pressed)
    }

    //=====================================================================
    // Query API - Touch
    //=====================================================================

    /// Position of a live contact, or `None` if the signal is not
    /// currently touching.
    pub fn touched(&self, signal: TouchSignal) -> Option<(f32, f32)> {
        self.touches
            .get(&signal)
            .filter(|state| state.down)
            .map(|state| (state.x, state.y))
    }

    /// Position of a contact that started this frame, or `None`.
    ///
    /// Stays `Some` for a tap that went down and up inside one window;
    /// the contact existed, for exactly this frame.
    pub fn just_touched(&self, signal: TouchSignal) -> Option<(f32, f32)> {
        self.touches
            .get(&signal)
            .filter(|state| state.touched)
            .map(|state| (state.x, state.y))
    }
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Test Helpers -----------------------------------------------------

    fn press(code: KeyCode) -> InputEvent {
        InputEvent::Key { code, pressed: true }
    }

    fn release(code: KeyCode) -> InputEvent {
        InputEvent::Key { code, pressed: false }
    }

    fn touch(signal: TouchSignal, x: f32, y: f32, phase: TouchPhase) -> InputEvent {
        InputEvent::Touch { signal, x, y, phase }
    }

    fn frame(snapshot: &mut InputSnapshot, events: &[InputEvent]) {
        snapshot.begin_frame();
        for event in events {
            snapshot.apply(event);
        }
    }

    //=====================================================================
    // Button Tests
    //=====================================================================

    /// The canonical press lifecycle: edge on the first frame, held
    /// afterwards, gone after release.
    #[test]
    fn press_edge_lasts_one_frame() {
        let mut snapshot = InputSnapshot::new();

        frame(&mut snapshot, &[press(KeyCode::ButtonA)]);
        assert!(snapshot.is_key_just_pressed(KeyCode::ButtonA));
        assert!(snapshot.is_key_pressed(KeyCode::ButtonA));

        frame(&mut snapshot, &[]);
        assert!(!snapshot.is_key_just_pressed(KeyCode::ButtonA));
        assert!(snapshot.is_key_pressed(KeyCode::ButtonA));

        frame(&mut snapshot, &[release(KeyCode::ButtonA)]);
        assert!(!snapshot.is_key_pressed(KeyCode::ButtonA));
        assert!(snapshot.is_key_just_released(KeyCode::ButtonA));
        assert!(!snapshot.any_key_pressed());
    }

    /// Press and release inside one window: the press edge survives the
    /// frame even though the button finishes up.
    #[test]
    fn same_window_tap_still_reads_just_pressed() {
        let mut snapshot = InputSnapshot::new();

        frame(
            &mut snapshot,
            &[press(KeyCode::Start), release(KeyCode::Start)],
        );

        assert!(snapshot.is_key_just_pressed(KeyCode::Start));
        assert!(snapshot.is_key_just_released(KeyCode::Start));
        assert!(!snapshot.is_key_pressed(KeyCode::Start));

        frame(&mut snapshot, &[]);
        assert!(!snapshot.is_key_just_pressed(KeyCode::Start));
    }

    #[test]
    fn duplicate_down_does_not_retrigger_edge() {
        let mut snapshot = InputSnapshot::new();

        frame(&mut snapshot, &[press(KeyCode::Left)]);
        frame(&mut snapshot, &[press(KeyCode::Left)]);

        assert!(!snapshot.is_key_just_pressed(KeyCode::Left));
        assert!(snapshot.is_key_pressed(KeyCode::Left));
    }

    #[test]
    fn spurious_release_is_ignored() {
        let mut snapshot = InputSnapshot::new();

        frame(&mut snapshot, &[release(KeyCode::ButtonY)]);

        assert!(!snapshot.is_key_just_released(KeyCode::ButtonY));
        assert!(!snapshot.is_key_pressed(KeyCode::ButtonY));
    }

    #[test]
    fn unidentified_keys_never_tracked() {
        let mut snapshot = InputSnapshot::new();

        frame(&mut snapshot, &[press(KeyCode::Unidentified)]);

        assert!(!snapshot.any_key_pressed());
        assert!(!snapshot.any_key_just_pressed());
    }

    #[test]
    fn keys_are_tracked_independently() {
        let mut snapshot = InputSnapshot::new();

        frame(&mut snapshot, &[press(KeyCode::Left), press(KeyCode::ButtonA)]);
        frame(&mut snapshot, &[release(KeyCode::Left)]);

        assert!(!snapshot.is_key_pressed(KeyCode::Left));
        assert!(snapshot.is_key_pressed(KeyCode::ButtonA));
        assert!(snapshot.any_key_pressed());
    }

    /// Queries are pure: asking repeatedly inside one frame always
    /// returns the same answer.
    #[test]
    fn queries_are_stable_within_a_frame() {
        let mut snapshot = InputSnapshot::new();

        frame(&mut snapshot, &[press(KeyCode::ButtonB)]);

        for _ in 0..5 {
            assert!(snapshot.is_key_just_pressed(KeyCode::ButtonB));
            assert!(snapshot.is_key_pressed(KeyCode::ButtonB));
            assert!(snapshot.any_key_just_pressed());
        }
    }

    //=====================================================================
    // Touch Tests
    //=====================================================================

    #[test]
    fn touch_lifecycle() {
        let mut snapshot = InputSnapshot::new();
        let signal = TouchSignal::POINTER;

        frame(&mut snapshot, &[touch(signal, 10.0, 20.0, TouchPhase::Down)]);
        assert_eq!(snapshot.just_touched(signal), Some((10.0, 20.0)));
        assert_eq!(snapshot.touched(signal), Some((10.0, 20.0)));

        frame(&mut snapshot, &[]);
        assert_eq!(snapshot.just_touched(signal), None);
        assert_eq!(snapshot.touched(signal), Some((10.0, 20.0)));

        frame(&mut snapshot, &[touch(signal, 15.0, 25.0, TouchPhase::Move)]);
        assert_eq!(snapshot.touched(signal), Some((15.0, 25.0)));

        frame(&mut snapshot, &[touch(signal, 15.0, 25.0, TouchPhase::Up)]);
        assert_eq!(snapshot.touched(signal), None);
    }

    /// Once a contact has ended and its frame passed, no position is
    /// reachable for that signal.
    #[test]
    fn lifted_contact_reports_no_stale_position() {
        let mut snapshot = InputSnapshot::new();
        let signal = TouchSignal(2);

        frame(&mut snapshot, &[touch(signal, 5.0, 5.0, TouchPhase::Down)]);
        frame(&mut snapshot, &[touch(signal, 5.0, 5.0, TouchPhase::Up)]);
        frame(&mut snapshot, &[]);

        assert_eq!(snapshot.touched(signal), None);
        assert_eq!(snapshot.just_touched(signal), None);
    }

    #[test]
    fn unknown_signal_returns_none() {
        let snapshot = InputSnapshot::new();
        assert_eq!(snapshot.touched(TouchSignal(7)), None);
        assert_eq!(snapshot.just_touched(TouchSignal(7)), None);
    }

    #[test]
    fn move_without_contact_is_ignored() {
        let mut snapshot = InputSnapshot::new();
        let signal = TouchSignal::POINTER;

        frame(&mut snapshot, &[touch(signal, 9.0, 9.0, TouchPhase::Move)]);

        assert_eq!(snapshot.touched(signal), None);
    }

    #[test]
    fn contacts_are_tracked_independently() {
        let mut snapshot = InputSnapshot::new();

        frame(
            &mut snapshot,
            &[
                touch(TouchSignal(0), 1.0, 1.0, TouchPhase::Down),
                touch(TouchSignal(1), 2.0, 2.0, TouchPhase::Down),
            ],
        );
        frame(&mut snapshot, &[touch(TouchSignal(0), 1.0, 1.0, TouchPhase::Up)]);

        assert_eq!(snapshot.touched(TouchSignal(0)), None);
        assert_eq!(snapshot.touched(TouchSignal(1)), Some((2.0, 2.0)));
    }
}

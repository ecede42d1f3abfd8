//=========================================================================
// Ctrl Bridge
//=========================================================================
//
// The `ctrl` namespace the script runtime sees every frame.
//
// Scripts address the directional pad by index; the index table below is
// the contract, independent of how `KeyCode` is laid out. Queries borrow
// the published snapshot, so a script can call them any number of times
// within a frame and read the same answers.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::input::{InputSystem, KeyCode};

//=== Index Table =========================================================

/// Script-visible pad indices: 0 left, 1 up, 2 right, 3 down.
const PAD: [KeyCode; 4] = [KeyCode::Left, KeyCode::Up, KeyCode::Right, KeyCode::Down];

fn pad_key(index: usize) -> Option<KeyCode> {
    PAD.get(index).copied()
}

//=== Ctrl ================================================================

/// Per-frame input queries for the script runtime.
///
/// Built fresh by the core loop for every frame callback; out-of-range
/// indices answer `false`, never an error.
pub struct Ctrl<'a> {
    input: &'a InputSystem,
}

impl<'a> Ctrl<'a> {
    pub(crate) fn new(input: &'a InputSystem) -> Self {
        Self { input }
    }

    /// True iff the pad direction at `index` was just pressed this frame.
    pub fn key(&self, index: usize) -> bool {
        pad_key(index).map_or(false, |code| self.input.is_key_just_pressed(code))
    }

    /// True iff the pad direction at `index` is currently held.
    pub fn down(&self, index: usize) -> bool {
        pad_key(index).map_or(false, |code| self.input.is_key_pressed(code))
    }

    //--- Reserved Surface -------------------------------------------------
    //
    // The script API declares touch accessors, but the runtime does not
    // consume them yet; they report no contact.
    // TODO: route `InputSystem::touched`/`just_touched` here once the
    // script runtime grows its pointer API.

    /// Position of the script-visible touch contact. Always `None`.
    pub fn touch(&self) -> Option<(f32, f32)> {
        None
    }

    /// Whether the script-visible touch contact is live. Always `false`.
    pub fn touching(&self) -> bool {
        false
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn input_with(presses: &[KeyCode]) -> InputSystem {
        let mut input = InputSystem::new(8);
        let handle = input.handle();
        for code in presses {
            handle.on_key_pressed(*code);
        }
        input.process_received_events();
        input
    }

    #[test]
    fn pad_indices_map_left_up_right_down() {
        let input = input_with(&[KeyCode::Left]);
        let ctrl = Ctrl::new(&input);
        assert!(ctrl.key(0));
        assert!(!ctrl.key(1));

        let input = input_with(&[KeyCode::Down]);
        let ctrl = Ctrl::new(&input);
        assert!(ctrl.key(3));
        assert!(ctrl.down(3));
    }

    #[test]
    fn key_is_edge_down_is_level() {
        let mut input = input_with(&[KeyCode::Right]);

        {
            let ctrl = Ctrl::new(&input);
            assert!(ctrl.key(2));
            assert!(ctrl.down(2));
        }

        input.process_received_events();
        let ctrl = Ctrl::new(&input);
        assert!(!ctrl.key(2));
        assert!(ctrl.down(2));
    }

    #[test]
    fn out_of_range_index_answers_false() {
        let input = input_with(&[KeyCode::Left, KeyCode::Up]);
        let ctrl = Ctrl::new(&input);

        assert!(!ctrl.key(4));
        assert!(!ctrl.down(17));
        assert!(!ctrl.key(usize::MAX));
    }

    #[test]
    fn non_pad_buttons_are_invisible_to_the_bridge() {
        let input = input_with(&[KeyCode::ButtonA, KeyCode::Start]);
        let ctrl = Ctrl::new(&input);

        for index in 0..4 {
            assert!(!ctrl.key(index));
            assert!(!ctrl.down(index));
        }
    }

    #[test]
    fn touch_surface_reports_no_contact() {
        let input = input_with(&[]);
        let ctrl = Ctrl::new(&input);
        assert_eq!(ctrl.touch(), None);
        assert!(!ctrl.touching());
    }
}

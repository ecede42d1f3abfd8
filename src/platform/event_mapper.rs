//=========================================================================
// Platform Event Mapper
//
// Converts Winit key codes to the console's fixed button set.
//
// The console pad is emulated on a keyboard: arrows for the pad, a row
// of letter keys for the face buttons, Enter/Shift for the menu pair.
// Everything else maps to `Unidentified` and is filtered before it can
// reach the input queue.
//
//=========================================================================

use winit::keyboard::KeyCode as WinitKeyCode;

use crate::core::input::KeyCode;

//=== Key Conversion ======================================================

impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        match code {
            //--- Pad --------------------------------------------------------
            WinitKeyCode::ArrowLeft => KeyCode::Left,
            WinitKeyCode::ArrowUp => KeyCode::Up,
            WinitKeyCode::ArrowRight => KeyCode::Right,
            WinitKeyCode::ArrowDown => KeyCode::Down,

            //--- Face Buttons -----------------------------------------------
            WinitKeyCode::KeyZ => KeyCode::ButtonA,
            WinitKeyCode::KeyX => KeyCode::ButtonB,
            WinitKeyCode::KeyC => KeyCode::ButtonX,
            WinitKeyCode::KeyV => KeyCode::ButtonY,

            //--- Menu -------------------------------------------------------
            WinitKeyCode::Enter => KeyCode::Start,
            WinitKeyCode::ShiftLeft | WinitKeyCode::ShiftRight => KeyCode::Select,

            //--- Fallback ---------------------------------------------------
            _ => KeyCode::Unidentified,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

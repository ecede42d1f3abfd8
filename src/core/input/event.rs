//=========================================================================
// Input Event Types
//
// Defines the internal representation of console input.
//
// This module abstracts platform input (Winit today, SDL or a browser
// shim tomorrow) into the fixed button set and touch contacts the console
// exposes to scripts.
//
// Responsibilities:
// - Represent the console's button set in a stable, portable way
// - Represent touch contacts (down / move / up) with their position
// - Stay copy-cheap: events cross a thread boundary every frame
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    InputEvent (this module, pooled)
//         ↓
//    EventQueue → InputSnapshot (published once per tick)
//         ↓
//    Ctrl queries (script runtime)
// ```
//
//=========================================================================

//=== KeyCode =============================================================

/// Console button identifier.
///
/// The console has a fixed pad: four directions, four face buttons, and
/// two menu buttons. Identifiers are stable for a whole session; anything
/// the platform reports outside this set maps to `Unidentified` and is
/// filtered before it reaches the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Directions -------------------------------------------------------

    Left,
    Up,
    Right,
    Down,

    //--- Face Buttons -----------------------------------------------------

    /// Primary action (keyboard: Z).
    ButtonA,

    /// Secondary action (keyboard: X).
    ButtonB,

    /// Tertiary action (keyboard: C).
    ButtonX,

    /// Quaternary action (keyboard: V).
    ButtonY,

    //--- Menu Buttons -----------------------------------------------------

    /// Start / pause (keyboard: Enter).
    Start,

    /// Select / menu (keyboard: Shift).
    Select,

    /// Fallback for keys the platform layer does not map.
    ///
    /// Filtered out before enqueueing; kept in the enum so conversions
    /// are total.
    Unidentified,
}

impl KeyCode {
    /// Every trackable button, in no particular order.
    ///
    /// Used by the snapshot tests and the `any_key_*` queries;
    /// deliberately excludes `Unidentified`.
    pub const ALL: [KeyCode; 10] = [
        KeyCode::Left,
        KeyCode::Up,
        KeyCode::Right,
        KeyCode::Down,
        KeyCode::ButtonA,
        KeyCode::ButtonB,
        KeyCode::ButtonX,
        KeyCode::ButtonY,
        KeyCode::Start,
        KeyCode::Select,
    ];
}

//=== TouchSignal =========================================================

/// Identifier for one touch contact source.
///
/// Contacts are identified by a small integer that is stable for the
/// lifetime of the contact. The desktop platform layer emulates a single
/// contact from the pointer ([`TouchSignal::POINTER`]); a real touch
/// screen would report one signal per finger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TouchSignal(pub u8);

impl TouchSignal {
    /// The pointer-emulated contact used on desktop platforms.
    pub const POINTER: TouchSignal = TouchSignal(0);
}

//=== TouchPhase ==========================================================

/// Lifecycle stage of a touch contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// Contact started.
    Down,

    /// Contact moved while held.
    Move,

    /// Contact ended.
    Up,
}

//=== InputEvent ==========================================================

/// One state change reported by the platform layer.
///
/// Instances are pooled: the queue obtains one per platform callback and
/// recycles it after the frame drain, so the per-frame hot path performs
/// no allocation in steady state.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A button changed state.
    Key {
        code: KeyCode,
        pressed: bool,
    },

    /// A touch contact changed.
    ///
    /// `x`/`y` are console screen coordinates. For `TouchPhase::Up` the
    /// position is the last known contact point.
    Touch {
        signal: TouchSignal,
        x: f32,
        y: f32,
        phase: TouchPhase,
    },
}

impl Default for InputEvent {
    /// The pool's resting state: a released, unidentified key.
    fn default() -> Self {
        InputEvent::Key {
            code: KeyCode::Unidentified,
            pressed: false,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the console core.
//
// Architecture:
// ```text
//  Main Thread:                     Logic Thread:
//  ┌──────────────────────────┐    ┌──────────────────┐
//  │  Winit Event Loop        │    │  CoreLoop        │
//  │   ↓                      │    │                  │
//  │  key / pointer mapping   │    │  InputSystem     │
//  │   ↓                      │    │  ↓               │
//  │  InputHandle ────────────┼───►│  snapshot        │
//  │                          │    │  ↓               │
//  │  CloseRequested          │    │  Ctrl → scripts  │
//  │   ↓                      │    └──────────────────┘
//  │  ControlEvent channel ───┼─────────────┘
//  └──────────────────────────┘
// ```
//
// Key Design Decisions:
// - Callbacks go straight into the shared input queue; the core decides
//   frame boundaries, not the platform.
// - The pointer emulates a single touch contact: left button down is a
//   touch-down, cursor movement while held is a touch-move.
// - OS key auto-repeat is dropped here; a held key is level state, not
//   a stream of presses.
// - Graceful channel disconnect: if the core is gone the platform keeps
//   running so the user can still close the window.
//
//=========================================================================

//=== Submodules ==========================================================

mod event_mapper;

//=== External Crates =====================================================

use crossbeam_channel::Sender;
use log::{error, info, trace};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowAttributes},
};

//=== Internal Imports ====================================================

use crate::core::input::{InputHandle, KeyCode, TouchSignal};
use crate::core::ControlEvent;

//=== PlatformError =======================================================

/// Platform initialization and runtime errors. Fatal: without an event
/// loop the console cannot present a window.
#[derive(Debug)]
pub(crate) enum PlatformError {
    EventLoopCreation(winit::error::EventLoopError),
    EventLoopExecution(winit::error::EventLoopError),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventLoopCreation(e) => write!(f, "Event loop creation failed: {}", e),
            Self::EventLoopExecution(e) => write!(f, "Event loop error: {}", e),
        }
    }
}

impl std::error::Error for PlatformError {}

//=== Platform ============================================================

/// Window owner and input forwarder.
///
/// Runs on the thread that called [`crate::Console::run`] (Winit requires
/// the main thread on macOS/iOS). All communication with the logic
/// thread goes through the shared input queue and the control channel.
pub(crate) struct Platform {
    /// OS window handle (None until `resumed()`).
    window: Option<Window>,

    /// Window title, taken from the cartridge name.
    title: String,

    input: InputHandle,
    control: Sender<ControlEvent>,

    //--- Pointer → Touch Emulation ---------------------------------------
    pointer_position: (f32, f32),
    pointer_down: bool,
}

impl Platform {
    pub(crate) fn new(title: String, input: InputHandle, control: Sender<ControlEvent>) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            title,
            input,
            control,
            pointer_position: (0.0, 0.0),
            pointer_down: false,
        }
    }

    /// Starts the event loop; blocks until the window closes.
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;
        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    //--- Internal Helpers -------------------------------------------------

    fn handle_key(&self, code: KeyCode, pressed: bool) {
        if code == KeyCode::Unidentified {
            trace!(target: "platform::input", "Unmapped key ignored");
            return;
        }
        if pressed {
            self.input.on_key_pressed(code);
        } else {
            self.input.on_key_released(code);
        }
    }

    fn handle_pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer_position = (x, y);
        if self.pointer_down {
            self.input.on_touch_move(TouchSignal::POINTER, x, y);
        }
    }

    fn handle_pointer_button(&mut self, pressed: bool) {
        let (x, y) = self.pointer_position;
        if pressed {
            self.pointer_down = true;
            self.input.on_touch_down(TouchSignal::POINTER, x, y);
        } else if self.pointer_down {
            self.pointer_down = false;
            self.input.on_touch_up(TouchSignal::POINTER);
        }
    }

    fn notify_closed(&self) {
        // A dead core loop already stopped listening; nothing to do.
        let _ = self.control.send(ControlEvent::WindowClosed);
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Creates the window on startup (and ignores mobile resumes once it
    /// exists).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(512, 512));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{}",
                    window.inner_size().width,
                    window.inner_size().height
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.notify_closed();
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.notify_closed();
                event_loop.exit();
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                // Auto-repeat reports no new state; the first down was
                // already forwarded.
                if key_event.repeat {
                    return;
                }
                if let PhysicalKey::Code(code) = key_event.physical_key {
                    let pressed = key_event.state == ElementState::Pressed;
                    self.handle_key(KeyCode::from(code), pressed);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.handle_pointer_moved(position.x as f32, position.y as f32);
            }

            WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                self.handle_pointer_button(state == ElementState::Pressed);
            }

            WindowEvent::RedrawRequested => {
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {
                // Resized, Focused, other buttons: not input the console
                // tracks.
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

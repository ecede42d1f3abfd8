//=========================================================================
// Core Loop
//
// The console's logic thread: one tick per frame at a fixed rate.
//
// Each tick:
//  1. Drains the control channel (window closed → clean exit)
//  2. Publishes the next input snapshot (exactly one publish per tick)
//  3. Pumps ordered resource events into the script host
//  4. Runs the host's frame callback against the published snapshot
//  5. Sleeps off the remainder of the frame budget
//
// Notes:
// The loop runs independently of the platform layer; the only inbound
// paths are the shared input queue, the resource channel, and the
// control channel. The host never observes a half-applied frame.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod ctrl;
pub mod input;
pub mod resource;

pub use ctrl::Ctrl;

//=== Standard Library Imports ============================================

use std::thread;
use std::time::{Duration, Instant};

//=== External Crates =====================================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{info, warn};

//=== Internal Imports ====================================================

use input::InputSystem;
use resource::{ResourceEvent, ResourceFailure, ResourceUpdate};

//=== ControlEvent ========================================================

/// Out-of-band signals from the platform layer to the core loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ControlEvent {
    /// User or OS closed the window; the loop should end this tick.
    WindowClosed,
}

//=== TickControl =========================================================

/// Loop control signal returned by each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== ScriptHost ==========================================================

/// The embedded script runtime, seen from the core.
///
/// The core hands the host resources in canonical order and one frame
/// callback per tick. An update with `reload == true` means reset and
/// re-bind that resource's runtime state, not first-time initialization.
pub trait ScriptHost: Send {
    /// Installs or re-installs one resource (already ordered).
    fn install_resource(&mut self, update: ResourceUpdate);

    /// A resource could not be read; the previous version stays valid.
    fn resource_failed(&mut self, failure: ResourceFailure);

    /// Runs one frame of script logic against the published snapshot.
    fn frame(&mut self, ctrl: Ctrl<'_>);
}

//=== CoreLoop ============================================================

/// Owns everything the logic thread touches.
pub(crate) struct CoreLoop<H: ScriptHost> {
    input: InputSystem,
    resources: Receiver<ResourceEvent>,
    control: Receiver<ControlEvent>,
    host: H,
}

impl<H: ScriptHost> CoreLoop<H> {
    pub(crate) fn new(
        input: InputSystem,
        resources: Receiver<ResourceEvent>,
        control: Receiver<ControlEvent>,
        host: H,
    ) -> Self {
        Self {
            input,
            resources,
            control,
            host,
        }
    }

    //--- tick() -----------------------------------------------------------

    /// Runs one frame. Separated from the pacing loop so tests can drive
    /// frames directly.
    pub(crate) fn tick(&mut self) -> TickControl {
        //--- Step 1: Control signals --------------------------------------
        loop {
            match self.control.try_recv() {
                Ok(ControlEvent::WindowClosed) => return TickControl::Exit,
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        //--- Step 2: Publish input ----------------------------------------
        self.input.process_received_events();

        //--- Step 3: Pump resources (bounded to avoid starving the frame) -
        const MAX_RESOURCES_PER_TICK: usize = 32;

        let mut delivered = 0;
        while delivered < MAX_RESOURCES_PER_TICK {
            match self.resources.try_recv() {
                Ok(ResourceEvent::Changed(update)) => self.host.install_resource(update),
                Ok(ResourceEvent::Failed(failure)) => self.host.resource_failed(failure),
                Err(_) => break,
            }
            delivered += 1;
        }
        if delivered >= MAX_RESOURCES_PER_TICK {
            warn!(target: "core", "Resource backlog: delivered {} this tick", delivered);
        }

        //--- Step 4: Script frame -----------------------------------------
        self.host.frame(Ctrl::new(&self.input));

        TickControl::Continue
    }

    //--- run() ------------------------------------------------------------

    /// Ticks at the given rate until an exit signal, then returns the
    /// host to the caller.
    pub(crate) fn run(mut self, tps: f64) -> H {
        let frame_duration = Duration::from_secs_f64(1.0 / tps);

        loop {
            let frame_start = Instant::now();

            if let TickControl::Exit = self.tick() {
                info!(target: "core", "Core loop exiting");
                break;
            }

            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                thread::sleep(frame_duration - elapsed);
            }
        }

        self.host
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

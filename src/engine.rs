//=========================================================================
// Ember Console
//
// Main entry point and coordinator for the console.
//
// Architecture:
// ```text
//     ConsoleBuilder ──build()──> Console ──run(cartridge, host)──>
//         │                         │
//         ├─ with_tps()             ├─ spawns one watcher per entry
//         └─ with_poll_interval()   ├─ spawns the core loop thread
//                                   ├─ runs the platform event loop
//                                   └─ joins everything on exit
// ```
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::sync::Arc;
use std::thread;
use std::time::Duration;

//=== External Crates =====================================================

use crossbeam_channel::{bounded, unbounded};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::input::InputSystem;
use crate::core::resource::{FileSource, ResourceCollector, ResourceWatcher};
use crate::core::{CoreLoop, ScriptHost};
use crate::manifest::Cartridge;
use crate::platform::Platform;

//=== ConsoleBuilder ======================================================

/// Builder for configuring and constructing a [`Console`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (logic ticks per second)
/// - **Poll interval**: 250 ms (resource watcher cadence)
///
/// # Examples
///
/// ```no_run
/// use ember_console::ConsoleBuilder;
///
/// let console = ConsoleBuilder::new()
///     .with_tps(30.0)
///     .with_poll_interval(std::time::Duration::from_millis(500))
///     .build();
/// ```
pub struct ConsoleBuilder {
    tps: f64,
    poll_interval: Duration,
}

impl ConsoleBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            poll_interval: Duration::from_millis(250),
        }
    }

    /// Sets the logic tick rate.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets how often each resource watcher probes its file.
    ///
    /// Lower values reload faster at the cost of more metadata calls.
    ///
    /// # Panics
    ///
    /// Panics if the interval is zero.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        assert!(!interval.is_zero(), "Poll interval must be non-zero");
        self.poll_interval = interval;
        self
    }

    /// Builds the console.
    pub fn build(self) -> Console {
        info!(
            "Building console (TPS: {}, poll: {:?})",
            self.tps, self.poll_interval
        );
        Console {
            tps: self.tps,
            poll_interval: self.poll_interval,
        }
    }
}

impl Default for ConsoleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Console =============================================================

/// The console runtime.
///
/// # Architecture
///
/// ```text
/// Console (Main Thread)
///   ├─► CoreLoop (Logic Thread @ TPS)
///   │     └─► InputSystem publish, resource pump, host frame
///   ├─► watcher threads (one per cartridge entry)
///   │     └─► ResourceCollector → ordered resource channel
///   └─► Platform (Winit event loop, blocks here)
/// ```
///
/// # Examples
///
/// ```no_run
/// use ember_console::prelude::*;
///
/// struct Runtime;
/// impl ScriptHost for Runtime {
///     fn install_resource(&mut self, _update: ResourceUpdate) { /* compile / bind */ }
///     fn resource_failed(&mut self, _failure: ResourceFailure) { /* report */ }
///     fn frame(&mut self, ctrl: Ctrl<'_>) {
///         if ctrl.key(1) { /* up was just pressed */ }
///     }
/// }
///
/// let cartridge = Cartridge::load("cart.json").expect("manifest");
/// ConsoleBuilder::new().build().run(cartridge, Runtime);
/// ```
pub struct Console {
    tps: f64,
    poll_interval: Duration,
}

impl Console {
    /// Runs the console until the window closes.
    ///
    /// # Lifecycle
    ///
    /// 1. Spawns one watcher thread per cartridge entry
    /// 2. Spawns the logic thread at the configured TPS
    /// 3. Runs the platform event loop (blocks here)
    /// 4. On window close: control channel signals the logic thread,
    ///    watcher shutdown is signalled, every thread is joined
    ///
    /// No queued event, pooled object, or worker thread outlives this
    /// call.
    pub fn run<H>(self, cartridge: Cartridge, host: H)
    where
        H: ScriptHost + 'static,
    {
        info!(
            "Starting console '{}' (TPS: {}, {} watched resources)",
            cartridge.name,
            self.tps,
            cartridge.entries().count()
        );

        //--- 1. Channels --------------------------------------------------
        let (resource_tx, resource_rx) = unbounded();
        let (control_tx, control_rx) = unbounded();
        let (watcher_stop_tx, watcher_stop_rx) = bounded::<()>(0);

        //--- 2. Resource pipeline -----------------------------------------
        let collector = Arc::new(ResourceCollector::new(resource_tx));
        let watchers: Vec<_> = cartridge
            .entries()
            .map(|entry| {
                ResourceWatcher::spawn(
                    entry.name.clone(),
                    entry.kind,
                    entry.slot,
                    FileSource::new(&entry.path),
                    Arc::clone(&collector),
                    self.poll_interval,
                    watcher_stop_rx.clone(),
                )
            })
            .collect();
        info!("{} watcher threads spawned", watchers.len());

        //--- 3. Core loop -------------------------------------------------
        let input = InputSystem::new(cartridge.input.event_pool_capacity);
        let input_handle = input.handle();

        let core = CoreLoop::new(input, resource_rx, control_rx, host);
        let tps = self.tps;
        let core_handle = thread::spawn(move || {
            core.run(tps);
        });
        info!("Core logic thread spawned");

        //--- 4. Platform (blocks until the window closes) -----------------
        let platform = Platform::new(cartridge.name.clone(), input_handle, control_tx);
        if let Err(e) = platform.run() {
            error!("Platform error: {}", e);
        }
        info!("Platform event loop exited");

        //--- 5. Shutdown --------------------------------------------------
        if core_handle.join().is_err() {
            error!("Core thread panicked");
        }

        drop(watcher_stop_tx);
        for watcher in watchers {
            if watcher.join().is_err() {
                error!("Watcher thread panicked");
            }
        }

        info!("Console shutdown complete");
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

//=========================================================================
// Resource Change Watcher
//=========================================================================
//
// One polling worker per watched resource.
//
// Architecture:
//   tick(poll_interval) ─┐
//   shutdown channel  ───┴─ select! → poll step → collector.emit / fail
//
// A watcher announces a resource once as soon as it exists, then again
// after every actual modification. Between observations nothing is
// re-emitted. Watchers know nothing about each other; ordering is the
// collector's job.
//
// Cancellation follows the engine's channel idiom: a shutdown signal or
// a disconnected shutdown channel both end the worker.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};

//=== External Crates =====================================================

use crossbeam_channel::{select, tick, Receiver};
use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::collector::ResourceCollector;
use super::kind::ResourceKind;

//=== WatchedSource =======================================================

/// Pollable resource handle.
///
/// `exists` and `was_modified` are cheap probes; `read` is the only
/// blocking operation a watcher performs besides waiting for its tick.
pub trait WatchedSource {
    fn exists(&self) -> bool;

    /// Whether the content changed since the last successful `read`.
    fn was_modified(&mut self) -> io::Result<bool>;

    fn read(&mut self) -> io::Result<Vec<u8>>;
}

//=== FileSource ==========================================================

/// File-backed source using modification-time comparison.
pub struct FileSource {
    path: PathBuf,

    /// Modification time observed by the last successful `read`.
    last_read: Option<SystemTime>,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_read: None,
        }
    }

    fn current_mtime(&self) -> io::Result<SystemTime> {
        std::fs::metadata(&self.path)?.modified()
    }
}

impl WatchedSource for FileSource {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn was_modified(&mut self) -> io::Result<bool> {
        match self.current_mtime() {
            Ok(mtime) => Ok(self.last_read != Some(mtime)),
            // A vanished file reads as unchanged; its return with a new
            // mtime will flag.
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(error) => Err(error),
        }
    }

    fn read(&mut self) -> io::Result<Vec<u8>> {
        // Stamp before reading so a write racing the read re-triggers on
        // the next poll instead of being lost.
        let mtime = self.current_mtime()?;
        let data = std::fs::read(&self.path)?;
        self.last_read = Some(mtime);
        Ok(data)
    }
}

//=== ResourceWatcher =====================================================

/// Spawner for per-resource polling workers.
pub struct ResourceWatcher;

impl ResourceWatcher {
    /// Spawns the polling worker for one resource.
    ///
    /// The worker emits through `collector` until `shutdown` is signalled
    /// or dropped, then exits. Read failures are reported and polling
    /// continues; they never end the worker.
    pub fn spawn<S>(
        name: String,
        kind: ResourceKind,
        slot: usize,
        mut source: S,
        collector: Arc<ResourceCollector>,
        poll_interval: Duration,
        shutdown: Receiver<()>,
    ) -> thread::JoinHandle<()>
    where
        S: WatchedSource + Send + 'static,
    {
        thread::spawn(move || {
            debug!(
                target: "resource::watcher",
                "Watching '{}' ({:?}, slot {}) every {:?}",
                name, kind, slot, poll_interval
            );

            let ticker = tick(poll_interval);
            let mut announced = false;

            // First probe happens immediately, not one interval in.
            Self::poll_step(&name, kind, slot, &mut source, &collector, &mut announced);

            loop {
                select! {
                    recv(shutdown) -> _ => break,
                    recv(ticker) -> _ => {
                        Self::poll_step(&name, kind, slot, &mut source, &collector, &mut announced);
                    }
                }
            }

            debug!(target: "resource::watcher", "Watcher for '{}' stopped", name);
        })
    }

    /// One poll: announce on first existence, then on each modification.
    fn poll_step<S: WatchedSource>(
        name: &str,
        kind: ResourceKind,
        slot: usize,
        source: &mut S,
        collector: &ResourceCollector,
        announced: &mut bool,
    ) {
        if !*announced {
            if !source.exists() {
                return;
            }
            match source.read() {
                Ok(data) => {
                    trace!(target: "resource::watcher", "'{}' found, announcing", name);
                    collector.emit(name, kind, slot, data);
                    *announced = true;
                }
                Err(error) => collector.fail(name, kind, slot, error.to_string()),
            }
            return;
        }

        match source.was_modified() {
            Ok(false) => {}
            Ok(true) => match source.read() {
                Ok(data) => {
                    trace!(target: "resource::watcher", "'{}' changed, announcing", name);
                    collector.emit(name, kind, slot, data);
                }
                Err(error) => collector.fail(name, kind, slot, error.to_string()),
            },
            Err(error) => {
                // Transient probe failure; the next tick retries.
                debug!(
                    target: "resource::watcher",
                    "Probe for '{}' failed: {}", name, error
                );
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

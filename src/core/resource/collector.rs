//=========================================================================
// Resource Ordering Collector
//=========================================================================
//
// Turns the unordered stream of watcher signals into a deterministic
// delivery sequence and distinguishes first-load from reload.
//
// Ordering rule: a slot's scripts are held back until boot, engine, and
// game code have all arrived once, then flushed in that order. After a
// slot's first flush its downstream state is initialized, so later script
// changes are forwarded immediately and individually. Data kinds (sprite
// sheets, levels, sounds) carry no ordering and bypass the buffer.
//
// Watcher threads call `emit`/`fail` concurrently; one mutex makes the
// collector the single cross-watcher synchronization point.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::collections::HashMap;
use std::sync::Mutex;

//=== External Crates =====================================================

use crossbeam_channel::Sender;
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::kind::{ResourceKind, SCRIPT_FLUSH_ORDER};
use super::{GameResource, ResourceEvent, ResourceFailure, ResourceUpdate};

//=== Collector State =====================================================

/// Identity key for version tracking.
type ResourceKey = (ResourceKind, usize, String);

/// A script buffered while its slot waits for the full triple.
struct PendingScript {
    name: String,
    data: Vec<u8>,
}

#[derive(Default)]
struct SlotState {
    /// True once the slot's first ordered triple has gone out.
    flushed: bool,

    /// Buffered scripts, indexed by script rank (boot, engine, game).
    pending: [Option<PendingScript>; 3],
}

#[derive(Default)]
struct CollectorState {
    /// Highest version delivered downstream per (kind, slot, name).
    versions: HashMap<ResourceKey, u32>,

    slots: HashMap<usize, SlotState>,
}

//=== ResourceCollector ===================================================

/// Single synchronization point between watcher threads and the
/// consumer.
///
/// Versions and the reload flag are assigned at delivery time: a signal
/// that overwrites a still-buffered script consumes no version, so the
/// consumer always sees version 1 with `reload == false` first and a
/// strictly increasing reload sequence after.
pub struct ResourceCollector {
    out: Sender<ResourceEvent>,
    state: Mutex<CollectorState>,
}

impl ResourceCollector {
    pub fn new(out: Sender<ResourceEvent>) -> Self {
        Self {
            out,
            state: Mutex::new(CollectorState::default()),
        }
    }

    //--- emit() -----------------------------------------------------------

    /// Accepts one change signal from a watcher.
    ///
    /// Data kinds and post-flush scripts are delivered immediately;
    /// pre-flush scripts are buffered until the slot's triple completes.
    /// Callable from any watcher thread.
    pub fn emit(&self, name: &str, kind: ResourceKind, slot: usize, data: Vec<u8>) {
        let mut state = self.lock();

        let rank = match kind.script_rank() {
            Some(rank) => rank,
            None => {
                // No ordering for data kinds.
                self.deliver(&mut state, name.to_owned(), kind, slot, data);
                return;
            }
        };

        let slot_state = state.slots.entry(slot).or_default();
        if slot_state.flushed {
            self.deliver(&mut state, name.to_owned(), kind, slot, data);
            return;
        }

        if slot_state.pending[rank].is_some() {
            debug!(
                target: "resource::collector",
                "Slot {} {:?} changed again before first flush, keeping newest",
                slot, kind
            );
        }
        slot_state.pending[rank] = Some(PendingScript {
            name: name.to_owned(),
            data,
        });

        if slot_state.pending.iter().all(Option::is_some) {
            self.flush_slot(&mut state, slot);
        }
    }

    //--- fail() -----------------------------------------------------------

    /// Reports a read failure for one resource.
    ///
    /// Forwarded immediately; failures carry no content and take part in
    /// no ordering.
    pub fn fail(&self, name: &str, kind: ResourceKind, slot: usize, reason: String) {
        warn!(
            target: "resource::collector",
            "Resource '{}' ({:?}, slot {}) failed: {}",
            name, kind, slot, reason
        );
        self.send(ResourceEvent::Failed(ResourceFailure {
            name: name.to_owned(),
            kind,
            slot,
            reason,
        }));
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends a slot's buffered triple downstream in canonical order.
    fn flush_slot(&self, state: &mut CollectorState, slot: usize) {
        info!(target: "resource::collector", "Slot {} complete, flushing scripts", slot);

        let mut taken: Vec<(ResourceKind, PendingScript)> = Vec::with_capacity(3);
        {
            let slot_state = state
                .slots
                .get_mut(&slot)
                .expect("flush_slot called for untracked slot");
            slot_state.flushed = true;

            for (rank, kind) in SCRIPT_FLUSH_ORDER.iter().enumerate() {
                let pending = slot_state.pending[rank]
                    .take()
                    .expect("flush_slot called before the slot triple completed");
                taken.push((*kind, pending));
            }
        }

        for (kind, pending) in taken {
            self.deliver(state, pending.name, kind, slot, pending.data);
        }
    }

    /// Assigns version/reload and sends one update downstream.
    fn deliver(
        &self,
        state: &mut CollectorState,
        name: String,
        kind: ResourceKind,
        slot: usize,
        data: Vec<u8>,
    ) {
        let version = state
            .versions
            .entry((kind, slot, name.clone()))
            .and_modify(|v| *v += 1)
            .or_insert(1);
        let version = *version;

        self.send(ResourceEvent::Changed(ResourceUpdate {
            resource: GameResource {
                name,
                kind,
                slot,
                version,
                reload: version > 1,
            },
            data,
        }));
    }

    fn send(&self, event: ResourceEvent) {
        // A closed receiver only happens during shutdown; drop silently.
        if self.out.send(event).is_err() {
            debug!(target: "resource::collector", "Consumer gone, dropping event");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CollectorState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{unbounded, Receiver};
    use std::sync::Arc;
    use std::thread;

    //--- Test Helpers -----------------------------------------------------

    fn collector() -> (ResourceCollector, Receiver<ResourceEvent>) {
        let (tx, rx) = unbounded();
        (ResourceCollector::new(tx), rx)
    }

    fn drain(rx: &Receiver<ResourceEvent>) -> Vec<ResourceEvent> {
        rx.try_iter().collect()
    }

    fn changed(event: &ResourceEvent) -> &GameResource {
        match event {
            ResourceEvent::Changed(update) => &update.resource,
            other => panic!("Expected Changed, got {:?}", other),
        }
    }

    //=====================================================================
    // Ordering Tests
    //=====================================================================

    /// Arrival order game → engine → boot still delivers boot → engine
    /// → game.
    #[test]
    fn slot_flushes_in_canonical_order() {
        let (collector, rx) = collector();

        collector.emit("game", ResourceKind::GameScript, 0, b"g".to_vec());
        assert!(drain(&rx).is_empty(), "Incomplete slot must not deliver");

        collector.emit("engine", ResourceKind::EngineScript, 0, b"e".to_vec());
        assert!(drain(&rx).is_empty());

        collector.emit("boot", ResourceKind::BootScript, 0, b"b".to_vec());
        let events = drain(&rx);

        let kinds: Vec<_> = events.iter().map(|e| changed(e).kind).collect();
        assert_eq!(kinds, SCRIPT_FLUSH_ORDER.to_vec());
        assert!(events.iter().all(|e| !changed(e).reload));
        assert!(events.iter().all(|e| changed(e).version == 1));
    }

    #[test]
    fn data_kinds_bypass_buffering() {
        let (collector, rx) = collector();

        collector.emit("sheet", ResourceKind::SpriteSheet, 0, b"png".to_vec());

        let events = drain(&rx);
        assert_eq!(events.len(), 1);
        assert_eq!(changed(&events[0]).kind, ResourceKind::SpriteSheet);
        assert!(!changed(&events[0]).reload);
    }

    /// After the first flush, each script change is forwarded alone, in
    /// arrival order, with no re-buffering.
    #[test]
    fn post_flush_reloads_forward_immediately() {
        let (collector, rx) = collector();

        collector.emit("boot", ResourceKind::BootScript, 0, b"b".to_vec());
        collector.emit("engine", ResourceKind::EngineScript, 0, b"e".to_vec());
        collector.emit("game", ResourceKind::GameScript, 0, b"g".to_vec());
        drain(&rx);

        collector.emit("game", ResourceKind::GameScript, 0, b"g2".to_vec());
        let events = drain(&rx);
        assert_eq!(events.len(), 1);
        let resource = changed(&events[0]);
        assert_eq!(resource.kind, ResourceKind::GameScript);
        assert!(resource.reload);
        assert_eq!(resource.version, 2);

        // A boot reload does not wait for anything either.
        collector.emit("boot", ResourceKind::BootScript, 0, b"b2".to_vec());
        let events = drain(&rx);
        assert_eq!(events.len(), 1);
        assert_eq!(changed(&events[0]).kind, ResourceKind::BootScript);
        assert!(changed(&events[0]).reload);
    }

    //=====================================================================
    // Version / Reload Tests
    //=====================================================================

    #[test]
    fn versions_increase_and_reload_flips_once() {
        let (collector, rx) = collector();

        for round in 1..=3 {
            collector.emit("level-1", ResourceKind::Level, 0, vec![round]);
        }

        let events = drain(&rx);
        let versions: Vec<_> = events.iter().map(|e| changed(e).version).collect();
        let reloads: Vec<_> = events.iter().map(|e| changed(e).reload).collect();
        assert_eq!(versions, vec![1, 2, 3]);
        assert_eq!(reloads, vec![false, true, true]);
    }

    #[test]
    fn slots_do_not_cross_contaminate() {
        let (collector, rx) = collector();

        collector.emit("level-a", ResourceKind::Level, 0, b"a".to_vec());
        collector.emit("level-a", ResourceKind::Level, 0, b"a2".to_vec());
        collector.emit("level-b", ResourceKind::Level, 1, b"b".to_vec());

        let events = drain(&rx);
        assert_eq!(changed(&events[1]).reload, true);
        // A fresh slot starts over: version 1, first load.
        assert_eq!(changed(&events[2]).slot, 1);
        assert_eq!(changed(&events[2]).version, 1);
        assert!(!changed(&events[2]).reload);
    }

    /// A script that changes again while its slot is still incomplete
    /// keeps the newest bytes but is still a first load when it finally
    /// flushes.
    #[test]
    fn pre_flush_overwrite_consumes_no_version() {
        let (collector, rx) = collector();

        collector.emit("boot", ResourceKind::BootScript, 0, b"old".to_vec());
        collector.emit("boot", ResourceKind::BootScript, 0, b"new".to_vec());
        collector.emit("engine", ResourceKind::EngineScript, 0, b"e".to_vec());
        collector.emit("game", ResourceKind::GameScript, 0, b"g".to_vec());

        let events = drain(&rx);
        assert_eq!(events.len(), 3);

        let boot = match &events[0] {
            ResourceEvent::Changed(update) => update,
            other => panic!("Expected Changed, got {:?}", other),
        };
        assert_eq!(boot.resource.version, 1);
        assert!(!boot.resource.reload);
        assert_eq!(boot.data, b"new".to_vec());
    }

    //=====================================================================
    // Failure Tests
    //=====================================================================

    #[test]
    fn failures_pass_through_without_ordering() {
        let (collector, rx) = collector();

        collector.emit("boot", ResourceKind::BootScript, 0, b"b".to_vec());
        collector.fail("engine", ResourceKind::EngineScript, 0, "gone".into());

        let events = drain(&rx);
        assert_eq!(events.len(), 1);
        match &events[0] {
            ResourceEvent::Failed(failure) => {
                assert_eq!(failure.name, "engine");
                assert_eq!(failure.reason, "gone");
            }
            other => panic!("Expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn send_after_consumer_drop_does_not_panic() {
        let (collector, rx) = collector();
        drop(rx);

        collector.emit("sheet", ResourceKind::SpriteSheet, 0, vec![]);
        collector.fail("sheet", ResourceKind::SpriteSheet, 0, "x".into());
    }

    //=====================================================================
    // Concurrency Tests
    //=====================================================================

    /// Concurrent emits from watcher threads still produce exactly one
    /// ordered triple per slot.
    #[test]
    fn concurrent_emits_keep_slot_order() {
        let _ = env_logger::builder().is_test(true).try_init();

        let (tx, rx) = unbounded();
        let collector = Arc::new(ResourceCollector::new(tx));

        let emits = [
            ("game", ResourceKind::GameScript),
            ("boot", ResourceKind::BootScript),
            ("engine", ResourceKind::EngineScript),
        ];

        let handles: Vec<_> = emits
            .into_iter()
            .map(|(name, kind)| {
                let collector = Arc::clone(&collector);
                thread::spawn(move || collector.emit(name, kind, 0, vec![]))
            })
            .collect();
        for handle in handles {
            handle.join().expect("emit thread panicked");
        }

        let events = drain(&rx);
        let kinds: Vec<_> = events.iter().map(|e| changed(e).kind).collect();
        assert_eq!(kinds, SCRIPT_FLUSH_ORDER.to_vec());
    }
}

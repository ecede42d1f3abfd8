//=========================================================================
// Resource Pipeline
//
// Watches cartridge files and delivers their changes to the script
// runtime in a deterministic, dependency-respecting order.
//
// Architecture:
// ```text
//  one watcher thread per resource          logic thread
//  ┌──────────────────────────┐
//  │ FileSource poll loop     │──emit──┐
//  └──────────────────────────┘        │
//  ┌──────────────────────────┐        ▼
//  │ FileSource poll loop     │──► ResourceCollector ──► Receiver<ResourceEvent>
//  └──────────────────────────┘   (orders scripts,        (drained each tick)
//                                  tags reloads)
// ```
//
// Watchers are mutually unordered; the collector is the single point
// that imposes order and the only cross-watcher synchronization.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod collector;
pub mod kind;
pub mod watcher;

pub use collector::ResourceCollector;
pub use kind::{ResourceKind, SCRIPT_FLUSH_ORDER};
pub use watcher::{FileSource, ResourceWatcher, WatchedSource};

//=== GameResource ========================================================

/// Identity and delivery metadata for one resource change.
///
/// `slot` groups resources that logically replace one another (the Nth
/// script, the Nth sprite sheet). `version` starts at 1 and increases by
/// one for every delivery of the same (kind, slot, name); `reload` is
/// false exactly once, on the first delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResource {
    pub name: String,
    pub kind: ResourceKind,
    pub slot: usize,
    pub version: u32,
    pub reload: bool,
}

//=== ResourceUpdate ======================================================

/// A delivered change: identity plus the bytes the watcher read.
///
/// Decoding the bytes (script compilation, image decode) is the
/// consumer's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceUpdate {
    pub resource: GameResource,
    pub data: Vec<u8>,
}

//=== ResourceFailure =====================================================

/// A read that went wrong for one resource.
///
/// Failures are scoped: the owning watcher keeps polling and sibling
/// resources are unaffected. The consumer decides whether to keep the
/// previous version running or surface the error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFailure {
    pub name: String,
    pub kind: ResourceKind,
    pub slot: usize,
    pub reason: String,
}

//=== ResourceEvent =======================================================

/// What the collector's consumer receives, already ordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceEvent {
    Changed(ResourceUpdate),
    Failed(ResourceFailure),
}

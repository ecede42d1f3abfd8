//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use ember_console::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Console facade
pub use crate::engine::{Console, ConsoleBuilder};

// Script runtime seam
pub use crate::core::{Ctrl, ScriptHost};

// Input system
pub use crate::core::input::{InputHandle, InputSystem, KeyCode, TouchPhase, TouchSignal};

// Resource pipeline
pub use crate::core::resource::{
    FileSource, GameResource, ResourceCollector, ResourceEvent, ResourceFailure, ResourceKind,
    ResourceUpdate, ResourceWatcher, WatchedSource,
};

// Cartridge manifest
pub use crate::manifest::{Cartridge, ManifestError};

//=========================================================================
// Resource Kinds
//=========================================================================
//
// The closed set of things a cartridge can ship, and the scheduling
// order for script code.
//
// The script runtime must have boot-level and engine-level code
// installed before any game-authored code for the same slot runs. That
// order lives in an explicit rank table here, not in the enum layout, so
// reordering variants can never silently change scheduling.
//
//=========================================================================

//=== External Crates =====================================================

use serde::{Deserialize, Serialize};

//=== ResourceKind ========================================================

/// What a watched resource contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Console boot code; installed first for its slot.
    BootScript,

    /// Engine-level script library; installed after boot code.
    EngineScript,

    /// Game-authored code; installed last for its slot.
    GameScript,

    /// Sprite sheet image data.
    SpriteSheet,

    /// Level / map data.
    Level,

    /// Audio waveform or pattern data.
    Sound,
}

/// The canonical installation order for one slot's scripts.
pub const SCRIPT_FLUSH_ORDER: [ResourceKind; 3] = [
    ResourceKind::BootScript,
    ResourceKind::EngineScript,
    ResourceKind::GameScript,
];

impl ResourceKind {
    /// Rank of a script kind in the installation order, or `None` for
    /// data kinds, which carry no ordering at all.
    pub fn script_rank(self) -> Option<usize> {
        match self {
            ResourceKind::BootScript => Some(0),
            ResourceKind::EngineScript => Some(1),
            ResourceKind::GameScript => Some(2),
            ResourceKind::SpriteSheet | ResourceKind::Level | ResourceKind::Sound => None,
        }
    }

    /// Returns `true` for the three script kinds.
    pub fn is_script(self) -> bool {
        self.script_rank().is_some()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

//=========================================================================
// Cartridge Manifest
//=========================================================================
//
// JSON description of a cartridge: which script and asset files the
// console watches, and input tuning.
//
// ```json
// {
//   "name": "demo-cart",
//   "scripts": [
//     { "name": "boot",   "kind": "boot_script",   "slot": 0, "path": "boot.lua" },
//     { "name": "engine", "kind": "engine_script", "slot": 0, "path": "engine.lua" },
//     { "name": "main",   "kind": "game_script",   "slot": 0, "path": "main.lua" }
//   ],
//   "assets": [
//     { "name": "tiles", "kind": "sprite_sheet", "slot": 0, "path": "tiles.png" }
//   ],
//   "input": { "event_pool_capacity": 64 }
// }
// ```
//
// Everything a bad manifest can do wrong is caught here, before any
// thread spawns.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

//=== External Crates =====================================================

use serde::Deserialize;

//=== Internal Dependencies ===============================================

use crate::core::resource::ResourceKind;

//=== ManifestError =======================================================

/// Everything that can go wrong loading a cartridge manifest.
#[derive(Debug)]
pub enum ManifestError {
    /// The manifest file could not be read.
    Io(io::Error),

    /// The manifest is not valid JSON for the expected shape.
    Parse(serde_json::Error),

    /// The manifest parsed but describes an unusable cartridge.
    Invalid(String),
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Failed to read manifest: {}", e),
            Self::Parse(e) => write!(f, "Failed to parse manifest: {}", e),
            Self::Invalid(reason) => write!(f, "Invalid manifest: {}", reason),
        }
    }
}

impl std::error::Error for ManifestError {}

impl From<io::Error> for ManifestError {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<serde_json::Error> for ManifestError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse(error)
    }
}

//=== ResourceEntry =======================================================

/// One watched file in the cartridge.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceEntry {
    pub name: String,
    pub kind: ResourceKind,
    pub slot: usize,
    pub path: PathBuf,
}

//=== InputTuning =========================================================

/// Input subsystem knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct InputTuning {
    /// Refill batch size of the input event pool.
    #[serde(default = "default_event_pool_capacity")]
    pub event_pool_capacity: usize,
}

fn default_event_pool_capacity() -> usize {
    64
}

impl Default for InputTuning {
    fn default() -> Self {
        Self {
            event_pool_capacity: default_event_pool_capacity(),
        }
    }
}

//=== Cartridge ===========================================================

/// Validated cartridge description.
#[derive(Debug, Clone, Deserialize)]
pub struct Cartridge {
    pub name: String,

    #[serde(default)]
    pub scripts: Vec<ResourceEntry>,

    #[serde(default)]
    pub assets: Vec<ResourceEntry>,

    #[serde(default)]
    pub input: InputTuning,
}

impl Cartridge {
    /// Loads and validates a manifest file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parses and validates manifest text.
    pub fn from_json(text: &str) -> Result<Self, ManifestError> {
        let cartridge: Cartridge = serde_json::from_str(text)?;
        cartridge.validate()?;
        Ok(cartridge)
    }

    /// All watched entries, scripts first.
    pub fn entries(&self) -> impl Iterator<Item = &ResourceEntry> {
        self.scripts.iter().chain(self.assets.iter())
    }

    //--- Validation -------------------------------------------------------

    fn validate(&self) -> Result<(), ManifestError> {
        if self.name.is_empty() {
            return Err(ManifestError::Invalid("cartridge name is empty".into()));
        }

        if self.input.event_pool_capacity == 0 {
            return Err(ManifestError::Invalid(
                "input.event_pool_capacity must be at least 1".into(),
            ));
        }

        let mut script_keys = HashSet::new();
        for entry in &self.scripts {
            if !entry.kind.is_script() {
                return Err(ManifestError::Invalid(format!(
                    "'{}' is listed under scripts but has data kind {:?}",
                    entry.name, entry.kind
                )));
            }
            if !script_keys.insert((entry.kind, entry.slot)) {
                return Err(ManifestError::Invalid(format!(
                    "duplicate script entry for {:?} slot {}",
                    entry.kind, entry.slot
                )));
            }
        }

        for entry in &self.assets {
            if entry.kind.is_script() {
                return Err(ManifestError::Invalid(format!(
                    "'{}' is listed under assets but has script kind {:?}",
                    entry.name, entry.kind
                )));
            }
        }

        for entry in self.entries() {
            if entry.name.is_empty() {
                return Err(ManifestError::Invalid(format!(
                    "entry with path {:?} has an empty name",
                    entry.path
                )));
            }
        }

        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &str = r#"{
        "name": "demo-cart",
        "scripts": [
            { "name": "boot",   "kind": "boot_script",   "slot": 0, "path": "boot.lua" },
            { "name": "engine", "kind": "engine_script", "slot": 0, "path": "engine.lua" },
            { "name": "main",   "kind": "game_script",   "slot": 0, "path": "main.lua" }
        ],
        "assets": [
            { "name": "tiles", "kind": "sprite_sheet", "slot": 0, "path": "tiles.png" }
        ]
    }"#;

    #[test]
    fn parses_a_complete_manifest() {
        let cartridge = Cartridge::from_json(GOOD).expect("parse");
        assert_eq!(cartridge.name, "demo-cart");
        assert_eq!(cartridge.scripts.len(), 3);
        assert_eq!(cartridge.assets.len(), 1);
        assert_eq!(cartridge.input.event_pool_capacity, 64);
        assert_eq!(cartridge.entries().count(), 4);
    }

    #[test]
    fn defaults_apply_when_sections_are_missing() {
        let cartridge = Cartridge::from_json(r#"{ "name": "bare" }"#).expect("parse");
        assert!(cartridge.scripts.is_empty());
        assert!(cartridge.assets.is_empty());
        assert_eq!(cartridge.input.event_pool_capacity, 64);
    }

    #[test]
    fn rejects_zero_pool_capacity() {
        let text = r#"{ "name": "c", "input": { "event_pool_capacity": 0 } }"#;
        match Cartridge::from_json(text) {
            Err(ManifestError::Invalid(reason)) => {
                assert!(reason.contains("event_pool_capacity"));
            }
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn rejects_duplicate_script_slots() {
        let text = r#"{
            "name": "c",
            "scripts": [
                { "name": "a", "kind": "game_script", "slot": 0, "path": "a.lua" },
                { "name": "b", "kind": "game_script", "slot": 0, "path": "b.lua" }
            ]
        }"#;
        assert!(matches!(
            Cartridge::from_json(text),
            Err(ManifestError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_data_kind_under_scripts() {
        let text = r#"{
            "name": "c",
            "scripts": [
                { "name": "tiles", "kind": "sprite_sheet", "slot": 0, "path": "t.png" }
            ]
        }"#;
        assert!(matches!(
            Cartridge::from_json(text),
            Err(ManifestError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_script_kind_under_assets() {
        let text = r#"{
            "name": "c",
            "assets": [
                { "name": "boot", "kind": "boot_script", "slot": 0, "path": "b.lua" }
            ]
        }"#;
        assert!(matches!(
            Cartridge::from_json(text),
            Err(ManifestError::Invalid(_))
        ));
    }

    #[test]
    fn malformed_json_reports_parse_error() {
        assert!(matches!(
            Cartridge::from_json("{ not json"),
            Err(ManifestError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_reports_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = Cartridge::load(dir.path().join("absent.json"));
        assert!(matches!(result, Err(ManifestError::Io(_))));
    }

    #[test]
    fn load_round_trips_through_a_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cart.json");
        std::fs::write(&path, GOOD).expect("write");

        let cartridge = Cartridge::load(&path).expect("load");
        assert_eq!(cartridge.name, "demo-cart");
    }
}

//=========================================================================
// Ember Console — Library Root
//
// This crate defines the public API surface of the Ember Console.
//
// Responsibilities:
// - Expose the console facade (`Console`, `ConsoleBuilder`)
// - Expose the core systems the embedding script runtime talks to
//   (`ScriptHost`, `Ctrl`, the resource pipeline types)
// - Keep OS integration (`platform`) hidden from end users
//
// Typical usage:
// ```no_run
// use ember_console::prelude::*;
//
// # struct Runtime;
// # impl ScriptHost for Runtime {
// #     fn install_resource(&mut self, _: ResourceUpdate) {}
// #     fn resource_failed(&mut self, _: ResourceFailure) {}
// #     fn frame(&mut self, _: Ctrl<'_>) {}
// # }
// let cartridge = Cartridge::load("cart.json").expect("manifest");
// ConsoleBuilder::new().build().run(cartridge, Runtime);
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the engine systems (input, resource pipeline, the script
// bridge). `manifest` loads cartridge descriptions. Both are public for
// embedders that drive the pieces directly.
//
pub mod core;
pub mod manifest;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` wraps Winit and is not part of the API surface; `engine`
// provides the facade re-exported below.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Console, ConsoleBuilder};

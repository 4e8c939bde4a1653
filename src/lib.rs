//=========================================================================
// Aetheric Screens — Library Root
//
// A stack of game screens (menus, popups, loading gates, gameplay) driven
// on a dedicated frame thread.
//
// Responsibilities:
// - Expose the engine facade (`EngineBuilder`, `Engine`, `EngineHandle`)
// - Expose the screen stack, input snapshot and render seam under `core`
// - Ship ready-made screens and the sample menu flow under `screens`
//
// Typical usage:
// ```no_run
// use aetheric_screens::prelude::*;
// use aetheric_screens::screens::menus;
//
// let handle = EngineBuilder::new()
//     .build()
//     .init(|manager| {
//         manager.push(BackgroundScreen::new(), None);
//         manager.push(menus::main_menu(), None);
//     })
//     .spawn(DrawList::default())
//     .expect("frame thread");
// handle.shutdown().expect("clean shutdown");
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the screen stack and its seams (input, rendering, flags,
// errors). Hosts that drive frames themselves use `ScreenManager`
// directly instead of the engine facade.
//
pub mod core;
pub mod prelude;
pub mod screens;

//--- Internal Modules ----------------------------------------------------
//
// `engine` defines the builder and the thread-owning runtime handle.
//
mod engine;

//--- Public Exports ------------------------------------------------------
pub use engine::{Engine, EngineBuilder, EngineHandle};

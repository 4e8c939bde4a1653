//=========================================================================
// Input
//
// Input collaborator consumed by the screen stack.
//
// Responsibilities:
// - Portable input events per player slot (`event`)
// - Per-frame current/previous snapshot handed to screens (`InputState`)
// - Named key/button groups with edge or level semantics (`InputAction`)
//
// Notes:
// Raw device polling lives in the host. The frame thread only ever sees
// batches of `InputEvent`s, applied once per tick before input routing.
//
//=========================================================================

//=== Submodules ==========================================================
mod action;
pub mod event;
mod input_state;

//=== Public API ==========================================================
pub use action::{InputAction, MenuActions};
pub use event::{Button, InputEvent, KeyCode, PlayerIndex};
pub use input_state::InputState;

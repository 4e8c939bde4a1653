//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_screens::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine facade
pub use crate::engine::{Engine, EngineBuilder, EngineHandle};
pub use crate::core::HostEvent;

// Errors and session state
pub use crate::core::error::{EngineError, ScreenError, ScreenFailure};
pub use crate::core::flags::{Difficulty, SessionFlags};

// Input
pub use crate::core::input::{Button, InputAction, InputEvent, InputState, KeyCode, MenuActions, PlayerIndex};

// Rendering
pub use crate::core::render::{Color, DrawCommand, DrawList, Rect, RenderFrame, Renderer, Vec2, Viewport};

// Screen stack
pub use crate::core::screen::{
    LoadId, LoadPolicy, LoadRequest, Screen, ScreenContext, ScreenId, ScreenInfo, ScreenManager, ScreenSet,
    TransitionState,
};

// Stock screens
pub use crate::screens::{
    BackgroundScreen, ControlsScreen, GameplayScreen, MenuEntry, MenuList, MenuScreen, MessageBoxScreen,
};

//=========================================================================
// Input Actions
//=========================================================================
//
// Named groups of keys and buttons evaluated against an `InputState`.
//
// An action fires when any of its keys or buttons is pressed by the
// controlling player (or by anyone, when no player is assigned). Screens
// use the returned `PlayerIndex` to know who triggered it.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::event::{Button, KeyCode, PlayerIndex};
use super::InputState;

//=== InputAction =========================================================

/// Keys and buttons that trigger the same thing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputAction {
    keys: Vec<KeyCode>,
    buttons: Vec<Button>,
    new_press_only: bool,
}

impl InputAction {
    /// Creates an action. With `new_press_only` it fires on the frame a
    /// binding goes down; otherwise it fires every frame it is held.
    pub fn new(keys: &[KeyCode], buttons: &[Button], new_press_only: bool) -> Self {
        Self {
            keys: keys.to_vec(),
            buttons: buttons.to_vec(),
            new_press_only,
        }
    }

    /// Returns the player that triggered the action this frame, if any.
    pub fn evaluate(&self, input: &InputState, controlling: Option<PlayerIndex>) -> Option<PlayerIndex> {
        let by_key = self.keys.iter().find_map(|&key| {
            if self.new_press_only {
                input.new_key_press(key, controlling)
            } else {
                input.key_held(key, controlling)
            }
        });

        by_key.or_else(|| {
            self.buttons.iter().find_map(|&button| {
                if self.new_press_only {
                    input.new_button_press(button, controlling)
                } else {
                    input.button_held(button, controlling)
                }
            })
        })
    }
}

//=== MenuActions =========================================================

/// Standard navigation bindings shared by menus and dialogs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuActions {
    pub up: InputAction,
    pub down: InputAction,
    pub select: InputAction,
    pub cancel: InputAction,
    pub pause: InputAction,
}

impl Default for MenuActions {
    fn default() -> Self {
        Self {
            up: InputAction::new(&[KeyCode::ArrowUp, KeyCode::KeyW], &[Button::DPadUp], true),
            down: InputAction::new(&[KeyCode::ArrowDown, KeyCode::KeyS], &[Button::DPadDown], true),
            select: InputAction::new(
                &[KeyCode::Enter, KeyCode::Space],
                &[Button::A, Button::Start],
                true,
            ),
            cancel: InputAction::new(&[KeyCode::Escape, KeyCode::Backspace], &[Button::B, Button::Back], true),
            pause: InputAction::new(&[KeyCode::Escape, KeyCode::KeyP], &[Button::Start, Button::Back], true),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

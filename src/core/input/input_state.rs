//=========================================================================
// Input State
//=========================================================================
//
// Per-frame snapshot of every player's keyboard, gamepad and touch input.
//
// Architecture:
//   InputEvent → process_events() → current (per player) → query
//                                    previous (last frame)
//
// Frame lifecycle: begin_frame() → process_events() → query
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use super::event::{Button, InputEvent, KeyCode, PlayerIndex};
use crate::core::render::Vec2;

//=== PlayerInput =========================================================

/// What one player slot is holding right now.
#[derive(Debug, Clone, Default, PartialEq)]
struct PlayerInput {
    keys_down: HashSet<KeyCode>,
    buttons_down: HashSet<Button>,
    gamepad_connected: bool,
    left_stick: Vec2,
}

//=== InputState ==========================================================

/// Snapshot handed to `Screen::handle_input`.
///
/// Keeps the current and previous frame per player so screens can ask for
/// edges ("newly pressed") as well as levels ("held").
#[derive(Debug, Clone, Default)]
pub struct InputState {
    //--- Persistent State (survives frame boundary) ----------------------
    current: [PlayerInput; 4],
    gamepad_was_connected: [bool; 4],
    touches: Vec<Vec2>,

    //--- Previous Frame ---------------------------------------------------
    previous: [PlayerInput; 4],
}

impl InputState {
    /// Creates an empty snapshot: nothing held, no gamepads.
    pub fn new() -> Self {
        Self::default()
    }

    //--- Frame Processing -------------------------------------------------

    /// Rolls the current state into the previous slot.
    pub fn begin_frame(&mut self) {
        self.previous = self.current.clone();
    }

    /// Applies a batch of events to the current state.
    pub fn process_events(&mut self, events: &[InputEvent]) {
        for event in events {
            self.process_event(event);
        }
    }

    fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown { player, key } => {
                self.current[player.index()].keys_down.insert(*key);
            }

            InputEvent::KeyUp { player, key } => {
                self.current[player.index()].keys_down.remove(key);
            }

            InputEvent::ButtonDown { player, button } => {
                self.current[player.index()].buttons_down.insert(*button);
            }

            InputEvent::ButtonUp { player, button } => {
                self.current[player.index()].buttons_down.remove(button);
            }

            InputEvent::GamePadConnection { player, connected } => {
                let slot = &mut self.current[player.index()];
                slot.gamepad_connected = *connected;
                if *connected {
                    self.gamepad_was_connected[player.index()] = true;
                } else {
                    slot.buttons_down.clear();
                    slot.left_stick = Vec2::ZERO;
                }
            }

            InputEvent::LeftStick { player, x, y } => {
                self.current[player.index()].left_stick =
                    Vec2::new(x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0));
            }

            InputEvent::Touches(points) => {
                self.touches = points.iter().map(|&(x, y)| Vec2::new(x, y)).collect();
            }
        }
    }

    //=====================================================================
    // Query API - Levels
    //=====================================================================

    /// Returns `true` while `player` holds `key`.
    pub fn is_key_down(&self, key: KeyCode, player: PlayerIndex) -> bool {
        self.current[player.index()].keys_down.contains(&key)
    }

    /// Returns `true` while `player` holds `button`.
    pub fn is_button_down(&self, button: Button, player: PlayerIndex) -> bool {
        self.current[player.index()].buttons_down.contains(&button)
    }

    /// Left thumbstick position for `player`.
    pub fn left_stick(&self, player: PlayerIndex) -> Vec2 {
        self.current[player.index()].left_stick
    }

    pub fn is_gamepad_connected(&self, player: PlayerIndex) -> bool {
        self.current[player.index()].gamepad_connected
    }

    /// True when `player` had a gamepad at some point and it is gone now.
    ///
    /// Keyboard-only players never trip this.
    pub fn gamepad_disconnected(&self, player: PlayerIndex) -> bool {
        !self.is_gamepad_connected(player) && self.gamepad_was_connected[player.index()]
    }

    /// Active touch points, first finger first.
    pub fn touches(&self) -> &[Vec2] {
        &self.touches
    }

    //=====================================================================
    // Query API - Edges
    //=====================================================================

    /// Checks for a key that went down this frame.
    ///
    /// With a controlling player only that slot is checked; with `None`
    /// every slot is. Returns the slot that pressed it.
    pub fn new_key_press(
        &self,
        key: KeyCode,
        controlling: Option<PlayerIndex>,
    ) -> Option<PlayerIndex> {
        self.first_matching(controlling, |i| {
            self.current[i].keys_down.contains(&key) && !self.previous[i].keys_down.contains(&key)
        })
    }

    /// Checks for a gamepad button that went down this frame.
    pub fn new_button_press(
        &self,
        button: Button,
        controlling: Option<PlayerIndex>,
    ) -> Option<PlayerIndex> {
        self.first_matching(controlling, |i| {
            self.current[i].buttons_down.contains(&button)
                && !self.previous[i].buttons_down.contains(&button)
        })
    }

    /// Key held by the controlling player (or any player).
    pub fn key_held(&self, key: KeyCode, controlling: Option<PlayerIndex>) -> Option<PlayerIndex> {
        self.first_matching(controlling, |i| self.current[i].keys_down.contains(&key))
    }

    /// Button held by the controlling player (or any player).
    pub fn button_held(
        &self,
        button: Button,
        controlling: Option<PlayerIndex>,
    ) -> Option<PlayerIndex> {
        self.first_matching(controlling, |i| self.current[i].buttons_down.contains(&button))
    }

    //--- Internal Helpers -------------------------------------------------

    fn first_matching<F>(&self, controlling: Option<PlayerIndex>, matches: F) -> Option<PlayerIndex>
    where
        F: Fn(usize) -> bool,
    {
        match controlling {
            Some(player) => matches(player.index()).then_some(player),
            None => PlayerIndex::ALL.into_iter().find(|p| matches(p.index())),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

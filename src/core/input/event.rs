//=========================================================================
// Input Event Types
//
// Portable representation of the raw input the host feeds the screen
// stack once per frame.
//
// Responsibilities:
// - Identify the four local player slots (`PlayerIndex`)
// - Represent keyboard, gamepad and touch input in a stable way
// - Stay cheap to copy so batches can cross the host channel freely
//
// Event Flow:
// ```text
// Host polling (window, gamepad, touch)
//         ↓
//    InputEvent (this module)
//         ↓
//    InputState (per-player current/previous snapshot)
//         ↓
//    Screen::handle_input
// ```
//
//=========================================================================

//=== PlayerIndex =========================================================

/// Local player slot. Identifies which input source may drive a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlayerIndex {
    One,
    Two,
    Three,
    Four,
}

impl PlayerIndex {
    /// All slots in order.
    pub const ALL: [PlayerIndex; 4] = [Self::One, Self::Two, Self::Three, Self::Four];

    /// Zero-based slot number.
    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
            Self::Three => 2,
            Self::Four => 3,
        }
    }
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Only the keys the stock screens care about. Hosts map everything else
/// to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Arrow Keys -------------------------------------------------------
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    //--- Letters ----------------------------------------------------------
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    KeyP,

    //--- Special Keys -----------------------------------------------------
    Space,
    Enter,
    Escape,
    Backspace,
    Tab,
}

//=== Button ==============================================================

/// Gamepad button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    A,
    B,
    X,
    Y,
    Start,
    Back,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    LeftShoulder,
    RightShoulder,
}

//=== InputEvent ==========================================================

/// One raw input change for a player slot.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown { player: PlayerIndex, key: KeyCode },
    KeyUp { player: PlayerIndex, key: KeyCode },
    ButtonDown { player: PlayerIndex, button: Button },
    ButtonUp { player: PlayerIndex, button: Button },

    /// Gamepad plugged in (`true`) or pulled out (`false`).
    GamePadConnection { player: PlayerIndex, connected: bool },

    /// Left thumbstick position, each axis in `[-1, 1]`, +y up.
    LeftStick { player: PlayerIndex, x: f32, y: f32 },

    /// Full set of active touch points (screen coordinates).
    Touches(Vec<(f32, f32)>),
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_indices_are_dense() {
        for (i, player) in PlayerIndex::ALL.iter().enumerate() {
            assert_eq!(player.index(), i);
        }
    }
}

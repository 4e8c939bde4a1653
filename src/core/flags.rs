//=========================================================================
// Session Flags
//=========================================================================
//
// Process-wide switches shared by every screen.
//
// Owned by the `ScreenManager` and lent to screens through
// `ScreenContext` (mutable) and `RenderFrame` (read-only). Only the frame
// thread ever touches them, so no locking is involved.
//
// Writers:
//   start_game     start prompt (set), gameplay activation (clear)
//   pause_game     gameplay activation (set), gameplay update (clear)
//   reset_game     host (set), pause prompt (consume)
//   quit_requested main menu exit confirmation; read by the engine loop
//   difficulty     difficulty menu
//
//=========================================================================

//=== Difficulty ==========================================================

/// Hazard toggles picked in the difficulty menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Difficulty {
    pub bullet_count: u32,
    pub snake_enabled: bool,
    pub blade_enabled: bool,
}

impl Difficulty {
    /// Bullet counts the menu cycles through.
    pub const BULLET_STEPS: [u32; 3] = [5, 10, 20];

    /// Advances to the next bullet count, wrapping around.
    pub fn cycle_bullets(&mut self) {
        let next = Self::BULLET_STEPS
            .iter()
            .position(|&n| n == self.bullet_count)
            .map(|i| (i + 1) % Self::BULLET_STEPS.len())
            .unwrap_or(0);
        self.bullet_count = Self::BULLET_STEPS[next];
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            bullet_count: Self::BULLET_STEPS[0],
            snake_enabled: false,
            blade_enabled: false,
        }
    }
}

//=== SessionFlags ========================================================

/// Shared switches read and written by screens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionFlags {
    /// The player confirmed the start prompt; gameplay may run.
    pub start_game: bool,

    /// Gameplay should show its start prompt on the next update.
    pub pause_game: bool,

    /// Resuming from the pause prompt should restart the round.
    pub reset_game: bool,

    /// The application should shut down after this frame.
    pub quit_requested: bool,

    pub difficulty: Difficulty,
}

impl SessionFlags {
    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bullets_cycle_and_wrap() {
        let mut d = Difficulty::default();
        assert_eq!(d.bullet_count, 5);
        d.cycle_bullets();
        assert_eq!(d.bullet_count, 10);
        d.cycle_bullets();
        d.cycle_bullets();
        assert_eq!(d.bullet_count, 5);
    }

    #[test]
    fn unknown_bullet_count_restarts_cycle() {
        let mut d = Difficulty { bullet_count: 7, ..Difficulty::default() };
        d.cycle_bullets();
        assert_eq!(d.bullet_count, 5);
    }
}

//=========================================================================
// Screen Transition
//=========================================================================
//
// Per-screen transition state machine.
//
// States:
// ```text
//   TransitionOn ──► Active ──► TransitionOff ──► Removed   (exiting)
//        ▲                          │
//        └──────── Hidden ◄─────────┘                       (covered)
// ```
//
// Progress is normalized: 0 = fully off, 1 = fully on. Every screen
// derives its blend value from progress, whatever it draws.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== TransitionState =====================================================

/// Lifecycle state of a screen on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionState {
    /// Progress rising toward 1.
    TransitionOn,

    /// Progress pinned at 1; fully interactive.
    Active,

    /// Progress falling toward 0, either exiting or being covered.
    TransitionOff,

    /// Covered by another screen and fully faded out, but still alive.
    Hidden,

    /// Exit finished. Never updated or rendered again.
    Removed,
}

impl TransitionState {
    /// Whether a screen in this state may receive input.
    pub fn accepts_input(self) -> bool {
        matches!(self, Self::TransitionOn | Self::Active)
    }

    /// Whether a screen in this state is drawn.
    pub fn is_visible(self) -> bool {
        matches!(self, Self::TransitionOn | Self::Active | Self::TransitionOff)
    }
}

//=== Direction ===========================================================

/// Direction a transition moves progress in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    On,
    Off,
}

//=== Transition ==========================================================

/// Transition progress plus the durations that drive it.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    state: TransitionState,
    progress: f32,
    on_time: Duration,
    off_time: Duration,
    exiting: bool,
}

impl Transition {
    /// Creates a transition that starts fully off and fades on.
    pub fn new(on_time: Duration, off_time: Duration) -> Self {
        Self {
            state: TransitionState::TransitionOn,
            progress: 0.0,
            on_time,
            off_time,
            exiting: false,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn state(&self) -> TransitionState {
        self.state
    }

    /// Normalized progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn on_time(&self) -> Duration {
        self.on_time
    }

    pub fn off_time(&self) -> Duration {
        self.off_time
    }

    pub fn is_exiting(&self) -> bool {
        self.exiting
    }

    //--- Stepping ---------------------------------------------------------

    /// Moves progress by `elapsed / duration` in `direction`.
    ///
    /// Returns `true` once progress sits on the bound for that direction.
    /// A zero duration snaps straight to the bound.
    pub fn advance(&mut self, elapsed: Duration, direction: Direction) -> bool {
        let duration = match direction {
            Direction::On => self.on_time,
            Direction::Off => self.off_time,
        };

        let delta = if duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / duration.as_secs_f64()) as f32
        };

        let signed = match direction {
            Direction::On => delta,
            Direction::Off => -delta,
        };

        // Non-finite deltas can only come from absurd elapsed values; treat them as a snap
        let next = if signed.is_finite() {
            self.progress + signed
        } else {
            signed.signum()
        };
        self.progress = next.clamp(0.0, 1.0);

        match direction {
            Direction::On => self.progress >= 1.0,
            Direction::Off => self.progress <= 0.0,
        }
    }

    /// Runs one frame of the state machine.
    ///
    /// Returns `true` when an exit has just completed; the state is then
    /// `Removed` and the owner should finalize the screen.
    pub fn step(&mut self, elapsed: Duration, covered: bool) -> bool {
        match self.state {
            TransitionState::Removed => false,
            _ if self.exiting => {
                if self.advance(elapsed, Direction::Off) {
                    self.state = TransitionState::Removed;
                    true
                } else {
                    self.state = TransitionState::TransitionOff;
                    false
                }
            }
            _ if covered => {
                self.state = if self.advance(elapsed, Direction::Off) {
                    TransitionState::Hidden
                } else {
                    TransitionState::TransitionOff
                };
                false
            }
            _ => {
                self.state = if self.advance(elapsed, Direction::On) {
                    TransitionState::Active
                } else {
                    TransitionState::TransitionOn
                };
                false
            }
        }
    }

    //--- Exit -------------------------------------------------------------

    /// Marks the transition as exiting.
    ///
    /// Returns `false` when an exit was already underway, so repeated
    /// requests have no further effect. A zero off-time jumps straight to
    /// `Removed`.
    pub fn begin_exit(&mut self) -> bool {
        if self.exiting || self.state == TransitionState::Removed {
            return false;
        }

        self.exiting = true;
        if self.off_time.is_zero() {
            self.progress = 0.0;
            self.state = TransitionState::Removed;
        } else {
            self.state = TransitionState::TransitionOff;
        }
        true
    }

    /// Forces the terminal state without animating.
    pub(crate) fn mark_removed(&mut self) {
        self.exiting = true;
        self.progress = 0.0;
        self.state = TransitionState::Removed;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn new_transition_starts_off() {
        let t = Transition::new(secs(0.5), secs(0.5));
        assert_eq!(t.state(), TransitionState::TransitionOn);
        assert_eq!(t.progress(), 0.0);
        assert!(!t.is_exiting());
    }

    #[test]
    fn advance_moves_proportionally() {
        let mut t = Transition::new(secs(0.5), secs(0.5));
        assert!(!t.advance(secs(0.25), Direction::On));
        assert!((t.progress() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn zero_duration_snaps_without_nan() {
        let mut t = Transition::new(Duration::ZERO, Duration::ZERO);
        assert!(t.advance(Duration::ZERO, Direction::On));
        assert_eq!(t.progress(), 1.0);

        assert!(t.advance(Duration::ZERO, Direction::Off));
        assert_eq!(t.progress(), 0.0);
    }

    #[test]
    fn progress_stays_in_unit_range_for_any_delta() {
        let deltas = [
            Duration::ZERO,
            Duration::from_nanos(1),
            secs(0.016),
            secs(3.0),
            Duration::from_secs(u64::MAX / 4),
        ];
        for on in [Duration::ZERO, Duration::from_nanos(1), secs(0.5)] {
            let mut t = Transition::new(on, on);
            for &d in &deltas {
                t.advance(d, Direction::On);
                assert!((0.0..=1.0).contains(&t.progress()), "{:?}", t);
                t.advance(d, Direction::Off);
                assert!((0.0..=1.0).contains(&t.progress()), "{:?}", t);
                assert!(!t.progress().is_nan());
            }
        }
    }

    #[test]
    fn step_reaches_active() {
        let mut t = Transition::new(secs(0.5), secs(0.5));
        t.step(secs(0.25), false);
        assert_eq!(t.state(), TransitionState::TransitionOn);
        t.step(secs(0.25), false);
        assert_eq!(t.state(), TransitionState::Active);
        assert_eq!(t.progress(), 1.0);
    }

    #[test]
    fn covered_screen_hides_then_returns() {
        let mut t = Transition::new(Duration::ZERO, secs(0.5));
        t.step(secs(0.1), false);
        assert_eq!(t.state(), TransitionState::Active);

        t.step(secs(0.25), true);
        assert_eq!(t.state(), TransitionState::TransitionOff);
        assert!(!t.step(secs(0.25), true));
        assert_eq!(t.state(), TransitionState::Hidden);

        t.step(secs(0.1), false);
        assert_eq!(t.state(), TransitionState::Active);
    }

    #[test]
    fn exit_completes_into_removed() {
        let mut t = Transition::new(Duration::ZERO, secs(0.5));
        t.step(secs(0.1), false);
        assert!(t.begin_exit());
        assert_eq!(t.state(), TransitionState::TransitionOff);

        assert!(!t.step(secs(0.25), false));
        assert!(t.step(secs(0.25), false));
        assert_eq!(t.state(), TransitionState::Removed);
        assert!(!t.step(secs(0.25), false));
    }

    #[test]
    fn zero_off_time_exit_is_immediate() {
        let mut t = Transition::new(Duration::ZERO, Duration::ZERO);
        t.step(secs(0.1), false);
        assert!(t.begin_exit());
        assert_eq!(t.state(), TransitionState::Removed);
    }

    #[test]
    fn begin_exit_is_idempotent() {
        let mut t = Transition::new(Duration::ZERO, secs(1.0));
        assert!(t.begin_exit());
        let snapshot = t.clone();
        assert!(!t.begin_exit());
        assert_eq!(t, snapshot);
    }

    #[test]
    fn visibility_and_input_rules() {
        assert!(TransitionState::TransitionOn.accepts_input());
        assert!(TransitionState::Active.accepts_input());
        assert!(!TransitionState::TransitionOff.accepts_input());
        assert!(!TransitionState::Hidden.is_visible());
        assert!(!TransitionState::Removed.is_visible());
        assert!(TransitionState::TransitionOff.is_visible());
    }
}

//=========================================================================
// Screen System
//=========================================================================
//
// Stack of screens with per-screen transitions, popup-aware input
// routing and deferred structural changes.
//
// Architecture:
//   ScreenManager
//     ├─ screens: Vec<ScreenSlot>        (bottom = oldest, top = newest)
//     │    └─ Box<dyn Screen> + Transition + controlling player
//     ├─ pending: PendingQueue           (applied at the next frame start)
//     └─ flags: SessionFlags             (lent to screens every call)
//
// Frame:
//   update()       → apply pending → walk top-down → Screen::update()
//   handle_input() → topmost accepting screen → Screen::handle_input()
//   render()       → visible screens bottom-up → Screen::render()
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::error::ScreenError;
use crate::core::input::InputState;
use crate::core::render::RenderFrame;

//=== Module Declarations =================================================

mod context;
mod loading;
mod pending;
mod screen_manager;
mod transition;

//=== Public API ==========================================================

pub use context::{ScreenContext, ScreenInfo};
pub use loading::{LoadPolicy, LoadRequest, LoadingScreen};
pub use pending::ScreenSet;
pub use screen_manager::ScreenManager;
pub use transition::{Direction, Transition, TransitionState};

//=== Identifiers =========================================================

/// Stable identity of a screen for as long as it is on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(pub(crate) u64);

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of one loading-gate swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadId(pub(crate) u64);

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "load-{}", self.0)
    }
}

//=== Screen Trait ========================================================

/// One interactive or passive layer managed by the [`ScreenManager`].
///
/// Once pushed, the manager owns the screen and drives it every frame
/// until its exit transition completes. Screens never touch the stack
/// directly; they queue requests through the [`ScreenContext`] they are
/// handed, which take effect at the start of the next frame.
///
/// # Minimal Implementation
///
/// Only `render()` is required. Everything else has a default:
///
/// ```rust
/// # use aetheric_screens::prelude::*;
/// struct Splash;
///
/// impl Screen for Splash {
///     fn render(&mut self, frame: &mut RenderFrame<'_>) {
///         let alpha = frame.alpha();
///         frame.renderer.draw_text("Splash", Vec2::ZERO, Color::WHITE.faded(alpha), 1.0);
///     }
/// }
/// ```
pub trait Screen: Send {
    //--- Description ------------------------------------------------------

    /// Short name used in logs and by [`ScreenContext::find_screen`].
    fn name(&self) -> &'static str {
        "screen"
    }

    /// Time to fade on after being pushed.
    fn transition_on_time(&self) -> Duration {
        Duration::ZERO
    }

    /// Time to fade off after an exit request. Zero removes immediately.
    fn transition_off_time(&self) -> Duration {
        Duration::ZERO
    }

    /// Popups leave the screens beneath them visible and updating.
    fn is_popup(&self) -> bool {
        false
    }

    /// Whether this screen fades into `Hidden` when a non-popup screen
    /// covers it. Backgrounds and gameplay usually opt out.
    fn hides_when_covered(&self) -> bool {
        true
    }

    /// Let input continue to the next accepting screen after this one.
    fn passes_input_through(&self) -> bool {
        false
    }

    /// Refuse to be pushed without a controlling player.
    fn requires_controlling_player(&self) -> bool {
        false
    }

    //--- Lifecycle --------------------------------------------------------

    /// Heavy resource preparation. May run on a loading worker thread.
    fn prepare(&mut self) -> Result<(), ScreenError> {
        Ok(())
    }

    /// (Re)acquire resources. Runs once per push before the first update,
    /// and again with `instance_preserved = true` after a resume.
    ///
    /// An error cancels the push.
    fn activate(
        &mut self,
        _ctx: &mut ScreenContext<'_>,
        _instance_preserved: bool,
    ) -> Result<(), ScreenError> {
        Ok(())
    }

    /// Called on final removal (before `unload`) and on suspend.
    fn deactivate(&mut self, _ctx: &mut ScreenContext<'_>) {}

    /// Release resources. Called once, after `deactivate`, on removal.
    fn unload(&mut self) {}

    //--- Frame ------------------------------------------------------------

    /// Called every frame while the screen is on the stack, even when it
    /// is covered. Screens that simulate should stop when
    /// `covered_by_other_screen` or `other_screen_has_focus` says so.
    fn update(
        &mut self,
        _ctx: &mut ScreenContext<'_>,
        _elapsed: Duration,
        _other_screen_has_focus: bool,
        _covered_by_other_screen: bool,
    ) {
    }

    /// Called only on the screen that owns input this frame.
    fn handle_input(&mut self, _ctx: &mut ScreenContext<'_>, _elapsed: Duration, _input: &InputState) {}

    /// Draw the screen, blending with `frame.alpha()`.
    fn render(&mut self, frame: &mut RenderFrame<'_>);
}

//=========================================================================
// Test Support
//=========================================================================

#[cfg(test)]
pub(crate) mod scripted;

//=========================================================================
// Screen Context
//=========================================================================
//
// Everything a screen may see or request during a callback.
//
// The context borrows the manager's pending queue, flags and failure log,
// never the live stack itself. Every structural request is queued and
// takes effect at the start of the next frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::pending::{LoadCompletion, PendingOp, PendingQueue};
use super::{LoadId, LoadRequest, Screen, ScreenId, ScreenSet, TransitionState};
use crate::core::error::{ScreenError, ScreenFailure};
use crate::core::flags::SessionFlags;
use crate::core::input::PlayerIndex;
use crate::core::render::Viewport;

//=== ScreenInfo ==========================================================

/// Read-only summary of a live screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenInfo {
    pub id: ScreenId,
    pub name: &'static str,
    pub state: TransitionState,
    pub progress: f32,
    pub is_popup: bool,
    pub controlling_player: Option<PlayerIndex>,
}

//=== ScreenContext =======================================================

/// Handle passed to every [`Screen`](super::Screen) callback.
pub struct ScreenContext<'a> {
    pub(crate) info: ScreenInfo,
    pub(crate) exiting: bool,
    pub(crate) other_screen_has_focus: bool,
    pub(crate) viewport: Viewport,
    pub(crate) pending: &'a mut PendingQueue,
    pub(crate) flags: &'a mut SessionFlags,
    pub(crate) directory: &'a [ScreenInfo],
    pub(crate) failures: &'a mut Vec<ScreenFailure>,
}

impl<'a> ScreenContext<'a> {
    //--- Self -------------------------------------------------------------

    pub fn screen_id(&self) -> ScreenId {
        self.info.id
    }

    pub fn state(&self) -> TransitionState {
        self.info.state
    }

    /// Transition progress: 0 = fully off, 1 = fully on.
    pub fn progress(&self) -> f32 {
        self.info.progress
    }

    pub fn is_exiting(&self) -> bool {
        self.exiting
    }

    /// True when this screen is on and nothing above it holds focus.
    pub fn is_active(&self) -> bool {
        !self.other_screen_has_focus && self.info.state.accepts_input()
    }

    /// Player allowed to drive this screen; `None` means anyone.
    pub fn controlling_player(&self) -> Option<PlayerIndex> {
        self.info.controlling_player
    }

    /// Controlling player for screens that cannot work without one.
    ///
    /// # Panics
    ///
    /// Panics if the screen was pushed without a controlling player.
    /// Screens that need one should also return `true` from
    /// `requires_controlling_player`, which rejects such pushes up front.
    pub fn require_player(&self) -> PlayerIndex {
        match self.info.controlling_player {
            Some(player) => player,
            None => panic!(
                "screen '{}' ({}) requires a controlling player but none was assigned",
                self.info.name, self.info.id
            ),
        }
    }

    //--- Shared State -----------------------------------------------------

    pub fn flags(&self) -> &SessionFlags {
        &*self.flags
    }

    pub fn flags_mut(&mut self) -> &mut SessionFlags {
        &mut *self.flags
    }

    /// Playable area.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Live screens as of the start of this frame, bottom to top.
    pub fn screens(&self) -> &[ScreenInfo] {
        self.directory
    }

    /// Topmost live screen with the given name.
    pub fn find_screen(&self, name: &str) -> Option<ScreenId> {
        self.directory
            .iter()
            .rev()
            .find(|info| info.name == name && info.state != TransitionState::Removed)
            .map(|info| info.id)
    }

    //--- Requests ---------------------------------------------------------

    /// Queues a screen to be pushed on top at the next frame.
    pub fn request_push<T>(&mut self, screen: T, player: Option<PlayerIndex>) -> ScreenId
    where
        T: Screen + 'static,
    {
        self.request_push_boxed(Box::new(screen), player)
    }

    pub fn request_push_boxed(
        &mut self,
        screen: Box<dyn Screen>,
        player: Option<PlayerIndex>,
    ) -> ScreenId {
        let id = self.pending.allocate_screen_id();
        debug!(target: "screens", "{} requested push of '{}' as {}", self.info.id, screen.name(), id);
        self.pending.push(PendingOp::Push {
            id,
            screen,
            player,
            requested_by: Some(self.info.id),
        });
        id
    }

    /// Asks for this screen to exit. Repeated requests are harmless.
    pub fn request_exit(&mut self) {
        let id = self.info.id;
        self.request_exit_of(id);
    }

    /// Asks for another screen to exit.
    pub fn request_exit_of(&mut self, id: ScreenId) {
        self.pending.push(PendingOp::Exit {
            id,
            requested_by: Some(self.info.id),
        });
    }

    /// Replaces the whole stack with `set` at the next frame boundary.
    pub fn request_pop_all_and_push_set(&mut self, set: ScreenSet) {
        self.pending.push(PendingOp::Swap {
            set,
            completion: None,
            requested_by: Some(self.info.id),
        });
    }

    /// Starts a loading gate in front of the current stack.
    ///
    /// The gate inherits this screen's controlling player.
    pub fn request_load(&mut self, request: LoadRequest) {
        self.pending.push(PendingOp::Load {
            request,
            player: self.info.controlling_player,
            requested_by: Some(self.info.id),
        });
    }

    /// Records a failure for the host to collect.
    pub fn report_failure(&mut self, error: ScreenError) {
        self.failures.push(ScreenFailure {
            screen: self.info.name,
            requested_by: Some(self.info.id),
            error,
        });
    }

    /// Rejections of requests this screen made.
    ///
    /// Requests are applied at the start of the next update, so their
    /// failures show up from that update on, until the host drains them
    /// with `ScreenManager::take_failures`.
    pub fn failures_for_self(&self) -> impl Iterator<Item = &ScreenFailure> + '_ {
        let id = self.info.id;
        self.failures.iter().filter(move |f| f.requested_by == Some(id))
    }

    /// Queues the swap that completes a load. Only the first completion
    /// for a given load is applied.
    pub(crate) fn finish_load(&mut self, load: LoadId, set: ScreenSet) {
        self.pending.push(PendingOp::Swap {
            set,
            completion: Some(LoadCompletion {
                load,
                gate: self.info.id,
            }),
            requested_by: Some(self.info.id),
        });
    }
}

//=========================================================================
// Screen Manager
//=========================================================================
//
// Owns the live stack of screens and drives them once per frame.
//
// Screens are boxed and stored bottom-to-top. Structural requests from
// screens or the host go through the pending queue and are applied at
// the start of the next `update()`, never during a walk.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, error, warn};

//=== Internal Dependencies ===============================================

use super::context::{ScreenContext, ScreenInfo};
use super::loading::{LoadRequest, LoadingScreen};
use super::pending::{PendingOp, PendingQueue, SetEntry};
use super::{LoadId, Screen, ScreenId, ScreenSet, Transition, TransitionState};
use crate::core::error::{ScreenError, ScreenFailure};
use crate::core::flags::SessionFlags;
use crate::core::input::{InputState, PlayerIndex};
use crate::core::render::{RenderFrame, Renderer, Viewport};

//=== ScreenSlot ==========================================================

/// A live screen plus the state the manager tracks for it.
struct ScreenSlot {
    id: ScreenId,
    name: &'static str,
    screen: Box<dyn Screen>,
    transition: Transition,
    controlling_player: Option<PlayerIndex>,
    /// Set by `suspend`, cleared by a successful `resume`.
    deactivated: bool,
}

impl ScreenSlot {
    fn new(id: ScreenId, screen: Box<dyn Screen>, controlling_player: Option<PlayerIndex>) -> Self {
        let transition = Transition::new(screen.transition_on_time(), screen.transition_off_time());
        Self {
            id,
            name: screen.name(),
            screen,
            transition,
            controlling_player,
            deactivated: false,
        }
    }

    fn info(&self) -> ScreenInfo {
        ScreenInfo {
            id: self.id,
            name: self.name,
            state: self.transition.state(),
            progress: self.transition.progress(),
            is_popup: self.screen.is_popup(),
            controlling_player: self.controlling_player,
        }
    }

    fn context<'s>(&self, shared: &'s mut Shared<'_>, other_screen_has_focus: bool) -> ScreenContext<'s> {
        ScreenContext {
            info: self.info(),
            exiting: self.transition.is_exiting(),
            other_screen_has_focus,
            viewport: shared.viewport,
            pending: &mut *shared.pending,
            flags: &mut *shared.flags,
            directory: shared.directory,
            failures: &mut *shared.failures,
        }
    }
}

//=== Shared ==============================================================

/// Manager state lent to screens while the stack itself is borrowed.
struct Shared<'a> {
    pending: &'a mut PendingQueue,
    flags: &'a mut SessionFlags,
    directory: &'a [ScreenInfo],
    failures: &'a mut Vec<ScreenFailure>,
    viewport: Viewport,
}

impl<'a> Shared<'a> {
    fn record(&mut self, screen: &'static str, requested_by: Option<ScreenId>, error: ScreenError) {
        error!(target: "screens", "Rejected '{}': {}", screen, error);
        self.failures.push(ScreenFailure {
            screen,
            requested_by,
            error,
        });
    }
}

/// Position of an entry in a swap that has been validated and activated.
enum Staged {
    Keep(ScreenId),
    Fresh(ScreenSlot),
}

//=== Screen Manager ======================================================

/// Stack of screens with transitions, popup-aware input routing and
/// deferred structural changes.
///
/// The host calls [`update`](Self::update), [`handle_input`](Self::handle_input)
/// and [`render`](Self::render) once each per frame, in that order.
///
/// # Example
///
/// ```rust
/// # use std::time::Duration;
/// # use aetheric_screens::prelude::*;
/// # struct Title;
/// # impl Screen for Title { fn render(&mut self, _: &mut RenderFrame<'_>) {} }
/// let mut manager = ScreenManager::new(Viewport::new(800.0, 600.0));
/// let title = manager.push(Title, None);
///
/// let mut renderer = DrawList::new(manager.viewport());
/// let dt = Duration::from_millis(16);
/// manager.update(dt);
/// manager.handle_input(dt, &InputState::new());
/// manager.render(dt, &mut renderer);
///
/// assert_eq!(manager.last_render_order(), &[title]);
/// ```
pub struct ScreenManager {
    screens: Vec<ScreenSlot>,
    pending: PendingQueue,
    flags: SessionFlags,
    viewport: Viewport,
    directory: Vec<ScreenInfo>,
    failures: Vec<ScreenFailure>,
    /// Completed loads whose gate is still on the stack.
    finalized_loads: HashMap<LoadId, ScreenId>,
    input_order: Vec<ScreenId>,
    render_order: Vec<ScreenId>,
}

impl ScreenManager {
    //--- Construction -----------------------------------------------------

    /// Creates an empty manager with default flags.
    pub fn new(viewport: Viewport) -> Self {
        Self::with_flags(viewport, SessionFlags::default())
    }

    pub fn with_flags(viewport: Viewport, flags: SessionFlags) -> Self {
        Self {
            screens: Vec::new(),
            pending: PendingQueue::new(),
            flags,
            viewport,
            directory: Vec::new(),
            failures: Vec::new(),
            finalized_loads: HashMap::new(),
            input_order: Vec::new(),
            render_order: Vec::new(),
        }
    }

    //--- Requests ---------------------------------------------------------

    /// Queues a screen to be pushed on top at the next update.
    ///
    /// `player` restricts which input source drives it; `None` lets
    /// anyone. The returned id is valid immediately for `exit` or
    /// retaining in a [`ScreenSet`].
    pub fn push<T>(&mut self, screen: T, player: Option<PlayerIndex>) -> ScreenId
    where
        T: Screen + 'static,
    {
        self.push_boxed(Box::new(screen), player)
    }

    pub fn push_boxed(&mut self, screen: Box<dyn Screen>, player: Option<PlayerIndex>) -> ScreenId {
        let id = self.pending.allocate_screen_id();
        self.pending.push(PendingOp::Push {
            id,
            screen,
            player,
            requested_by: None,
        });
        id
    }

    /// Queues an exit for `id` ("pop"). Exiting twice is a no-op.
    pub fn exit(&mut self, id: ScreenId) {
        self.pending.push(PendingOp::Exit {
            id,
            requested_by: None,
        });
    }

    /// Queues a full swap of the stack for the next frame boundary.
    pub fn pop_all_and_push_set(&mut self, set: ScreenSet) {
        self.pending.push(PendingOp::Swap {
            set,
            completion: None,
            requested_by: None,
        });
    }

    /// Queues a loading gate in front of the current stack.
    pub fn begin_load(&mut self, request: LoadRequest, player: Option<PlayerIndex>) {
        self.pending.push(PendingOp::Load {
            request,
            player,
            requested_by: None,
        });
    }

    //--- Frame ------------------------------------------------------------

    /// Applies queued changes, then updates every live screen top-down.
    ///
    /// While walking down, `other_screen_has_focus` turns on once a screen
    /// above is transitioning on or active, and `covered_by_other_screen`
    /// turns on once such a screen is not a popup. Requests made during
    /// the walk wait for the next call.
    pub fn update(&mut self, elapsed: Duration) {
        self.apply_pending();

        let Self {
            screens,
            pending,
            flags,
            directory,
            failures,
            viewport,
            ..
        } = self;
        let mut shared = Shared {
            pending,
            flags,
            directory: directory.as_slice(),
            failures,
            viewport: *viewport,
        };

        let mut other_screen_has_focus = false;
        let mut covered_by_other_screen = false;

        for slot in screens.iter_mut().rev() {
            if slot.transition.state() == TransitionState::Removed {
                continue;
            }

            let hide = covered_by_other_screen && slot.screen.hides_when_covered();
            if slot.transition.step(elapsed, hide) {
                debug!(target: "screens", "'{}' {} finished exiting", slot.name, slot.id);
                continue;
            }

            let mut ctx = slot.context(&mut shared, other_screen_has_focus);
            slot.screen.update(&mut ctx, elapsed, other_screen_has_focus, covered_by_other_screen);

            if slot.transition.state().accepts_input() {
                other_screen_has_focus = true;
                if !slot.screen.is_popup() {
                    covered_by_other_screen = true;
                }
            }
        }
    }

    /// Routes input to the topmost screen that is transitioning on or
    /// active. Routing continues downward only past screens that pass
    /// input through.
    pub fn handle_input(&mut self, elapsed: Duration, input: &InputState) {
        let Self {
            screens,
            pending,
            flags,
            directory,
            failures,
            viewport,
            input_order,
            ..
        } = self;
        let mut shared = Shared {
            pending,
            flags,
            directory: directory.as_slice(),
            failures,
            viewport: *viewport,
        };

        input_order.clear();

        for slot in screens.iter_mut().rev() {
            if !slot.transition.state().accepts_input() {
                continue;
            }

            let mut ctx = slot.context(&mut shared, false);
            slot.screen.handle_input(&mut ctx, elapsed, input);
            input_order.push(slot.id);

            if !slot.screen.passes_input_through() {
                break;
            }
        }
    }

    /// Draws every visible screen bottom-to-top, including ones fading off.
    pub fn render(&mut self, elapsed: Duration, renderer: &mut dyn Renderer) {
        self.render_order.clear();

        for slot in self.screens.iter_mut() {
            let state = slot.transition.state();
            if !state.is_visible() {
                continue;
            }

            let mut frame = RenderFrame {
                renderer: &mut *renderer,
                elapsed,
                flags: &self.flags,
                state,
                progress: slot.transition.progress(),
            };
            slot.screen.render(&mut frame);
            self.render_order.push(slot.id);
        }
    }

    //--- Process Lifecycle ------------------------------------------------

    /// Deactivates every live screen, e.g. when the process is backgrounded.
    pub fn suspend(&mut self) {
        let Self {
            screens,
            pending,
            flags,
            directory,
            failures,
            viewport,
            ..
        } = self;
        let mut shared = Shared {
            pending,
            flags,
            directory: directory.as_slice(),
            failures,
            viewport: *viewport,
        };

        debug!(target: "screens", "Suspending {} screens", screens.len());
        for slot in screens.iter_mut().rev() {
            if slot.deactivated || slot.transition.state() == TransitionState::Removed {
                continue;
            }
            let mut ctx = slot.context(&mut shared, false);
            slot.screen.deactivate(&mut ctx);
            slot.deactivated = true;
        }
    }

    /// Re-activates every live screen with `instance_preserved = true`.
    ///
    /// A screen that fails to come back is dropped at the next update.
    pub fn resume(&mut self) {
        let Self {
            screens,
            pending,
            flags,
            directory,
            failures,
            viewport,
            ..
        } = self;
        let mut shared = Shared {
            pending,
            flags,
            directory: directory.as_slice(),
            failures,
            viewport: *viewport,
        };

        debug!(target: "screens", "Resuming {} screens", screens.len());
        for slot in screens.iter_mut() {
            if !slot.deactivated || slot.transition.state() == TransitionState::Removed {
                continue;
            }
            match Self::activate_slot(slot, &mut shared, true) {
                Ok(()) => slot.deactivated = false,
                Err(e) => {
                    shared.record(slot.name, None, e);
                    slot.transition.mark_removed();
                }
            }
        }
    }

    /// Deactivates and unloads every screen and drops pending requests.
    pub fn shutdown(&mut self) {
        let dropped = self.pending.take().len();
        if dropped > 0 {
            debug!(target: "screens", "Dropping {} pending requests at shutdown", dropped);
        }

        let Self {
            screens,
            pending,
            flags,
            directory,
            failures,
            viewport,
            ..
        } = self;
        let mut shared = Shared {
            pending,
            flags,
            directory: directory.as_slice(),
            failures,
            viewport: *viewport,
        };

        for mut slot in std::mem::take(screens).into_iter().rev() {
            Self::finalize_slot(&mut slot, &mut shared);
        }
        directory.clear();
    }

    //--- Queries ----------------------------------------------------------

    /// Number of screens on the stack, including ones waiting for removal.
    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// Whether requests are waiting for the next update.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn contains(&self, id: ScreenId) -> bool {
        self.screens.iter().any(|s| s.id == id)
    }

    pub fn state_of(&self, id: ScreenId) -> Option<TransitionState> {
        self.slot(id).map(|s| s.transition.state())
    }

    pub fn progress_of(&self, id: ScreenId) -> Option<f32> {
        self.slot(id).map(|s| s.transition.progress())
    }

    /// Current stack, bottom to top.
    pub fn screens(&self) -> Vec<ScreenInfo> {
        self.screens.iter().map(ScreenSlot::info).collect()
    }

    /// Screens drawn by the last `render`, bottom to top.
    pub fn last_render_order(&self) -> &[ScreenId] {
        &self.render_order
    }

    /// Screens that received input in the last `handle_input`, top first.
    pub fn last_input_order(&self) -> &[ScreenId] {
        &self.input_order
    }

    /// Takes the failures recorded since the last call.
    pub fn take_failures(&mut self) -> Vec<ScreenFailure> {
        std::mem::take(&mut self.failures)
    }

    pub fn flags(&self) -> &SessionFlags {
        &self.flags
    }

    pub fn flags_mut(&mut self) -> &mut SessionFlags {
        &mut self.flags
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    //--- Pending Application ----------------------------------------------

    fn apply_pending(&mut self) {
        let ops = self.pending.take();

        let Self {
            screens,
            pending,
            flags,
            directory,
            failures,
            viewport,
            finalized_loads,
            ..
        } = self;
        let mut shared = Shared {
            pending,
            flags,
            directory: directory.as_slice(),
            failures,
            viewport: *viewport,
        };

        // Screens whose exit finished during the previous walk
        let mut i = 0;
        while i < screens.len() {
            if screens[i].transition.state() == TransitionState::Removed {
                let mut slot = screens.remove(i);
                Self::finalize_slot(&mut slot, &mut shared);
            } else {
                i += 1;
            }
        }

        for op in ops {
            match op {
                PendingOp::Push {
                    id,
                    screen,
                    player,
                    requested_by,
                } => Self::push_internal(screens, &mut shared, id, screen, player, requested_by),

                PendingOp::Exit { id, requested_by } => {
                    Self::exit_internal(screens, &mut shared, id, requested_by)
                }

                PendingOp::Swap {
                    set,
                    completion,
                    requested_by,
                } => {
                    if let Some(done) = completion {
                        if finalized_loads.insert(done.load, done.gate).is_some() {
                            warn!(target: "screens::loading", "{} already finalized, ignoring repeated completion", done.load);
                            continue;
                        }
                    }

                    let swapped = Self::swap_internal(screens, &mut shared, set, requested_by);
                    if let (false, Some(done)) = (swapped, completion) {
                        Self::exit_internal(screens, &mut shared, done.gate, requested_by);
                    }
                }

                PendingOp::Load {
                    request,
                    player,
                    requested_by,
                } => {
                    let load = shared.pending.allocate_load_id();
                    let id = shared.pending.allocate_screen_id();
                    let gate = Box::new(LoadingScreen::new(load, request));
                    Self::push_internal(screens, &mut shared, id, gate, player, requested_by);
                }
            }
        }

        // Repeats can only come from a gate that is still around
        finalized_loads.retain(|_, gate| screens.iter().any(|s| s.id == *gate));

        directory.clear();
        directory.extend(screens.iter().map(ScreenSlot::info));
    }

    //--- Internal Helpers -------------------------------------------------

    fn slot(&self, id: ScreenId) -> Option<&ScreenSlot> {
        self.screens.iter().find(|s| s.id == id)
    }

    /// Player check plus `activate`.
    fn admit(slot: &mut ScreenSlot, shared: &mut Shared<'_>) -> Result<(), ScreenError> {
        if slot.screen.requires_controlling_player() && slot.controlling_player.is_none() {
            return Err(ScreenError::MissingControllingPlayer { screen: slot.name });
        }
        Self::activate_slot(slot, shared, false)
    }

    fn activate_slot(
        slot: &mut ScreenSlot,
        shared: &mut Shared<'_>,
        instance_preserved: bool,
    ) -> Result<(), ScreenError> {
        let mut ctx = slot.context(shared, false);
        slot.screen.activate(&mut ctx, instance_preserved)
    }

    /// Runs `deactivate` then `unload`. `deactivate` is skipped for a
    /// screen still suspended.
    fn finalize_slot(slot: &mut ScreenSlot, shared: &mut Shared<'_>) {
        slot.transition.mark_removed();
        if !slot.deactivated {
            let mut ctx = slot.context(shared, true);
            slot.screen.deactivate(&mut ctx);
            slot.deactivated = true;
        }
        slot.screen.unload();
        debug!(target: "screens", "Removed '{}' {}", slot.name, slot.id);
    }

    fn push_internal(
        screens: &mut Vec<ScreenSlot>,
        shared: &mut Shared<'_>,
        id: ScreenId,
        screen: Box<dyn Screen>,
        player: Option<PlayerIndex>,
        requested_by: Option<ScreenId>,
    ) {
        let mut slot = ScreenSlot::new(id, screen, player);

        match Self::admit(&mut slot, shared) {
            Ok(()) => {
                debug!(
                    target: "screens",
                    "Pushed '{}' {} (player {:?}) at depth {}",
                    slot.name, id, player, screens.len()
                );
                screens.push(slot);
            }
            Err(e) => shared.record(slot.name, requested_by, e),
        }
    }

    fn exit_internal(
        screens: &mut Vec<ScreenSlot>,
        shared: &mut Shared<'_>,
        id: ScreenId,
        requested_by: Option<ScreenId>,
    ) {
        let Some(pos) = screens.iter().position(|s| s.id == id) else {
            warn!(target: "screens", "Exit of {} ignored, not on the stack (requested by {:?})", id, requested_by);
            return;
        };

        if !screens[pos].transition.begin_exit() {
            debug!(target: "screens", "'{}' {} is already exiting", screens[pos].name, id);
            return;
        }

        if screens[pos].transition.state() == TransitionState::Removed {
            let mut slot = screens.remove(pos);
            Self::finalize_slot(&mut slot, shared);
        } else {
            debug!(target: "screens", "'{}' {} transitioning off", screens[pos].name, id);
        }
    }

    /// Applies a full swap. Returns `false` if it was rolled back.
    fn swap_internal(
        screens: &mut Vec<ScreenSlot>,
        shared: &mut Shared<'_>,
        set: ScreenSet,
        requested_by: Option<ScreenId>,
    ) -> bool {
        //--- 1. Retained screens must be live -----------------------------
        for entry in &set.entries {
            if let SetEntry::Retain(id) = entry {
                let live = screens
                    .iter()
                    .any(|s| s.id == *id && s.transition.state() != TransitionState::Removed);
                if !live {
                    warn!(target: "screens", "Swap retains {} which is not live, rolling back", id);
                    shared.record("screen set", requested_by, ScreenError::UnknownScreen(*id));
                    return false;
                }
            }
        }

        //--- 2. Activate new screens, undoing all of them on failure -----
        let mut staged: Vec<Staged> = Vec::with_capacity(set.entries.len());
        for entry in set.entries {
            match entry {
                SetEntry::Retain(id) => staged.push(Staged::Keep(id)),
                SetEntry::Insert { screen, player } => {
                    let id = shared.pending.allocate_screen_id();
                    let mut slot = ScreenSlot::new(id, screen, player);

                    if let Err(e) = Self::admit(&mut slot, shared) {
                        for undo in staged.iter_mut().rev() {
                            if let Staged::Fresh(fresh) = undo {
                                Self::finalize_slot(fresh, shared);
                            }
                        }
                        shared.record(slot.name, requested_by, e);
                        return false;
                    }
                    staged.push(Staged::Fresh(slot));
                }
            }
        }

        //--- 3. Commit: retire everything not retained --------------------
        let mut old = std::mem::take(screens);
        let mut next = Vec::with_capacity(staged.len());
        for entry in staged {
            match entry {
                Staged::Keep(id) => {
                    if let Some(pos) = old.iter().position(|s| s.id == id) {
                        next.push(old.remove(pos));
                    }
                }
                Staged::Fresh(slot) => next.push(slot),
            }
        }

        for mut slot in old.into_iter().rev() {
            Self::finalize_slot(&mut slot, shared);
        }

        debug!(target: "screens", "Swapped stack to {} screens", next.len());
        *screens = next;
        true
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

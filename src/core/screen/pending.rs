//=========================================================================
// Pending Operations
//=========================================================================
//
// Queue of structural stack changes.
//
// Screens and the host queue requests here at any time. The manager
// takes the whole queue at the start of the next frame and applies it
// before walking the stack, so the live sequence is never mutated while
// it is being iterated.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{LoadId, LoadRequest, Screen, ScreenId};
use crate::core::error::ScreenError;
use crate::core::input::PlayerIndex;

//=== ScreenSet ===========================================================

/// Target stack for a full swap, listed bottom to top.
///
/// Retained entries keep their live instance (no deactivate/activate);
/// pushed entries are activated fresh. Every live screen not retained is
/// deactivated and unloaded.
///
/// ```rust
/// # use aetheric_screens::prelude::*;
/// # struct Game;
/// # impl Screen for Game { fn render(&mut self, _: &mut RenderFrame<'_>) {} }
/// # fn swap(ctx: &mut ScreenContext<'_>) {
/// let mut set = ScreenSet::new();
/// if let Some(background) = ctx.find_screen("background") {
///     set = set.retain(background);
/// }
/// ctx.request_pop_all_and_push_set(set.push(Game, Some(PlayerIndex::One)));
/// # }
/// ```
#[derive(Default)]
pub struct ScreenSet {
    pub(crate) entries: Vec<SetEntry>,
}

pub(crate) enum SetEntry {
    Retain(ScreenId),
    Insert {
        screen: Box<dyn Screen>,
        player: Option<PlayerIndex>,
    },
}

impl ScreenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps a live screen, at this position in the new stack.
    pub fn retain(mut self, id: ScreenId) -> Self {
        self.entries.push(SetEntry::Retain(id));
        self
    }

    /// Adds a new screen at this position in the new stack.
    pub fn push<T>(self, screen: T, player: Option<PlayerIndex>) -> Self
    where
        T: Screen + 'static,
    {
        self.push_boxed(Box::new(screen), player)
    }

    pub fn push_boxed(mut self, screen: Box<dyn Screen>, player: Option<PlayerIndex>) -> Self {
        self.entries.push(SetEntry::Insert { screen, player });
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs `Screen::prepare` on every new screen, stopping at the first error.
    pub(crate) fn prepare_all(&mut self) -> Result<(), ScreenError> {
        for entry in &mut self.entries {
            if let SetEntry::Insert { screen, .. } = entry {
                screen.prepare()?;
            }
        }
        Ok(())
    }
}

//=== PendingOp ===========================================================

/// Identifies the loading gate a swap completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LoadCompletion {
    pub load: LoadId,
    pub gate: ScreenId,
}

/// One queued stack change.
pub(crate) enum PendingOp {
    Push {
        id: ScreenId,
        screen: Box<dyn Screen>,
        player: Option<PlayerIndex>,
        requested_by: Option<ScreenId>,
    },
    Exit {
        id: ScreenId,
        requested_by: Option<ScreenId>,
    },
    Swap {
        set: ScreenSet,
        completion: Option<LoadCompletion>,
        requested_by: Option<ScreenId>,
    },
    Load {
        request: LoadRequest,
        player: Option<PlayerIndex>,
        requested_by: Option<ScreenId>,
    },
}

//=== PendingQueue ========================================================

/// FIFO of stack changes plus the id allocator.
///
/// Ids are handed out at request time so callers can refer to a screen
/// (to exit or retain it) before it is live.
#[derive(Default)]
pub(crate) struct PendingQueue {
    ops: Vec<PendingOp>,
    next_screen: u64,
    next_load: u64,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_screen_id(&mut self) -> ScreenId {
        self.next_screen += 1;
        ScreenId(self.next_screen)
    }

    pub fn allocate_load_id(&mut self) -> LoadId {
        self.next_load += 1;
        LoadId(self.next_load)
    }

    /// Queues an operation for the next frame boundary.
    pub fn push(&mut self, op: PendingOp) {
        self.ops.push(op);
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Takes all queued operations, leaving the queue empty.
    ///
    /// Requests made while the taken batch is being applied land in the
    /// fresh queue and wait for the following frame.
    pub fn take(&mut self) -> Vec<PendingOp> {
        std::mem::take(&mut self.ops)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::screen::scripted::Scripted;

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut queue = PendingQueue::new();
        let a = queue.allocate_screen_id();
        let b = queue.allocate_screen_id();
        assert!(b > a);
        assert_ne!(queue.allocate_load_id(), queue.allocate_load_id());
    }

    #[test]
    fn take_empties_queue() {
        let mut queue = PendingQueue::new();
        let id = queue.allocate_screen_id();
        queue.push(PendingOp::Exit { id, requested_by: None });
        assert_eq!(queue.len(), 1);

        let taken = queue.take();
        assert_eq!(taken.len(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn set_keeps_order() {
        let mut queue = PendingQueue::new();
        let kept = queue.allocate_screen_id();
        let set = ScreenSet::new()
            .retain(kept)
            .push(Scripted::new("game").0, Some(PlayerIndex::One));

        assert_eq!(set.len(), 2);
        assert!(matches!(set.entries[0], SetEntry::Retain(id) if id == kept));
        assert!(matches!(set.entries[1], SetEntry::Insert { player: Some(PlayerIndex::One), .. }));
    }

    #[test]
    fn prepare_all_stops_at_first_error() {
        let (ok, ok_log) = Scripted::new("ok");
        let (bad, bad_log) = Scripted::new("bad");
        let (never, never_log) = Scripted::new("never");
        let mut set = ScreenSet::new()
            .push(ok, None)
            .push(bad.fail_prepare(), None)
            .push(never, None);

        assert!(set.prepare_all().is_err());
        assert_eq!(ok_log.count("prepare"), 1);
        assert_eq!(bad_log.count("prepare"), 1);
        assert_eq!(never_log.count("prepare"), 0);
    }
}

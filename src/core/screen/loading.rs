//=========================================================================
// Loading Gate
//=========================================================================
//
// Transitional screen shown in front of the stack while the next set of
// screens is prepared.
//
// Flow:
// ```text
//   request_load() ──► gate pushed on top (old stack covered, still alive)
//        │
//        ├─ Synchronous:  gate fully on → prepare inline → finish_load()
//        └─ Asynchronous: gate activated → worker prepares ──► channel
//                         gate polls each update, keeps animating
//                         result ready && gate fully on → finish_load()
//        │
//   next frame: swap applied once (old screens unloaded, new activated)
// ```
//
// The old stack is only torn down by the swap, after every new screen
// has been prepared. A failed preparation exits the gate and uncovers the
// old stack untouched. Loads cannot be cancelled once started.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, TryRecvError};
use log::{debug, error, info};

//=== Internal Dependencies ===============================================

use super::{LoadId, Screen, ScreenContext, ScreenSet, TransitionState};
use crate::core::error::ScreenError;
use crate::core::render::{Color, RenderFrame, Vec2};

//=== LoadPolicy ==========================================================

/// Where screen preparation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Prepare on the frame thread inside a single update. Fine for
    /// cheap loads; the frame stalls for as long as preparation takes.
    Synchronous,

    /// Prepare on a worker thread while the gate keeps animating.
    Asynchronous,
}

//=== LoadRequest =========================================================

/// Screens to swap in behind a loading gate.
pub struct LoadRequest {
    pub(crate) policy: LoadPolicy,
    pub(crate) set: ScreenSet,
    pub(crate) show_indicator: bool,
}

impl LoadRequest {
    pub fn new(policy: LoadPolicy, set: ScreenSet) -> Self {
        Self {
            policy,
            set,
            show_indicator: false,
        }
    }

    pub fn synchronous(set: ScreenSet) -> Self {
        Self::new(LoadPolicy::Synchronous, set)
    }

    pub fn asynchronous(set: ScreenSet) -> Self {
        Self::new(LoadPolicy::Asynchronous, set)
    }

    /// Draw a "Loading..." message while waiting. Worth it for slow loads.
    pub fn with_indicator(mut self, show: bool) -> Self {
        self.show_indicator = show;
        self
    }

    pub fn policy(&self) -> LoadPolicy {
        self.policy
    }
}

//=== LoadingScreen =======================================================

enum LoadJob {
    /// Not started yet.
    Waiting(ScreenSet),

    /// Worker running.
    Preparing(Receiver<Result<ScreenSet, ScreenError>>),

    /// Prepared, waiting for the gate to be fully on.
    Ready(ScreenSet),

    /// Swap requested or load failed.
    Done,
}

/// The loading gate screen.
///
/// Pushed by the manager for every [`LoadRequest`]; not meant to be
/// pushed directly.
pub struct LoadingScreen {
    load: LoadId,
    policy: LoadPolicy,
    show_indicator: bool,
    job: LoadJob,
}

impl LoadingScreen {
    pub(crate) fn new(load: LoadId, request: LoadRequest) -> Self {
        Self {
            load,
            policy: request.policy,
            show_indicator: request.show_indicator,
            job: LoadJob::Waiting(request.set),
        }
    }

    pub fn load_id(&self) -> LoadId {
        self.load
    }

    //--- Internal Helpers -------------------------------------------------

    fn spawn_worker(&mut self) -> Result<(), ScreenError> {
        let LoadJob::Waiting(mut set) = std::mem::replace(&mut self.job, LoadJob::Done) else {
            return Ok(());
        };

        let load = self.load;
        let (tx, rx) = bounded(1);

        thread::Builder::new()
            .name(format!("{}", load))
            .spawn(move || {
                debug!(target: "screens::loading", "{} preparing {} screens", load, set.len());
                let result = set.prepare_all().map(|()| set);
                // Receiver gone means the manager was dropped; nothing left to swap into
                let _ = tx.send(result);
            })
            .map_err(|e| ScreenError::LoadWorkerSpawn {
                load,
                reason: e.to_string(),
            })?;

        self.job = LoadJob::Preparing(rx);
        Ok(())
    }

    fn poll_worker(&mut self, ctx: &mut ScreenContext<'_>) {
        let received = match &self.job {
            LoadJob::Preparing(rx) => rx.try_recv(),
            _ => return,
        };

        match received {
            Ok(Ok(set)) => {
                debug!(target: "screens::loading", "{} prepared", self.load);
                self.job = LoadJob::Ready(set);
            }
            Ok(Err(e)) => self.fail(ctx, e),
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                let load = self.load;
                self.fail(ctx, ScreenError::LoadWorkerLost(load));
            }
        }
    }

    fn prepare_inline(&mut self, ctx: &mut ScreenContext<'_>) {
        let LoadJob::Waiting(mut set) = std::mem::replace(&mut self.job, LoadJob::Done) else {
            return;
        };

        match set.prepare_all() {
            Ok(()) => self.job = LoadJob::Ready(set),
            Err(e) => self.fail(ctx, e),
        }
    }

    fn fail(&mut self, ctx: &mut ScreenContext<'_>, err: ScreenError) {
        error!(target: "screens::loading", "{} failed: {}", self.load, err);
        self.job = LoadJob::Done;
        ctx.report_failure(err);
        ctx.request_exit();
    }
}

impl Screen for LoadingScreen {
    fn name(&self) -> &'static str {
        "loading"
    }

    fn transition_on_time(&self) -> Duration {
        Duration::from_millis(500)
    }

    fn transition_off_time(&self) -> Duration {
        Duration::from_millis(500)
    }

    fn activate(
        &mut self,
        _ctx: &mut ScreenContext<'_>,
        _instance_preserved: bool,
    ) -> Result<(), ScreenError> {
        info!(target: "screens::loading", "{} started ({:?})", self.load, self.policy);
        match self.policy {
            LoadPolicy::Asynchronous => self.spawn_worker(),
            LoadPolicy::Synchronous => Ok(()),
        }
    }

    fn update(
        &mut self,
        ctx: &mut ScreenContext<'_>,
        _elapsed: Duration,
        _other_screen_has_focus: bool,
        _covered_by_other_screen: bool,
    ) {
        // Only swap once the gate fully hides the old stack
        let fully_on = ctx.state() == TransitionState::Active;

        match self.policy {
            LoadPolicy::Asynchronous => self.poll_worker(ctx),
            LoadPolicy::Synchronous if fully_on => self.prepare_inline(ctx),
            LoadPolicy::Synchronous => {}
        }

        if fully_on && matches!(self.job, LoadJob::Ready(_)) {
            if let LoadJob::Ready(set) = std::mem::replace(&mut self.job, LoadJob::Done) {
                info!(target: "screens::loading", "{} ready, swapping {} screens", self.load, set.len());
                ctx.finish_load(self.load, set);
            }
        }
    }

    fn render(&mut self, frame: &mut RenderFrame<'_>) {
        if !self.show_indicator {
            return;
        }

        const MESSAGE: &str = "Loading...";
        let viewport = frame.viewport();
        let size = frame.renderer.measure_text(MESSAGE);
        let position = Vec2::new(
            (viewport.width - size.x) / 2.0,
            (viewport.height - size.y) / 2.0,
        );
        let color = Color::WHITE.faded(frame.alpha());
        frame.renderer.draw_text(MESSAGE, position, color, 1.0);
    }
}

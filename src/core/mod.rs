//=========================================================================
// Frame Loop
//
// Drives the screen stack on its own thread at a fixed tick rate.
//
// Responsibilities:
// - Own the `ScreenManager`, the input snapshot and the renderer
// - Receive host events (input batches, suspend/resume, shutdown) via a
//   bounded crossbeam channel
// - Run one frame per tick: input snapshot → update → input → render
// - Keep pacing steady and stop cleanly on shutdown or quit
//
// Notes:
// The host never touches the manager once the loop is running. Everything
// it has to say arrives as a `HostEvent`, so the stack keeps a single
// writer for its whole life.
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::thread;
use std::time::{Duration, Instant};

//=== External Crates =====================================================
use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::{debug, info, warn};

//=== Internal Modules ====================================================
pub mod error;
pub mod flags;
pub mod input;
pub mod render;
pub mod screen;

use input::{InputEvent, InputState};
use render::Renderer;
use screen::ScreenManager;

//=== HostEvent ===========================================================
//
// Everything the host can tell the frame thread.
//
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Input gathered by the host since the last batch.
    Inputs(Vec<InputEvent>),

    /// Process is being backgrounded.
    Suspend,

    /// Process is back in the foreground.
    Resume,

    /// Stop the loop and tear the stack down.
    Shutdown,
}

//=== TickControl =========================================================
//
// Control flow for the frame loop.
//
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== FrameLoop ===========================================================
//
// Owns the stack plus the per-frame input snapshot.
//
pub(crate) struct FrameLoop {
    manager: ScreenManager,
    input: InputState,
    input_batches: Vec<Vec<InputEvent>>,
    suspended: bool,
}

impl FrameLoop {
    //--- Construction -----------------------------------------------------

    pub fn new(manager: ScreenManager) -> Self {
        Self {
            manager,
            input: InputState::new(),
            input_batches: Vec::with_capacity(8),
            suspended: false,
        }
    }

    pub fn manager(&self) -> &ScreenManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut ScreenManager {
        &mut self.manager
    }

    //--- spawn_frame_thread() ---------------------------------------------
    //
    // Spawns the thread that ticks the stack at `tps` frames per second.
    //
    // Each tick:
    //  1. Collects host events (waits up to one frame for the first)
    //  2. Runs one frame unless suspended
    //  3. Sleeps to maintain fixed pacing
    //
    // The renderer is handed back when the thread ends.
    //
    pub fn spawn_frame_thread<R>(
        self,
        receiver: Receiver<HostEvent>,
        tps: f64,
        renderer: R,
    ) -> std::io::Result<thread::JoinHandle<R>>
    where
        R: Renderer + Send + 'static,
    {
        let frame_duration = Duration::from_secs_f64(1.0 / tps);

        thread::Builder::new()
            .name("screens-frame".to_string())
            .spawn(move || {
                let mut frame_loop = self;
                let mut renderer = renderer;
                let mut last_frame = Instant::now();

                loop {
                    let frame_start = Instant::now();

                    //--- Step 1: Gather host events --------------------------
                    if frame_loop.collect_host_events(&receiver, frame_duration) == TickControl::Exit {
                        info!(target: "engine", "Frame thread received shutdown");
                        break;
                    }

                    //--- Step 2: Run one frame -------------------------------
                    let elapsed = frame_start.duration_since(last_frame);
                    last_frame = frame_start;
                    if frame_loop.tick(elapsed, &mut renderer) == TickControl::Exit {
                        info!(target: "engine", "Quit requested, frame thread exiting");
                        break;
                    }

                    //--- Step 3: Maintain pacing ----------------------------
                    let spent = frame_start.elapsed();
                    if spent < frame_duration {
                        thread::sleep(frame_duration - spent);
                    }
                }

                frame_loop.manager.shutdown();
                renderer
            })
    }

    //--- tick() -----------------------------------------------------------
    //
    // One frame of the stack. Pending input batches are folded into the
    // snapshot first so every screen sees the same state.
    //
    pub fn tick(&mut self, elapsed: Duration, renderer: &mut dyn Renderer) -> TickControl {
        self.input.begin_frame();
        for batch in self.input_batches.drain(..) {
            self.input.process_events(&batch);
        }

        if self.suspended {
            return TickControl::Continue;
        }

        self.manager.update(elapsed);
        self.manager.handle_input(elapsed, &self.input);
        self.manager.render(elapsed, renderer);

        for failure in self.manager.take_failures() {
            warn!(target: "engine", "'{}' failed: {}", failure.screen, failure.error);
        }

        if self.manager.flags().quit_requested {
            TickControl::Exit
        } else {
            TickControl::Continue
        }
    }

    //--- collect_host_events() --------------------------------------------
    //
    // Aggregates everything the host sent during this frame.
    //
    fn collect_host_events(&mut self, receiver: &Receiver<HostEvent>, frame_duration: Duration) -> TickControl {
        // Wait for at least one event this frame
        match receiver.recv_timeout(frame_duration) {
            Ok(event) => {
                if self.apply_host_event(event) == TickControl::Exit {
                    return TickControl::Exit;
                }
            }
            Err(RecvTimeoutError::Disconnected) => return TickControl::Exit,
            Err(RecvTimeoutError::Timeout) => {}
        }

        // Drain additional events queued during this frame
        while let Ok(event) = receiver.try_recv() {
            if self.apply_host_event(event) == TickControl::Exit {
                return TickControl::Exit;
            }
        }

        TickControl::Continue
    }

    pub(crate) fn apply_host_event(&mut self, event: HostEvent) -> TickControl {
        match event {
            HostEvent::Inputs(batch) => self.input_batches.push(batch),
            HostEvent::Suspend if !self.suspended => {
                debug!(target: "engine", "Suspending");
                self.suspended = true;
                self.manager.suspend();
            }
            HostEvent::Resume if self.suspended => {
                debug!(target: "engine", "Resuming");
                self.suspended = false;
                self.manager.resume();
            }
            HostEvent::Suspend | HostEvent::Resume => {}
            HostEvent::Shutdown => return TickControl::Exit,
        }
        TickControl::Continue
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

//=========================================================================
// Aetheric Screens Engine
//
// Host-facing entry point: configure, seed the stack, run it.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──spawn(renderer)──>  EngineHandle
//         │                          │                               │
//         ├─ with_tps()              └─ init(|manager| ...)          ├─ send_input()
//         ├─ with_channel_capacity()                                 ├─ suspend() / resume()
//         ├─ with_viewport()                                         └─ shutdown() → renderer
//         └─ with_difficulty()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread::JoinHandle;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::error::EngineError;
use crate::core::flags::{Difficulty, SessionFlags};
use crate::core::input::InputEvent;
use crate::core::render::{Renderer, Viewport};
use crate::core::screen::ScreenManager;
use crate::core::{FrameLoop, HostEvent};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (frames per second on the frame thread)
/// - **Channel capacity**: 128 host events
/// - **Viewport**: 1280 x 720
/// - **Difficulty**: 5 bullets, no snake, no blade
///
/// # Examples
///
/// ```no_run
/// use aetheric_screens::prelude::*;
/// use aetheric_screens::screens::menus;
///
/// let handle = EngineBuilder::new()
///     .with_tps(120.0)
///     .with_viewport(Viewport::new(800.0, 480.0))
///     .build()
///     .init(|manager| {
///         manager.push(BackgroundScreen::new(), None);
///         manager.push(menus::main_menu(), None);
///     })
///     .spawn(DrawList::new(Viewport::new(800.0, 480.0)))
///     .expect("frame thread");
///
/// let renderer = handle.shutdown().expect("clean shutdown");
/// # drop(renderer);
/// ```
pub struct EngineBuilder {
    tps: f64,
    channel_capacity: usize,
    viewport: Viewport,
    difficulty: Difficulty,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            viewport: Viewport::default(),
            difficulty: Difficulty::default(),
        }
    }

    /// Sets the target frames per second for the frame thread.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the capacity of the host → frame thread channel.
    ///
    /// A full channel blocks the host on send until the next tick drains it.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Sets the playable area handed to screens.
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Sets the difficulty the session starts with.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Builds the engine with an empty screen stack.
    pub fn build(self) -> Engine {
        info!(
            target: "engine",
            "Building engine (TPS: {}, channel: {}, viewport: {}x{})",
            self.tps, self.channel_capacity, self.viewport.width, self.viewport.height
        );

        let flags = SessionFlags::with_difficulty(self.difficulty);
        Engine {
            frame_loop: FrameLoop::new(ScreenManager::with_flags(self.viewport, flags)),
            tps: self.tps,
            channel_capacity: self.channel_capacity,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Configured but not yet running engine.
///
/// # Architecture
///
/// ```text
/// Host (any thread)
///   └─► EngineHandle ──HostEvent──► Frame Thread @ TPS
///                                     ├─► InputState
///                                     ├─► ScreenManager
///                                     └─► Renderer
/// ```
pub struct Engine {
    frame_loop: FrameLoop,
    tps: f64,
    channel_capacity: usize,
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Seeds the stack before the frame thread starts.
    ///
    /// Pushes made here are applied on the first frame.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut ScreenManager),
    {
        info!(target: "engine", "Initializing screen stack");
        init_fn(self.frame_loop.manager_mut());
        self
    }

    pub fn manager(&self) -> &ScreenManager {
        self.frame_loop.manager()
    }

    //--- Execution --------------------------------------------------------

    /// Starts the frame thread, which takes ownership of the stack and
    /// `renderer` until [`EngineHandle::shutdown`].
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the bounded host → frame thread channel
    /// 2. Spawns the frame thread running at the configured TPS
    /// 3. Returns immediately; the host drives it through the handle
    pub fn spawn<R>(self, renderer: R) -> Result<EngineHandle<R>, EngineError>
    where
        R: Renderer + Send + 'static,
    {
        info!(target: "engine", "Starting engine runtime (TPS: {})", self.tps);

        //--- 1. Create communication channel -----------------------------
        let (sender, receiver): (Sender<HostEvent>, Receiver<HostEvent>) = bounded(self.channel_capacity);

        //--- 2. Spawn the frame thread ------------------------------------
        let thread = self
            .frame_loop
            .spawn_frame_thread(receiver, self.tps, renderer)
            .map_err(|e| EngineError::FrameThreadSpawn(e.to_string()))?;

        info!(target: "engine", "Frame thread spawned");
        Ok(EngineHandle { sender, thread })
    }
}

//=== EngineHandle ========================================================

/// Host side of a running engine.
pub struct EngineHandle<R> {
    sender: Sender<HostEvent>,
    thread: JoinHandle<R>,
}

impl<R> EngineHandle<R> {
    /// Forwards a batch of input to the next frame.
    pub fn send_input(&self, events: Vec<InputEvent>) -> Result<(), EngineError> {
        self.send(HostEvent::Inputs(events))
    }

    /// Deactivates every screen and pauses frames.
    pub fn suspend(&self) -> Result<(), EngineError> {
        self.send(HostEvent::Suspend)
    }

    /// Re-activates every screen and resumes frames.
    pub fn resume(&self) -> Result<(), EngineError> {
        self.send(HostEvent::Resume)
    }

    /// Whether the frame thread has stopped (quit requested, or panicked).
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Stops the frame thread, unloads every screen, and returns the renderer.
    pub fn shutdown(self) -> Result<R, EngineError> {
        // Already gone if a screen requested quit
        let _ = self.sender.send(HostEvent::Shutdown);

        match self.thread.join() {
            Ok(renderer) => {
                info!(target: "engine", "Engine shutdown complete");
                Ok(renderer)
            }
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic payload".to_string());
                error!(target: "engine", "Frame thread panicked: {}", message);
                Err(EngineError::FrameThreadPanicked(message))
            }
        }
    }

    fn send(&self, event: HostEvent) -> Result<(), EngineError> {
        self.sender.send(event).map_err(|_| EngineError::ChannelClosed)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{KeyCode, PlayerIndex};
    use crate::core::render::DrawList;
    use crate::core::screen::{Screen, ScreenContext};
    use crate::core::render::RenderFrame;
    use crate::screens::menus;
    use std::time::Duration;

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.tps, 60.0);
        assert_eq!(builder.channel_capacity, 128);
        assert_eq!(builder.viewport, Viewport::default());
        assert_eq!(builder.difficulty, Difficulty::default());
    }

    #[test]
    fn builder_with_tps() {
        let builder = EngineBuilder::new().with_tps(120.0);
        assert_eq!(builder.tps, 120.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_zero() {
        EngineBuilder::new().with_tps(0.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_negative() {
        EngineBuilder::new().with_tps(-60.0);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        EngineBuilder::new().with_channel_capacity(0);
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let difficulty = Difficulty {
            bullet_count: 20,
            snake_enabled: true,
            blade_enabled: false,
        };
        let engine = EngineBuilder::new()
            .with_tps(120.0)
            .with_channel_capacity(256)
            .with_viewport(Viewport::new(640.0, 480.0))
            .with_difficulty(difficulty)
            .build();

        assert_eq!(engine.tps, 120.0);
        assert_eq!(engine.channel_capacity, 256);
        assert_eq!(engine.manager().viewport(), Viewport::new(640.0, 480.0));
        assert_eq!(engine.manager().flags().difficulty, difficulty);
    }

    #[test]
    fn init_seeds_pending_stack() {
        let engine = EngineBuilder::new().build().init(|manager| {
            manager.push(menus::main_menu(), None);
        });
        assert!(engine.manager().has_pending());
    }

    //=====================================================================
    // Runtime Tests
    //=====================================================================

    #[test]
    fn spawn_and_shutdown_returns_renderer() {
        let viewport = Viewport::new(320.0, 240.0);
        let handle = EngineBuilder::new()
            .with_tps(240.0)
            .with_viewport(viewport)
            .build()
            .init(|manager| {
                manager.push(menus::main_menu(), None);
            })
            .spawn(DrawList::new(viewport))
            .unwrap();

        std::thread::sleep(Duration::from_millis(50));
        let draw = handle.shutdown().unwrap();
        assert!(draw.texts().any(|t| t == "Main Menu"));
    }

    #[test]
    fn quit_from_menu_stops_frame_thread() {
        let handle = EngineBuilder::new()
            .with_tps(240.0)
            .build()
            .init(|manager| {
                manager.push(menus::main_menu(), None);
            })
            .spawn(DrawList::default())
            .unwrap();

        let press = |key| {
            vec![InputEvent::KeyDown {
                player: PlayerIndex::One,
                key,
            }]
        };
        let release = |key| {
            vec![InputEvent::KeyUp {
                player: PlayerIndex::One,
                key,
            }]
        };

        // Escape on the main menu asks to exit; Enter confirms
        handle.send_input(press(KeyCode::Escape)).unwrap();
        std::thread::sleep(Duration::from_millis(40));
        handle.send_input(release(KeyCode::Escape)).unwrap();
        std::thread::sleep(Duration::from_millis(40));
        for _ in 0..50 {
            if handle.is_finished() {
                break;
            }
            let _ = handle.send_input(press(KeyCode::Enter));
            std::thread::sleep(Duration::from_millis(20));
            let _ = handle.send_input(release(KeyCode::Enter));
            std::thread::sleep(Duration::from_millis(20));
        }

        assert!(handle.is_finished());
        assert!(handle.shutdown().is_ok());
    }

    #[test]
    fn panicking_screen_is_reported() {
        struct Faulty;
        impl Screen for Faulty {
            fn update(&mut self, _: &mut ScreenContext<'_>, _: Duration, _: bool, _: bool) {
                panic!("faulty screen");
            }
            fn render(&mut self, _: &mut RenderFrame<'_>) {}
        }

        let handle = EngineBuilder::new()
            .build()
            .init(|manager| {
                manager.push(Faulty, None);
            })
            .spawn(DrawList::default())
            .unwrap();

        std::thread::sleep(Duration::from_millis(50));
        match handle.shutdown() {
            Err(EngineError::FrameThreadPanicked(message)) => assert!(message.contains("faulty screen")),
            other => panic!("expected a panic report, got {:?}", other.map(|_| ())),
        }
    }
}

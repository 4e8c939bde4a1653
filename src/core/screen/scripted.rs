//=========================================================================
// Scripted Screen (test support)
//=========================================================================
//
// Configurable screen that records every callback it receives into a
// shared log, so tests can assert on ordering and flags after the
// manager has taken ownership of it.
//
//=========================================================================

use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{Screen, ScreenContext, TransitionState};
use crate::core::error::ScreenError;
use crate::core::input::InputState;
use crate::core::render::RenderFrame;

//=== Call ================================================================

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Prepare,
    Activate { preserved: bool },
    Deactivate,
    Unload,
    Update {
        other_screen_has_focus: bool,
        covered_by_other_screen: bool,
        state: TransitionState,
        progress: f32,
    },
    Input,
    Render { alpha: f32 },
}

impl Call {
    fn kind(&self) -> &'static str {
        match self {
            Self::Prepare => "prepare",
            Self::Activate { .. } => "activate",
            Self::Deactivate => "deactivate",
            Self::Unload => "unload",
            Self::Update { .. } => "update",
            Self::Input => "input",
            Self::Render { .. } => "render",
        }
    }
}

//=== CallLog =============================================================

#[derive(Clone, Default)]
pub(crate) struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    fn record(&self, event: Call) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().iter().map(Call::kind).collect()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|e| e.kind() == kind).count()
    }

    /// `(other_screen_has_focus, covered_by_other_screen)` of the last update.
    pub fn last_update_flags(&self) -> Option<(bool, bool)> {
        self.0.lock().unwrap().iter().rev().find_map(|e| match e {
            Call::Update {
                other_screen_has_focus,
                covered_by_other_screen,
                ..
            } => Some((*other_screen_has_focus, *covered_by_other_screen)),
            _ => None,
        })
    }

    pub fn last_alpha(&self) -> Option<f32> {
        self.0.lock().unwrap().iter().rev().find_map(|e| match e {
            Call::Render { alpha } => Some(*alpha),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

//=== Scripted ============================================================

type Script = Box<dyn FnMut(&mut ScreenContext<'_>) + Send>;

pub(crate) struct Scripted {
    name: &'static str,
    log: CallLog,
    popup: bool,
    on: Duration,
    off: Duration,
    fail_prepare: bool,
    fail_activate: bool,
    fail_resume: bool,
    panic_prepare: bool,
    requires_player: bool,
    passes_input: bool,
    hides: bool,
    on_update: Option<Script>,
    on_input: Option<Script>,
}

impl Scripted {
    pub fn new(name: &'static str) -> (Self, CallLog) {
        let log = CallLog::default();
        let scripted = Self {
            name,
            log: log.clone(),
            popup: false,
            on: Duration::ZERO,
            off: Duration::ZERO,
            fail_prepare: false,
            fail_activate: false,
            fail_resume: false,
            panic_prepare: false,
            requires_player: false,
            passes_input: false,
            hides: true,
            on_update: None,
            on_input: None,
        };
        (scripted, log)
    }

    pub fn popup(mut self) -> Self {
        self.popup = true;
        self
    }

    pub fn durations(mut self, on_ms: u64, off_ms: u64) -> Self {
        self.on = Duration::from_millis(on_ms);
        self.off = Duration::from_millis(off_ms);
        self
    }

    pub fn fail_prepare(mut self) -> Self {
        self.fail_prepare = true;
        self
    }

    pub fn fail_activate(mut self) -> Self {
        self.fail_activate = true;
        self
    }

    /// Fails only re-activation after a suspend.
    pub fn fail_resume(mut self) -> Self {
        self.fail_resume = true;
        self
    }

    /// Panics inside `prepare`, taking a loading worker down with it.
    pub fn panic_prepare(mut self) -> Self {
        self.panic_prepare = true;
        self
    }

    pub fn requires_player(mut self) -> Self {
        self.requires_player = true;
        self
    }

    pub fn passes_input(mut self) -> Self {
        self.passes_input = true;
        self
    }

    pub fn keep_when_covered(mut self) -> Self {
        self.hides = false;
        self
    }

    pub fn on_update(mut self, script: impl FnMut(&mut ScreenContext<'_>) + Send + 'static) -> Self {
        self.on_update = Some(Box::new(script));
        self
    }

    pub fn on_input(mut self, script: impl FnMut(&mut ScreenContext<'_>) + Send + 'static) -> Self {
        self.on_input = Some(Box::new(script));
        self
    }
}

impl Screen for Scripted {
    fn name(&self) -> &'static str {
        self.name
    }

    fn transition_on_time(&self) -> Duration {
        self.on
    }

    fn transition_off_time(&self) -> Duration {
        self.off
    }

    fn is_popup(&self) -> bool {
        self.popup
    }

    fn hides_when_covered(&self) -> bool {
        self.hides
    }

    fn passes_input_through(&self) -> bool {
        self.passes_input
    }

    fn requires_controlling_player(&self) -> bool {
        self.requires_player
    }

    fn prepare(&mut self) -> Result<(), ScreenError> {
        self.log.record(Call::Prepare);
        if self.panic_prepare {
            panic!("'{}' blew up while preparing", self.name);
        }
        if self.fail_prepare {
            return Err(ScreenError::resource(self.name, "scripted.asset", "missing"));
        }
        Ok(())
    }

    fn activate(&mut self, _ctx: &mut ScreenContext<'_>, instance_preserved: bool) -> Result<(), ScreenError> {
        self.log.record(Call::Activate {
            preserved: instance_preserved,
        });
        if self.fail_activate || (self.fail_resume && instance_preserved) {
            return Err(ScreenError::resource(self.name, "scripted.device", "unavailable"));
        }
        Ok(())
    }

    fn deactivate(&mut self, _ctx: &mut ScreenContext<'_>) {
        self.log.record(Call::Deactivate);
    }

    fn unload(&mut self) {
        self.log.record(Call::Unload);
    }

    fn update(
        &mut self,
        ctx: &mut ScreenContext<'_>,
        _elapsed: Duration,
        other_screen_has_focus: bool,
        covered_by_other_screen: bool,
    ) {
        self.log.record(Call::Update {
            other_screen_has_focus,
            covered_by_other_screen,
            state: ctx.state(),
            progress: ctx.progress(),
        });
        if let Some(script) = self.on_update.as_mut() {
            script(ctx);
        }
    }

    fn handle_input(&mut self, ctx: &mut ScreenContext<'_>, _elapsed: Duration, _input: &InputState) {
        self.log.record(Call::Input);
        if let Some(script) = self.on_input.as_mut() {
            script(ctx);
        }
    }

    fn render(&mut self, frame: &mut RenderFrame<'_>) {
        self.log.record(Call::Render { alpha: frame.alpha() });
    }
}

//=========================================================================
// Menus
//=========================================================================
//
// Vertical list of selectable entries, plus the generic screen that
// hosts one.
//
// Layout:
//   title centered at y = 80, slid up while transitioning
//   entries stacked from y = 175, slid left when entering, right when
//   leaving; the selected entry pulses and is drawn yellow
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::error::ScreenError;
use crate::core::flags::SessionFlags;
use crate::core::input::{InputState, MenuActions, PlayerIndex};
use crate::core::render::{Color, RenderFrame, Vec2};
use crate::core::screen::{Screen, ScreenContext, TransitionState};

//=== MenuEntry ===========================================================

/// Callback run when an entry is chosen, with the player who chose it.
pub type MenuHandler = Box<dyn FnMut(&mut ScreenContext<'_>, PlayerIndex) + Send>;

/// One line of a menu.
pub struct MenuEntry {
    text: String,
    handler: Option<MenuHandler>,
    selection_fade: f32,
}

impl MenuEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            handler: None,
            selection_fade: 0.0,
        }
    }

    pub fn on_selected<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&mut ScreenContext<'_>, PlayerIndex) + Send + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// 0 when unselected, easing to 1 while selected.
    pub fn selection_fade(&self) -> f32 {
        self.selection_fade
    }

    fn update(&mut self, selected: bool, elapsed: Duration) {
        let speed = elapsed.as_secs_f32() * 4.0;
        self.selection_fade = if selected {
            (self.selection_fade + speed).min(1.0)
        } else {
            (self.selection_fade - speed).max(0.0)
        };
    }

    fn select(&mut self, ctx: &mut ScreenContext<'_>, player: PlayerIndex) {
        if let Some(handler) = self.handler.as_mut() {
            handler(ctx, player);
        }
    }
}

//=== MenuList ============================================================

/// What a frame of menu input amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    Idle,
    Moved,
    Selected { index: usize, player: PlayerIndex },
    Cancelled { player: PlayerIndex },
}

/// Title plus entries with a wrapping selection.
pub struct MenuList {
    title: String,
    entries: Vec<MenuEntry>,
    selected: usize,
    actions: MenuActions,
    time: f32,
}

impl MenuList {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
            selected: 0,
            actions: MenuActions::default(),
            time: 0.0,
        }
    }

    pub fn with_entry(mut self, entry: MenuEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut MenuEntry> {
        self.entries.get_mut(index)
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    //--- Frame ------------------------------------------------------------

    /// Reads navigation for `controlling` (anyone when `None`).
    pub fn handle_input(&mut self, input: &InputState, controlling: Option<PlayerIndex>) -> MenuOutcome {
        let count = self.entries.len();

        if count > 0 && self.actions.up.evaluate(input, controlling).is_some() {
            self.selected = (self.selected + count - 1) % count;
            return MenuOutcome::Moved;
        }

        if count > 0 && self.actions.down.evaluate(input, controlling).is_some() {
            self.selected = (self.selected + 1) % count;
            return MenuOutcome::Moved;
        }

        if let Some(player) = self.actions.select.evaluate(input, controlling) {
            if count > 0 {
                return MenuOutcome::Selected {
                    index: self.selected,
                    player,
                };
            }
        }

        if let Some(player) = self.actions.cancel.evaluate(input, controlling) {
            return MenuOutcome::Cancelled { player };
        }

        MenuOutcome::Idle
    }

    pub fn update(&mut self, elapsed: Duration) {
        self.time += elapsed.as_secs_f32();
        let selected = self.selected;
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.update(i == selected, elapsed);
        }
    }

    pub fn render(&self, frame: &mut RenderFrame<'_>) {
        let offset = frame.slide_offset();
        let entering = frame.state() == TransitionState::TransitionOn;
        let alpha = frame.alpha();
        let center_x = frame.viewport().width / 2.0;
        let pulsate = (self.time * 6.0).sin() + 1.0;

        let mut y = 175.0;
        for (i, entry) in self.entries.iter().enumerate() {
            let size = frame.renderer.measure_text(&entry.text);
            let mut x = center_x - size.x / 2.0;
            if entering {
                x -= offset * 256.0;
            } else {
                x += offset * 512.0;
            }

            let color = if i == self.selected { Color::YELLOW } else { Color::WHITE };
            let scale = 1.0 + pulsate * 0.05 * entry.selection_fade;
            frame
                .renderer
                .draw_text(&entry.text, Vec2::new(x, y), color.faded(alpha), scale);
            y += size.y;
        }

        const TITLE_SCALE: f32 = 1.25;
        let size = frame.renderer.measure_text(&self.title) * TITLE_SCALE;
        let position = Vec2::new(center_x - size.x / 2.0, 80.0 - offset * 100.0 - size.y / 2.0);
        frame
            .renderer
            .draw_text(&self.title, position, Color::TITLE.faded(alpha), TITLE_SCALE);
    }
}

//=== MenuScreen ==========================================================

/// Rewrites entry texts from the current flags before each update.
pub type MenuRefresh = fn(&SessionFlags, &mut MenuList);

/// Screen hosting a [`MenuList`].
///
/// Cancel exits the screen unless a cancel handler is set.
pub struct MenuScreen {
    name: &'static str,
    menu: MenuList,
    on_cancel: Option<MenuHandler>,
    refresh: Option<MenuRefresh>,
}

impl MenuScreen {
    pub fn new(name: &'static str, menu: MenuList) -> Self {
        Self {
            name,
            menu,
            on_cancel: None,
            refresh: None,
        }
    }

    pub fn on_cancel<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&mut ScreenContext<'_>, PlayerIndex) + Send + 'static,
    {
        self.on_cancel = Some(Box::new(handler));
        self
    }

    pub fn with_refresh(mut self, refresh: MenuRefresh) -> Self {
        self.refresh = Some(refresh);
        self
    }

    pub fn menu(&self) -> &MenuList {
        &self.menu
    }
}

impl Screen for MenuScreen {
    fn name(&self) -> &'static str {
        self.name
    }

    fn transition_on_time(&self) -> Duration {
        Duration::from_millis(500)
    }

    fn transition_off_time(&self) -> Duration {
        Duration::from_millis(500)
    }

    fn activate(&mut self, ctx: &mut ScreenContext<'_>, _instance_preserved: bool) -> Result<(), ScreenError> {
        if let Some(refresh) = self.refresh {
            refresh(ctx.flags(), &mut self.menu);
        }
        Ok(())
    }

    fn update(
        &mut self,
        ctx: &mut ScreenContext<'_>,
        elapsed: Duration,
        _other_screen_has_focus: bool,
        _covered_by_other_screen: bool,
    ) {
        if let Some(refresh) = self.refresh {
            refresh(ctx.flags(), &mut self.menu);
        }
        self.menu.update(elapsed);
    }

    fn handle_input(&mut self, ctx: &mut ScreenContext<'_>, _elapsed: Duration, input: &InputState) {
        match self.menu.handle_input(input, ctx.controlling_player()) {
            MenuOutcome::Selected { index, player } => {
                if let Some(entry) = self.menu.entries.get_mut(index) {
                    entry.select(ctx, player);
                }
            }
            MenuOutcome::Cancelled { player } => match self.on_cancel.as_mut() {
                Some(handler) => handler(ctx, player),
                None => ctx.request_exit(),
            },
            MenuOutcome::Moved | MenuOutcome::Idle => {}
        }
    }

    fn render(&mut self, frame: &mut RenderFrame<'_>) {
        self.menu.render(frame);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

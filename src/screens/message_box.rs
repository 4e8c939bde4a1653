//=========================================================================
// Message Box
//=========================================================================
//
// Confirmation popup. Darkens whatever is beneath it and waits for the
// player to accept or cancel, then exits itself.
//
//=========================================================================

use std::time::Duration;

use crate::core::input::{InputState, MenuActions, PlayerIndex};
use crate::core::render::{Color, Rect, RenderFrame, Vec2};
use crate::core::screen::{Screen, ScreenContext};
use crate::screens::menu::MenuHandler;

const USAGE: &str = "A button, Space, Enter = ok\nB button, Esc = cancel";
const LINE_PADDING: f32 = 32.0;
const BOX_PADDING: Vec2 = Vec2::new(32.0, 16.0);

/// Popup asking a yes/no question.
pub struct MessageBoxScreen {
    message: String,
    actions: MenuActions,
    on_accepted: Option<MenuHandler>,
    on_cancelled: Option<MenuHandler>,
}

impl MessageBoxScreen {
    /// Creates a box showing `message` followed by the key legend.
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_usage(message, true)
    }

    pub fn with_usage(message: impl Into<String>, include_usage: bool) -> Self {
        let message = message.into();
        let message = if include_usage {
            format!("{}\n{}", message, USAGE)
        } else {
            message
        };

        Self {
            message,
            actions: MenuActions::default(),
            on_accepted: None,
            on_cancelled: None,
        }
    }

    pub fn on_accepted<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&mut ScreenContext<'_>, PlayerIndex) + Send + 'static,
    {
        self.on_accepted = Some(Box::new(handler));
        self
    }

    pub fn on_cancelled<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&mut ScreenContext<'_>, PlayerIndex) + Send + 'static,
    {
        self.on_cancelled = Some(Box::new(handler));
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Screen for MessageBoxScreen {
    fn name(&self) -> &'static str {
        "message box"
    }

    fn transition_on_time(&self) -> Duration {
        Duration::from_millis(200)
    }

    fn transition_off_time(&self) -> Duration {
        Duration::from_millis(200)
    }

    fn is_popup(&self) -> bool {
        true
    }

    fn handle_input(&mut self, ctx: &mut ScreenContext<'_>, _elapsed: Duration, input: &InputState) {
        let controlling = ctx.controlling_player();

        if let Some(player) = self.actions.select.evaluate(input, controlling) {
            if let Some(handler) = self.on_accepted.as_mut() {
                handler(ctx, player);
            }
            ctx.request_exit();
        } else if let Some(player) = self.actions.cancel.evaluate(input, controlling) {
            if let Some(handler) = self.on_cancelled.as_mut() {
                handler(ctx, player);
            }
            ctx.request_exit();
        }
    }

    fn render(&mut self, frame: &mut RenderFrame<'_>) {
        let alpha = frame.alpha();
        frame.renderer.fade_to_black(alpha * 2.0 / 3.0);

        let viewport = frame.viewport();
        let text_size = frame.renderer.measure_text(&self.message);
        let text_position = Vec2::new(
            (viewport.width - text_size.x) / 2.0,
            (viewport.height - text_size.y) / 2.0,
        );

        let backdrop = Rect::new(
            text_position.x - BOX_PADDING.x,
            text_position.y - BOX_PADDING.y,
            text_size.x + BOX_PADDING.x * 2.0,
            text_size.y + BOX_PADDING.y * 2.0 + LINE_PADDING,
        );

        let color = Color::WHITE.faded(alpha);
        frame.renderer.draw_sprite("gradient", backdrop, color);
        frame.renderer.draw_text(&self.message, text_position, color, 1.0);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

//=========================================================================
// Background
//=========================================================================
//
// Full-screen backdrop that sits at the bottom of the menu stack. It stays
// fully on regardless of what covers it.
//
//=========================================================================

use std::time::Duration;

use crate::core::render::{Color, RenderFrame};
use crate::core::screen::Screen;

/// Sprite stretched over the viewport.
pub struct BackgroundScreen {
    sprite: &'static str,
}

impl BackgroundScreen {
    pub fn new() -> Self {
        Self::with_sprite("background")
    }

    pub fn with_sprite(sprite: &'static str) -> Self {
        Self { sprite }
    }
}

impl Default for BackgroundScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for BackgroundScreen {
    fn name(&self) -> &'static str {
        "background"
    }

    fn transition_on_time(&self) -> Duration {
        Duration::from_millis(500)
    }

    fn transition_off_time(&self) -> Duration {
        Duration::from_millis(500)
    }

    fn hides_when_covered(&self) -> bool {
        false
    }

    fn render(&mut self, frame: &mut RenderFrame<'_>) {
        let bounds = frame.viewport().bounds();
        let color = Color::WHITE.faded(frame.alpha());
        frame.renderer.draw_sprite(self.sprite, bounds, color);
    }
}

//=========================================================================
// Controls
//=========================================================================
//
// Static picture of the controller layout, reached from the main menu.
// Only its controlling player can dismiss it.
//
//=========================================================================

use std::time::Duration;

use log::debug;

use crate::core::error::ScreenError;
use crate::core::input::{InputState, MenuActions};
use crate::core::render::{Color, Rect, RenderFrame};
use crate::core::screen::{Screen, ScreenContext};

/// Fraction of each viewport edge kept clear of the picture.
const TITLE_SAFE_INSET: f32 = 0.05;

pub struct ControlsScreen {
    sprite: &'static str,
    actions: MenuActions,
}

impl ControlsScreen {
    pub fn new() -> Self {
        Self::with_sprite("controls")
    }

    pub fn with_sprite(sprite: &'static str) -> Self {
        Self {
            sprite,
            actions: MenuActions::default(),
        }
    }
}

impl Default for ControlsScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for ControlsScreen {
    fn name(&self) -> &'static str {
        "controls"
    }

    fn transition_on_time(&self) -> Duration {
        Duration::from_millis(500)
    }

    fn transition_off_time(&self) -> Duration {
        Duration::from_millis(500)
    }

    fn activate(&mut self, _ctx: &mut ScreenContext<'_>, instance_preserved: bool) -> Result<(), ScreenError> {
        if !instance_preserved {
            debug!(target: "screens", "Showing controls sprite '{}'", self.sprite);
        }
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut ScreenContext<'_>, _elapsed: Duration, input: &InputState) {
        let controlling = ctx.controlling_player();
        if self.actions.cancel.evaluate(input, controlling).is_some() {
            ctx.request_exit();
        }
    }

    fn render(&mut self, frame: &mut RenderFrame<'_>) {
        let viewport = frame.viewport();
        let inset_x = viewport.width * TITLE_SAFE_INSET;
        let inset_y = viewport.height * TITLE_SAFE_INSET;
        let area = Rect::new(
            inset_x,
            inset_y,
            viewport.width - inset_x * 2.0,
            viewport.height - inset_y * 2.0,
        );

        let color = Color::WHITE.faded(frame.alpha());
        frame.renderer.draw_sprite(self.sprite, area, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputEvent, KeyCode, PlayerIndex};
    use crate::core::render::{DrawCommand, DrawList, Viewport};
    use crate::core::screen::ScreenManager;

    const DT: Duration = Duration::from_millis(100);

    fn escape(player: PlayerIndex) -> InputState {
        let mut input = InputState::new();
        input.begin_frame();
        input.process_events(&[InputEvent::KeyDown {
            player,
            key: KeyCode::Escape,
        }]);
        input
    }

    #[test]
    fn draws_picture_inside_title_safe_area() {
        let mut manager = ScreenManager::new(Viewport::new(800.0, 600.0));
        manager.push(ControlsScreen::new(), Some(PlayerIndex::One));
        manager.update(Duration::from_millis(500));

        let mut draw = DrawList::new(manager.viewport());
        manager.render(DT, &mut draw);
        match &draw.commands()[0] {
            DrawCommand::Sprite { sprite, rect, .. } => {
                assert_eq!(sprite, "controls");
                let expected = [40.0, 30.0, 720.0, 540.0];
                let actual = [rect.x, rect.y, rect.width, rect.height];
                for (a, e) in actual.iter().zip(expected) {
                    assert!((a - e).abs() < 1e-3, "{:?} != {:?}", actual, expected);
                }
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn only_controlling_player_dismisses() {
        let mut manager = ScreenManager::new(Viewport::new(800.0, 600.0));
        let id = manager.push(ControlsScreen::new(), Some(PlayerIndex::One));
        manager.update(DT);

        manager.handle_input(DT, &escape(PlayerIndex::Two));
        manager.update(DT);
        assert!(manager.state_of(id).is_some_and(|s| s.accepts_input()));

        manager.handle_input(DT, &escape(PlayerIndex::One));
        manager.update(DT);
        assert!(manager.state_of(id).is_some_and(|s| !s.accepts_input()));
    }
}

//=========================================================================
// Gameplay
//=========================================================================
//
// The playable screen: one player square moved by keys, stick or touch,
// a survival timer, and the start / pause prompts layered on top.
//
// Flags:
//   activate     start_game = false, pause_game = true
//   first update pause_game && !start_game → push start prompt
//   start prompt "Ok! Let's go!" sets start_game
//
// The timer only runs while no other screen holds focus. When covered
// the screen dims instead of hiding, so prompts show the frozen game
// beneath them.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::error::ScreenError;
use crate::core::input::{InputAction, InputState, KeyCode, MenuActions, PlayerIndex};
use crate::core::render::{Color, Rect, RenderFrame, Vec2};
use crate::core::screen::{Screen, ScreenContext};
use crate::screens::menus;

//=== Constants ===========================================================

const PLAYER_SIZE: f32 = 32.0;
const PLAYER_SPEED: f32 = 10.0;

/// Pause dimming change per update.
const PAUSE_FADE_STEP: f32 = 1.0 / 32.0;

//=== GameplayScreen ======================================================

pub struct GameplayScreen {
    player_position: Vec2,
    timer: f32,
    pause_alpha: f32,
    pause_action: InputAction,
    assets_ready: bool,
}

impl GameplayScreen {
    pub fn new() -> Self {
        Self {
            player_position: Vec2::ZERO,
            timer: 0.0,
            pause_alpha: 0.0,
            pause_action: MenuActions::default().pause,
            assets_ready: false,
        }
    }

    pub fn player_position(&self) -> Vec2 {
        self.player_position
    }

    /// Seconds survived so far.
    pub fn elapsed_seconds(&self) -> f32 {
        self.timer
    }

    pub fn pause_alpha(&self) -> f32 {
        self.pause_alpha
    }

    fn movement(&self, input: &InputState, player: PlayerIndex) -> Vec2 {
        let mut movement = Vec2::ZERO;

        if input.is_key_down(KeyCode::ArrowLeft, player) {
            movement.x -= 1.0;
        }
        if input.is_key_down(KeyCode::ArrowRight, player) {
            movement.x += 1.0;
        }
        if input.is_key_down(KeyCode::ArrowUp, player) {
            movement.y -= 1.0;
        }
        if input.is_key_down(KeyCode::ArrowDown, player) {
            movement.y += 1.0;
        }

        // Stick y points up, screen y points down
        let stick = input.left_stick(player);
        movement.x += stick.x;
        movement.y -= stick.y;

        if let Some(&touch) = input.touches().first() {
            movement = movement + (touch - self.player_position).normalized();
        }

        if movement.length() > 1.0 {
            movement.normalized()
        } else {
            movement
        }
    }
}

impl Default for GameplayScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for GameplayScreen {
    fn name(&self) -> &'static str {
        "gameplay"
    }

    fn transition_on_time(&self) -> Duration {
        Duration::from_millis(1500)
    }

    fn transition_off_time(&self) -> Duration {
        Duration::from_millis(500)
    }

    fn hides_when_covered(&self) -> bool {
        false
    }

    fn requires_controlling_player(&self) -> bool {
        true
    }

    fn prepare(&mut self) -> Result<(), ScreenError> {
        if !self.assets_ready {
            debug!(target: "screens::loading", "Loading gameplay assets");
            self.assets_ready = true;
        }
        Ok(())
    }

    fn activate(&mut self, ctx: &mut ScreenContext<'_>, instance_preserved: bool) -> Result<(), ScreenError> {
        if instance_preserved {
            return Ok(());
        }

        self.prepare()?;

        let flags = ctx.flags_mut();
        flags.start_game = false;
        flags.pause_game = true;

        let half = PLAYER_SIZE / 2.0;
        self.player_position = ctx.viewport().center() - Vec2::new(half, half);
        self.timer = 0.0;
        Ok(())
    }

    fn deactivate(&mut self, _ctx: &mut ScreenContext<'_>) {
        self.timer = 0.0;
    }

    fn update(
        &mut self,
        ctx: &mut ScreenContext<'_>,
        elapsed: Duration,
        _other_screen_has_focus: bool,
        covered_by_other_screen: bool,
    ) {
        self.pause_alpha = if covered_by_other_screen {
            (self.pause_alpha + PAUSE_FADE_STEP).min(1.0)
        } else {
            (self.pause_alpha - PAUSE_FADE_STEP).max(0.0)
        };

        let waiting_for_start = {
            let flags = ctx.flags_mut();
            let waiting = !flags.start_game && flags.pause_game;
            if waiting {
                flags.pause_game = false;
            }
            waiting
        };

        if waiting_for_start {
            let player = ctx.controlling_player();
            ctx.request_push(menus::start_prompt(), player);
        } else if ctx.is_active() {
            self.timer += elapsed.as_secs_f32();
        }
    }

    fn handle_input(&mut self, ctx: &mut ScreenContext<'_>, _elapsed: Duration, input: &InputState) {
        let player = ctx.require_player();

        let paused = self.pause_action.evaluate(input, Some(player)).is_some();
        if paused || input.gamepad_disconnected(player) {
            ctx.request_push(menus::pause_prompt(), Some(player));
            return;
        }

        let movement = self.movement(input, player);
        let bounds = ctx.viewport();
        let next = self.player_position + movement * PLAYER_SPEED;
        self.player_position = Vec2::new(
            next.x.clamp(0.0, (bounds.width - PLAYER_SIZE).max(0.0)),
            next.y.clamp(0.0, (bounds.height - PLAYER_SIZE).max(0.0)),
        );
    }

    fn render(&mut self, frame: &mut RenderFrame<'_>) {
        frame.renderer.clear(Color::CORNFLOWER_BLUE);

        let player = Rect::new(
            self.player_position.x,
            self.player_position.y,
            PLAYER_SIZE,
            PLAYER_SIZE,
        );
        frame.renderer.draw_sprite("player", player, Color::WHITE);
        frame
            .renderer
            .draw_text(&format!("{:.2}", self.timer), Vec2::new(100.0, 100.0), Color::WHITE, 1.0);

        let transition_alpha = frame.alpha();
        if transition_alpha < 1.0 || self.pause_alpha > 0.0 {
            let from = 1.0 - transition_alpha;
            let fade = from + (1.0 - from) * (self.pause_alpha / 2.0);
            frame.renderer.fade_to_black(fade);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::InputEvent;
    use crate::core::render::{DrawCommand, DrawList, Viewport};
    use crate::core::screen::{ScreenManager, TransitionState};

    const VIEWPORT: Viewport = Viewport::new(800.0, 600.0);
    const DT: Duration = Duration::from_millis(100);

    fn input(events: &[InputEvent]) -> InputState {
        let mut state = InputState::new();
        state.begin_frame();
        state.process_events(events);
        state
    }

    fn names(manager: &ScreenManager) -> Vec<&'static str> {
        manager.screens().iter().map(|s| s.name).collect()
    }

    #[test]
    fn refuses_push_without_player() {
        let mut manager = ScreenManager::new(VIEWPORT);
        manager.push(GameplayScreen::new(), None);
        manager.update(DT);

        assert!(manager.is_empty());
        assert!(matches!(
            manager.take_failures()[0].error,
            ScreenError::MissingControllingPlayer { screen: "gameplay" }
        ));
    }

    #[test]
    fn first_update_pushes_start_prompt() {
        let mut manager = ScreenManager::new(VIEWPORT);
        manager.push(GameplayScreen::new(), Some(PlayerIndex::One));

        manager.update(DT);
        assert!(!manager.flags().start_game);
        assert!(!manager.flags().pause_game);
        assert!(manager.has_pending());

        manager.update(DT);
        assert_eq!(names(&manager), vec!["gameplay", "start prompt"]);
        assert_eq!(manager.screens()[1].controlling_player, Some(PlayerIndex::One));
    }

    #[test]
    fn moves_and_clamps_to_viewport() {
        let mut screen = GameplayScreen::new();
        screen.player_position = Vec2::new(5.0, 300.0);

        let held = input(&[
            InputEvent::KeyDown {
                player: PlayerIndex::One,
                key: KeyCode::ArrowLeft,
            },
            InputEvent::KeyDown {
                player: PlayerIndex::One,
                key: KeyCode::ArrowUp,
            },
        ]);
        let movement = screen.movement(&held, PlayerIndex::One);
        assert!((movement.length() - 1.0).abs() < 1e-4);

        let mut manager = ScreenManager::new(VIEWPORT);
        manager.push(screen, Some(PlayerIndex::One));
        manager.update(DT);
        // Activation recenters; walk to the left edge
        for _ in 0..100 {
            manager.handle_input(DT, &held);
        }

        let mut draw = DrawList::new(VIEWPORT);
        manager.render(DT, &mut draw);
        let sprite = draw.commands().iter().find_map(|c| match c {
            DrawCommand::Sprite { rect, .. } => Some(*rect),
            _ => None,
        });
        let rect = sprite.unwrap();
        assert_eq!((rect.x, rect.y), (0.0, 0.0));
    }

    #[test]
    fn other_players_do_not_move_the_square() {
        let screen = GameplayScreen::new();
        let held = input(&[InputEvent::KeyDown {
            player: PlayerIndex::Two,
            key: KeyCode::ArrowRight,
        }]);
        assert_eq!(screen.movement(&held, PlayerIndex::One), Vec2::ZERO);
    }

    #[test]
    fn pause_and_disconnect_push_pause_prompt() {
        let mut manager = ScreenManager::new(VIEWPORT);
        manager.push(GameplayScreen::new(), Some(PlayerIndex::One));
        manager.update(DT);

        manager.handle_input(
            DT,
            &input(&[InputEvent::KeyDown {
                player: PlayerIndex::One,
                key: KeyCode::Escape,
            }]),
        );
        manager.update(DT);
        assert!(names(&manager).contains(&"pause prompt"));

        let mut manager = ScreenManager::new(VIEWPORT);
        manager.push(GameplayScreen::new(), Some(PlayerIndex::Two));
        manager.update(DT);
        let mut state = InputState::new();
        state.begin_frame();
        state.process_events(&[InputEvent::GamePadConnection {
            player: PlayerIndex::Two,
            connected: true,
        }]);
        state.begin_frame();
        state.process_events(&[InputEvent::GamePadConnection {
            player: PlayerIndex::Two,
            connected: false,
        }]);
        manager.handle_input(DT, &state);
        manager.update(DT);
        assert!(names(&manager).contains(&"pause prompt"));
    }

    #[test]
    fn pause_uses_menu_bindings() {
        let mut manager = ScreenManager::new(VIEWPORT);
        manager.push(GameplayScreen::new(), Some(PlayerIndex::One));
        manager.update(DT);

        manager.handle_input(
            DT,
            &input(&[InputEvent::KeyDown {
                player: PlayerIndex::One,
                key: KeyCode::KeyP,
            }]),
        );
        manager.update(DT);
        assert!(names(&manager).contains(&"pause prompt"));
    }

    #[test]
    fn timer_runs_only_with_focus_and_dims_when_covered() {
        let mut manager = ScreenManager::new(VIEWPORT);
        let game = manager.push(GameplayScreen::new(), Some(PlayerIndex::One));
        manager.update(DT);

        // Start prompt covers the game: frozen, dimming, still visible
        for _ in 0..20 {
            manager.update(DT);
        }
        assert_eq!(manager.state_of(game), Some(TransitionState::Active));
        let mut draw = DrawList::new(VIEWPORT);
        manager.render(DT, &mut draw);
        assert!(draw.texts().any(|t| t == "0.00"));
        assert!(draw
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::FadeToBlack(a) if *a > 0.0)));
    }
}

//=========================================================================
// Stock Menus
//=========================================================================
//
// Builders for the menus the sample flow is made of.
//
//   main menu ──Play──► [loading] ──► gameplay ──► start prompt
//       │                                 └─pause─► pause prompt
//       ├─Controls──► controls picture
//       ├─Difficulty──► difficulty menu
//       └─Exit──► "exit?" box ──► quit_requested
//
// Quitting from either prompt confirms first, then loads the background
// and main menu back in.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::flags::SessionFlags;
use crate::core::input::PlayerIndex;
use crate::core::screen::{LoadRequest, ScreenContext, ScreenSet};
use crate::screens::menu::{MenuEntry, MenuList, MenuScreen};
use crate::screens::{BackgroundScreen, ControlsScreen, GameplayScreen, MessageBoxScreen};

//=== Main Menu ===========================================================

pub fn main_menu() -> MenuScreen {
    let menu = MenuList::new("Main Menu")
        .with_entry(MenuEntry::new("Play Game").on_selected(|ctx, player| {
            let set = ScreenSet::new().push(GameplayScreen::new(), Some(player));
            ctx.request_load(LoadRequest::asynchronous(set).with_indicator(true));
        }))
        .with_entry(MenuEntry::new("Controls").on_selected(|ctx, player| {
            ctx.request_push(ControlsScreen::new(), Some(player));
        }))
        .with_entry(MenuEntry::new("Difficulty").on_selected(|ctx, player| {
            ctx.request_push(difficulty_menu(), Some(player));
        }))
        .with_entry(MenuEntry::new("Exit").on_selected(confirm_exit));

    MenuScreen::new("main menu", menu).on_cancel(confirm_exit)
}

fn confirm_exit(ctx: &mut ScreenContext<'_>, player: PlayerIndex) {
    let dialog = MessageBoxScreen::new("Are you sure you want to exit this sample?")
        .on_accepted(|ctx, _| ctx.flags_mut().quit_requested = true);
    ctx.request_push(dialog, Some(player));
}

//=== Difficulty Menu =====================================================

pub fn difficulty_menu() -> MenuScreen {
    let menu = MenuList::new("Difficulty Settings")
        .with_entry(MenuEntry::new("").on_selected(|ctx, _| {
            ctx.flags_mut().difficulty.cycle_bullets();
        }))
        .with_entry(MenuEntry::new("").on_selected(|ctx, _| {
            let difficulty = &mut ctx.flags_mut().difficulty;
            difficulty.snake_enabled = !difficulty.snake_enabled;
        }))
        .with_entry(MenuEntry::new("").on_selected(|ctx, _| {
            let difficulty = &mut ctx.flags_mut().difficulty;
            difficulty.blade_enabled = !difficulty.blade_enabled;
        }))
        .with_entry(MenuEntry::new("Back").on_selected(|ctx, _| ctx.request_exit()));

    MenuScreen::new("difficulty menu", menu).with_refresh(refresh_difficulty)
}

fn refresh_difficulty(flags: &SessionFlags, menu: &mut MenuList) {
    let toggle = |on: bool| if on { "Enabled" } else { "Disabled" };
    let difficulty = flags.difficulty;
    let texts = [
        format!("Bullets: {}", difficulty.bullet_count),
        format!("Snake: {}", toggle(difficulty.snake_enabled)),
        format!("Circular Blade: {}", toggle(difficulty.blade_enabled)),
    ];

    for (index, text) in texts.into_iter().enumerate() {
        if let Some(entry) = menu.entry_mut(index) {
            entry.set_text(text);
        }
    }
}

//=== Gameplay Prompts ====================================================

/// Shown over a freshly started game.
pub fn start_prompt() -> MenuScreen {
    let menu = MenuList::new("Survive for 1 minute!")
        .with_entry(MenuEntry::new("Ok! Let's go!").on_selected(|ctx, _| {
            ctx.flags_mut().start_game = true;
            ctx.request_exit();
        }))
        .with_entry(MenuEntry::new("Maybe next time...").on_selected(confirm_quit_game));

    MenuScreen::new("start prompt", menu)
}

/// Shown when the player pauses or their gamepad drops.
pub fn pause_prompt() -> MenuScreen {
    let menu = MenuList::new("Continue?")
        .with_entry(MenuEntry::new("Yes!").on_selected(|ctx, player| {
            let restart = std::mem::take(&mut ctx.flags_mut().reset_game);
            if restart {
                let set = ScreenSet::new().push(GameplayScreen::new(), Some(player));
                ctx.request_load(LoadRequest::synchronous(set));
            }
            ctx.flags_mut().start_game = true;
            ctx.request_exit();
        }))
        .with_entry(MenuEntry::new("Not really...").on_selected(confirm_quit_game));

    MenuScreen::new("pause prompt", menu)
}

fn confirm_quit_game(ctx: &mut ScreenContext<'_>, _player: PlayerIndex) {
    let dialog = MessageBoxScreen::new("Are you sure you want to quit this game?").on_accepted(|ctx, _| {
        let set = ScreenSet::new()
            .push(BackgroundScreen::new(), None)
            .push(main_menu(), None);
        ctx.request_load(LoadRequest::synchronous(set));
    });
    let player = ctx.controlling_player();
    ctx.request_push(dialog, player);
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputEvent, InputState, KeyCode};
    use crate::core::render::Viewport;
    use crate::core::screen::ScreenManager;
    use std::time::Duration;

    const DT: Duration = Duration::from_millis(100);

    fn key(key: KeyCode) -> InputState {
        let mut input = InputState::new();
        input.begin_frame();
        input.process_events(&[InputEvent::KeyDown {
            player: PlayerIndex::One,
            key,
        }]);
        input
    }

    fn names(manager: &ScreenManager) -> Vec<&'static str> {
        manager.screens().iter().map(|s| s.name).collect()
    }

    /// Runs update then input for one frame.
    fn step(manager: &mut ScreenManager, input: &InputState) {
        manager.update(DT);
        manager.handle_input(DT, input);
    }

    #[test]
    fn exit_confirmation_requests_quit() {
        let mut manager = ScreenManager::new(Viewport::default());
        manager.push(main_menu(), None);
        let idle = InputState::new();

        step(&mut manager, &key(KeyCode::ArrowUp));
        step(&mut manager, &key(KeyCode::Enter));
        step(&mut manager, &idle);
        assert_eq!(names(&manager), vec!["main menu", "message box"]);

        step(&mut manager, &key(KeyCode::Enter));
        assert!(manager.flags().quit_requested);
    }

    #[test]
    fn controls_entry_shows_picture_for_selecting_player() {
        let mut manager = ScreenManager::new(Viewport::default());
        manager.push(main_menu(), None);
        let idle = InputState::new();

        step(&mut manager, &key(KeyCode::ArrowDown));
        step(&mut manager, &idle);
        step(&mut manager, &key(KeyCode::Enter));
        step(&mut manager, &idle);

        let stack = manager.screens();
        assert_eq!(names(&manager), vec!["main menu", "controls"]);
        assert_eq!(stack[1].controlling_player, Some(PlayerIndex::One));
    }

    #[test]
    fn difficulty_entries_follow_flags() {
        let mut manager = ScreenManager::new(Viewport::default());
        let id = manager.push(difficulty_menu(), None);

        step(&mut manager, &key(KeyCode::Enter));
        assert_eq!(manager.flags().difficulty.bullet_count, 10);

        step(&mut manager, &key(KeyCode::ArrowDown));
        step(&mut manager, &key(KeyCode::Enter));
        assert!(manager.flags().difficulty.snake_enabled);
        assert!(manager.contains(id));
    }

    #[test]
    fn refresh_writes_toggle_texts() {
        let mut flags = SessionFlags::default();
        flags.difficulty.snake_enabled = true;
        let mut list = MenuList::new("t")
            .with_entry(MenuEntry::new(""))
            .with_entry(MenuEntry::new(""))
            .with_entry(MenuEntry::new(""))
            .with_entry(MenuEntry::new("Back"));

        refresh_difficulty(&flags, &mut list);
        let texts: Vec<_> = list.entries().iter().map(|e| e.text()).collect();
        assert_eq!(
            texts,
            vec!["Bullets: 5", "Snake: Enabled", "Circular Blade: Disabled", "Back"]
        );
    }

    #[test]
    fn start_prompt_starts_game() {
        let mut manager = ScreenManager::new(Viewport::default());
        let prompt = manager.push(start_prompt(), Some(PlayerIndex::One));

        step(&mut manager, &key(KeyCode::Enter));
        assert!(manager.flags().start_game);

        manager.update(DT);
        assert!(manager.state_of(prompt).is_some_and(|s| !s.accepts_input()));
    }

    #[test]
    fn pause_prompt_restarts_when_reset_requested() {
        let mut manager = ScreenManager::new(Viewport::default());
        manager.flags_mut().reset_game = true;
        manager.push(pause_prompt(), Some(PlayerIndex::One));

        step(&mut manager, &key(KeyCode::Enter));
        assert!(!manager.flags().reset_game);
        assert!(manager.flags().start_game);

        manager.update(DT);
        assert!(names(&manager).contains(&"loading"));
    }

    #[test]
    fn play_loads_gameplay_behind_gate() {
        let mut manager = ScreenManager::new(Viewport::default());
        manager.push(BackgroundScreen::new(), None);
        manager.push(main_menu(), None);
        step(&mut manager, &key(KeyCode::Enter));

        let idle = InputState::new();
        for _ in 0..200 {
            step(&mut manager, &idle);
            if names(&manager).contains(&"start prompt") {
                break;
            }
            std::thread::sleep(Duration::from_millis(2));
        }

        assert_eq!(names(&manager), vec!["gameplay", "start prompt"]);
        assert_eq!(manager.screens()[0].controlling_player, Some(PlayerIndex::One));
        assert!(manager.take_failures().is_empty());
    }
}

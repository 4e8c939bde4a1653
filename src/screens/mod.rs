//=========================================================================
// Stock Screens
//
// Ready-made screens built on the core stack: a reusable menu, the
// confirmation popup, the backdrop, the controls picture and the
// gameplay screen, plus the menu builders that wire them into the
// sample flow.
//
//=========================================================================

//=== Submodules ==========================================================
mod background;
mod controls;
mod gameplay;
pub mod menu;
pub mod menus;
mod message_box;

//=== Public API ==========================================================
pub use background::BackgroundScreen;
pub use controls::ControlsScreen;
pub use gameplay::GameplayScreen;
pub use menu::{MenuEntry, MenuHandler, MenuList, MenuOutcome, MenuRefresh, MenuScreen};
pub use message_box::MessageBoxScreen;

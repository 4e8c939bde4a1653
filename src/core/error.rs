//=========================================================================
// Screen Errors
//=========================================================================
//
// Error types surfaced by the screen stack and the engine runtime.
//
// Nothing here aborts a frame: the manager records failures and keeps
// driving the remaining screens. Callers drain them via
// `ScreenManager::take_failures()`.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::screen::{LoadId, ScreenId};

//=== ScreenError =========================================================

/// Failure raised while pushing, activating or preparing a screen.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScreenError {
    /// The screen reads input for one player but was pushed without one.
    #[error("screen '{screen}' requires a controlling player but none was assigned")]
    MissingControllingPlayer { screen: &'static str },

    /// A resource could not be acquired during `prepare` or `activate`.
    #[error("screen '{screen}' could not acquire '{resource}': {reason}")]
    ResourceUnavailable {
        screen: &'static str,
        resource: String,
        reason: String,
    },

    /// A request referenced a screen that is not on the stack.
    #[error("screen {0} is not on the stack")]
    UnknownScreen(ScreenId),

    /// The background preparation worker went away without reporting.
    #[error("preparation worker for load {0} disconnected before finishing")]
    LoadWorkerLost(LoadId),

    /// The background preparation worker could not be started.
    #[error("preparation worker for load {load} could not be spawned: {reason}")]
    LoadWorkerSpawn { load: LoadId, reason: String },
}

impl ScreenError {
    /// Shorthand for [`ScreenError::ResourceUnavailable`].
    pub fn resource(
        screen: &'static str,
        resource: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ResourceUnavailable {
            screen,
            resource: resource.into(),
            reason: reason.into(),
        }
    }
}

//=== ScreenFailure =======================================================

/// A rejected push, swap or load, kept until the host drains it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenFailure {
    /// Name of the screen that failed.
    pub screen: &'static str,

    /// Screen that issued the request, `None` for host-level requests.
    pub requested_by: Option<ScreenId>,

    /// What went wrong.
    pub error: ScreenError,
}

//=== EngineError =========================================================

/// Errors from the host-facing engine handle.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The frame thread is no longer receiving events.
    #[error("frame thread is no longer receiving host events")]
    ChannelClosed,

    /// The frame thread panicked; the payload message is kept if it was a string.
    #[error("frame thread panicked: {0}")]
    FrameThreadPanicked(String),

    #[error("frame thread could not be spawned: {0}")]
    FrameThreadSpawn(String),
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_player_message_names_the_screen() {
        let err = ScreenError::MissingControllingPlayer { screen: "gameplay" };
        assert_eq!(
            err.to_string(),
            "screen 'gameplay' requires a controlling player but none was assigned"
        );
    }

    #[test]
    fn resource_shorthand_builds_variant() {
        let err = ScreenError::resource("menu", "menufont", "file not found");
        assert_eq!(
            err,
            ScreenError::ResourceUnavailable {
                screen: "menu",
                resource: "menufont".to_string(),
                reason: "file not found".to_string(),
            }
        );
        assert!(err.to_string().contains("menufont"));
    }
}

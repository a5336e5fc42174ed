use serde::{Deserialize, Serialize};

use crate::engine::command::MolvisCommand;

/// Engine-level actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// toggle_projection = "KeyP"
/// reset_view = "KeyR"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Switch between perspective and orthographic projection.
    ToggleProjection,
    /// Deselect every atom.
    ClearSelection,
    /// Undo rotation and zoom.
    ResetView,
}

impl KeyAction {
    /// The parameterless command this action triggers.
    #[must_use]
    pub fn to_command(self) -> MolvisCommand {
        match self {
            Self::ToggleProjection => MolvisCommand::ToggleProjection,
            Self::ClearSelection => MolvisCommand::ClearSelection,
            Self::ResetView => MolvisCommand::ResetView,
        }
    }
}

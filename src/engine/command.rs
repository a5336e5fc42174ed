//! The engine's complete interactive vocabulary.
//!
//! Every user-facing operation, whether triggered by a key press, a mouse
//! gesture or a programmatic call, is a `MolvisCommand`. Consumers construct
//! commands and pass them to
//! [`MolvisEngine::execute`](super::MolvisEngine::execute).

/// A discrete or parameterized operation the engine can perform.
///
/// ```ignore
/// engine.execute(MolvisCommand::ToggleProjection);
/// engine.execute(MolvisCommand::Zoom { factor: 1.1 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MolvisCommand {
    // ── Transform ───────────────────────────────────────────────────
    /// Incremental scene rotation in degrees.
    Rotate {
        /// About the view X axis.
        pitch: f32,
        /// About the view Y axis.
        yaw: f32,
        /// About the view Z axis.
        roll: f32,
    },

    /// Multiply the scene scale.
    Zoom {
        /// Scale factor (> 0).
        factor: f32,
    },

    /// Undo rotation and zoom.
    ResetView,

    /// Switch between perspective and orthographic projection.
    ToggleProjection,

    // ── Picking ─────────────────────────────────────────────────────
    /// Highlight the atom under a canvas position. Resolved by
    /// [`poll_picking`](super::MolvisEngine::poll_picking).
    Hover {
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels.
        y: f32,
    },

    /// Remove the hover highlight.
    ClearHover,

    /// Flip the selection of the atom under a canvas position. Resolved by
    /// [`poll_picking`](super::MolvisEngine::poll_picking).
    ToggleSelection {
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels.
        y: f32,
    },

    /// Deselect every atom.
    ClearSelection,
}

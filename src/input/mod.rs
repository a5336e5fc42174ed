//! Input handling: event types, the click/drag state machine, and the
//! processor that converts raw window events into engine commands.

/// Platform-agnostic input events.
pub mod event;
/// Key-bindable actions.
pub mod keyboard;
/// Click/drag state machine and cursor tracking.
pub mod mouse;
/// Converts raw events into engine commands.
pub mod processor;

pub use event::{InputEvent, MouseButton};
pub use keyboard::KeyAction;
pub use mouse::{PointerAction, PointerState};
pub use processor::InputProcessor;

//! Converts raw platform events into engine commands.
//!
//! The `InputProcessor` owns all transient input state (cursor tracking,
//! click/drag detection) and the key-binding map. It is the only thing that
//! sits between raw window events and the engine's
//! [`execute`](crate::MolvisEngine::execute) method.

use glam::Vec2;

use super::event::{InputEvent, MouseButton};
use super::mouse::{Pointer, PointerAction, PointerState};
use crate::engine::command::MolvisCommand;
use crate::options::{KeybindingOptions, Options};

/// Converts raw window events into [`MolvisCommand`]s.
///
/// # Usage
///
/// ```ignore
/// if let Some(cmd) = input.handle_event(event) {
///     engine.execute(cmd);
/// }
/// if let Some(cmd) = input.handle_key_press("KeyP") {
///     engine.execute(cmd);
/// }
/// ```
pub struct InputProcessor {
    pointer: Pointer,
    /// Degrees of rotation per dragged pixel.
    rotate_speed: f32,
    /// Fractional zoom per scroll line.
    zoom_speed: f32,
    key_bindings: KeybindingOptions,
}

impl InputProcessor {
    /// Processor configured from `options`.
    #[must_use]
    pub fn new(options: &Options) -> Self {
        Self {
            pointer: Pointer::new(options.camera.drag_threshold),
            rotate_speed: options.camera.rotate_speed,
            zoom_speed: options.camera.zoom_speed,
            key_bindings: options.keybindings.clone(),
        }
    }

    /// Pick up changed camera speeds and key bindings.
    pub fn apply_options(&mut self, options: &Options) {
        self.pointer.set_drag_threshold(options.camera.drag_threshold);
        self.rotate_speed = options.camera.rotate_speed;
        self.zoom_speed = options.camera.zoom_speed;
        self.key_bindings = options.keybindings.clone();
    }

    /// Current cursor position in physical pixels.
    #[must_use]
    pub fn cursor_position(&self) -> (f32, f32) {
        let p = self.pointer.position();
        (p.x, p.y)
    }

    /// Primary-button state.
    #[must_use]
    pub fn pointer_state(&self) -> PointerState {
        self.pointer.state()
    }

    /// Look up a key press and return the corresponding command, if bound.
    #[must_use]
    pub fn handle_key_press(&self, key: &str) -> Option<MolvisCommand> {
        self.key_bindings.lookup(key).map(super::KeyAction::to_command)
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<MolvisCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => {
                let action = self.pointer.moved(Vec2::new(x, y));
                self.command_for(action)
            }
            InputEvent::MouseButton {
                button: MouseButton::Left,
                pressed,
            } => {
                if pressed {
                    self.pointer.press();
                    None
                } else {
                    let action = self.pointer.release();
                    self.command_for(action)
                }
            }
            InputEvent::MouseButton { .. } => None,
            InputEvent::Scroll { delta } => {
                let factor = (1.0 + self.zoom_speed).powf(delta);
                Some(MolvisCommand::Zoom { factor })
            }
            InputEvent::CursorLeft => {
                self.pointer.cancel();
                Some(MolvisCommand::ClearHover)
            }
        }
    }

    fn command_for(&self, action: PointerAction) -> Option<MolvisCommand> {
        match action {
            PointerAction::None => None,
            PointerAction::Hover(p) => Some(MolvisCommand::Hover { x: p.x, y: p.y }),
            PointerAction::Click(p) => Some(MolvisCommand::ToggleSelection { x: p.x, y: p.y }),
            PointerAction::Drag(delta) => Some(MolvisCommand::Rotate {
                pitch: delta.y * self.rotate_speed,
                yaw: delta.x * self.rotate_speed,
                roll: 0.0,
            }),
        }
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new(&Options::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(pressed: bool) -> InputEvent {
        InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed,
        }
    }

    #[test]
    fn click_toggles_selection_at_cursor() {
        let mut input = InputProcessor::default();
        assert_eq!(
            input.handle_event(InputEvent::CursorMoved { x: 40.0, y: 30.0 }),
            Some(MolvisCommand::Hover { x: 40.0, y: 30.0 })
        );
        assert_eq!(input.handle_event(press(true)), None);
        assert_eq!(
            input.handle_event(press(false)),
            Some(MolvisCommand::ToggleSelection { x: 40.0, y: 30.0 })
        );
    }

    #[test]
    fn drag_rotates_and_does_not_select() {
        let mut input = InputProcessor::default();
        let _ = input.handle_event(InputEvent::CursorMoved { x: 0.0, y: 0.0 });
        let _ = input.handle_event(press(true));
        let cmd = input.handle_event(InputEvent::CursorMoved { x: 10.0, y: 5.0 });
        let speed = Options::default().camera.rotate_speed;
        assert_eq!(
            cmd,
            Some(MolvisCommand::Rotate {
                pitch: 5.0 * speed,
                yaw: 10.0 * speed,
                roll: 0.0,
            })
        );
        assert_eq!(input.handle_event(press(false)), None);
    }

    #[test]
    fn scroll_zooms_multiplicatively() {
        let mut input = InputProcessor::default();
        let Some(MolvisCommand::Zoom { factor: zoom_in }) =
            input.handle_event(InputEvent::Scroll { delta: 1.0 })
        else {
            panic!("expected zoom");
        };
        let Some(MolvisCommand::Zoom { factor: zoom_out }) =
            input.handle_event(InputEvent::Scroll { delta: -1.0 })
        else {
            panic!("expected zoom");
        };
        assert!(zoom_in > 1.0);
        assert!((zoom_in * zoom_out - 1.0).abs() < 1e-6);
    }

    #[test]
    fn bound_keys_map_to_commands() {
        let input = InputProcessor::default();
        assert_eq!(input.handle_key_press("KeyP"), Some(MolvisCommand::ToggleProjection));
        assert_eq!(input.handle_key_press("Escape"), Some(MolvisCommand::ClearSelection));
        assert_eq!(input.handle_key_press("KeyZ"), None);
    }

    #[test]
    fn right_button_is_ignored() {
        let mut input = InputProcessor::default();
        let event = InputEvent::MouseButton {
            button: MouseButton::Right,
            pressed: true,
        };
        assert_eq!(input.handle_event(event), None);
        assert_eq!(input.pointer_state(), PointerState::Idle);
    }
}

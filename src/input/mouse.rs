use glam::Vec2;

/// Primary-button state machine distinguishing a click from a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerState {
    /// Button up.
    Idle,
    /// Button down, cursor still within the drag threshold of `origin`.
    Pressed {
        /// Cursor position at press.
        origin: Vec2,
    },
    /// Button down and moved past the threshold.
    Dragging {
        /// Cursor position at the previous move.
        last: Vec2,
    },
}

/// What a pointer transition means for the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    /// Nothing to do.
    None,
    /// Cursor moved with the button up.
    Hover(Vec2),
    /// Drag moved by `delta` pixels.
    Drag(Vec2),
    /// Button released without dragging.
    Click(Vec2),
}

/// Tracks the cursor and the [`PointerState`].
pub(crate) struct Pointer {
    state: PointerState,
    position: Vec2,
    drag_threshold: f32,
}

impl Pointer {
    pub(crate) fn new(drag_threshold: f32) -> Self {
        Self {
            state: PointerState::Idle,
            position: Vec2::ZERO,
            drag_threshold,
        }
    }

    pub(crate) fn state(&self) -> PointerState {
        self.state
    }

    pub(crate) fn position(&self) -> Vec2 {
        self.position
    }

    pub(crate) fn set_drag_threshold(&mut self, threshold: f32) {
        self.drag_threshold = threshold;
    }

    pub(crate) fn press(&mut self) {
        self.state = PointerState::Pressed {
            origin: self.position,
        };
    }

    pub(crate) fn moved(&mut self, position: Vec2) -> PointerAction {
        self.position = position;
        match self.state {
            PointerState::Idle => PointerAction::Hover(position),
            PointerState::Pressed { origin } => {
                if position.distance(origin) < self.drag_threshold {
                    return PointerAction::None;
                }
                self.state = PointerState::Dragging { last: position };
                PointerAction::Drag(position - origin)
            }
            PointerState::Dragging { last } => {
                self.state = PointerState::Dragging { last: position };
                PointerAction::Drag(position - last)
            }
        }
    }

    pub(crate) fn release(&mut self) -> PointerAction {
        let action = match self.state {
            PointerState::Pressed { .. } => PointerAction::Click(self.position),
            PointerState::Idle | PointerState::Dragging { .. } => PointerAction::None,
        };
        self.state = PointerState::Idle;
        action
    }

    /// Drop any press, e.g. when the cursor leaves the window.
    pub(crate) fn cancel(&mut self) {
        self.state = PointerState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_jitter_is_still_a_click() {
        let mut pointer = Pointer::new(4.0);
        let _ = pointer.moved(Vec2::new(10.0, 10.0));
        pointer.press();
        assert_eq!(pointer.moved(Vec2::new(12.0, 11.0)), PointerAction::None);
        assert_eq!(pointer.release(), PointerAction::Click(Vec2::new(12.0, 11.0)));
        assert_eq!(pointer.state(), PointerState::Idle);
    }

    #[test]
    fn crossing_threshold_starts_a_drag() {
        let mut pointer = Pointer::new(4.0);
        pointer.press();
        assert_eq!(pointer.moved(Vec2::new(5.0, 0.0)), PointerAction::Drag(Vec2::new(5.0, 0.0)));
        assert_eq!(pointer.moved(Vec2::new(7.0, 1.0)), PointerAction::Drag(Vec2::new(2.0, 1.0)));
        assert_eq!(pointer.release(), PointerAction::None);
    }

    #[test]
    fn idle_moves_hover() {
        let mut pointer = Pointer::new(4.0);
        assert_eq!(pointer.moved(Vec2::new(3.0, 4.0)), PointerAction::Hover(Vec2::new(3.0, 4.0)));
        assert_eq!(pointer.position(), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn cancel_forgets_press() {
        let mut pointer = Pointer::new(4.0);
        pointer.press();
        pointer.cancel();
        assert_eq!(pointer.release(), PointerAction::None);
    }
}

/// Platform-agnostic input events.
///
/// These are fed into an [`InputState`](super::InputState), which
/// accumulates them until the engine takes a per-frame snapshot.
///
/// # Example
///
/// ```ignore
/// engine.handle_input(InputEvent::CursorMoved { x: 100.0, y: 200.0 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to an absolute canvas position.
    CursorMoved {
        /// Horizontal position in client (logical) pixels.
        x: f32,
        /// Vertical position in client (logical) pixels, origin at top.
        y: f32,
    },
    /// Cursor left the canvas; ends any drag.
    CursorLeft,
    /// Mouse button pressed or released.
    MouseButton {
        /// Which button changed.
        button: MouseButton,
        /// `true` for press, `false` for release.
        pressed: bool,
    },
    /// Scroll wheel (positive = zoom in).
    Scroll {
        /// Scroll amount (positive = zoom in, negative = zoom out).
        delta: f32,
    },
    /// Modifier key state changed.
    ModifiersChanged {
        /// Whether the shift key is held.
        shift: bool,
    },
}

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) mouse button.
    Left,
    /// Secondary (right) mouse button.
    Right,
    /// Middle mouse button (wheel click).
    Middle,
    /// Back, forward, and any other extra button. Never drags the camera.
    Other,
}

#[cfg(feature = "viewer")]
impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Left => Self::Left,
            winit::event::MouseButton::Right => Self::Right,
            winit::event::MouseButton::Middle => Self::Middle,
            winit::event::MouseButton::Back
            | winit::event::MouseButton::Forward
            | winit::event::MouseButton::Other(_) => Self::Other,
        }
    }
}

#[cfg(all(test, feature = "viewer"))]
mod tests {
    use super::*;

    #[test]
    fn extra_buttons_are_not_primary() {
        for button in [
            winit::event::MouseButton::Back,
            winit::event::MouseButton::Forward,
            winit::event::MouseButton::Other(8),
        ] {
            assert_eq!(MouseButton::from(button), MouseButton::Other);
        }
        assert_eq!(
            MouseButton::from(winit::event::MouseButton::Left),
            MouseButton::Left
        );
    }
}

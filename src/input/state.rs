use std::f32::consts::PI;

use glam::Vec2;

use crate::input::event::{InputEvent, MouseButton};

/// Per-frame velocity decay applied after a drag is released.
pub const DEFAULT_AMORTIZATION: f32 = 0.95;

/// Camera deltas accumulated over one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputSnapshot {
    /// Orbit rotation in radians: x rotates yaw, y rotates pitch.
    pub rotation: Vec2,
    /// Pan in client pixels.
    pub pan: Vec2,
    /// Zoom steps (positive = closer).
    pub zoom: f32,
}

/// Pointer position, drag state, and the deltas accumulated since the last
/// snapshot.
///
/// While the primary button is held, pointer motion accumulates as rotation
/// (or pan with shift held). After release the last motion keeps being
/// applied each frame, decaying by the amortization factor, so the view
/// coasts to a stop.
#[derive(Debug, Clone)]
pub struct InputState {
    pointer: (f32, f32),
    last_drag: (f32, f32),
    dragging: bool,
    shift: bool,
    rotation_accum: Vec2,
    pan_accum: Vec2,
    rotation_velocity: Vec2,
    pan_velocity: Vec2,
    zoom_accum: f32,
    amortization: f32,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(DEFAULT_AMORTIZATION)
    }
}

impl InputState {
    /// Create an idle input state with the given inertia decay
    /// (clamped to `[0, 1)`).
    pub fn new(amortization: f32) -> Self {
        Self {
            pointer: (0.0, 0.0),
            last_drag: (0.0, 0.0),
            dragging: false,
            shift: false,
            rotation_accum: Vec2::ZERO,
            pan_accum: Vec2::ZERO,
            rotation_velocity: Vec2::ZERO,
            pan_velocity: Vec2::ZERO,
            zoom_accum: 0.0,
            amortization: amortization.clamp(0.0, 0.999),
        }
    }

    /// Change the inertia decay.
    pub fn set_amortization(&mut self, amortization: f32) {
        self.amortization = amortization.clamp(0.0, 0.999);
    }

    /// Dispatch a platform-agnostic event.
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::CursorMoved { x, y } => self.on_pointer_move(x, y),
            InputEvent::CursorLeft => self.on_pointer_leave(),
            InputEvent::MouseButton {
                button: MouseButton::Left,
                pressed,
            } => {
                if pressed {
                    self.on_pointer_down();
                } else {
                    self.on_pointer_up();
                }
            }
            InputEvent::MouseButton { .. } => {}
            InputEvent::Scroll { delta } => self.on_wheel(delta),
            InputEvent::ModifiersChanged { shift } => self.shift = shift,
        }
    }

    /// Primary button pressed at the current pointer position.
    pub fn on_pointer_down(&mut self) {
        self.dragging = true;
        self.last_drag = self.pointer;
    }

    /// Primary button released.
    pub fn on_pointer_up(&mut self) {
        self.dragging = false;
    }

    /// Pointer left the canvas. Treated as a release.
    pub fn on_pointer_leave(&mut self) {
        self.dragging = false;
    }

    /// Pointer moved to `(x, y)` in client pixels.
    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        self.pointer = (x, y);
        if !self.dragging {
            return;
        }
        let delta = Vec2::new(x - self.last_drag.0, y - self.last_drag.1);
        self.last_drag = (x, y);
        if self.shift {
            self.pan_accum += delta;
            self.pan_velocity = delta;
        } else {
            self.rotation_accum += delta;
            self.rotation_velocity = delta;
        }
    }

    /// Wheel scrolled by `delta` steps.
    pub fn on_wheel(&mut self, delta: f32) {
        self.zoom_accum += delta;
    }

    /// Latest pointer position in client pixels.
    pub fn pointer(&self) -> (f32, f32) {
        self.pointer
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Drain this frame's deltas.
    ///
    /// Pixel deltas become radians as `delta * PI / client_size`. When no
    /// drag is active the stored velocity decays by the amortization factor
    /// and is added on top.
    pub fn take_frame(&mut self, client_size: (f32, f32)) -> InputSnapshot {
        let scale = Vec2::new(
            PI / client_size.0.max(1.0),
            PI / client_size.1.max(1.0),
        );
        let mut rotation = self.rotation_accum;
        let mut pan = self.pan_accum;
        if !self.dragging {
            self.rotation_velocity *= self.amortization;
            self.pan_velocity *= self.amortization;
            rotation += self.rotation_velocity;
            pan += self.pan_velocity;
        }

        self.rotation_accum = Vec2::ZERO;
        self.pan_accum = Vec2::ZERO;
        let zoom = std::mem::take(&mut self.zoom_accum);

        InputSnapshot {
            rotation: rotation * scale,
            pan,
            zoom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: (f32, f32) = (200.0, 100.0);

    fn drag(state: &mut InputState, from: (f32, f32), to: (f32, f32)) {
        state.on_pointer_move(from.0, from.1);
        state.on_pointer_down();
        state.on_pointer_move(to.0, to.1);
    }

    #[test]
    fn hover_without_drag_rotates_nothing() {
        let mut state = InputState::default();
        state.on_pointer_move(50.0, 50.0);
        state.on_pointer_move(80.0, 10.0);
        let snap = state.take_frame(SIZE);
        assert_eq!(snap.rotation, Vec2::ZERO);
        assert_eq!(state.pointer(), (80.0, 10.0));
    }

    #[test]
    fn extra_button_press_does_not_drag() {
        let mut state = InputState::default();
        state.on_pointer_move(10.0, 10.0);
        state.handle_event(InputEvent::MouseButton {
            button: MouseButton::Other,
            pressed: true,
        });
        state.on_pointer_move(60.0, 40.0);
        assert!(!state.is_dragging());
        assert_eq!(state.take_frame(SIZE).rotation, Vec2::ZERO);
    }

    #[test]
    fn drag_converts_pixels_to_radians() {
        let mut state = InputState::default();
        drag(&mut state, (0.0, 0.0), (200.0, 50.0));
        let snap = state.take_frame(SIZE);
        assert!((snap.rotation.x - PI).abs() < 1e-6);
        assert!((snap.rotation.y - PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn released_drag_coasts_and_decays() {
        let mut state = InputState::new(0.5);
        drag(&mut state, (0.0, 0.0), (20.0, 0.0));
        let _ = state.take_frame(SIZE);
        state.on_pointer_up();

        let first = state.take_frame(SIZE).rotation.x;
        let second = state.take_frame(SIZE).rotation.x;
        let step = 20.0 * PI / SIZE.0;
        assert!((first - step * 0.5).abs() < 1e-6);
        assert!((second - step * 0.25).abs() < 1e-6);
    }

    #[test]
    fn held_drag_does_not_coast() {
        let mut state = InputState::default();
        drag(&mut state, (0.0, 0.0), (20.0, 0.0));
        let _ = state.take_frame(SIZE);
        assert_eq!(state.take_frame(SIZE).rotation, Vec2::ZERO);
    }

    #[test]
    fn leaving_the_canvas_ends_the_drag() {
        let mut state = InputState::default();
        drag(&mut state, (0.0, 0.0), (10.0, 0.0));
        state.handle_event(InputEvent::CursorLeft);
        assert!(!state.is_dragging());
        state.on_pointer_move(100.0, 0.0);
        let snap = state.take_frame(SIZE);
        // Only the motion before leaving, plus one decayed coast step.
        let step = 10.0 * PI / SIZE.0;
        assert!((snap.rotation.x - step * (1.0 + DEFAULT_AMORTIZATION)).abs() < 1e-5);
    }

    #[test]
    fn shift_drag_pans_instead_of_rotating() {
        let mut state = InputState::default();
        state.handle_event(InputEvent::ModifiersChanged { shift: true });
        drag(&mut state, (0.0, 0.0), (5.0, -3.0));
        let snap = state.take_frame(SIZE);
        assert_eq!(snap.rotation, Vec2::ZERO);
        assert_eq!(snap.pan, Vec2::new(5.0, -3.0));
    }

    #[test]
    fn wheel_accumulates_until_taken() {
        let mut state = InputState::default();
        state.handle_event(InputEvent::Scroll { delta: 1.0 });
        state.handle_event(InputEvent::Scroll { delta: 0.5 });
        assert_eq!(state.take_frame(SIZE).zoom, 1.5);
        assert_eq!(state.take_frame(SIZE).zoom, 0.0);
    }

    #[test]
    fn right_button_does_not_start_a_drag() {
        let mut state = InputState::default();
        state.handle_event(InputEvent::MouseButton {
            button: MouseButton::Right,
            pressed: true,
        });
        assert!(!state.is_dragging());
    }
}

use super::CityEngine;
use crate::input::InputEvent;

impl CityEngine {
    /// Feed one platform-agnostic input event.
    ///
    /// Positions are client (logical) pixels. Events only accumulate; the
    /// camera moves when the next frame takes its snapshot.
    ///
    /// # Example
    ///
    /// ```ignore
    /// engine.handle_input(InputEvent::CursorMoved { x, y });
    /// engine.handle_input(InputEvent::Scroll { delta: 1.0 });
    /// ```
    pub fn handle_input(&mut self, event: InputEvent) {
        self.input.handle_event(event);
    }

    /// Last client-space pointer position.
    pub fn pointer(&self) -> (f32, f32) {
        self.input.pointer()
    }
}

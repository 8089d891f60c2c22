//! Input handling: platform-agnostic event types and the drag/inertia
//! accumulator that turns them into per-frame camera snapshots.

/// Platform-agnostic input events.
pub mod event;
/// Pointer tracking, drag accumulation, and inertia.
pub mod state;

pub use event::{InputEvent, MouseButton};
pub use state::{InputSnapshot, InputState};

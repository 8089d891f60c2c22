//! GPU picking: find the instance under the pointer by rendering per-instance
//! ids into a single pixel.
//!
//! - [`id`] packs instance indices into RGBA8 pixels and back.
//! - [`frustum`] builds the projection whose clip volume is exactly the
//!   backing pixel under the pointer.
//! - [`picker`] owns the 1x1 target and performs the blocking readback.

pub mod frustum;
pub mod id;
pub mod picker;

pub use frustum::{Perspective, Viewport};
pub use id::{decode_pick_id, encode_pick_id, PickResult, MAX_PICKABLE_INSTANCES};
pub use picker::PixelPicker;

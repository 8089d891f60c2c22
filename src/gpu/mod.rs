//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, offscreen targets with
//! one-pixel readback, pipeline boilerplate, and shader composition.

/// Shared wgpu boilerplate helpers for screen-space and scene pipelines.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Offscreen color + depth targets and pixel readback.
pub mod texture;

pub use render_context::RenderContext;
pub use shader_composer::{Shader, ShaderComposer};
pub use texture::OffscreenTarget;

//! Camera system for 3D scene viewing.
//!
//! Provides an orbit camera driven by per-frame input snapshots and the GPU
//! uniform/bind group it feeds to scene pipelines.

/// Camera GPU uniform and bind group.
pub mod core;
/// Orbit camera pose, projection, and input application.
pub mod orbit;

pub use self::core::{CameraBinding, CameraUniform};
pub use orbit::OrbitCamera;

//! Shared utilities for the rendering engine.

/// Frame pacing and smoothed FPS.
pub mod frame_timing;

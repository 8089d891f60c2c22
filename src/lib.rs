// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! GPU object picking and multi-pass post-processing for a small
//! instanced city scene, built on wgpu.
//!
//! Skyline renders a field of instanced cubes over a checkerboard ground
//! under a procedural sky. Every frame it renders a one-pixel id pass under
//! the pointer to find the hovered cube, highlights it, and then pushes the
//! lit scene through a configurable chain of full-screen passes (bloom,
//! dual-Kawase blur) before presenting.
//!
//! # Key entry points
//!
//! - [`engine::CityEngine`] - the per-frame orchestrator
//! - [`picking::PixelPicker`] - one-pixel id-buffer picking
//! - [`postprocess::PostProcessChain`] - ping-pong full-screen pass chain
//! - [`gpu::OffscreenTarget`] - color + depth render target
//! - [`options::Options`] - runtime configuration (camera, post-processing,
//!   scene, picking, display)
//!
//! # Architecture
//!
//! The engine owns one primary scene target and two ping-pong targets.
//! A frame runs: input snapshot -> camera update -> id pass (1x1 target,
//! pixel-sized frustum, blocking readback) -> selection uniform -> lit
//! scene pass into the primary target -> post-processing chain whose last
//! stage writes the presentation surface.
//!
//! Pure pieces (id encoding, frustum math, chain planning, CPU reference
//! kernels, input accumulation) carry no GPU state and are unit tested
//! directly.

pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod options;
pub mod picking;
pub mod postprocess;
pub mod scene;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use error::SkylineError;

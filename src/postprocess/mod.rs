//! Full-screen post-processing.
//!
//! The scene renders into a primary offscreen target; a chain of
//! full-screen stages then ping-pongs between two more targets, and its
//! last stage writes the presentation surface.
//!
//! - [`stage`] - the stage catalogue, screen quad, and pipeline cache
//! - [`chain`] - recipe planning and per-frame encoding
//! - [`kernel`] - filter constants and a CPU reference of every stage

pub mod chain;
pub mod kernel;
pub mod stage;

pub use chain::{plan, ChainRecipe, PassOutput, PostProcessChain, StagePass, TargetSlot};
pub use stage::StageKind;

//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the skyline crate.
#[derive(Debug)]
pub enum SkylineError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// A WGSL shader failed to compose or validate.
    ShaderCompose {
        /// Shader file that failed.
        shader: &'static str,
        /// Composer diagnostic.
        message: String,
    },
    /// An offscreen target could not be allocated.
    TargetAllocation(String),
    /// A GPU buffer readback failed (map or device poll).
    Readback(String),
    /// More instances than the 24-bit pick id space can address.
    TooManyInstances {
        /// Requested instance count.
        requested: usize,
        /// Largest supported instance count.
        max: usize,
    },
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for SkylineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::ShaderCompose { shader, message } => {
                write!(f, "failed to compose shader {shader}: {message}")
            }
            Self::TargetAllocation(msg) => {
                write!(f, "render target allocation failed: {msg}")
            }
            Self::Readback(msg) => write!(f, "GPU readback failed: {msg}"),
            Self::TooManyInstances { requested, max } => write!(
                f,
                "{requested} instances requested, at most {max} are pickable"
            ),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for SkylineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for SkylineError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for SkylineError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_many_instances_message_names_both_counts() {
        let err = SkylineError::TooManyInstances {
            requested: 20_000_000,
            max: 16_777_215,
        };
        let msg = err.to_string();
        assert!(msg.contains("20000000"));
        assert!(msg.contains("16777215"));
    }

    #[test]
    fn io_error_exposes_source() {
        use std::error::Error;
        let err = SkylineError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing preset",
        ));
        assert!(err.source().is_some());
    }
}

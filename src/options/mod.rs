//! Centralized runtime options with TOML preset support.
//!
//! Camera, post-processing, scene, picking, and display settings are
//! consolidated here. Options serialize to/from TOML for view presets stored
//! in `assets/view_presets/`.

mod camera;
mod display;
mod picking;
mod post_processing;
mod scene;

use std::path::Path;

pub use camera::CameraOptions;
pub use display::DisplayOptions;
pub use picking::PickingOptions;
pub use post_processing::{PostProcessingOptions, RecipeKind};
pub use scene::SceneOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::SkylineError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[post_processing]`) work
/// correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Camera pose, projection, and control parameters.
    pub camera: CameraOptions,
    /// Post-processing chain selection.
    pub post_processing: PostProcessingOptions,
    /// Cube field and ground parameters.
    pub scene: SceneOptions,
    /// Hover picking toggles.
    pub picking: PickingOptions,
    /// Window and frame pacing.
    #[schemars(skip)]
    pub display: DisplayOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::Io`] if the file cannot be read and
    /// [`SkylineError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, SkylineError> {
        let content =
            std::fs::read_to_string(path).map_err(SkylineError::Io)?;
        toml::from_str(&content)
            .map_err(|e| SkylineError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::OptionsParse`] if serialization fails and
    /// [`SkylineError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), SkylineError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SkylineError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(SkylineError::Io)?;
        }
        std::fs::write(path, content).map_err(SkylineError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

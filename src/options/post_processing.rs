use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::postprocess::chain::ChainRecipe;
use crate::postprocess::kernel::DEFAULT_BRIGHTNESS;

/// Which post-processing chain runs after the scene pass.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum RecipeKind {
    /// Gaussian blur rounds followed by a brighten.
    Bloom,
    /// Dual-Kawase down/up blur.
    DualKawase,
    /// Copy the scene straight to the screen.
    Passthrough,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Effects", inline)]
#[serde(default)]
/// Post-processing chain selection and parameters.
pub struct PostProcessingOptions {
    /// When false the scene is copied to the screen unchanged.
    #[schemars(title = "Enabled")]
    pub enabled: bool,
    /// Chain to run.
    #[schemars(title = "Recipe")]
    pub recipe: RecipeKind,
    /// Horizontal+vertical blur rounds of the bloom recipe.
    #[schemars(title = "Blur Iterations", range(min = 0, max = 16))]
    pub blur_iterations: u32,
    /// Brighten multiplier of the bloom recipe.
    #[schemars(title = "Brightness", range(min = 0.0, max = 4.0), extend("step" = 0.05))]
    pub brightness: f32,
}

impl Default for PostProcessingOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            recipe: RecipeKind::Bloom,
            blur_iterations: 1,
            brightness: DEFAULT_BRIGHTNESS,
        }
    }
}

impl PostProcessingOptions {
    /// The chain recipe these options select.
    pub fn chain_recipe(&self) -> ChainRecipe {
        if !self.enabled {
            return ChainRecipe::Passthrough;
        }
        match self.recipe {
            RecipeKind::Bloom => ChainRecipe::Bloom {
                iterations: self.blur_iterations,
            },
            RecipeKind::DualKawase => ChainRecipe::DualKawase,
            RecipeKind::Passthrough => ChainRecipe::Passthrough,
        }
    }
}

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::scene::instances::InstanceCloud;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Scene", inline)]
#[serde(default)]
/// Cube field and ground parameters.
pub struct SceneOptions {
    /// Number of cubes.
    #[schemars(title = "Cube Count", range(min = 1, max = 100_000))]
    pub cube_count: usize,
    /// Side of the square the cube centers are scattered over.
    #[schemars(title = "Cloud Size", range(min = 1.0, max = 100.0), extend("step" = 0.5))]
    pub cloud_size: f32,
    /// Uniform cube scale.
    #[schemars(title = "Cube Scale", range(min = 0.01, max = 2.0), extend("step" = 0.01))]
    pub cube_scale: f32,
    /// Height of every cube center.
    #[schemars(skip)]
    pub cube_height: f32,
    /// Half-extent of the ground plane.
    #[schemars(skip)]
    pub ground_half_size: f32,
    /// Seed for cube placement and colors.
    #[schemars(skip)]
    pub seed: u64,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            cube_count: 500,
            cloud_size: 5.0,
            cube_scale: 0.2,
            cube_height: 0.1,
            ground_half_size: 100.0,
            seed: 0x5EED,
        }
    }
}

impl SceneOptions {
    /// Generation parameters for the instance table.
    pub fn instance_cloud(&self) -> InstanceCloud {
        InstanceCloud {
            count: self.cube_count,
            cloud_size: self.cloud_size,
            cube_scale: self.cube_scale,
            height: self.cube_height,
            seed: self.seed,
        }
    }
}

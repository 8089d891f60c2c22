use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera pose, projection, and control parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 120.0), extend("step" = 1.0))]
    pub fovy: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub zfar: f32,
    /// Orbit target in world space.
    #[schemars(skip)]
    pub target: [f32; 3],
    /// Initial eye distance from the target.
    #[schemars(title = "Distance", range(min = 0.5, max = 50.0), extend("step" = 0.1))]
    pub distance: f32,
    /// Initial yaw in degrees.
    #[schemars(skip)]
    pub yaw_degrees: f32,
    /// Initial elevation in degrees.
    #[schemars(skip)]
    pub pitch_degrees: f32,
    /// Closest allowed eye distance.
    #[schemars(skip)]
    pub min_distance: f32,
    /// Farthest allowed eye distance.
    #[schemars(skip)]
    pub max_distance: f32,
    /// Rotation sensitivity multiplier.
    #[schemars(title = "Rotate Speed", range(min = 0.1, max = 2.0), extend("step" = 0.05))]
    pub rotate_speed: f32,
    /// Pan distance per client pixel, as a fraction of the eye distance.
    #[schemars(title = "Pan Speed", range(min = 0.0005, max = 0.01), extend("step" = 0.0005))]
    pub pan_speed: f32,
    /// Zoom fraction per wheel step.
    #[schemars(title = "Zoom Speed", range(min = 0.01, max = 0.5), extend("step" = 0.01))]
    pub zoom_speed: f32,
    /// Per-frame decay of drag velocity after release.
    #[schemars(title = "Inertia", range(min = 0.0, max = 0.99), extend("step" = 0.01))]
    pub amortization: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 75.0,
            znear: 0.01,
            zfar: 1000.0,
            target: [0.0, 0.0, 0.0],
            distance: 5.1,
            yaw_degrees: 0.0,
            pitch_degrees: 11.3,
            min_distance: 0.5,
            max_distance: 50.0,
            rotate_speed: 1.0,
            pan_speed: 0.002,
            zoom_speed: 0.1,
            amortization: 0.95,
        }
    }
}

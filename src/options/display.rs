use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
/// Window and frame pacing settings.
pub struct DisplayOptions {
    /// Window title.
    #[schemars(skip)]
    pub title: String,
    /// Initial window width in logical pixels.
    #[schemars(skip)]
    pub width: u32,
    /// Initial window height in logical pixels.
    #[schemars(skip)]
    pub height: u32,
    /// Frame rate cap; 0 disables the limiter.
    #[schemars(title = "Target FPS", range(min = 0, max = 240))]
    pub target_fps: u32,
    /// Log frame statistics every this many frames.
    #[schemars(title = "Stats Interval", range(min = 1, max = 600))]
    pub stats_interval: u64,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            title: "Skyline".to_owned(),
            width: 1280,
            height: 720,
            target_fps: 0,
            stats_interval: 10,
        }
    }
}

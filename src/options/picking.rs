use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Picking", inline)]
#[serde(default)]
/// Hover picking toggles.
pub struct PickingOptions {
    /// Run the id pass every frame.
    #[schemars(title = "Hover Picking")]
    pub enabled: bool,
    /// Draw the picked instance highlighted.
    #[schemars(title = "Highlight Selection")]
    pub highlight: bool,
}

impl Default for PickingOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            highlight: true,
        }
    }
}

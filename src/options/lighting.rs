use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// One directional "top" light plus a flat ambient term.
pub struct LightingOptions {
    /// Directional light colour (linear RGB).
    pub directional_color: [f32; 3],
    /// Directional light intensity multiplier.
    pub directional_intensity: f32,
    /// Directional light position; it shines from here towards the origin.
    pub directional_position: [f32; 3],
    /// Ambient light colour (linear RGB).
    pub ambient_color: [f32; 3],
    /// Ambient light intensity multiplier.
    pub ambient_intensity: f32,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            directional_color: [1.0, 1.0, 1.0],
            directional_intensity: 1.0,
            directional_position: [500.0, 500.0, 500.0],
            // 0x333333
            ambient_color: [0.2, 0.2, 0.2],
            ambient_intensity: 1.0,
        }
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Output surface and UI chrome options.
pub struct DisplayOptions {
    /// Clear to a fully transparent background so the page (or desktop
    /// compositor) shows through around the model.
    pub transparent_background: bool,
    /// Background colour used when the background is opaque.
    pub clear_color: [f32; 4],
    /// Add the "Toggle Panning" button to the page (browser builds).
    pub show_toggle_button: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            transparent_background: true,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            show_toggle_button: true,
        }
    }
}

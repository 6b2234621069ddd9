//! Viewer options with TOML file support.
//!
//! Camera, lighting, display and keybinding settings are consolidated here.
//! Every section uses `#[serde(default)]`, so a partial TOML file (e.g. only
//! overriding `[lighting]`) works. [`Options::for_preset`] returns the
//! per-model tweaks for the bundled models.

mod camera;
mod display;
mod lighting;
mod preset;

use std::path::Path;

pub use camera::CameraOptions;
pub use display::DisplayOptions;
pub use lighting::LightingOptions;
pub use preset::{ModelPreset, UnknownPreset};
use serde::{Deserialize, Serialize};

use crate::error::ViewerError;
use crate::input::KeyBindings;

/// Top-level options container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Camera projection and control parameters.
    pub camera: CameraOptions,
    /// Lighting parameters.
    pub lighting: LightingOptions,
    /// Background and UI chrome.
    pub display: DisplayOptions,
    /// Keyboard bindings.
    pub keybindings: KeyBindings,
}

impl Options {
    /// Defaults adjusted for one of the bundled models.
    ///
    /// The castle is a large scene: the camera sits 500 units out and
    /// auto-rotates. The dino is small: the camera sits 25 units out under
    /// five times the ambient light and stays still until panning is
    /// toggled on.
    #[must_use]
    pub fn for_preset(preset: ModelPreset) -> Self {
        let mut options = Self::default();
        match preset {
            ModelPreset::Castle => {
                options.camera.distance = Some(500.0);
                options.camera.auto_rotate = true;
                options.lighting.ambient_intensity = 1.0;
            }
            ModelPreset::Dino => {
                options.camera.distance = Some(25.0);
                options.camera.auto_rotate = false;
                options.lighting.ambient_intensity = 5.0;
            }
        }
        options
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Io`] if the file cannot be read and
    /// [`ViewerError::OptionsParse`] if it is not valid options TOML or
    /// holds unusable camera values.
    pub fn load(path: &Path) -> Result<Self, ViewerError> {
        let content = std::fs::read_to_string(path).map_err(ViewerError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from a TOML string. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::OptionsParse`] on malformed TOML or on camera
    /// values rejected by [`CameraOptions::validate`].
    pub fn from_toml(content: &str) -> Result<Self, ViewerError> {
        let options: Self = toml::from_str(content)
            .map_err(|e| ViewerError::OptionsParse(e.to_string()))?;
        options
            .camera
            .validate()
            .map_err(ViewerError::OptionsParse)?;
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Io`] if the file or its directory cannot be
    /// written.
    pub fn save(&self, path: &Path) -> Result<(), ViewerError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ViewerError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ViewerError::Io)?;
        }
        std::fs::write(path, content).map_err(ViewerError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ViewerCommand;

    #[test]
    fn default_survives_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[lighting]
ambient_intensity = 5.0
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.lighting.ambient_intensity, 5.0);
        assert_eq!(opts.lighting.directional_position, [500.0, 500.0, 500.0]);
        assert_eq!(opts.camera.fovy, 75.0);
        assert!(opts.display.transparent_background);
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml("[camera\nfovy = ").unwrap_err();
        assert!(matches!(err, ViewerError::OptionsParse(_)));
    }

    #[test]
    fn inverted_distance_limits_are_rejected() {
        let err = Options::from_toml(
            "[camera]\nmin_distance = 50.0\nmax_distance = 10.0\n",
        )
        .unwrap_err();
        let ViewerError::OptionsParse(msg) = err else {
            panic!("expected OptionsParse, got {err:?}");
        };
        assert!(msg.contains("max_distance"), "{msg}");
    }

    #[test]
    fn non_finite_camera_values_are_rejected() {
        for toml_str in [
            "[camera]\nmin_distance = nan\n",
            "[camera]\nmax_distance = nan\n",
            "[camera]\ndistance = -1.0\n",
            "[camera]\nfovy = 0.0\n",
            "[camera]\nznear = 10.0\nzfar = 1.0\n",
        ] {
            assert!(
                matches!(
                    Options::from_toml(toml_str),
                    Err(ViewerError::OptionsParse(_))
                ),
                "accepted {toml_str:?}"
            );
        }
    }

    #[test]
    fn infinite_max_distance_is_allowed() {
        let opts =
            Options::from_toml("[camera]\nmax_distance = inf\n").unwrap();
        assert!(opts.camera.max_distance.is_infinite());
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.lookup("KeyP"),
            Some(ViewerCommand::TogglePanning)
        );
        assert_eq!(
            opts.keybindings.lookup("Escape"),
            Some(ViewerCommand::Quit)
        );
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn presets_differ_in_distance_and_ambient() {
        let castle = Options::for_preset(ModelPreset::Castle);
        assert_eq!(castle.camera.distance, Some(500.0));
        assert!(castle.camera.auto_rotate);
        assert_eq!(castle.lighting.ambient_intensity, 1.0);

        let dino = Options::for_preset(ModelPreset::Dino);
        assert_eq!(dino.camera.distance, Some(25.0));
        assert!(!dino.camera.auto_rotate);
        assert_eq!(dino.lighting.ambient_intensity, 5.0);
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = std::env::temp_dir()
            .join(format!("modelview-options-{}", std::process::id()));
        let path = dir.join("viewer.toml");
        let opts = Options::for_preset(ModelPreset::Dino);
        opts.save(&path).unwrap();
        let loaded = Options::load(&path).unwrap();
        assert_eq!(opts, loaded);
        let _ = std::fs::remove_dir_all(&dir);
    }
}

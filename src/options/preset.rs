use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Bundled models with their own camera and lighting tweaks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ModelPreset {
    /// Large scene viewed from afar with orbit controls auto-rotating.
    #[default]
    Castle,
    /// Small model viewed up close under strong ambient light, camera
    /// still until the user toggles panning.
    Dino,
}

impl ModelPreset {
    /// All presets, in CLI listing order.
    pub const ALL: [Self; 2] = [Self::Castle, Self::Dino];

    /// Directory name under `models/`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Castle => "castle",
            Self::Dino => "dino",
        }
    }

    /// Relative path (or URL) of the preset's glTF file.
    #[must_use]
    pub fn model_path(self) -> String {
        format!("models/{}/scene.gltf", self.name())
    }
}

impl fmt::Display for ModelPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing a preset name that does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPreset(pub String);

impl fmt::Display for UnknownPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown model preset `{}` (expected one of: ", self.0)?;
        for (i, preset) in ModelPreset::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(preset.name())?;
        }
        f.write_str(")")
    }
}

impl std::error::Error for UnknownPreset {}

impl FromStr for ModelPreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownPreset(s.to_owned()))
    }
}

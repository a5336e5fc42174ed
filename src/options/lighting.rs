use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Named lighting parameter sets.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum LightingPreset {
    /// Balanced plastic look.
    #[default]
    Default,
    /// Mostly diffuse, nearly no highlight.
    Matte,
    /// Tight, strong highlights.
    Glossy,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Lighting", inline)]
#[serde(default)]
/// Blinn-Phong parameters. The light is fixed in view space.
pub struct LightingOptions {
    /// Ambient term, as a fraction of the light color.
    #[schemars(title = "Ambient", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub ambient: f32,
    /// Specular strength.
    #[schemars(title = "Specular", range(min = 0.0, max = 2.0), extend("step" = 0.05))]
    pub specular: f32,
    /// Specular exponent.
    #[schemars(title = "Shininess", range(min = 1.0, max = 128.0), extend("step" = 1.0))]
    pub shininess: f32,
    /// Linear light color.
    #[schemars(skip)]
    pub light_color: [f32; 3],
    /// View-space direction towards the light. Normalized in the shader.
    #[schemars(skip)]
    pub light_dir: [f32; 3],
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self::preset(LightingPreset::Default)
    }
}

impl LightingOptions {
    /// Parameters for a named preset.
    #[must_use]
    pub fn preset(preset: LightingPreset) -> Self {
        let (ambient, specular, shininess) = match preset {
            LightingPreset::Default => (0.3, 0.6, 16.0),
            LightingPreset::Matte => (0.35, 0.1, 4.0),
            LightingPreset::Glossy => (0.25, 1.0, 64.0),
        };
        Self {
            ambient,
            specular,
            shininess,
            light_color: [0.9; 3],
            light_dir: [0.3, 0.3, 1.0],
        }
    }
}

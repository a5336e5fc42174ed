//! Rendering and interaction options with TOML preset support.
//!
//! Every section uses `#[serde(default)]`, so a preset file only needs the
//! keys it overrides.

mod camera;
mod display;
mod geometry;
mod keybindings;
mod lighting;

use std::path::Path;

pub use camera::{CameraOptions, ProjectionMode};
pub use display::DisplayOptions;
pub use geometry::{BondColorMode, GeometryOptions};
pub use keybindings::KeybindingOptions;
pub use lighting::{LightingOptions, LightingPreset};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::MolvisError;

/// Top-level options container.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Lighting parameters.
    pub lighting: LightingOptions,
    /// Camera projection and control parameters.
    pub camera: CameraOptions,
    /// Atom appearance, highlight and labels.
    pub display: DisplayOptions,
    /// Bond inference and geometry.
    pub geometry: GeometryOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MolvisError::OptionsParse`] on malformed TOML.
    pub fn from_toml(content: &str) -> Result<Self, MolvisError> {
        let mut opts: Self = toml::from_str(content)
            .map_err(|e| MolvisError::OptionsParse(e.to_string()))?;
        opts.keybindings.rebuild_reverse_map();
        Ok(opts)
    }

    /// Load options from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an I/O or parse error.
    pub fn load(path: &Path) -> Result<Self, MolvisError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns an I/O or serialization error.
    pub fn save(&self, path: &Path) -> Result<(), MolvisError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MolvisError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyAction;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed = Options::from_toml(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[lighting]
shininess = 64.0

[display]
atom_opacity = 0.5
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.lighting.shininess, 64.0);
        assert_eq!(opts.lighting.ambient, 0.3);
        assert_eq!(opts.display.atom_opacity, 0.5);
        assert_eq!(opts.display.highlight_scale, 1.15);
        assert_eq!(opts.geometry.bond_tolerance, 0.15);
    }

    #[test]
    fn malformed_toml_is_reported() {
        let err = Options::from_toml("[lighting\nambient = ").unwrap_err();
        assert!(matches!(err, MolvisError::OptionsParse(_)));
    }

    #[test]
    fn default_lighting_matches_preset() {
        let lighting = LightingOptions::default();
        assert_eq!(lighting, LightingOptions::preset(LightingPreset::Default));
        assert_eq!(lighting.ambient, 0.3);
        assert_eq!(lighting.specular, 0.6);
        assert_eq!(lighting.shininess, 16.0);
        assert_eq!(lighting.light_color, [0.9; 3]);
        assert_eq!(lighting.light_dir, [0.3, 0.3, 1.0]);
        assert_ne!(
            LightingOptions::preset(LightingPreset::Glossy).shininess,
            lighting.shininess
        );
    }

    #[test]
    fn keybinding_lookup_survives_reload() {
        let toml_str = r#"
[keybindings.bindings]
toggle_projection = "KeyO"
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(
            opts.keybindings.lookup("KeyO"),
            Some(KeyAction::ToggleProjection)
        );
        assert_eq!(opts.keybindings.lookup("KeyP"), None);
        assert_eq!(
            Options::default().keybindings.lookup("Escape"),
            Some(KeyAction::ClearSelection)
        );
    }

    #[test]
    fn presets_are_listed_sorted() {
        let dir = std::env::temp_dir()
            .join(format!("molvis-presets-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        Options::default().save(&dir.join("b.toml")).unwrap();
        Options::default().save(&dir.join("a.toml")).unwrap();
        std::fs::write(dir.join("notes.txt"), "x").unwrap();
        assert_eq!(Options::list_presets(&dir), vec!["a", "b"]);
        let loaded = Options::load(&dir.join("a.toml")).unwrap();
        assert_eq!(loaded, Options::default());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn bundled_presets_parse() {
        let glossy =
            Options::from_toml(include_str!("../../assets/presets/glossy.toml"))
                .unwrap();
        assert_eq!(glossy.lighting.shininess, 64.0);

        let translucent = Options::from_toml(include_str!(
            "../../assets/presets/translucent.toml"
        ))
        .unwrap();
        assert_eq!(translucent.camera.projection, ProjectionMode::Orthographic);
        assert!(translucent.display.selection_halo);
        assert_eq!(
            translucent.geometry.bond_color_mode,
            BondColorMode::SplitByAtom
        );
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("lighting"));
        assert!(props.contains_key("camera"));
        assert!(props.contains_key("display"));
        assert!(props.contains_key("geometry"));
        assert!(!props.contains_key("keybindings"));

        let lighting = &props["lighting"]["properties"];
        assert!(lighting.get("ambient").is_some());
        assert!(lighting.get("light_dir").is_none());
    }
}

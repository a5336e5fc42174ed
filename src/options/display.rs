use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
/// Appearance of atoms, highlights and labels.
pub struct DisplayOptions {
    /// Clear color of the viewport (linear RGB).
    #[schemars(skip)]
    pub background: [f32; 3],
    /// Alpha applied to every atom. Values below 1 route atoms through WBOIT.
    #[schemars(title = "Atom Opacity", range(min = 0.05, max = 1.0), extend("step" = 0.05))]
    pub atom_opacity: f32,
    /// Radius multiplier of the hovered atom.
    #[schemars(title = "Hover Scale", range(min = 1.0, max = 1.5), extend("step" = 0.01))]
    pub highlight_scale: f32,
    /// Color of selected atoms.
    #[schemars(skip)]
    pub selection_color: [f32; 3],
    /// Draw a translucent halo around selected atoms.
    #[schemars(title = "Selection Halo")]
    pub selection_halo: bool,
    /// Halo radius relative to the atom radius.
    #[schemars(skip)]
    pub halo_scale: f32,
    /// Halo opacity.
    #[schemars(skip)]
    pub halo_alpha: f32,
    /// Draw element symbols over atoms (needs a font atlas).
    #[schemars(title = "Labels")]
    pub show_labels: bool,
    /// Label glyph height in molecule units.
    #[schemars(title = "Label Height", range(min = 0.1, max = 2.0), extend("step" = 0.05))]
    pub label_height: f32,
    /// Label color.
    #[schemars(skip)]
    pub label_color: [f32; 3],
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            background: [0.133, 0.133, 0.133],
            atom_opacity: 1.0,
            highlight_scale: 1.15,
            selection_color: [1.0, 0.85, 0.1],
            selection_halo: false,
            halo_scale: 1.35,
            halo_alpha: 0.35,
            show_labels: false,
            label_height: 0.4,
            label_color: [1.0, 1.0, 1.0],
        }
    }
}

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How bond cylinders are colored.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum BondColorMode {
    /// Each half takes the color of the atom it touches.
    #[default]
    SplitByAtom,
    /// One cylinder in `bond_color`.
    Uniform,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Geometry", inline)]
#[serde(default)]
/// Bond inference and bond geometry.
pub struct GeometryOptions {
    /// Bond cylinder radius in molecule units.
    #[schemars(title = "Bond Radius", range(min = 0.02, max = 0.5), extend("step" = 0.01))]
    pub bond_radius: f32,
    /// Relative slack on the covalent-radius bond cutoff.
    #[schemars(title = "Bond Tolerance", range(min = 0.0, max = 0.5), extend("step" = 0.01))]
    pub bond_tolerance: f32,
    /// Bond coloring.
    #[schemars(title = "Bond Colors")]
    pub bond_color_mode: BondColorMode,
    /// Color used by [`BondColorMode::Uniform`].
    #[schemars(skip)]
    pub bond_color: [f32; 3],
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            bond_radius: 0.1,
            bond_tolerance: 0.15,
            bond_color_mode: BondColorMode::SplitByAtom,
            bond_color: [0.6, 0.6, 0.6],
        }
    }
}

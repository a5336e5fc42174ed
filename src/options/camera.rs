use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Projection used for the scene.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMode {
    /// Perspective projection with `fovy`.
    #[default]
    Perspective,
    /// Orthographic projection sized to the molecule.
    Orthographic,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection and control parameters.
pub struct CameraOptions {
    /// Initial projection.
    #[schemars(title = "Projection")]
    pub projection: ProjectionMode,
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 90.0), extend("step" = 1.0))]
    pub fovy: f32,
    /// Degrees of rotation per pixel of drag.
    #[schemars(title = "Rotate Speed", range(min = 0.05, max = 2.0), extend("step" = 0.05))]
    pub rotate_speed: f32,
    /// Exponential zoom factor per scroll line.
    #[schemars(title = "Zoom Speed", range(min = 0.01, max = 0.5), extend("step" = 0.01))]
    pub zoom_speed: f32,
    /// Lower clamp of the accumulated scene scale.
    #[schemars(skip)]
    pub min_scale: f32,
    /// Upper clamp of the accumulated scene scale.
    #[schemars(skip)]
    pub max_scale: f32,
    /// Pointer travel in pixels before a press becomes a drag.
    #[schemars(skip)]
    pub drag_threshold: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            projection: ProjectionMode::Perspective,
            fovy: 45.0,
            rotate_speed: 0.4,
            zoom_speed: 0.1,
            min_scale: 0.01,
            max_scale: 100.0,
            drag_threshold: 4.0,
        }
    }
}

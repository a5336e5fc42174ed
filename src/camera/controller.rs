use glam::{Mat4, Vec3};

use super::core::{Camera, FrameUniform, RenderMode};
use super::projection::Projection;
use super::transform::SceneTransform;
use crate::options::{CameraOptions, ProjectionMode};

/// Distance of the camera from the origin, in molecule sizes.
const CAMERA_DISTANCE: f32 = 3.0;

/// The full transform set feeding every pass.
///
/// `final_transform = projection * view * scene * model_root` is cached and
/// invalidated by every setter, so readers never see a stale product.
#[derive(Debug, Clone)]
pub struct SceneTransforms {
    camera: Camera,
    projection: Projection,
    scene: SceneTransform,
    model_root: Mat4,
    min_scale: f32,
    max_scale: f32,
    final_transform: Option<Mat4>,
}

impl SceneTransforms {
    /// Transforms for a `width` x `height` viewport.
    #[must_use]
    pub fn new(options: &CameraOptions, width: u32, height: u32) -> Self {
        Self {
            camera: Camera::default(),
            projection: Projection::new(
                options.projection,
                options.fovy,
                width,
                height,
            ),
            scene: SceneTransform::default(),
            model_root: Mat4::IDENTITY,
            min_scale: options.min_scale,
            max_scale: options.max_scale,
            final_transform: None,
        }
    }

    /// Re-read projection parameters and scale limits from options.
    ///
    /// The projection mode is left alone; it is toggled at runtime.
    pub fn apply_options(&mut self, options: &CameraOptions) {
        self.projection.fovy = options.fovy;
        self.min_scale = options.min_scale;
        self.max_scale = options.max_scale;
        self.scene.scale = self.scene.scale.clamp(self.min_scale, self.max_scale);
        self.invalidate();
    }

    /// Center the model on `centroid` and place the camera so a sphere of
    /// radius `size` fills the view. Resets rotation and zoom.
    pub fn frame(&mut self, centroid: Vec3, size: f32) {
        let size = if size.is_finite() && size > 0.0 { size } else { 1.0 };
        self.model_root = Mat4::from_translation(-centroid);
        self.camera = Camera::facing_origin(CAMERA_DISTANCE * size);
        self.projection.size = size;
        self.scene = SceneTransform::default();
        self.invalidate();
    }

    /// Reset rotation and zoom, keeping the framing.
    pub fn reset_view(&mut self) {
        self.scene = SceneTransform::default();
        self.invalidate();
    }

    /// Incremental rotation in degrees.
    pub fn rotate(&mut self, pitch: f32, yaw: f32, roll: f32) {
        self.scene.rotate(pitch, yaw, roll);
        self.invalidate();
    }

    /// Multiply the scene scale by `factor`; see [`SceneTransform::scale_by`].
    pub fn scale(&mut self, factor: f32) -> bool {
        let changed = self.scene.scale_by(factor, self.min_scale, self.max_scale);
        if changed {
            self.invalidate();
        }
        changed
    }

    /// Update the projection aspect ratio.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.set_viewport(width, height);
        self.invalidate();
    }

    /// Switch between perspective and orthographic projection.
    pub fn toggle_projection(&mut self) -> ProjectionMode {
        self.projection.mode = match self.projection.mode {
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
        };
        self.invalidate();
        self.projection.mode
    }

    fn invalidate(&mut self) {
        self.final_transform = None;
    }

    /// Whether the cached product is current.
    pub fn is_cached(&self) -> bool {
        self.final_transform.is_some()
    }

    /// Scene rotation/scale composed with the model root.
    pub fn scene_matrix(&self) -> Mat4 {
        self.scene.matrix() * self.model_root
    }

    /// `projection * view * scene`, recomputed if any part changed.
    pub fn final_transform(&mut self) -> Mat4 {
        if let Some(m) = self.final_transform {
            return m;
        }
        let m = self.projection.matrix() * self.camera.view() * self.scene_matrix();
        self.final_transform = Some(m);
        m
    }

    /// Model scale times scene scale: the on-screen size multiplier of an
    /// instance whose model matrix scales by `model_scale`.
    pub fn combined_scale(&self, model_scale: f32) -> f32 {
        model_scale * self.scene.scale
    }

    /// Accumulated scene rotation.
    pub fn rotation(&self) -> glam::Quat {
        self.scene.rotation
    }

    /// Accumulated scene scale.
    pub fn scene_scale(&self) -> f32 {
        self.scene.scale
    }

    /// Current projection.
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Current camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Uniform contents for a pass in `mode`.
    pub fn frame_uniform(&mut self, mode: RenderMode) -> FrameUniform {
        let final_transform = self.final_transform();
        FrameUniform {
            final_transform: final_transform.to_cols_array_2d(),
            projection: self.projection.matrix().to_cols_array_2d(),
            view: self.camera.view().to_cols_array_2d(),
            scene: self.scene_matrix().to_cols_array_2d(),
            render_mode: mode.as_u32(),
            is_perspective: u32::from(self.projection.is_perspective()),
            _pad: [0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transforms() -> SceneTransforms {
        let mut t = SceneTransforms::new(&CameraOptions::default(), 800, 600);
        t.frame(Vec3::new(1.0, 2.0, 3.0), 5.0);
        t
    }

    #[test]
    fn every_setter_invalidates_the_cache() {
        let mut t = transforms();
        let _ = t.final_transform();
        assert!(t.is_cached());

        t.rotate(5.0, 0.0, 0.0);
        assert!(!t.is_cached());
        let _ = t.final_transform();

        assert!(t.scale(1.5));
        assert!(!t.is_cached());
        let _ = t.final_transform();

        t.resize(400, 400);
        assert!(!t.is_cached());
        let _ = t.final_transform();

        let _ = t.toggle_projection();
        assert!(!t.is_cached());
    }

    #[test]
    fn ignored_scale_keeps_cache() {
        let mut t = transforms();
        let _ = t.final_transform();
        assert!(!t.scale(-1.0));
        assert!(t.is_cached());

        assert!(t.scale(1000.0));
        let _ = t.final_transform();
        assert!(!t.scale(2.0));
        assert!(t.is_cached());
    }

    #[test]
    fn cached_product_matches_fresh_product() {
        let mut t = transforms();
        t.rotate(10.0, 20.0, 30.0);
        let _ = t.scale(2.0);
        let cached = t.final_transform();
        let fresh = t.projection().matrix() * t.camera().view() * t.scene_matrix();
        assert_eq!(cached, fresh);
    }

    #[test]
    fn framing_centers_the_centroid() {
        let mut t = transforms();
        let ndc = t.final_transform().project_point3(Vec3::new(1.0, 2.0, 3.0));
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn scale_round_trip_restores_final_transform() {
        let mut t = transforms();
        let before = t.final_transform();
        let _ = t.scale(2.0);
        let _ = t.scale(0.5);
        assert_eq!(t.final_transform(), before);
    }

    #[test]
    fn combined_scale_multiplies_scene_scale() {
        let mut t = transforms();
        let _ = t.scale(2.0);
        assert_eq!(t.combined_scale(0.5), 1.0);
    }

    #[test]
    fn toggle_flips_projection_flag() {
        let mut t = transforms();
        assert_eq!(t.frame_uniform(RenderMode::Normal).is_perspective, 1);
        assert_eq!(t.toggle_projection(), ProjectionMode::Orthographic);
        let uniform = t.frame_uniform(RenderMode::Picking);
        assert_eq!(uniform.is_perspective, 0);
        assert_eq!(uniform.render_mode, 1);
    }
}

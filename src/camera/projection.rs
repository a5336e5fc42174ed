use glam::Mat4;

use crate::options::ProjectionMode;

/// Orthographic bounds relative to the molecule size.
const ORTHO_MARGIN: f32 = 1.1;
/// Perspective near plane.
const NEAR: f32 = 0.1;

/// Projection sized to the framed molecule.
///
/// Portrait viewports keep the configured field of view horizontally and
/// the orthographic box grows along the long axis, so a molecule that fits
/// a landscape window also fits a portrait one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Current projection mode.
    pub mode: ProjectionMode,
    /// Vertical field of view in degrees (horizontal in portrait).
    pub fovy: f32,
    /// Viewport width / height.
    pub aspect: f32,
    /// Bounding radius of the framed scene.
    pub size: f32,
}

impl Projection {
    /// Projection for a `width` x `height` viewport.
    #[must_use]
    pub fn new(mode: ProjectionMode, fovy: f32, width: u32, height: u32) -> Self {
        Self {
            mode,
            fovy,
            aspect: aspect_ratio(width, height),
            size: 1.0,
        }
    }

    /// Update the aspect ratio for a new viewport size.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = aspect_ratio(width, height);
    }

    /// Whether the viewport is taller than wide.
    pub fn is_portrait(&self) -> bool {
        self.aspect < 1.0
    }

    /// Whether the projection is perspective.
    pub fn is_perspective(&self) -> bool {
        self.mode == ProjectionMode::Perspective
    }

    /// Far plane; scaled so narrow fields of view still contain the scene.
    pub fn far(&self) -> f32 {
        10.0 * self.size / (self.fovy / 45.0).max(0.1)
    }

    /// Half extents `(x, y)` of the orthographic box.
    pub fn ortho_half_extents(&self) -> (f32, f32) {
        let bounds = self.size * ORTHO_MARGIN;
        if self.is_portrait() {
            (bounds, bounds / self.aspect)
        } else {
            (bounds * self.aspect, bounds)
        }
    }

    /// Vertical field of view actually used, in radians.
    pub fn effective_fovy(&self) -> f32 {
        let fov = self.fovy.to_radians();
        if self.is_portrait() {
            2.0 * ((fov * 0.5).tan() / self.aspect).atan()
        } else {
            fov
        }
    }

    /// Projection matrix with wgpu's [0, 1] depth range.
    pub fn matrix(&self) -> Mat4 {
        match self.mode {
            ProjectionMode::Perspective => Mat4::perspective_rh(
                self.effective_fovy(),
                self.aspect,
                NEAR,
                self.far(),
            ),
            ProjectionMode::Orthographic => {
                let (hx, hy) = self.ortho_half_extents();
                Mat4::orthographic_rh(-hx, hx, -hy, hy, NEAR, self.far())
            }
        }
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn landscape_ortho_keeps_vertical_bounds() {
        let mut p = Projection::new(ProjectionMode::Orthographic, 45.0, 200, 100);
        p.size = 10.0;
        let (hx, hy) = p.ortho_half_extents();
        assert!((hy - 11.0).abs() < 1e-5);
        assert!((hx - 22.0).abs() < 1e-5);
    }

    #[test]
    fn portrait_ortho_keeps_horizontal_bounds() {
        let mut p = Projection::new(ProjectionMode::Orthographic, 45.0, 100, 200);
        p.size = 10.0;
        let (hx, hy) = p.ortho_half_extents();
        assert!((hx - 11.0).abs() < 1e-5);
        assert!((hy - 22.0).abs() < 1e-5);
    }

    #[test]
    fn portrait_perspective_keeps_horizontal_fov() {
        let p = Projection::new(ProjectionMode::Perspective, 45.0, 100, 200);
        let m = p.matrix();
        // A point on the horizontal 22.5 degree edge lands on the NDC edge.
        let z = -5.0;
        let x = (22.5_f32).to_radians().tan() * 5.0;
        let ndc = m.project_point3(Vec3::new(x, 0.0, z));
        assert!((ndc.x - 1.0).abs() < 1e-4);
    }

    #[test]
    fn depth_range_is_zero_to_one() {
        let mut p = Projection::new(ProjectionMode::Perspective, 45.0, 100, 100);
        p.size = 2.0;
        let m = p.matrix();
        assert!(m.project_point3(Vec3::new(0.0, 0.0, -NEAR)).z.abs() < 1e-4);
        assert!((m.project_point3(Vec3::new(0.0, 0.0, -p.far())).z - 1.0).abs() < 1e-4);
    }
}

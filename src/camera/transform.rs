use glam::{Mat4, Quat};

/// Accumulated user rotation and zoom of the whole scene.
///
/// Rotations compose on the left, so each increment turns the molecule
/// about the fixed screen axes regardless of its current orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneTransform {
    /// Accumulated rotation.
    pub rotation: Quat,
    /// Accumulated uniform scale.
    pub scale: f32,
}

impl Default for SceneTransform {
    fn default() -> Self {
        Self {
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }
}

impl SceneTransform {
    /// Apply an incremental rotation given in degrees about X, Y and Z.
    pub fn rotate(&mut self, pitch: f32, yaw: f32, roll: f32) {
        let delta = Quat::from_rotation_x(pitch.to_radians())
            * Quat::from_rotation_y(yaw.to_radians())
            * Quat::from_rotation_z(roll.to_radians());
        self.rotation = (delta * self.rotation).normalize();
    }

    /// Multiply the scale by `factor`, clamped to `[min, max]`.
    ///
    /// Returns whether the stored scale changed. Non-positive and
    /// non-finite factors are ignored, as is a factor that pushes further
    /// into a limit the scale already sits on.
    pub fn scale_by(&mut self, factor: f32, min: f32, max: f32) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let scale = (self.scale * factor).clamp(min, max);
        let changed = scale != self.scale;
        self.scale = scale;
        changed
    }

    /// Scale-then-rotate matrix about the origin.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_quat(self.rotation) * Mat4::from_scale(glam::Vec3::splat(self.scale))
    }
}

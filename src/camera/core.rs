use glam::{Mat4, Vec3};

/// Look-at camera. The molecule is always centered at the origin, so the
/// camera only moves along +Z when the scene is framed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}

impl Camera {
    /// Camera looking at the origin from `distance` along +Z.
    #[must_use]
    pub fn facing_origin(distance: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, distance),
            ..Self::default()
        }
    }

    /// View matrix.
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
}

/// Which color a draw writes: shaded visual color or the identity color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Shaded output.
    #[default]
    Normal,
    /// Unlit picking color.
    Picking,
}

impl RenderMode {
    /// Value of the shader's `render_mode` field.
    pub fn as_u32(self) -> u32 {
        match self {
            Self::Normal => 0,
            Self::Picking => 1,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform holding the frame's transform set.
pub struct FrameUniform {
    /// `projection * view * scene`.
    pub final_transform: [[f32; 4]; 4],
    /// Projection matrix (used to write ray-cast depth).
    pub projection: [[f32; 4]; 4],
    /// View matrix.
    pub view: [[f32; 4]; 4],
    /// Scene rotation/scale composed with the model-root transform.
    pub scene: [[f32; 4]; 4],
    /// [`RenderMode`] as u32.
    pub render_mode: u32,
    /// 1 for perspective, 0 for orthographic.
    pub is_perspective: u32,
    pub(crate) _pad: [u32; 2],
}

impl Default for FrameUniform {
    fn default() -> Self {
        let identity = Mat4::IDENTITY.to_cols_array_2d();
        Self {
            final_transform: identity,
            projection: identity,
            view: identity,
            scene: identity,
            render_mode: RenderMode::Normal.as_u32(),
            is_perspective: 1,
            _pad: [0; 2],
        }
    }
}

//! Per-instance GPU record shared by every molecule pipeline.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

/// Implicit surface the fragment stage ray-casts for an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaycastType {
    /// Rasterize the proxy mesh as-is.
    None,
    /// Sphere inscribed in the proxy cube.
    Sphere,
    /// Capped cylinder along the proxy's Z axis.
    Cylinder,
}

impl RaycastType {
    /// Shader tag.
    pub fn as_u32(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Sphere => 1,
            Self::Cylinder => 2,
        }
    }

    /// Parse a shader tag.
    pub fn from_u32(tag: u32) -> Option<Self> {
        match tag {
            0 => Some(Self::None),
            1 => Some(Self::Sphere),
            2 => Some(Self::Cylinder),
            _ => None,
        }
    }
}

/// Shading applied to the base color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightingModel {
    /// Base color unchanged.
    Flat,
    /// Energy-conserving Blinn-Phong.
    BlinnPhong,
}

impl LightingModel {
    /// Shader tag.
    pub fn as_u32(self) -> u32 {
        match self {
            Self::Flat => 0,
            Self::BlinnPhong => 1,
        }
    }
}

/// One instanced draw. Must match `InstanceInput` in `molecule.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceRecord {
    /// Model matrix, column-major.
    pub model: [[f32; 4]; 4],
    /// Base color (linear RGBA).
    pub color: [f32; 4],
    /// Identity color written in picking mode.
    pub picking_color: [f32; 4],
    /// Atlas cell `(u_min, v_min, u_max, v_max)`; read only when textured.
    pub uv_rect: [f32; 4],
    /// [`LightingModel`] tag.
    pub lighting_model: u32,
    /// [`RaycastType`] tag.
    pub raycast_type: u32,
    /// 1 if the atlas is sampled.
    pub textured: u32,
    pub(crate) _pad: u32,
}

impl InstanceRecord {
    const ATTRIBUTES: [wgpu::VertexAttribute; 10] = wgpu::vertex_attr_array![
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4,
        8 => Float32x4,
        9 => Float32x4,
        10 => Uint32,
        11 => Uint32,
        12 => Uint32,
    ];

    /// Per-instance buffer layout (locations 3-12).
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }

    fn new(model: Mat4, color: [f32; 4], raycast: RaycastType, lighting: LightingModel) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color,
            picking_color: [0.0; 4],
            uv_rect: [0.0, 0.0, 1.0, 1.0],
            lighting_model: lighting.as_u32(),
            raycast_type: raycast.as_u32(),
            textured: 0,
            _pad: 0,
        }
    }

    /// Lit sphere of `radius` at `center`.
    #[must_use]
    pub fn sphere(center: Vec3, radius: f32, color: [f32; 4]) -> Self {
        let model = Mat4::from_translation(center) * Mat4::from_scale(Vec3::splat(radius));
        Self::new(model, color, RaycastType::Sphere, LightingModel::BlinnPhong)
    }

    /// Lit capped cylinder from `start` to `end`.
    ///
    /// Returns `None` for a degenerate (zero-length) axis.
    #[must_use]
    pub fn cylinder(start: Vec3, end: Vec3, radius: f32, color: [f32; 4]) -> Option<Self> {
        let axis = end - start;
        let length = axis.length();
        if !length.is_finite() || length <= f32::EPSILON {
            return None;
        }
        let rotation = Quat::from_rotation_arc(Vec3::Z, axis / length);
        let model = Mat4::from_scale_rotation_translation(
            Vec3::new(radius, radius, length * 0.5),
            rotation,
            (start + end) * 0.5,
        );
        Some(Self::new(model, color, RaycastType::Cylinder, LightingModel::BlinnPhong))
    }

    /// Flat textured quad sampling the atlas cell `uv_rect`.
    #[must_use]
    pub fn glyph(model: Mat4, color: [f32; 4], uv_rect: [f32; 4]) -> Self {
        Self {
            uv_rect,
            textured: 1,
            ..Self::new(model, color, RaycastType::None, LightingModel::Flat)
        }
    }

    /// Attach an identity color.
    #[must_use]
    pub fn with_picking_color(mut self, picking_color: [f32; 4]) -> Self {
        self.picking_color = picking_color;
        self
    }

    /// Decoded raycast tag.
    pub fn raycast(&self) -> Option<RaycastType> {
        RaycastType::from_u32(self.raycast_type)
    }

    /// Model matrix.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }

    /// Whether the instance needs the transparent pass.
    pub fn is_transparent(&self) -> bool {
        self.color[3] < 1.0
    }
}

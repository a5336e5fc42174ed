//! Lighting uniform and a CPU mirror of `lighting.wgsl`.

use std::f32::consts::PI;

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

use super::instance::LightingModel;
use crate::options::LightingOptions;

/// GPU lighting parameters. Must match `LightingUniform` in WGSL.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightingUniform {
    /// Linear light color.
    pub light_color: [f32; 3],
    /// Ambient strength.
    pub ambient_strength: f32,
    /// View-space direction towards the light.
    pub light_dir: [f32; 3],
    /// Specular strength.
    pub specular_strength: f32,
    /// Specular exponent.
    pub shininess: f32,
    pub(crate) _pad: [f32; 3],
}

impl From<&LightingOptions> for LightingUniform {
    fn from(options: &LightingOptions) -> Self {
        Self {
            light_color: options.light_color,
            ambient_strength: options.ambient,
            light_dir: options.light_dir,
            specular_strength: options.specular,
            shininess: options.shininess,
            _pad: [0.0; 3],
        }
    }
}

impl LightingUniform {
    /// Shade `base` with `model` at a surface with view-space `normal`.
    pub fn shade(&self, model: LightingModel, normal: Vec3, base: Vec4) -> Vec4 {
        match model {
            LightingModel::Flat => base,
            LightingModel::BlinnPhong => self.blinn_phong(normal, base),
        }
    }

    fn blinn_phong(&self, normal: Vec3, base: Vec4) -> Vec4 {
        let n = normal.normalize_or_zero();
        let l = Vec3::from_array(self.light_dir).normalize_or_zero();
        let light = Vec3::from_array(self.light_color);
        let ambient = light * self.ambient_strength;
        let diff = n.dot(l).max(0.0);
        let diffuse = light * diff;
        let energy = (8.0 + self.shininess) / (8.0 * PI);
        let specular = light * (self.specular_strength * energy * diff.powf(self.shininess));
        ((ambient + diffuse) * base.truncate() + specular).extend(base.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform() -> LightingUniform {
        LightingUniform::from(&LightingOptions::default())
    }

    #[test]
    fn uniform_is_three_vec4s() {
        assert_eq!(size_of::<LightingUniform>(), 48);
    }

    #[test]
    fn flat_leaves_color_unchanged() {
        let base = Vec4::new(0.2, 0.4, 0.6, 0.5);
        assert_eq!(uniform().shade(LightingModel::Flat, Vec3::X, base), base);
    }

    #[test]
    fn facing_light_adds_diffuse_and_specular() {
        let u = uniform();
        let l = Vec3::new(0.3, 0.3, 1.0).normalize();
        let base = Vec4::new(1.0, 0.5, 0.0, 0.25);
        let out = u.shade(LightingModel::BlinnPhong, l, base);

        let energy = (8.0 + 16.0) / (8.0 * PI);
        let spec = 0.6 * energy * 0.9;
        let expected_r = (0.9 * 0.3 + 0.9) * 1.0 + spec;
        let expected_b = spec;
        assert!((out.x - expected_r).abs() < 1e-5);
        assert!((out.z - expected_b).abs() < 1e-5);
        assert_eq!(out.w, 0.25);
    }

    #[test]
    fn back_facing_gets_ambient_only() {
        let u = uniform();
        let base = Vec4::new(1.0, 1.0, 1.0, 1.0);
        let out = u.shade(LightingModel::BlinnPhong, -Vec3::new(0.3, 0.3, 1.0), base);
        assert!((out.x - 0.27).abs() < 1e-6);
    }
}

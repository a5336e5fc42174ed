//! Host-supplied glyph atlas and billboarded atom labels.
//!
//! The crate never rasterizes fonts: the host hands over a single-channel
//! coverage image plus per-character cells, and labels are laid out as
//! one textured quad per glyph.

use glam::{Mat4, Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::error::DataError;
use crate::renderer::instance::InstanceRecord;

/// Character drawn for glyphs missing from the atlas.
pub const FALLBACK_CHAR: char = '?';

/// Distance of a label in front of its atom, relative to the radius.
const LABEL_OFFSET: f32 = 1.05;

/// One character cell of a [`FontAtlas`].
///
/// Texture coordinates follow wgpu's convention: `v_min` is the top row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphInfo {
    /// Advance width in atlas pixels.
    pub width: f32,
    /// Cell height in atlas pixels (shared line height).
    pub height: f32,
    /// Left edge.
    pub u_min: f32,
    /// Right edge.
    pub u_max: f32,
    /// Top edge.
    pub v_min: f32,
    /// Bottom edge.
    pub v_max: f32,
}

impl GlyphInfo {
    fn uv_rect(&self) -> [f32; 4] {
        [self.u_min, self.v_min, self.u_max, self.v_max]
    }

    fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            0.0
        }
    }
}

/// Single-channel coverage atlas.
#[derive(Debug, Clone, PartialEq)]
pub struct FontAtlas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    glyphs: FxHashMap<char, GlyphInfo>,
}

impl FontAtlas {
    /// Wrap a `width x height` coverage image (row-major, one byte per
    /// texel) and its glyph cells.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InvalidAtlas`] for an empty image, a pixel
    /// buffer of the wrong length or a cell outside `[0, 1]`.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        glyphs: FxHashMap<char, GlyphInfo>,
    ) -> Result<Self, DataError> {
        if width == 0 || height == 0 {
            return Err(DataError::InvalidAtlas(format!("empty atlas ({width}x{height})")));
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(DataError::InvalidAtlas(format!(
                "expected {expected} texels, got {}",
                pixels.len()
            )));
        }
        let in_unit = |v: f32| (0.0..=1.0).contains(&v);
        if let Some((ch, _)) = glyphs.iter().find(|(_, g)| {
            ![g.u_min, g.u_max, g.v_min, g.v_max].into_iter().all(in_unit)
        }) {
            return Err(DataError::InvalidAtlas(format!(
                "cell for {ch:?} lies outside the atlas"
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
            glyphs,
        })
    }

    /// Width in texels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major coverage texels.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Cell for `ch`, falling back to [`FALLBACK_CHAR`].
    pub fn glyph(&self, ch: char) -> Option<&GlyphInfo> {
        self.glyphs
            .get(&ch)
            .or_else(|| self.glyphs.get(&FALLBACK_CHAR))
    }
}

/// Appearance shared by every label of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    /// Glyph height in molecule units.
    pub height: f32,
    /// Linear RGB text color.
    pub color: [f32; 3],
}

/// Glyph quads spelling `text`, centered in front of an atom.
///
/// `rotation` is the current scene rotation; its inverse turns each quad to
/// face the camera.
pub fn label_instances(
    atlas: &FontAtlas,
    text: &str,
    center: Vec3,
    radius: f32,
    rotation: Quat,
    style: &LabelStyle,
) -> Vec<InstanceRecord> {
    let glyphs: Vec<&GlyphInfo> = text.chars().filter_map(|c| atlas.glyph(c)).collect();
    let half_height = style.height * 0.5;
    let total_width: f32 = glyphs.iter().map(|g| g.aspect() * style.height).sum();

    let facing = rotation.inverse();
    let anchor = center + facing * Vec3::new(0.0, 0.0, radius * LABEL_OFFSET);
    let billboard = Mat4::from_translation(anchor) * Mat4::from_quat(facing);
    let color = [style.color[0], style.color[1], style.color[2], 1.0];

    let mut cursor = -total_width * 0.5;
    glyphs
        .into_iter()
        .filter_map(|glyph| {
            let width = glyph.aspect() * style.height;
            let offset = cursor + width * 0.5;
            cursor += width;
            (width > 0.0).then(|| {
                let local = Mat4::from_translation(Vec3::new(offset, 0.0, 0.0))
                    * Mat4::from_scale(Vec3::new(width * 0.5, half_height, 1.0));
                InstanceRecord::glyph(billboard * local, color, glyph.uv_rect())
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(u_min: f32, u_max: f32) -> GlyphInfo {
        GlyphInfo {
            width: 8.0,
            height: 16.0,
            u_min,
            u_max,
            v_min: 0.0,
            v_max: 1.0,
        }
    }

    fn atlas() -> FontAtlas {
        let mut glyphs = FxHashMap::default();
        let _ = glyphs.insert('C', cell(0.0, 0.25));
        let _ = glyphs.insert('l', cell(0.25, 0.5));
        let _ = glyphs.insert('?', cell(0.5, 0.75));
        FontAtlas::new(32, 16, vec![0; 32 * 16], glyphs).unwrap()
    }

    const STYLE: LabelStyle = LabelStyle {
        height: 0.4,
        color: [1.0, 1.0, 1.0],
    };

    #[test]
    fn rejects_wrong_pixel_count() {
        let err = FontAtlas::new(4, 4, vec![0; 15], FxHashMap::default()).unwrap_err();
        assert!(matches!(err, DataError::InvalidAtlas(_)));
    }

    #[test]
    fn rejects_cells_outside_atlas() {
        let mut glyphs = FxHashMap::default();
        let _ = glyphs.insert('X', cell(0.9, 1.2));
        assert!(FontAtlas::new(4, 4, vec![0; 16], glyphs).is_err());
    }

    #[test]
    fn unknown_chars_use_fallback() {
        let atlas = atlas();
        assert_eq!(atlas.glyph('Z'), atlas.glyph('?'));
    }

    #[test]
    fn one_textured_quad_per_glyph() {
        let quads = label_instances(&atlas(), "Cl", Vec3::ZERO, 1.0, Quat::IDENTITY, &STYLE);
        assert_eq!(quads.len(), 2);
        assert!(quads.iter().all(|q| q.textured == 1));
        assert_eq!(quads[0].uv_rect, [0.0, 0.0, 0.25, 1.0]);
        assert_eq!(quads[1].uv_rect, [0.25, 0.0, 0.5, 1.0]);
    }

    #[test]
    fn label_is_centered_in_front_of_atom() {
        let quads = label_instances(&atlas(), "Cl", Vec3::ZERO, 1.0, Quat::IDENTITY, &STYLE);
        let left = quads[0].model_matrix().w_axis;
        let right = quads[1].model_matrix().w_axis;
        assert!((left.x + right.x).abs() < 1e-6);
        assert!((left.z - 1.05).abs() < 1e-6);
        // Each glyph is half as wide as it is tall.
        assert!((quads[0].model_matrix().x_axis.x - 0.1).abs() < 1e-6);
    }

    #[test]
    fn billboard_faces_camera_after_rotation() {
        let rotation = Quat::from_rotation_y(1.0);
        let quads = label_instances(&atlas(), "C", Vec3::ZERO, 1.0, rotation, &STYLE);
        // Scene rotation applied to the quad normal must give view +Z.
        let normal = rotation * quads[0].model_matrix().transform_vector3(Vec3::Z);
        assert!((normal.normalize() - Vec3::Z).length() < 1e-5);
    }
}

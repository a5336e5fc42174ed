//! GPU side of the glyph atlas used by atom labels.

use super::pipeline_helpers::{filtering_sampler, linear_sampler, texture_2d};
use crate::scene::labels::FontAtlas;

/// Bind group layout for the atlas (group 1 of the molecule shader).
pub fn atlas_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Font Atlas Layout"),
        entries: &[texture_2d(0), filtering_sampler(1)],
    })
}

/// Single-channel atlas texture plus its bind group.
///
/// Without a host atlas a 1x1 opaque texel is bound so the pipeline layout
/// stays identical whether or not labels are enabled.
pub struct AtlasTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    loaded: bool,
}

impl AtlasTexture {
    /// Upload `atlas`, or the 1x1 placeholder when `None`.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        atlas: Option<&FontAtlas>,
    ) -> Self {
        let placeholder = [u8::MAX];
        let (width, height, pixels) = match atlas {
            Some(a) => (a.width(), a.height(), a.pixels()),
            None => (1, 1, &placeholder[..]),
        };
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Font Atlas"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width),
                rows_per_image: Some(height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = linear_sampler(device, "Font Atlas Sampler");
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Font Atlas Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });
        if atlas.is_some() {
            log::debug!("font atlas uploaded ({width}x{height})");
        }
        Self {
            _texture: texture,
            bind_group,
            loaded: atlas.is_some(),
        }
    }

    /// Bind group for group 1.
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Whether a host atlas (not the placeholder) is bound.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

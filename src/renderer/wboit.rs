//! Weighted-blended order-independent transparency.
//!
//! Transparent fragments accumulate `(rgb * a, a) * w` additively and
//! multiply revealage by `1 - a`; a full-screen pass then blends the
//! weighted average over the opaque image.

use glam::{Vec3, Vec4};

use crate::error::MolvisError;
use crate::gpu::pipeline_helpers::{create_screen_space_pipeline, texture_2d_unfilterable};
use crate::gpu::shader_composer::{Shader, ShaderComposer};
use crate::gpu::texture::RenderTarget;

/// Accumulation target format.
pub const ACCUM_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
/// Revealage target format.
pub const REVEAL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R16Float;

/// Depth weight of a transparent fragment (`depth` in window space).
pub fn oit_weight(alpha: f32, depth: f32) -> f32 {
    let a = alpha.min(1.0) * 8.0 + 0.01;
    let d = 1.0 - 0.95 * depth;
    (a * a * a * 1e8 * d * d * d).clamp(1e-2, 3e2)
}

/// One pixel of the accumulation/revealage pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OitPixel {
    /// Weighted premultiplied color and weighted alpha.
    pub accum: Vec4,
    /// Product of `1 - a` over all fragments.
    pub revealage: f32,
}

impl Default for OitPixel {
    fn default() -> Self {
        Self {
            accum: Vec4::ZERO,
            revealage: 1.0,
        }
    }
}

impl OitPixel {
    /// Blend in a fragment of straight-alpha `color` at window `depth`.
    pub fn add(&mut self, color: Vec4, depth: f32) {
        let a = color.w;
        let w = oit_weight(a, depth);
        self.accum += (color.truncate() * a).extend(a) * w;
        self.revealage *= 1.0 - a;
    }

    /// Composite over an opaque color, as the resolve pass does.
    pub fn composite_over(&self, opaque: Vec3) -> Vec3 {
        if self.revealage >= 1.0 {
            return opaque;
        }
        let average = self.accum.truncate() / self.accum.w.max(1e-5);
        let alpha = 1.0 - self.revealage;
        average * alpha + opaque * (1.0 - alpha)
    }
}

/// Accumulation/revealage targets and the resolve pipeline.
pub struct WboitPass {
    accum: RenderTarget,
    reveal: RenderTarget,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    pipeline: wgpu::RenderPipeline,
}

impl WboitPass {
    /// Targets sized to the surface and a resolve pipeline writing
    /// `surface_format`.
    ///
    /// # Errors
    ///
    /// Returns [`MolvisError::Shader`] if the composite shader fails.
    pub fn new(
        device: &wgpu::Device,
        composer: &mut ShaderComposer,
        surface_format: wgpu::TextureFormat,
        size: (u32, u32),
    ) -> Result<Self, MolvisError> {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("WBOIT Composite Layout"),
            entries: &[texture_2d_unfilterable(0), texture_2d_unfilterable(1)],
        });
        let shader = composer.compose(device, Shader::WboitComposite)?;
        let pipeline = create_screen_space_pipeline(
            device,
            "WBOIT Composite",
            &shader,
            surface_format,
            Some(wgpu::BlendState::ALPHA_BLENDING),
            &[&layout],
        );
        let (accum, reveal) = Self::create_targets(device, size);
        let bind_group = Self::create_bind_group(device, &layout, &accum, &reveal);
        Ok(Self {
            accum,
            reveal,
            layout,
            bind_group,
            pipeline,
        })
    }

    fn create_targets(device: &wgpu::Device, size: (u32, u32)) -> (RenderTarget, RenderTarget) {
        let usage = wgpu::TextureUsages::TEXTURE_BINDING;
        (
            RenderTarget::new(device, "WBOIT Accumulation", size, ACCUM_FORMAT, usage),
            RenderTarget::new(device, "WBOIT Revealage", size, REVEAL_FORMAT, usage),
        )
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        accum: &RenderTarget,
        reveal: &RenderTarget,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("WBOIT Composite Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&accum.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&reveal.view),
                },
            ],
        })
    }

    /// Recreate both targets (and the bind group reading them).
    pub fn resize(&mut self, device: &wgpu::Device, size: (u32, u32)) {
        let (accum, reveal) = Self::create_targets(device, size);
        self.bind_group = Self::create_bind_group(device, &self.layout, &accum, &reveal);
        self.accum = accum;
        self.reveal = reveal;
    }

    /// Target size in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.accum.size()
    }

    /// Color targets for a pipeline writing the accumulation pass.
    pub fn accumulation_targets() -> [Option<wgpu::ColorTargetState>; 2] {
        let additive = wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        };
        let multiplicative = wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::Zero,
            dst_factor: wgpu::BlendFactor::OneMinusSrc,
            operation: wgpu::BlendOperation::Add,
        };
        [
            Some(wgpu::ColorTargetState {
                format: ACCUM_FORMAT,
                blend: Some(wgpu::BlendState {
                    color: additive,
                    alpha: additive,
                }),
                write_mask: wgpu::ColorWrites::ALL,
            }),
            Some(wgpu::ColorTargetState {
                format: REVEAL_FORMAT,
                blend: Some(wgpu::BlendState {
                    color: multiplicative,
                    alpha: multiplicative,
                }),
                write_mask: wgpu::ColorWrites::ALL,
            }),
        ]
    }

    /// Color attachments for the accumulation pass, cleared to
    /// accumulation 0 and revealage 1.
    pub fn accumulation_attachments(&self) -> [Option<wgpu::RenderPassColorAttachment<'_>>; 2] {
        let attachment = |view, clear| {
            Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })
        };
        [
            attachment(&self.accum.view, wgpu::Color::TRANSPARENT),
            attachment(&self.reveal.view, wgpu::Color::WHITE),
        ]
    }

    /// Blend the resolved transparency over `target`.
    pub fn composite(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("WBOIT Composite Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            ..Default::default()
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-4
    }

    #[test]
    fn weight_is_clamped() {
        assert_eq!(oit_weight(1.0, 0.0), 3e2);
        // Beyond the far plane the raw weight drops below the floor.
        assert_eq!(oit_weight(0.0, 1.05), 1e-2);
        // Fully transparent at the far plane: ~0.0125, just above the floor.
        let far = oit_weight(0.0, 1.0);
        assert!(far >= 1e-2 && far < 2e-2);
        let mid = oit_weight(0.5, 0.5);
        assert!(mid > 1e-2 && mid <= 3e2);
    }

    #[test]
    fn weight_decreases_with_depth() {
        let near = oit_weight(0.0, 0.5);
        let far = oit_weight(0.0, 0.95);
        assert!(near < 3e2 && far > 1e-2);
        assert!(near > far);
    }

    #[test]
    fn empty_pixel_leaves_opaque_image() {
        let opaque = Vec3::new(0.1, 0.2, 0.3);
        assert_eq!(OitPixel::default().composite_over(opaque), opaque);
    }

    #[test]
    fn single_fragment_is_plain_alpha_blend() {
        let mut px = OitPixel::default();
        px.add(Vec4::new(1.0, 0.0, 0.0, 0.25), 0.4);
        let out = px.composite_over(Vec3::new(0.0, 0.0, 1.0));
        assert!(close(out, Vec3::new(0.25, 0.0, 0.75)));
    }

    #[test]
    fn result_is_independent_of_fragment_order() {
        let fragments = [
            (Vec4::new(1.0, 0.0, 0.0, 0.3), 0.2),
            (Vec4::new(0.0, 1.0, 0.0, 0.6), 0.5),
            (Vec4::new(0.0, 0.0, 1.0, 0.45), 0.8),
        ];
        let opaque = Vec3::splat(0.133);
        let composite = |order: [usize; 3]| {
            let mut px = OitPixel::default();
            for i in order {
                let (color, depth) = fragments[i];
                px.add(color, depth);
            }
            px.composite_over(opaque)
        };
        let reference = composite([0, 1, 2]);
        for order in [[0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]] {
            assert!(close(composite(order), reference), "order {order:?}");
        }
    }
}

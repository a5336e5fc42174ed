//! GPU rendering: impostor geometry, lighting, transparency and picking.
//!
//! [`Renderer`] owns every pipeline and size-dependent target and encodes
//! the passes of a [`FramePlan`] into one command encoder.

pub mod frame;
pub mod impostor;
pub mod instance;
pub mod lighting;
pub mod mesh;
pub mod molecule_pass;
pub mod picking;
pub mod wboit;

use self::frame::{targets_match, FramePass, FramePlan};
use self::molecule_pass::MoleculePass;
use self::picking::Picking;
use self::wboit::WboitPass;
use crate::error::MolvisError;
use crate::gpu::shader_composer::ShaderComposer;

/// Every pipeline and off-screen target of the engine.
pub struct Renderer {
    /// Molecule pipelines, uniforms and instance buffers.
    pub molecule: MoleculePass,
    /// Transparency targets and resolve.
    pub wboit: WboitPass,
    /// Picking targets and request ids.
    pub picking: Picking,
}

impl Renderer {
    /// Compose shaders and allocate targets for a surface of `size`.
    ///
    /// # Errors
    ///
    /// Returns [`MolvisError::Shader`] if a shader fails to compose.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        size: (u32, u32),
    ) -> Result<Self, MolvisError> {
        let mut composer = ShaderComposer::new()?;
        let molecule = MoleculePass::new(device, queue, &mut composer, surface_format, size)?;
        let wboit = WboitPass::new(device, &mut composer, surface_format, size)?;
        let picking = Picking::new(device, size);
        Ok(Self {
            molecule,
            wboit,
            picking,
        })
    }

    /// Recreate depth, accumulation, revealage and picking targets.
    pub fn resize(&mut self, device: &wgpu::Device, size: (u32, u32)) {
        log::debug!("recreating render targets at {}x{}", size.0, size.1);
        self.molecule.resize(device, size);
        self.wboit.resize(device, size);
        self.picking.resize(device, size);
    }

    /// Whether all targets match a surface of `size`.
    pub fn matches(&self, size: (u32, u32)) -> bool {
        targets_match(
            size,
            &[self.molecule.size(), self.wboit.size(), self.picking.size()],
        )
    }

    /// Plan for the next frame given current instance and picking state.
    pub fn plan(&self) -> FramePlan {
        FramePlan::new(self.molecule.has_transparent(), self.picking.is_dirty())
    }

    /// Encode every pass of `plan` targeting `view`.
    pub fn encode(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        plan: FramePlan,
        background: wgpu::Color,
    ) {
        for pass in plan.passes() {
            match pass {
                FramePass::Opaque => self.molecule.draw_opaque(encoder, view, background),
                FramePass::Transparent => self.molecule.draw_transparent(encoder, &self.wboit),
                FramePass::Composite => self.wboit.composite(encoder, view),
                FramePass::Picking => self.encode_picking(encoder),
            }
        }
    }

    /// Encode the picking pass alone and mark the picking image current.
    pub fn encode_picking(&mut self, encoder: &mut wgpu::CommandEncoder) {
        self.molecule.draw_picking(encoder, &self.picking);
        self.picking.mark_rendered();
    }
}

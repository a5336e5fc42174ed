//! Per-frame rendering and resize.

use super::MolvisEngine;
use crate::camera::core::RenderMode;
use crate::error::MolvisError;

impl MolvisEngine {
    /// Resize the surface and every size-dependent target. Zero sizes are
    /// ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.context.resize(width, height) {
            return;
        }
        self.transforms.resize(width, height);
        self.renderer.resize(&self.context.device, (width, height));
    }

    /// Render and present one frame.
    ///
    /// `Outdated` and `Timeout` surfaces reconfigure and skip the frame.
    ///
    /// # Errors
    ///
    /// Returns a fatal error ([`MolvisError::is_fatal`]) if the device or
    /// surface is lost.
    pub fn render(&mut self) -> Result<(), MolvisError> {
        self.check_device()?;
        let frame = match self.context.get_next_frame() {
            Ok(frame) => frame,
            Err(
                e @ (wgpu::SurfaceError::Outdated
                | wgpu::SurfaceError::Timeout
                | wgpu::SurfaceError::Other),
            ) => {
                log::warn!("skipping frame: {e}");
                self.context.reconfigure();
                return Ok(());
            }
            Err(e) => return Err(MolvisError::Surface(e)),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.render_to_view(&view)?;
        frame.present();
        Ok(())
    }

    /// Render one frame into `view`, which must have the context's format
    /// and size.
    ///
    /// # Errors
    ///
    /// Returns [`MolvisError::DeviceLost`] if the device was lost.
    pub fn render_to_view(&mut self, view: &wgpu::TextureView) -> Result<(), MolvisError> {
        self.check_device()?;
        let size = self.context.size();
        if !self.renderer.matches(size) {
            log::debug!("targets out of date, recreating before frame");
            self.renderer.resize(&self.context.device, size);
        }

        self.prepare_frame();
        let plan = self.renderer.plan();
        let mut encoder = self.context.create_encoder("Frame Encoder");
        self.renderer
            .encode(&mut encoder, view, plan, self.background());
        self.context.submit(encoder);
        self.has_rendered = true;
        Ok(())
    }

    /// Bring instances and both frame uniforms up to date.
    pub(super) fn prepare_frame(&mut self) {
        self.sync_instances();
        let normal = self.transforms.frame_uniform(RenderMode::Normal);
        let picking = self.transforms.frame_uniform(RenderMode::Picking);
        self.renderer
            .molecule
            .write_frame(&self.context.queue, &normal, &picking);
    }

    fn check_device(&self) -> Result<(), MolvisError> {
        if self.context.is_device_lost() {
            return Err(MolvisError::DeviceLost(
                "device lost; recreate the engine".to_owned(),
            ));
        }
        Ok(())
    }

    fn background(&self) -> wgpu::Color {
        let [r, g, b] = self.options.display.background;
        wgpu::Color {
            r: f64::from(r),
            g: f64::from(g),
            b: f64::from(b),
            a: 1.0,
        }
    }
}

//! Scene mutation: transforms, data, options and instance sync.

use super::MolvisEngine;
use crate::error::MolvisError;
use crate::options::{Options, ProjectionMode};
use crate::renderer::lighting::LightingUniform;
use crate::scene::instances::InstanceContext;
use crate::scene::{AtomicCoordinates, FontAtlas, InstanceBatches, Molecule};

impl MolvisEngine {
    /// Incremental scene rotation in degrees.
    pub fn rotate_scene(&mut self, pitch: f32, yaw: f32, roll: f32) {
        self.transforms.rotate(pitch, yaw, roll);
        self.view_changed();
    }

    /// Multiply the scene scale by `factor`, clamped to the configured
    /// range. Non-positive or non-finite factors are ignored. Returns
    /// whether the scale changed.
    pub fn scale_scene(&mut self, factor: f32) -> bool {
        let changed = self.transforms.scale(factor);
        if changed {
            self.view_changed();
        }
        changed
    }

    /// Undo rotation and zoom.
    pub fn reset_view(&mut self) {
        self.transforms.reset_view();
        self.view_changed();
    }

    /// Switch projection mode; returns the new mode.
    pub fn toggle_projection(&mut self) -> ProjectionMode {
        let mode = self.transforms.toggle_projection();
        log::debug!("projection: {mode:?}");
        self.view_changed();
        mode
    }

    /// Deselect every atom. Returns whether anything was selected.
    pub fn clear_selection(&mut self) -> bool {
        self.molecule.clear_selection()
    }

    /// Replace the molecule. On error the displayed scene is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`MolvisError::InvalidData`] if `data` is rejected.
    pub fn set_data(&mut self, data: AtomicCoordinates) -> Result<(), MolvisError> {
        let molecule = Molecule::build(&data, &self.elements, &self.options.geometry)?;
        self.transforms.frame(molecule.centroid(), molecule.size());
        self.molecule = molecule;
        self.coords = data;
        self.pending_pick = None;
        self.renderer.picking.invalidate();
        Ok(())
    }

    /// Apply new options.
    ///
    /// Geometry changes rebuild bonds from the stored input, keeping the
    /// selection.
    pub fn set_options(&mut self, options: Options) {
        self.renderer.molecule.write_lighting(
            &self.context.queue,
            &LightingUniform::from(&options.lighting),
        );
        self.transforms.apply_options(&options.camera);
        if options.camera.projection != self.options.camera.projection
            && options.camera.projection != self.transforms.projection().mode
        {
            let _ = self.transforms.toggle_projection();
        }
        if options.geometry != self.options.geometry {
            self.rebuild_molecule(&options);
        }
        self.options = options;
        self.molecule.force_dirty();
        self.renderer.picking.invalidate();
    }

    fn rebuild_molecule(&mut self, options: &Options) {
        match Molecule::build(&self.coords, &self.elements, &options.geometry) {
            Ok(mut molecule) => {
                for tag in self.molecule.selection().iter() {
                    let _ = molecule.toggle_selection(tag);
                }
                let _ = molecule.set_hovered(self.molecule.hovered());
                self.molecule = molecule;
            }
            Err(e) => log::warn!("keeping previous bonds: {e}"),
        }
    }

    /// Supply (or remove) the glyph atlas used for labels.
    pub fn set_font_atlas(&mut self, atlas: Option<FontAtlas>) {
        self.renderer.molecule.set_atlas(
            &self.context.device,
            &self.context.queue,
            atlas.as_ref(),
        );
        self.atlas = atlas;
        self.molecule.force_dirty();
    }

    /// Transform changed: the picking image is stale and camera-facing
    /// labels must be rebuilt.
    fn view_changed(&mut self) {
        self.renderer.picking.invalidate();
        if self.labels_visible() {
            self.molecule.force_dirty();
        }
    }

    fn labels_visible(&self) -> bool {
        self.options.display.show_labels && self.atlas.is_some()
    }

    /// Rebuild and upload instances if the molecule changed.
    pub(super) fn sync_instances(&mut self) {
        if !self.molecule.is_dirty() {
            return;
        }
        let batches = InstanceBatches::build(
            &self.molecule,
            &InstanceContext {
                display: &self.options.display,
                geometry: &self.options.geometry,
                rotation: self.transforms.rotation(),
                atlas: self.atlas.as_ref(),
            },
        );
        self.renderer
            .molecule
            .upload(&self.context.device, &self.context.queue, &batches);
        self.renderer.picking.invalidate();
        self.molecule.mark_rendered();
    }
}

//! The engine: GPU context, renderer, molecule and transforms behind one
//! `&mut self` API.

pub mod command;
mod picking;
mod render;
mod scene;

pub use self::picking::PickEvent;

use self::command::MolvisCommand;
use self::picking::PickRequest;
use crate::camera::controller::SceneTransforms;
use crate::error::MolvisError;
use crate::gpu::render_context::RenderContext;
use crate::options::Options;
use crate::renderer::lighting::LightingUniform;
use crate::renderer::Renderer;
use crate::scene::{AtomicCoordinates, ElementTable, FontAtlas, Molecule};

/// The molecule rendering engine.
///
/// Owns the GPU context, every pipeline and target, the loaded molecule and
/// the transform set. All mutation happens through `&mut self` between
/// frames.
///
/// # Frame loop
///
/// Call [`render`](Self::render) once per frame and
/// [`resize`](Self::resize) when the surface size changes. Interaction
/// arrives either as [`MolvisCommand`]s through
/// [`execute`](Self::execute) (picks then complete in
/// [`poll_picking`](Self::poll_picking)) or through the async
/// [`new_cursor_position`](Self::new_cursor_position) and
/// [`toggle_atom_selection`](Self::toggle_atom_selection).
///
/// # Reinitialization
///
/// There is no in-place recovery from a fatal error
/// ([`MolvisError::is_fatal`]): drop the engine and build a new one.
pub struct MolvisEngine {
    /// Core wgpu device, queue, and surface.
    pub context: RenderContext,
    renderer: Renderer,
    transforms: SceneTransforms,
    elements: ElementTable,
    options: Options,
    /// Last accepted input, kept to rebuild bonds on geometry changes.
    coords: AtomicCoordinates,
    molecule: Molecule,
    atlas: Option<FontAtlas>,
    /// Non-blocking pick awaiting [`poll_picking`](Self::poll_picking).
    pending_pick: Option<PickRequest>,
    /// Whether at least one frame has been rendered.
    has_rendered: bool,
}

impl MolvisEngine {
    /// Create the engine for a window surface (the host's `create`).
    ///
    /// Data is validated before any GPU work, so bad input fails fast.
    ///
    /// # Errors
    ///
    /// Returns [`MolvisError::InvalidData`] for rejected coordinates, or a
    /// fatal GPU error if the device or pipelines cannot be created.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        data: AtomicCoordinates,
        options: Options,
    ) -> Result<Self, MolvisError> {
        let elements = ElementTable::default();
        let molecule = Molecule::build(&data, &elements, &options.geometry)?;
        let context = RenderContext::new(target, size).await?;
        Self::assemble(context, elements, data, molecule, options)
    }

    /// Create the engine on an existing device (embedding, offscreen
    /// rendering). Draw with [`render_to_view`](Self::render_to_view).
    ///
    /// # Errors
    ///
    /// Returns [`MolvisError::InvalidData`] for rejected coordinates or
    /// [`MolvisError::Shader`] if a pipeline fails to build.
    pub fn from_context(
        context: RenderContext,
        data: AtomicCoordinates,
        options: Options,
    ) -> Result<Self, MolvisError> {
        Self::from_context_with_elements(context, data, options, ElementTable::default())
    }

    /// Like [`from_context`](Self::from_context) with a custom element
    /// table.
    ///
    /// # Errors
    ///
    /// See [`from_context`](Self::from_context).
    pub fn from_context_with_elements(
        context: RenderContext,
        data: AtomicCoordinates,
        options: Options,
        elements: ElementTable,
    ) -> Result<Self, MolvisError> {
        let molecule = Molecule::build(&data, &elements, &options.geometry)?;
        Self::assemble(context, elements, data, molecule, options)
    }

    fn assemble(
        context: RenderContext,
        elements: ElementTable,
        coords: AtomicCoordinates,
        molecule: Molecule,
        options: Options,
    ) -> Result<Self, MolvisError> {
        let (width, height) = context.size();
        let renderer = Renderer::new(
            &context.device,
            &context.queue,
            context.format(),
            (width, height),
        )?;
        renderer
            .molecule
            .write_lighting(&context.queue, &LightingUniform::from(&options.lighting));

        let mut transforms = SceneTransforms::new(&options.camera, width, height);
        transforms.frame(molecule.centroid(), molecule.size());

        log::info!(
            "engine ready: {} atoms, {}x{} {:?}",
            molecule.len(),
            width,
            height,
            options.camera.projection
        );

        Ok(Self {
            context,
            renderer,
            transforms,
            elements,
            options,
            coords,
            molecule,
            atlas: None,
            pending_pick: None,
            has_rendered: false,
        })
    }

    /// Run one command. Returns whether the scene needs a redraw.
    ///
    /// `Hover` and `ToggleSelection` only start a readback; the result is
    /// applied by [`poll_picking`](Self::poll_picking).
    pub fn execute(&mut self, command: MolvisCommand) -> bool {
        match command {
            MolvisCommand::Rotate { pitch, yaw, roll } => {
                self.rotate_scene(pitch, yaw, roll);
                true
            }
            MolvisCommand::Zoom { factor } => self.scale_scene(factor),
            MolvisCommand::ResetView => {
                self.reset_view();
                true
            }
            MolvisCommand::ToggleProjection => {
                let _ = self.toggle_projection();
                true
            }
            MolvisCommand::Hover { x, y } => {
                self.start_pick(x, y, PickRequest::hover);
                false
            }
            MolvisCommand::ClearHover => self.molecule.set_hovered(None),
            MolvisCommand::ToggleSelection { x, y } => {
                self.start_pick(x, y, PickRequest::toggle);
                false
            }
            MolvisCommand::ClearSelection => self.clear_selection(),
        }
    }

    /// Current options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Loaded molecule.
    pub fn molecule(&self) -> &Molecule {
        &self.molecule
    }

    /// Element styles used for loading.
    pub fn elements(&self) -> &ElementTable {
        &self.elements
    }

    /// Current transform set.
    pub fn transforms(&self) -> &SceneTransforms {
        &self.transforms
    }

    /// Surface size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        self.context.size()
    }
}

//! Per-frame pass sequencing.

/// One render pass of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePass {
    /// Opaque impostors and labels into the surface and scene depth.
    Opaque,
    /// Transparent instances into accumulation/revealage.
    Transparent,
    /// Resolve the accumulated transparency over the surface.
    Composite,
    /// Identity colors into the picking target.
    Picking,
}

/// Which passes a frame runs, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FramePlan {
    transparent: bool,
    picking: bool,
}

impl FramePlan {
    /// Plan for a frame with (or without) transparent instances and a stale
    /// picking image.
    pub fn new(has_transparent: bool, picking_dirty: bool) -> Self {
        Self {
            transparent: has_transparent,
            picking: picking_dirty,
        }
    }

    /// Passes in submission order.
    pub fn passes(&self) -> impl Iterator<Item = FramePass> {
        [
            Some(FramePass::Opaque),
            self.transparent.then_some(FramePass::Transparent),
            self.transparent.then_some(FramePass::Composite),
            self.picking.then_some(FramePass::Picking),
        ]
        .into_iter()
        .flatten()
    }

    /// Whether the picking image is refreshed by this frame.
    pub fn renders_picking(&self) -> bool {
        self.picking
    }
}

/// Whether every size-dependent target matches the surface.
pub fn targets_match(surface: (u32, u32), targets: &[(u32, u32)]) -> bool {
    let surface = (surface.0.max(1), surface.1.max(1));
    targets.iter().all(|&size| size == surface)
}

//! Pixel picking: readback requests, hover and selection updates.

use super::MolvisEngine;
use crate::error::MolvisError;
use crate::renderer::picking::{PendingPick, PickOutcome};
use crate::scene::AtomInfo;

/// What a completed non-blocking pick was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PickPurpose {
    Hover,
    Toggle,
}

/// A pick started by [`MolvisEngine::execute`].
pub(crate) struct PickRequest {
    purpose: PickPurpose,
    pick: PendingPick,
}

impl PickRequest {
    pub(crate) fn hover(pick: PendingPick) -> Self {
        Self {
            purpose: PickPurpose::Hover,
            pick,
        }
    }

    pub(crate) fn toggle(pick: PendingPick) -> Self {
        Self {
            purpose: PickPurpose::Toggle,
            pick,
        }
    }
}

/// Result of a completed non-blocking pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickEvent {
    /// Hover resolved; `None` for background. The highlight is updated.
    Hovered(Option<AtomInfo>),
    /// Selection toggled for `atom`; `selected` is its new state.
    Toggled {
        /// The clicked atom.
        atom: AtomInfo,
        /// Whether the atom is now selected.
        selected: bool,
    },
    /// Click landed on the background.
    Missed,
}

impl MolvisEngine {
    /// Start a readback of the atom under `(x, y)`.
    ///
    /// Supersedes every earlier request. Returns `None` outside the canvas
    /// or before the first frame has been rendered.
    pub fn request_pick(&mut self, x: f32, y: f32) -> Option<PendingPick> {
        if !self.has_rendered {
            return None;
        }
        let (px, py) = canvas_pixel(self.context.size(), x, y)?;
        let id = self.renderer.picking.next_request_id();

        let mut encoder = self.context.create_encoder("Picking Encoder");
        if self.molecule.is_dirty() || self.renderer.picking.is_dirty() {
            self.prepare_frame();
            self.renderer.encode_picking(&mut encoder);
        }
        let staging = self
            .renderer
            .picking
            .encode_readback(&self.context.device, &mut encoder, px, py);
        self.context.submit(encoder);
        Some(
            self.renderer
                .picking
                .start_readback(&self.context.device, id, staging),
        )
    }

    pub(super) fn start_pick(
        &mut self,
        x: f32,
        y: f32,
        request: fn(PendingPick) -> PickRequest,
    ) {
        self.pending_pick = self.request_pick(x, y).map(request);
    }

    /// Whether a pick started by [`execute`](Self::execute) is still
    /// waiting for [`poll_picking`](Self::poll_picking).
    pub fn has_pending_pick(&self) -> bool {
        self.pending_pick.is_some()
    }

    /// Complete the pending non-blocking pick, if its readback has landed.
    ///
    /// Returns `None` while in flight, when nothing is pending, or when the
    /// result was superseded by a newer request.
    pub fn poll_picking(&mut self) -> Option<PickEvent> {
        let result = self.pending_pick.as_ref()?.pick.try_resolve()?;
        let request = self.pending_pick.take()?;
        let tag = resolved_tag(result)?;
        match request.purpose {
            PickPurpose::Hover => Some(PickEvent::Hovered(self.apply_hover(tag))),
            PickPurpose::Toggle => Some(match self.apply_toggle(tag) {
                Some((atom, selected)) => PickEvent::Toggled { atom, selected },
                None => PickEvent::Missed,
            }),
        }
    }

    /// Pick the atom under `(x, y)`, highlight it and return its identity.
    ///
    /// A result superseded by a newer request is discarded and yields
    /// `None`, as do positions outside the canvas and background pixels.
    pub async fn new_cursor_position(&mut self, x: f32, y: f32) -> Option<AtomInfo> {
        let Some(pick) = self.request_pick(x, y) else {
            let _ = self.molecule.set_hovered(None);
            return None;
        };
        let result = pick.resolve().await;
        let tag = resolved_tag(result)?;
        self.apply_hover(tag)
    }

    /// Flip the selection of the atom under `(x, y)`.
    ///
    /// Returns whether an atom was toggled.
    pub async fn toggle_atom_selection(&mut self, x: f32, y: f32) -> bool {
        let Some(pick) = self.request_pick(x, y) else {
            return false;
        };
        let result = pick.resolve().await;
        resolved_tag(result)
            .and_then(|tag| self.apply_toggle(tag))
            .is_some()
    }

    fn apply_hover(&mut self, tag: Option<u32>) -> Option<AtomInfo> {
        let _ = self.molecule.set_hovered(tag);
        tag.and_then(|t| self.molecule.atom(t)).map(crate::scene::Atom::info)
    }

    fn apply_toggle(&mut self, tag: Option<u32>) -> Option<(AtomInfo, bool)> {
        let tag = tag?;
        let selected = self.molecule.toggle_selection(tag)?;
        let atom = self.molecule.atom(tag)?.info();
        log::debug!("atom {} {}", atom.tag, if selected { "selected" } else { "deselected" });
        Some((atom, selected))
    }
}

/// Pixel under `(x, y)` on a canvas of `size`, `None` outside it.
fn canvas_pixel((width, height): (u32, u32), x: f32, y: f32) -> Option<(u32, u32)> {
    let inside = x.is_finite()
        && y.is_finite()
        && x >= 0.0
        && y >= 0.0
        && x < width as f32
        && y < height as f32;
    inside.then(|| {
        (
            (x as u32).min(width.saturating_sub(1)),
            (y as u32).min(height.saturating_sub(1)),
        )
    })
}

/// `Some(tag-or-background)` for a current result, `None` for stale or
/// failed reads.
fn resolved_tag(result: Result<PickOutcome, MolvisError>) -> Option<Option<u32>> {
    match result {
        Ok(PickOutcome::Resolved(tag)) => Some(tag),
        Ok(PickOutcome::Stale) => None,
        Err(e) => {
            log::warn!("pick failed: {e}");
            None
        }
    }
}

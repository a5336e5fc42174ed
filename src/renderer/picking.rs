//! Identity-color picking: off-screen target, 1x1 readback and the
//! newest-request-wins bookkeeping.
//!
//! Atom tags are encoded as `id = tag + 1` in the RGB channels of an
//! `Rgba8Unorm` target (red holds the low byte). Id 0 is the background.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::MolvisError;
use crate::gpu::texture::RenderTarget;

/// Largest encodable id; atom tags run `0..MAX_PICK_ID`.
pub const MAX_PICK_ID: u32 = 0x00FF_FFFF;

/// Picking color target format.
pub const PICKING_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Bytes per row of the readback copy (wgpu's copy alignment).
const READBACK_ROW_BYTES: u32 = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

/// Identity color for atom `tag`.
///
/// Tags at or above [`MAX_PICK_ID`] are rejected at load time, so they
/// never reach this function.
pub fn encode_tag(tag: u32) -> [f32; 4] {
    let id = (tag + 1) & MAX_PICK_ID;
    let channel = |shift: u32| ((id >> shift) & 0xFF) as f32 / 255.0;
    [channel(0), channel(8), channel(16), 1.0]
}

/// Atom tag for a read-back pixel, `None` for background.
pub fn decode_pixel(pixel: [u8; 4]) -> Option<u32> {
    let id = u32::from(pixel[0]) | u32::from(pixel[1]) << 8 | u32::from(pixel[2]) << 16;
    id.checked_sub(1)
}

/// Result of a completed pick request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    /// A newer request was issued before this one completed.
    Stale,
    /// The tag under the pixel, or `None` for background.
    Resolved(Option<u32>),
}

/// Monotonic request ids shared between the engine and in-flight reads.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    latest: Arc<AtomicU64>,
}

impl RequestTracker {
    /// Allocate a new id, superseding every earlier one.
    pub fn next(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `id` is still the newest request.
    pub fn is_latest(&self, id: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == id
    }
}

/// Off-screen picking targets and request ids.
pub struct Picking {
    color: RenderTarget,
    depth: RenderTarget,
    requests: RequestTracker,
    dirty: bool,
}

impl Picking {
    /// Targets sized to the surface.
    pub fn new(device: &wgpu::Device, size: (u32, u32)) -> Self {
        let (color, depth) = Self::create_targets(device, size);
        Self {
            color,
            depth,
            requests: RequestTracker::default(),
            dirty: true,
        }
    }

    fn create_targets(device: &wgpu::Device, size: (u32, u32)) -> (RenderTarget, RenderTarget) {
        let color = RenderTarget::new(
            device,
            "Picking Color",
            size,
            PICKING_FORMAT,
            wgpu::TextureUsages::COPY_SRC,
        );
        let depth = RenderTarget::depth(device, "Picking Depth", size);
        (color, depth)
    }

    /// Recreate both targets for a new surface size.
    pub fn resize(&mut self, device: &wgpu::Device, size: (u32, u32)) {
        let (color, depth) = Self::create_targets(device, size);
        self.color = color;
        self.depth = depth;
        self.dirty = true;
    }

    /// Picking color attachment view.
    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color.view
    }

    /// Picking depth attachment view.
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth.view
    }

    /// Target size in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.color.size()
    }

    /// Mark the picking image out of date.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Whether the picking image must be re-rendered before a readback.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record that the picking pass was just encoded.
    pub fn mark_rendered(&mut self) {
        self.dirty = false;
    }

    /// Allocate a new request id, superseding every earlier request.
    pub fn next_request_id(&self) -> u64 {
        self.requests.next()
    }

    /// Encode a copy of pixel `(x, y)` into a fresh staging buffer.
    ///
    /// Each request owns its buffer so an in-flight mapping never blocks a
    /// newer request.
    pub fn encode_readback(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        x: u32,
        y: u32,
    ) -> wgpu::Buffer {
        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Picking Staging Buffer"),
            size: u64::from(READBACK_ROW_BYTES),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.color.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(READBACK_ROW_BYTES),
                    rows_per_image: Some(1),
                },
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
        staging
    }

    /// Start mapping `staging` (after its copy was submitted).
    pub fn start_readback(
        &self,
        device: &wgpu::Device,
        id: u64,
        staging: wgpu::Buffer,
    ) -> PendingPick {
        let (sender, receiver) = flume::bounded(1);
        staging
            .slice(..)
            .map_async(wgpu::MapMode::Read, move |result| {
                let _ = sender.send(result);
            });
        PendingPick {
            id,
            requests: self.requests.clone(),
            buffer: staging,
            device: device.clone(),
            receiver,
        }
    }
}

/// An in-flight readback.
pub struct PendingPick {
    id: u64,
    requests: RequestTracker,
    buffer: wgpu::Buffer,
    device: wgpu::Device,
    receiver: flume::Receiver<Result<(), wgpu::BufferAsyncError>>,
}

impl PendingPick {
    /// Request id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wait for the readback.
    ///
    /// # Errors
    ///
    /// Returns [`MolvisError::DeviceLost`] if the mapping fails.
    pub async fn resolve(self) -> Result<PickOutcome, MolvisError> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = self.device.poll(wgpu::PollType::Wait);
        }
        let mapped = self
            .receiver
            .recv_async()
            .await
            .map_err(|_| MolvisError::DeviceLost("picking readback dropped".to_owned()))?;
        self.finish(mapped)
    }

    /// Poll without blocking; `None` while the copy is still in flight.
    pub fn try_resolve(&self) -> Option<Result<PickOutcome, MolvisError>> {
        let _ = self.device.poll(wgpu::PollType::Poll);
        match self.receiver.try_recv() {
            Ok(mapped) => Some(self.finish(mapped)),
            Err(flume::TryRecvError::Empty) => None,
            Err(flume::TryRecvError::Disconnected) => Some(Err(MolvisError::DeviceLost(
                "picking readback dropped".to_owned(),
            ))),
        }
    }

    fn finish(
        &self,
        mapped: Result<(), wgpu::BufferAsyncError>,
    ) -> Result<PickOutcome, MolvisError> {
        if !self.requests.is_latest(self.id) {
            log::debug!("discarding stale pick {}", self.id);
            return Ok(PickOutcome::Stale);
        }
        mapped.map_err(|e| MolvisError::DeviceLost(format!("picking readback: {e}")))?;
        let pixel = {
            let bytes = self.buffer.slice(..).get_mapped_range();
            [bytes[0], bytes[1], bytes[2], bytes[3]]
        };
        self.buffer.unmap();
        Ok(PickOutcome::Resolved(decode_pixel(pixel)))
    }
}

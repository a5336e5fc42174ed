//! Size-dependent render targets.

/// A render-target texture and its default view.
///
/// Every off-screen attachment the renderer owns (depth, WBOIT
/// accumulation/revealage, picking color and depth) is one of these, so
/// they can all be recreated together on resize.
pub struct RenderTarget {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl RenderTarget {
    /// Create a render target of the given size and format.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        (width, height): (u32, u32),
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
    ) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: usage | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            width,
            height,
        }
    }

    /// Depth attachment in the shared depth format.
    #[must_use]
    pub fn depth(device: &wgpu::Device, label: &str, size: (u32, u32)) -> Self {
        Self::new(
            device,
            label,
            size,
            DEPTH_FORMAT,
            wgpu::TextureUsages::empty(),
        )
    }

    /// Size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether this target can be rendered alongside a surface of `size`.
    pub fn matches(&self, size: (u32, u32)) -> bool {
        self.size() == (size.0.max(1), size.1.max(1))
    }
}

/// Depth format used by every pass.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

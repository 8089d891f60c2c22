//! Offscreen render targets and single-pixel readback.

use crate::error::SkylineError;
use crate::gpu::render_context::RenderContext;

/// Color format of every offscreen target.
pub const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
/// Depth format shared by the scene, sky, and picking pipelines.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

/// Staging buffer size for one-pixel readback. Buffer copies require
/// `bytes_per_row` to be a multiple of 256.
pub const PIXEL_STAGING_SIZE: u64 = 256;

/// An RGBA8 color texture with an optional depth attachment, usable both as a
/// render attachment and as a sampled input to later passes.
///
/// The color texture is created with `RENDER_ATTACHMENT | TEXTURE_BINDING |
/// COPY_SRC` so its pixels can be read back. Targets are immutable in size:
/// on resize the owner drops them and allocates new ones.
pub struct OffscreenTarget {
    label: String,
    width: u32,
    height: u32,
    color: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth: Option<(wgpu::Texture, wgpu::TextureView)>,
}

impl OffscreenTarget {
    /// Allocate a target. `size` defaults to the context's backing size.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::TargetAllocation`] for a zero-sized request or
    /// one exceeding the device's 2D texture limit.
    pub fn new(
        context: &RenderContext,
        label: &str,
        has_depth: bool,
        size: Option<(u32, u32)>,
    ) -> Result<Self, SkylineError> {
        let (width, height) = size.unwrap_or_else(|| context.backing_size());
        let max = context.device.limits().max_texture_dimension_2d;
        if width == 0 || height == 0 || width > max || height > max {
            return Err(SkylineError::TargetAllocation(format!(
                "{label}: {width}x{height} outside 1..={max}"
            )));
        }

        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let color = context.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("{label} Color")),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let color_view =
            color.create_view(&wgpu::TextureViewDescriptor::default());

        let depth = has_depth.then(|| {
            let texture =
                context.device.create_texture(&wgpu::TextureDescriptor {
                    label: Some(&format!("{label} Depth")),
                    size: extent,
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format: DEPTH_FORMAT,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                });
            let view =
                texture.create_view(&wgpu::TextureViewDescriptor::default());
            (texture, view)
        });

        log::debug!("allocated target {label} {width}x{height}");
        Ok(Self {
            label: label.to_owned(),
            width,
            height,
            color,
            color_view,
            depth,
        })
    }

    /// Target size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether a depth attachment was allocated.
    pub fn has_depth(&self) -> bool {
        self.depth.is_some()
    }

    /// The color texture.
    pub fn texture(&self) -> &wgpu::Texture {
        &self.color
    }

    /// A full view of the color texture, for sampling or attachment.
    pub fn view(&self) -> &wgpu::TextureView {
        &self.color_view
    }

    /// Open a render pass on this target, set the viewport to the full
    /// target, and run `draw` inside it.
    ///
    /// With `clear` set, color is cleared to it and depth to 1.0; otherwise
    /// both attachments are loaded. The pass ends when `draw` returns (or
    /// unwinds), so the previous target binding is always restored.
    pub fn bind<R>(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        clear: Option<wgpu::Color>,
        draw: impl FnOnce(&mut wgpu::RenderPass<'_>) -> R,
    ) -> R {
        let mut pass = begin_color_pass(
            encoder,
            &self.label,
            &self.color_view,
            self.depth.as_ref().map(|(_, view)| view),
            clear,
        );
        pass.set_viewport(
            0.0,
            0.0,
            self.width as f32,
            self.height as f32,
            0.0,
            1.0,
        );
        draw(&mut pass)
    }

    /// Read one RGBA8 pixel back to the CPU, blocking until the copy lands.
    ///
    /// Allocates a temporary staging buffer; hot paths keep their own and
    /// call [`copy_pixel_to_staging`] / [`map_staging_pixel`] directly.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::Readback`] if the coordinates fall outside
    /// the target or the buffer cannot be mapped.
    pub fn read_pixel(
        &self,
        context: &RenderContext,
        x: u32,
        y: u32,
    ) -> Result<[u8; 4], SkylineError> {
        if x >= self.width || y >= self.height {
            return Err(SkylineError::Readback(format!(
                "pixel ({x}, {y}) outside {}x{} target {}",
                self.width, self.height, self.label
            )));
        }
        let staging = create_pixel_staging(&context.device, "Readback");
        let mut encoder = context.create_encoder("Readback Encoder");
        copy_pixel_to_staging(&mut encoder, &self.color, x, y, &staging);
        context.submit(encoder);
        map_staging_pixel(&context.device, &staging)
    }

    /// Release the GPU textures immediately instead of on drop.
    pub fn destroy(self) {
        self.color.destroy();
        if let Some((depth, _)) = self.depth {
            depth.destroy();
        }
    }
}

/// Begin a render pass on an arbitrary color view, with an optional depth
/// view. Shared by [`OffscreenTarget::bind`] and passes that write the
/// presentation surface.
pub fn begin_color_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    label: &str,
    color: &wgpu::TextureView,
    depth: Option<&wgpu::TextureView>,
    clear: Option<wgpu::Color>,
) -> wgpu::RenderPass<'e> {
    let color_load = clear.map_or(wgpu::LoadOp::Load, wgpu::LoadOp::Clear);
    let depth_load = if clear.is_some() {
        wgpu::LoadOp::Clear(1.0)
    } else {
        wgpu::LoadOp::Load
    };
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: color,
            depth_slice: None,
            resolve_target: None,
            ops: wgpu::Operations {
                load: color_load,
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: depth.map(|view| {
            wgpu::RenderPassDepthStencilAttachment {
                view,
                depth_ops: Some(wgpu::Operations {
                    load: depth_load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
    })
}

/// Create a mappable staging buffer sized for one padded pixel row.
pub fn create_pixel_staging(device: &wgpu::Device, label: &str) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(&format!("{label} Staging Buffer")),
        size: PIXEL_STAGING_SIZE,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    })
}

/// Record a copy of pixel `(x, y)` from `texture` into the first four bytes
/// of `staging`. `(x, y)` are texture coordinates with row 0 at the top.
pub fn copy_pixel_to_staging(
    encoder: &mut wgpu::CommandEncoder,
    texture: &wgpu::Texture,
    x: u32,
    y: u32,
    staging: &wgpu::Buffer,
) {
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d { x, y, z: 0 },
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: staging,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(PIXEL_STAGING_SIZE as u32),
                rows_per_image: Some(1),
            },
        },
        wgpu::Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        },
    );
}

/// Map `staging`, wait for the GPU, and return its first four bytes.
///
/// # Errors
///
/// Returns [`SkylineError::Readback`] if polling or mapping fails.
pub fn map_staging_pixel(
    device: &wgpu::Device,
    staging: &wgpu::Buffer,
) -> Result<[u8; 4], SkylineError> {
    let slice = staging.slice(..4);
    let (sender, receiver) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = sender.send(result);
    });
    let _ = device
        .poll(wgpu::PollType::Wait)
        .map_err(|e| SkylineError::Readback(e.to_string()))?;

    match receiver.recv() {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(SkylineError::Readback(e.to_string())),
        Err(e) => return Err(SkylineError::Readback(e.to_string())),
    }

    let mut pixel = [0u8; 4];
    {
        let data = slice.get_mapped_range();
        pixel.copy_from_slice(&data[..4]);
    }
    staging.unmap();
    Ok(pixel)
}

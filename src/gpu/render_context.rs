use std::fmt;

/// Errors that can occur during GPU context initialization.
#[derive(Debug)]
pub enum RenderContextError {
    /// Failed to create a wgpu surface from the window handle.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    AdapterRequest(wgpu::RequestAdapterError),
    /// GPU device request failed (limits or features not met).
    DeviceRequest(wgpu::RequestDeviceError),
    /// Surface configuration not supported by the selected adapter.
    UnsupportedSurface,
}

impl fmt::Display for RenderContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SurfaceCreation(e) => {
                write!(f, "surface creation failed: {e}")
            }
            Self::AdapterRequest(e) => {
                write!(f, "no compatible GPU adapter found: {e}")
            }
            Self::DeviceRequest(e) => write!(f, "device request failed: {e}"),
            Self::UnsupportedSurface => {
                write!(f, "surface configuration not supported by adapter")
            }
        }
    }
}

impl std::error::Error for RenderContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SurfaceCreation(e) => Some(e),
            Self::AdapterRequest(e) => Some(e),
            Self::DeviceRequest(e) => Some(e),
            Self::UnsupportedSurface => None,
        }
    }
}

/// Texture format used when rendering without a presentation surface.
pub const HEADLESS_FORMAT: wgpu::TextureFormat =
    wgpu::TextureFormat::Rgba8Unorm;

/// Owns the core wgpu resources: device, queue, surface, and configuration.
///
/// The configuration width/height are the backing (device pixel) size of the
/// canvas. The client size, in which pointer coordinates arrive, is the
/// backing size divided by the display scale factor.
pub struct RenderContext {
    /// The wgpu logical device.
    pub device: wgpu::Device,
    /// The wgpu command queue.
    pub queue: wgpu::Queue,
    /// The window surface for presentation (`None` in headless mode).
    pub surface: Option<wgpu::Surface<'static>>,
    /// Current surface configuration (format, size, present mode).
    pub config: wgpu::SurfaceConfiguration,
    /// Device pixels per client (logical) pixel.
    pub scale_factor: f64,
}

impl RenderContext {
    /// Create a new render context from the given window surface target and
    /// initial backing size.
    ///
    /// # Errors
    ///
    /// Returns `RenderContextError` if surface creation, adapter request,
    /// device request, or surface configuration fails.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        initial_size: (u32, u32),
    ) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(RenderContextError::SurfaceCreation)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                power_preference: wgpu::PowerPreference::HighPerformance,
                ..Default::default()
            })
            .await
            .map_err(RenderContextError::AdapterRequest)?;

        let (device, queue) = request_device(&adapter).await?;

        let mut config = surface
            .get_default_config(&adapter, initial_size.0, initial_size.1)
            .ok_or(RenderContextError::UnsupportedSurface)?;
        config.width = initial_size.0.max(1);
        config.height = initial_size.1.max(1);
        config.present_mode = wgpu::PresentMode::Fifo;
        config.format = display_format(
            &surface.get_capabilities(&adapter).formats,
            config.format,
        );

        surface.configure(&device, &config);
        log::info!(
            "surface configured: {}x{} {:?}",
            config.width,
            config.height,
            config.format
        );

        Ok(Self {
            device,
            queue,
            surface: Some(surface),
            config,
            scale_factor: 1.0,
        })
    }

    /// Create a surfaceless render context of the given backing size.
    ///
    /// Used by tests and offline rendering; the final post-processing stage
    /// then targets an [`HEADLESS_FORMAT`] texture instead of a swapchain.
    ///
    /// # Errors
    ///
    /// Returns `RenderContextError` if no adapter is available or the
    /// device request fails.
    pub async fn headless(
        width: u32,
        height: u32,
    ) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: None,
                power_preference: wgpu::PowerPreference::HighPerformance,
                force_fallback_adapter: false,
            })
            .await
            .map_err(RenderContextError::AdapterRequest)?;

        let (device, queue) = request_device(&adapter).await?;
        Ok(Self::from_device(
            device,
            queue,
            HEADLESS_FORMAT,
            width.max(1),
            height.max(1),
        ))
    }

    /// Create a render context from an externally-owned device and queue
    /// (no surface, for texture-only / embedded rendering).
    #[must_use]
    pub fn from_device(
        device: wgpu::Device,
        queue: wgpu::Queue,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
        };
        Self {
            device,
            queue,
            surface: None,
            config,
            scale_factor: 1.0,
        }
    }

    /// The surface texture format.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Backing (device pixel) size of the canvas.
    pub fn backing_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Client (logical pixel) size of the canvas, the space pointer events
    /// are reported in.
    pub fn client_size(&self) -> (f32, f32) {
        let scale = self.scale_factor.max(f64::EPSILON);
        (
            (f64::from(self.config.width) / scale) as f32,
            (f64::from(self.config.height) / scale) as f32,
        )
    }

    /// Reconfigure the surface for the new backing size. Ignores zero-sized
    /// dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            if let Some(ref surface) = self.surface {
                surface.configure(&self.device, &self.config);
            }
        }
    }

    /// Set the display scale factor (device pixels per client pixel).
    pub fn set_scale_factor(&mut self, scale: f64) {
        if scale > 0.0 {
            self.scale_factor = scale;
        }
    }

    /// Acquire the next swapchain texture for rendering.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the surface is lost, outdated,
    /// or timed out, or if no surface is available (headless mode).
    pub fn get_next_frame(
        &self,
    ) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface
            .as_ref()
            .map_or(Err(wgpu::SurfaceError::Lost), |surface| {
                surface.get_current_texture()
            })
    }

    /// Returns `true` if this context has a presentation surface.
    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// Create a new command encoder for recording GPU commands.
    pub fn create_encoder(&self, label: &str) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some(label),
            })
    }

    /// Finish the encoder and submit its command buffer to the GPU queue.
    pub fn submit(&self, encoder: wgpu::CommandEncoder) {
        let _ = self.queue.submit(std::iter::once(encoder.finish()));
    }
}

/// Pick a non-sRGB surface format. Shading writes display-space values, so
/// an sRGB target would encode them a second time on store.
///
/// Prefers the first non-sRGB format the surface offers, falling back to
/// `fallback` with its sRGB suffix removed.
pub fn display_format(
    supported: &[wgpu::TextureFormat],
    fallback: wgpu::TextureFormat,
) -> wgpu::TextureFormat {
    supported
        .iter()
        .copied()
        .find(|format| !format.is_srgb())
        .unwrap_or_else(|| fallback.remove_srgb_suffix())
}

async fn request_device(
    adapter: &wgpu::Adapter,
) -> Result<(wgpu::Device, wgpu::Queue), RenderContextError> {
    let info = adapter.get_info();
    log::info!("using adapter {} ({:?})", info.name, info.backend);
    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("Primary Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults()
                .using_resolution(adapter.limits()),
            ..Default::default()
        })
        .await
        .map_err(RenderContextError::DeviceRequest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat;

    #[test]
    fn display_format_skips_srgb_formats() {
        let offered = [
            TextureFormat::Bgra8UnormSrgb,
            TextureFormat::Bgra8Unorm,
            TextureFormat::Rgba8UnormSrgb,
        ];
        assert_eq!(
            display_format(&offered, TextureFormat::Bgra8UnormSrgb),
            TextureFormat::Bgra8Unorm
        );
    }

    #[test]
    fn display_format_strips_srgb_from_fallback() {
        assert_eq!(
            display_format(
                &[TextureFormat::Rgba8UnormSrgb],
                TextureFormat::Rgba8UnormSrgb
            ),
            TextureFormat::Rgba8Unorm
        );
        assert_eq!(
            display_format(&[], TextureFormat::Bgra8UnormSrgb),
            TextureFormat::Bgra8Unorm
        );
    }

    #[test]
    fn headless_format_is_linear_storage() {
        assert!(!HEADLESS_FORMAT.is_srgb());
    }
}

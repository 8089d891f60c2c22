//! One-pixel id-buffer picking.

use glam::Mat4;

use crate::error::SkylineError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::{
    copy_pixel_to_staging, create_pixel_staging, map_staging_pixel,
    OffscreenTarget,
};
use crate::picking::frustum::{pixel_frustum, Perspective, Viewport};
use crate::picking::id::{decode_pick_id, PickResult};

/// Renders the id pass through a pixel-sized frustum into a 1x1 target and
/// reads the single pixel back.
///
/// Owns a 1x1 color + depth target and one reusable staging buffer. Reads
/// are blocking: `render` submits, waits for the GPU, and returns the
/// decoded hit in the same call.
pub struct PixelPicker {
    target: OffscreenTarget,
    staging: wgpu::Buffer,
    projection: Mat4,
    last: PickResult,
}

impl PixelPicker {
    /// Allocate the 1x1 target and staging buffer.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::TargetAllocation`] if the target cannot be
    /// created.
    pub fn new(context: &RenderContext) -> Result<Self, SkylineError> {
        let target =
            OffscreenTarget::new(context, "Picking", true, Some((1, 1)))?;
        let staging = create_pixel_staging(&context.device, "Picking");
        Ok(Self {
            target,
            staging,
            projection: Mat4::IDENTITY,
            last: PickResult::None,
        })
    }

    /// Pick at `pointer` (client coordinates, origin top-left).
    ///
    /// Clears the 1x1 target to zero, computes the pixel frustum for the
    /// backing pixel under the pointer, runs `render_id_pass` with it, and
    /// decodes the resulting pixel. A failed readback is logged and reported
    /// as [`PickResult::None`].
    pub fn render<F>(
        &mut self,
        context: &RenderContext,
        pointer: (f32, f32),
        perspective: &Perspective,
        render_id_pass: F,
    ) -> PickResult
    where
        F: FnOnce(&mut wgpu::RenderPass<'_>, &Mat4),
    {
        let viewport = Viewport {
            backing: context.backing_size(),
            client: context.client_size(),
        };
        self.projection = pixel_frustum(perspective, &viewport, pointer);

        let mut encoder = context.create_encoder("Picking Encoder");
        let projection = self.projection;
        self.target
            .bind(&mut encoder, Some(wgpu::Color::TRANSPARENT), |pass| {
                render_id_pass(pass, &projection);
            });
        copy_pixel_to_staging(
            &mut encoder,
            self.target.texture(),
            0,
            0,
            &self.staging,
        );
        context.submit(encoder);

        self.last = match map_staging_pixel(&context.device, &self.staging) {
            Ok(pixel) => decode_pick_id(pixel),
            Err(e) => {
                log::warn!("pick readback failed: {e}");
                PickResult::None
            }
        };
        self.last
    }

    /// Projection used by the most recent pick pass.
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Result of the most recent pick.
    pub fn last(&self) -> PickResult {
        self.last
    }
}

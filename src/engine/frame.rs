//! Per-frame pass ordering.

use super::CityEngine;
use crate::picking::id::PickResult;

impl CityEngine {
    /// Render one frame if the frame limiter allows it, timing it against
    /// the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the swapchain frame cannot be
    /// acquired.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        if !self.timing.should_render() {
            return Ok(());
        }
        let frame_number = self.timing.frame_count();
        let _ = self.timing.end_frame();
        self.draw(frame_number)
    }

    /// Render one frame with an externally measured `delta_time` (seconds).
    ///
    /// Order: input snapshot, camera, pick pass, selection highlight,
    /// scene pass into the primary target, post-processing chain into the
    /// surface (or the headless present target).
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the swapchain frame cannot be
    /// acquired. Steady-state GPU errors are not checked.
    pub fn render_frame(
        &mut self,
        delta_time: f32,
        frame_number: u64,
    ) -> Result<(), wgpu::SurfaceError> {
        self.timing.record(delta_time);
        self.draw(frame_number)
    }

    fn draw(&mut self, frame_number: u64) -> Result<(), wgpu::SurfaceError> {
        let snapshot = self.input.take_frame(self.context.client_size());
        self.camera.apply(&snapshot);
        let view = self.camera.view_matrix();
        let projection = self.camera.projection_matrix();

        self.picked = if self.options.picking.enabled {
            let scene = &self.scene;
            let queue = &self.context.queue;
            self.picker.render(
                &self.context,
                self.input.pointer(),
                &self.camera.perspective(),
                |pass, pick_projection| {
                    scene.update_picking_camera(queue, view, *pick_projection);
                    scene.render_picking(pass);
                },
            )
        } else {
            PickResult::None
        };
        let selected = if self.options.picking.highlight {
            self.picked
        } else {
            PickResult::None
        };
        self.scene
            .set_selected_instance(&self.context.queue, selected);
        self.scene.update_camera(
            &self.context.queue,
            view,
            self.camera.view_direction_matrix(),
            projection,
        );

        let frame = if self.context.has_surface() {
            Some(self.context.get_next_frame()?)
        } else {
            None
        };
        let final_view = match (&frame, &self.targets.present) {
            (Some(frame), _) => frame
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default()),
            (None, Some(present)) => present.view().clone(),
            (None, None) => return Err(wgpu::SurfaceError::Lost),
        };

        let mut encoder = self.context.create_encoder("Frame Encoder");
        let scene = &self.scene;
        self.targets.primary.bind(
            &mut encoder,
            Some(wgpu::Color::BLACK),
            |pass| scene.render(pass),
        );
        self.targets.chain.run(&mut encoder, &final_view);
        self.context.submit(encoder);

        if let Some(frame) = frame {
            frame.present();
        }

        let interval = self.options.display.stats_interval.max(1);
        if frame_number % interval == interval / 2 {
            log::debug!(
                "frame {frame_number}: {:.1} fps, picked {:?}",
                self.timing.fps(),
                self.picked
            );
        }
        Ok(())
    }
}
